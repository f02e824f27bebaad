use crate::engine::errors::IdError;

/// A fixed-width unsigned subfield of a 64-bit word.
///
/// Fields never reach bit 63, so every packed value stays a valid
/// non-negative signed 64-bit integer as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    position: u32,
    size: u32,
}

impl BitField {
    pub const fn new(position: u32, size: u32) -> Self {
        assert!(size > 0, "bit field must be at least one bit wide");
        assert!(position + size <= 63, "bit field must end below bit 63");
        Self { position, size }
    }

    #[inline]
    pub const fn position(&self) -> u32 {
        self.position
    }

    #[inline]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Largest value the field can hold.
    #[inline]
    pub const fn max_value(&self) -> u64 {
        (1u64 << self.size) - 1
    }

    /// Shifts `value` into position. Values wider than the field are rejected.
    pub fn set_field(&self, value: u64) -> Result<u64, IdError> {
        if value > self.max_value() {
            return Err(IdError::FieldOverflow {
                value,
                size: self.size,
            });
        }
        Ok(value << self.position)
    }

    #[inline]
    pub const fn get_field(&self, packed: u64) -> u64 {
        (packed >> self.position) & self.max_value()
    }
}
