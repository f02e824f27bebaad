use super::bit_field::BitField;
use crate::engine::errors::IdError;

#[test]
fn set_field_shifts_value_into_position() {
    let field = BitField::new(16, 9);
    assert_eq!(field.set_field(1).unwrap(), 1 << 16);
    assert_eq!(field.set_field(511).unwrap(), 511 << 16);
}

#[test]
fn get_field_masks_neighbours() {
    let low = BitField::new(0, 16);
    let mid = BitField::new(16, 9);
    let packed = mid.set_field(300).unwrap() | low.set_field(65_535).unwrap();

    assert_eq!(low.get_field(packed), 65_535);
    assert_eq!(mid.get_field(packed), 300);
}

#[test]
fn rejects_values_wider_than_field() {
    let field = BitField::new(25, 7);
    assert_eq!(field.max_value(), 127);
    assert!(field.set_field(127).is_ok());
    assert_eq!(
        field.set_field(128),
        Err(IdError::FieldOverflow {
            value: 128,
            size: 7
        })
    );
}

#[test]
fn widest_field_ends_below_sign_bit() {
    let field = BitField::new(32, 31);
    let packed = field.set_field(field.max_value()).unwrap();
    assert_eq!(packed >> 63, 0);
    assert_eq!(field.get_field(packed), (1 << 31) - 1);
}

#[test]
#[should_panic(expected = "bit field must end below bit 63")]
fn construction_rejects_overlapping_sign_bit() {
    let _ = BitField::new(40, 24);
}
