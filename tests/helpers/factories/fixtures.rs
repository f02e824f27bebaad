use crate::engine::core::event::{EventPayload, StreamType};
use serde::{Deserialize, Serialize};

pub struct Account;

impl StreamType for Account {
    const NAME: &'static str = "Account";
}

pub struct Order;

impl StreamType for Order {
    const NAME: &'static str = "Order";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposited {
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Withdrawn {
    pub amount: u64,
}

/// Deliberately left out of the default store registrations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Closed {
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_t")]
pub enum LedgerEvent {
    Deposited(Deposited),
    Withdrawn(Withdrawn),
    Closed(Closed),
}

impl LedgerEvent {
    pub fn deposit(amount: u64) -> Self {
        LedgerEvent::Deposited(Deposited { amount })
    }

    pub fn withdraw(amount: u64) -> Self {
        LedgerEvent::Withdrawn(Withdrawn { amount })
    }

    pub fn close(reason: &str) -> Self {
        LedgerEvent::Closed(Closed {
            reason: reason.to_string(),
        })
    }
}

impl EventPayload for LedgerEvent {
    fn discriminator(&self) -> &str {
        match self {
            LedgerEvent::Deposited(_) => "Deposited",
            LedgerEvent::Withdrawn(_) => "Withdrawn",
            LedgerEvent::Closed(_) => "Closed",
        }
    }
}
