//! Payment evaluation.
//!
//! A [`PaymentProcessor`] decides whether a balance covers a price and how much
//! change is owed. Processors are pure: they never touch the machine's balance,
//! which is owned by the controller.

use crate::error::VendingError;
use crate::money::Money;
use std::fmt;
use std::str::FromStr;

/// Result of evaluating a balance against a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentOutcome {
    /// `true` if the balance covers the price.
    pub sufficient: bool,

    /// Change owed; zero when the balance is insufficient.
    pub change: Money,
}

/// A payment strategy.
pub trait PaymentProcessor: fmt::Debug {
    /// Which method this processor implements.
    fn method(&self) -> PaymentMethod;

    /// Evaluates `balance` against `price` without side effects.
    fn evaluate(&self, balance: Money, price: Money) -> PaymentOutcome;
}

/// Cash payments: any balance at or above the price is accepted and the
/// difference is returned as change.
#[derive(Debug, Clone, Copy, Default)]
pub struct CashPayment;

impl PaymentProcessor for CashPayment {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Cash
    }

    fn evaluate(&self, balance: Money, price: Money) -> PaymentOutcome {
        if balance >= price {
            PaymentOutcome {
                sufficient: true,
                change: balance - price,
            }
        } else {
            PaymentOutcome {
                sufficient: false,
                change: Money::ZERO,
            }
        }
    }
}

/// Configurable payment method selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    Cash,
}

impl PaymentMethod {
    /// Builds the processor for this method.
    pub fn processor(self) -> Box<dyn PaymentProcessor> {
        match self {
            PaymentMethod::Cash => Box::new(CashPayment),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => f.write_str("cash"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = VendingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            other => Err(VendingError::InvalidConfig(format!(
                "unsupported payment method '{}'",
                other
            ))),
        }
    }
}
