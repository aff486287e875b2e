//! Command-line configuration.

use crate::catalog;
use crate::error::{Result, VendingError};
use crate::machine::VendingMachine;
use crate::payment::PaymentMethod;
use std::path::PathBuf;
use std::str::FromStr;

pub const USAGE: &str = "Usage: vending-machine [--stock <file.csv>] [--payment <method>]";

/// Startup settings for the machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// CSV stock file; the built-in catalog is used when absent.
    pub stock: Option<PathBuf>,

    pub payment: PaymentMethod,
}

impl Config {
    /// Parses arguments, excluding the program name.
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--stock" => {
                    let path = args.next().ok_or_else(|| missing_value("--stock"))?;
                    config.stock = Some(PathBuf::from(path));
                }
                "--payment" => {
                    let method = args.next().ok_or_else(|| missing_value("--payment"))?;
                    config.payment = PaymentMethod::from_str(&method)?;
                }
                other => {
                    return Err(VendingError::InvalidConfig(format!(
                        "unexpected argument '{}'. {}",
                        other, USAGE
                    )));
                }
            }
        }

        Ok(config)
    }

    /// Builds a machine stocked and wired according to this configuration.
    pub fn build_machine(&self) -> Result<VendingMachine> {
        let inventory = match &self.stock {
            Some(path) => catalog::load_stock_file(path)?,
            None => catalog::default_inventory()?,
        };

        Ok(VendingMachine::new(inventory).with_payment(self.payment.processor()))
    }
}

fn missing_value(flag: &str) -> VendingError {
    VendingError::InvalidConfig(format!("{} requires a value. {}", flag, USAGE))
}
