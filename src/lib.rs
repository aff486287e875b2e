//! # Vending Machine
//!
//! A vending machine simulator: drink inventory, cash payments, dispensing
//! and a transaction ledger, driven through an interactive text menu.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: Money uses 2 decimal places via `rust_decimal`
//! - **Failure isolation**: A rejected purchase never changes stock or balance
//! - **Complete history**: Every purchase attempt is recorded, successful or not
//! - **Pluggable payments**: Payment evaluation sits behind a trait
//!
//! ## Example
//!
//! ```
//! use std::str::FromStr;
//! use vending_machine::{Drink, Inventory, Money, VendingMachine};
//!
//! let mut inventory = Inventory::new();
//! let cola = Drink::soda("A1", "Cola", Money::from_str("1.50").unwrap(), false).unwrap();
//! inventory.add_item(cola, 5).unwrap();
//!
//! let mut machine = VendingMachine::new(inventory);
//! machine.insert_money(Money::from_str("2.00").unwrap()).unwrap();
//! let purchase = machine.select_item("A1");
//! assert!(purchase.success);
//! assert_eq!(purchase.message, "Dispensing Cola. Change: $0.50");
//! ```

pub mod catalog;
pub mod config;
pub mod drink;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod machine;
pub mod menu;
pub mod money;
pub mod payment;

pub use config::Config;
pub use drink::{Category, Drink, DrinkKind};
pub use error::{Result, VendingError};
pub use inventory::{Inventory, InventorySummary, StockItem};
pub use ledger::{FailureReason, Ledger, Statistics, TransactionRecord, TransactionStatus};
pub use machine::{MenuItem, Purchase, VendingMachine};
pub use menu::Session;
pub use money::Money;
pub use payment::{CashPayment, PaymentMethod, PaymentOutcome, PaymentProcessor};
