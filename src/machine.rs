//! The vending machine controller.
//!
//! Coordinates the inventory, the payment processor and the ledger. The
//! controller owns the customer's balance: it is zero while the machine is
//! idle and positive once money has been inserted, and returns to zero after
//! every purchase or refund.
//!
//! A purchase attempt is checked in a fixed order: product lookup, stock,
//! then funds. The first failing check decides the reported reason. A failed
//! attempt never changes stock, balance or the cash reserve; it only appends a
//! failure record to the ledger. A sale whose price would overflow the cash
//! reserve or the recorded revenue is refused as well.

use crate::drink::{Category, Drink};
use crate::error::{Result, VendingError};
use crate::inventory::Inventory;
use crate::ledger::{
    AttemptOutcome, FailureReason, Ledger, PurchaseAttempt, Statistics, TransactionRecord,
};
use crate::money::Money;
use crate::payment::{CashPayment, PaymentMethod, PaymentProcessor};
use log::{debug, info, warn};

/// Outcome of selecting an item.
#[derive(Debug, Clone)]
pub struct Purchase {
    pub success: bool,

    /// Customer-facing message.
    pub message: String,

    /// The ledger record for a successful sale; `None` when rejected.
    pub transaction: Option<TransactionRecord>,

    /// Why the attempt was rejected, if it was.
    pub reason: Option<FailureReason>,
}

impl Purchase {
    /// Change returned by a successful sale.
    pub fn change(&self) -> Option<Money> {
        self.transaction.as_ref().map(|t| t.change)
    }
}

/// Read-only view of one product for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub code: String,
    pub name: String,
    pub price: Money,
    pub quantity: u32,
    pub category: Category,
    pub description: String,
}

/// The vending machine.
#[derive(Debug)]
pub struct VendingMachine {
    inventory: Inventory,
    payment: Box<dyn PaymentProcessor>,
    ledger: Ledger,

    /// Money inserted and not yet spent or refunded.
    balance: Money,

    /// Takings from completed sales, emptied by [`cash_out`](Self::cash_out).
    cash_reserve: Money,
}

impl VendingMachine {
    /// Creates a machine that takes cash and starts with an empty ledger.
    pub fn new(inventory: Inventory) -> Self {
        VendingMachine {
            inventory,
            payment: Box::new(CashPayment),
            ledger: Ledger::new(),
            balance: Money::ZERO,
            cash_reserve: Money::ZERO,
        }
    }

    /// Replaces the payment processor.
    pub fn with_payment(mut self, payment: Box<dyn PaymentProcessor>) -> Self {
        self.payment = payment;
        self
    }

    /// Replaces the ledger, e.g. to continue an existing history.
    pub fn with_ledger(mut self, ledger: Ledger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn cash_reserve(&self) -> Money {
        self.cash_reserve
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment.method()
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Direct stock access for admin restocking and new products.
    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Adds `amount` to the balance and returns the new balance.
    pub fn insert_money(&mut self, amount: Money) -> Result<Money> {
        if !amount.is_positive() {
            return Err(VendingError::InvalidAmount(amount));
        }

        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(VendingError::BalanceOverflow(amount))?;
        debug!("Inserted ${}, balance ${}", amount, self.balance);
        Ok(self.balance)
    }

    /// Attempts to buy the product stocked under `code`.
    pub fn select_item(&mut self, code: &str) -> Purchase {
        let (drink, in_stock) = match self.inventory.entry(code) {
            Some(item) => (item.drink.clone(), item.quantity > 0),
            None => {
                return self.reject(
                    code,
                    None,
                    FailureReason::InvalidProduct,
                    format!("Invalid product code: {}", code),
                );
            }
        };

        if !in_stock {
            let message = format!("{} is out of stock", drink.name());
            return self.reject(code, Some(&drink), FailureReason::OutOfStock, message);
        }

        let payment = self.payment.evaluate(self.balance, drink.price());
        if !payment.sufficient {
            let message = format!(
                "Insufficient funds. {} costs ${}, but you only have ${}",
                drink.name(),
                drink.price(),
                self.balance
            );
            return self.reject(code, Some(&drink), FailureReason::InsufficientFunds, message);
        }

        let takings = self
            .cash_reserve
            .checked_add(drink.price())
            .zip(self.ledger.revenue().checked_add(drink.price()));
        let Some((reserve, _)) = takings else {
            warn!("Cash reserve full, refusing sale of {}", code);
            let message = format!("{} cannot be sold: cash reserve is full", drink.name());
            return self.reject(code, Some(&drink), FailureReason::ReserveFull, message);
        };

        if let Err(e) = self.inventory.decrement(code) {
            warn!("Stock changed during sale of {}: {}", code, e);
            let message = format!("{} is out of stock", drink.name());
            return self.reject(code, Some(&drink), FailureReason::OutOfStock, message);
        }

        let paid = self.balance;
        self.balance = Money::ZERO;
        self.cash_reserve = reserve;

        let record = self.ledger.record(PurchaseAttempt {
            code: code.to_string(),
            item_name: drink.name().to_string(),
            price: drink.price(),
            paid,
            outcome: AttemptOutcome::Dispensed {
                change: payment.change,
            },
        });

        info!(
            "{}: sold {} for ${}, change ${}",
            record.reference(),
            drink.name(),
            drink.price(),
            payment.change
        );

        Purchase {
            success: true,
            message: format!("Dispensing {}. Change: ${}", drink.name(), payment.change),
            transaction: Some(record),
            reason: None,
        }
    }

    /// Returns the whole balance to the customer.
    pub fn refund(&mut self) -> Money {
        let amount = self.balance;
        self.balance = Money::ZERO;

        if amount.is_positive() {
            info!("Refunded ${}", amount);
        }
        amount
    }

    /// Empties the cash reserve and returns its contents.
    pub fn cash_out(&mut self) -> Money {
        let amount = self.cash_reserve;
        self.cash_reserve = Money::ZERO;
        info!("Cashed out ${}", amount);
        amount
    }

    /// Every product in stocking order.
    pub fn menu(&self) -> Vec<MenuItem> {
        self.inventory
            .list_all()
            .iter()
            .map(|item| MenuItem {
                code: item.drink.code().to_string(),
                name: item.drink.name().to_string(),
                price: item.drink.price(),
                quantity: item.quantity,
                category: item.drink.category(),
                description: item.drink.description(),
            })
            .collect()
    }

    pub fn statistics(&self) -> Statistics {
        self.ledger.statistics()
    }

    fn reject(
        &mut self,
        code: &str,
        drink: Option<&Drink>,
        reason: FailureReason,
        message: String,
    ) -> Purchase {
        let record = self.ledger.record(PurchaseAttempt {
            code: code.to_string(),
            item_name: drink.map(|d| d.name().to_string()).unwrap_or_default(),
            price: drink.map(|d| d.price()).unwrap_or(Money::ZERO),
            paid: self.balance,
            outcome: AttemptOutcome::Rejected(reason),
        });

        debug!("{}: rejected {} ({})", record.reference(), code, reason);

        Purchase {
            success: false,
            message,
            transaction: None,
            reason: Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TransactionStatus;
    use crate::payment::PaymentOutcome;
    use std::str::FromStr;

    /// Takes exact payment only and never gives change.
    #[derive(Debug)]
    struct ExactPayment;

    impl PaymentProcessor for ExactPayment {
        fn method(&self) -> PaymentMethod {
            PaymentMethod::Cash
        }

        fn evaluate(&self, balance: Money, price: Money) -> PaymentOutcome {
            PaymentOutcome {
                sufficient: balance == price,
                change: Money::ZERO,
            }
        }
    }

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn machine() -> VendingMachine {
        let mut inventory = Inventory::new();
        inventory
            .add_item(Drink::soda("A1", "Cola", money("1.50"), false).unwrap(), 5)
            .unwrap();
        inventory
            .add_item(Drink::water("C1", "Water", money("1.00"), false).unwrap(), 0)
            .unwrap();
        VendingMachine::new(inventory)
    }

    #[test]
    fn test_starts_idle() {
        let vm = machine();
        assert!(vm.balance().is_zero());
        assert!(vm.cash_reserve().is_zero());
        assert!(vm.ledger().is_empty());
        assert_eq!(vm.payment_method(), PaymentMethod::Cash);
    }

    #[test]
    fn test_insert_money_accumulates() {
        let mut vm = machine();
        assert_eq!(vm.insert_money(money("1.00")).unwrap(), money("1.00"));
        assert_eq!(vm.insert_money(money("0.25")).unwrap(), money("1.25"));
    }

    #[test]
    fn test_insert_non_positive_is_rejected() {
        let mut vm = machine();
        vm.insert_money(money("1.00")).unwrap();

        assert!(matches!(
            vm.insert_money(Money::ZERO),
            Err(VendingError::InvalidAmount(_))
        ));
        assert!(matches!(
            vm.insert_money(money("-2.00")),
            Err(VendingError::InvalidAmount(_))
        ));
        assert_eq!(vm.balance(), money("1.00"));
    }

    #[test]
    fn test_successful_purchase() {
        let mut vm = machine();
        vm.insert_money(money("2.00")).unwrap();

        let purchase = vm.select_item("A1");

        assert!(purchase.success);
        assert_eq!(purchase.message, "Dispensing Cola. Change: $0.50");
        assert_eq!(purchase.change(), Some(money("0.50")));
        let record = purchase.transaction.unwrap();
        assert_eq!(record.status, TransactionStatus::Success);
        assert_eq!(record.charged, money("1.50"));
        assert_eq!(record.paid, money("2.00"));

        assert_eq!(vm.inventory().quantity("A1").unwrap(), 4);
        assert!(vm.balance().is_zero());
        assert_eq!(vm.cash_reserve(), money("1.50"));
        assert_eq!(vm.ledger().len(), 1);
    }

    #[test]
    fn test_unknown_code_is_recorded_failure() {
        let mut vm = machine();
        vm.insert_money(money("5.00")).unwrap();

        let purchase = vm.select_item("Z9");

        assert!(!purchase.success);
        assert_eq!(purchase.reason, Some(FailureReason::InvalidProduct));
        assert!(purchase.transaction.is_none());
        assert_eq!(purchase.message, "Invalid product code: Z9");
        assert_eq!(vm.balance(), money("5.00"));

        let record = vm.ledger().history().last().unwrap();
        assert_eq!(record.reason, Some(FailureReason::InvalidProduct));
        assert_eq!(record.item_name, "");
    }

    #[test]
    fn test_out_of_stock_checked_before_funds() {
        let mut vm = machine();

        let purchase = vm.select_item("C1");

        assert!(!purchase.success);
        assert_eq!(purchase.reason, Some(FailureReason::OutOfStock));
        assert_eq!(purchase.message, "Water is out of stock");
        assert_eq!(vm.inventory().quantity("C1").unwrap(), 0);
    }

    #[test]
    fn test_insufficient_funds_leaves_state_untouched() {
        let mut vm = machine();
        vm.insert_money(money("1.00")).unwrap();

        let purchase = vm.select_item("A1");

        assert!(!purchase.success);
        assert_eq!(purchase.reason, Some(FailureReason::InsufficientFunds));
        assert_eq!(
            purchase.message,
            "Insufficient funds. Cola costs $1.50, but you only have $1.00"
        );
        assert_eq!(vm.inventory().quantity("A1").unwrap(), 5);
        assert_eq!(vm.balance(), money("1.00"));
        assert!(vm.cash_reserve().is_zero());
    }

    #[test]
    fn test_custom_processor_decides_funds_and_change() {
        let mut vm = machine().with_payment(Box::new(ExactPayment));

        vm.insert_money(money("2.00")).unwrap();
        let purchase = vm.select_item("A1");
        assert_eq!(purchase.reason, Some(FailureReason::InsufficientFunds));
        assert_eq!(vm.balance(), money("2.00"));
        assert_eq!(vm.inventory().quantity("A1").unwrap(), 5);

        vm.refund();
        vm.insert_money(money("1.50")).unwrap();
        let purchase = vm.select_item("A1");
        assert!(purchase.success);
        assert_eq!(purchase.change(), Some(Money::ZERO));
        assert_eq!(vm.cash_reserve(), money("1.50"));
    }

    #[test]
    fn test_insert_past_balance_limit_is_rejected() {
        let mut vm = machine();
        let max = money("79228162514264337593543950335");
        vm.insert_money(max).unwrap();

        assert!(matches!(
            vm.insert_money(money("1")),
            Err(VendingError::BalanceOverflow(_))
        ));
        assert_eq!(vm.balance(), max);
    }

    #[test]
    fn test_sale_refused_when_reserve_would_overflow() {
        let max = money("79228162514264337593543950335");
        let mut inventory = Inventory::new();
        inventory
            .add_item(Drink::soda("G1", "Gold Cola", max, false).unwrap(), 2)
            .unwrap();
        let mut vm = VendingMachine::new(inventory);

        vm.insert_money(max).unwrap();
        assert!(vm.select_item("G1").success);

        vm.insert_money(max).unwrap();
        let purchase = vm.select_item("G1");

        assert!(!purchase.success);
        assert_eq!(purchase.reason, Some(FailureReason::ReserveFull));
        assert_eq!(purchase.message, "Gold Cola cannot be sold: cash reserve is full");
        assert_eq!(vm.balance(), max);
        assert_eq!(vm.cash_reserve(), max);
        assert_eq!(vm.inventory().quantity("G1").unwrap(), 1);
        assert_eq!(vm.statistics().revenue, max);
    }

    #[test]
    fn test_refund() {
        let mut vm = machine();
        vm.insert_money(money("3.00")).unwrap();

        assert_eq!(vm.refund(), money("3.00"));
        assert!(vm.balance().is_zero());
        assert!(vm.refund().is_zero());
        assert!(vm.ledger().is_empty());
    }

    #[test]
    fn test_cash_out_empties_reserve() {
        let mut vm = machine();
        vm.insert_money(money("2.00")).unwrap();
        vm.select_item("A1");

        assert_eq!(vm.cash_out(), money("1.50"));
        assert!(vm.cash_reserve().is_zero());
        assert!(vm.cash_out().is_zero());
    }

    #[test]
    fn test_menu_view() {
        let vm = machine();
        let menu = vm.menu();

        assert_eq!(menu.len(), 2);
        assert_eq!(
            menu[0],
            MenuItem {
                code: "A1".to_string(),
                name: "Cola".to_string(),
                price: money("1.50"),
                quantity: 5,
                category: Category::Soda,
                description: "Carbonated soft drink".to_string(),
            }
        );
        assert_eq!(menu[1].code, "C1");
    }

    #[test]
    fn test_with_ledger_continues_ids() {
        let mut ledger = Ledger::new();
        ledger.record(PurchaseAttempt {
            code: "A1".to_string(),
            item_name: "Cola".to_string(),
            price: money("1.50"),
            paid: money("1.50"),
            outcome: AttemptOutcome::Dispensed {
                change: Money::ZERO,
            },
        });

        let mut vm = machine().with_ledger(ledger);
        vm.insert_money(money("1.50")).unwrap();
        let record = vm.select_item("A1").transaction.unwrap();

        assert_eq!(record.id, 2);
        assert_eq!(vm.statistics().successful, 2);
    }
}
