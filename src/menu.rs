//! Interactive text menu.
//!
//! A [`Session`] reads choices line by line from any `BufRead` and writes to
//! any `Write`, so the same loop serves a terminal and tests. End of input
//! ends the session as if the customer had quit.

use crate::drink::Drink;
use crate::error::Result;
use crate::ledger::{Statistics, TransactionRecord};
use crate::machine::VendingMachine;
use crate::money::Money;
use std::io::{BufRead, Write};
use std::str::FromStr;

const WIDTH: usize = 60;

/// One customer session against a machine.
pub struct Session<'a, R, W> {
    machine: &'a mut VendingMachine,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(machine: &'a mut VendingMachine, input: R, output: W) -> Self {
        Session {
            machine,
            input,
            output,
        }
    }

    /// Runs the customer menu until the customer leaves or input ends.
    pub fn run(&mut self) -> Result<()> {
        self.header("VENDING MACHINE SIMULATOR")?;

        loop {
            self.section("OPTIONS")?;
            writeln!(self.output, "1. View Menu")?;
            writeln!(self.output, "2. Insert Money")?;
            writeln!(self.output, "3. Select Item")?;
            writeln!(self.output, "4. View Statistics")?;
            writeln!(self.output, "5. Refund & Exit")?;
            writeln!(self.output, "6. Admin Mode")?;
            writeln!(self.output, "7. Quit")?;

            let Some(choice) = self.prompt("\nEnter choice (1-7): ")? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => self.show_menu()?,
                "2" => self.insert_money()?,
                "3" => self.select_item()?,
                "4" => self.show_statistics(self.machine.statistics())?,
                "5" => {
                    self.refund()?;
                    self.info("Thank you for using our vending machine. Goodbye!")?;
                    return Ok(());
                }
                "6" => self.admin()?,
                "7" => {
                    self.info("Goodbye!")?;
                    return Ok(());
                }
                _ => self.error("Invalid choice. Please enter 1-7.")?,
            }
        }
    }

    fn show_menu(&mut self) -> Result<()> {
        self.header("VENDING MACHINE MENU")?;
        writeln!(self.output, "\nYour Balance: ${}\n", self.machine.balance())?;
        writeln!(
            self.output,
            "{:<6} | {:<18} | {:<8} | {:<6} | Status",
            "Code", "Name", "Price", "Stock"
        )?;
        writeln!(self.output, "{}", "-".repeat(WIDTH))?;

        for item in self.machine.menu() {
            let status = if item.quantity > 0 {
                "Available"
            } else {
                "OUT OF STOCK"
            };
            writeln!(
                self.output,
                "{:<6} | {:<18} | ${:<7} | {:<6} | {}",
                item.code, item.name, item.price, item.quantity, status
            )?;
        }
        Ok(())
    }

    fn insert_money(&mut self) -> Result<()> {
        let Some(raw) = self.prompt("Enter amount to insert: $")? else {
            return Ok(());
        };

        let amount = match Money::from_str(&raw) {
            Ok(amount) => amount,
            Err(_) => return self.error("Please enter a valid number."),
        };

        match self.machine.insert_money(amount) {
            Ok(balance) => self.success(&format!(
                "Inserted ${}. New balance: ${}",
                amount, balance
            )),
            Err(e) => self.error(&e.to_string()),
        }
    }

    fn select_item(&mut self) -> Result<()> {
        self.show_menu()?;

        let Some(code) = self.prompt("\nEnter product code: ")? else {
            return Ok(());
        };
        let code = code.to_uppercase();

        let purchase = self.machine.select_item(&code);
        if !purchase.success {
            return self.error(&purchase.message);
        }

        self.success(&purchase.message)?;
        if let Some(record) = &purchase.transaction {
            let description = self
                .machine
                .inventory()
                .get(&code)
                .map(Drink::description)
                .unwrap_or_default();
            self.receipt(record, &description)?;
        }
        Ok(())
    }

    fn receipt(&mut self, record: &TransactionRecord, description: &str) -> Result<()> {
        self.header("RECEIPT")?;
        writeln!(self.output, "Transaction ID: {}", record.reference())?;
        writeln!(
            self.output,
            "Time: {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(self.output, "\nItem: {}", record.item_name)?;
        if !description.is_empty() {
            writeln!(self.output, "Description: {}", description)?;
        }
        writeln!(self.output, "\nPrice: ${}", record.price)?;
        writeln!(self.output, "Paid: ${}", record.paid)?;
        writeln!(self.output, "Change: ${}", record.change)?;
        writeln!(self.output, "\nStatus: {}", record.status)?;
        writeln!(self.output, "\nThank you for your purchase!")?;
        writeln!(self.output, "{}", "=".repeat(WIDTH))?;
        Ok(())
    }

    fn refund(&mut self) -> Result<()> {
        let amount = self.machine.refund();
        if amount.is_positive() {
            self.info(&format!("Refunding ${}", amount))?;
        }
        Ok(())
    }

    fn show_statistics(&mut self, stats: Statistics) -> Result<()> {
        self.header("TRANSACTION STATISTICS")?;
        writeln!(self.output, "Total Transactions: {}", stats.total)?;
        writeln!(self.output, "Successful: {}", stats.successful)?;
        writeln!(self.output, "Failed: {}", stats.failed)?;
        writeln!(
            self.output,
            "Success Rate: {:.1}%",
            stats.success_rate * 100.0
        )?;
        writeln!(self.output, "Total Revenue: ${}", stats.revenue)?;
        Ok(())
    }

    fn admin(&mut self) -> Result<()> {
        self.header("ADMIN PANEL")?;

        loop {
            self.section("ADMIN OPTIONS")?;
            writeln!(self.output, "1. View Inventory")?;
            writeln!(self.output, "2. Restock Item")?;
            writeln!(self.output, "3. View Transactions")?;
            writeln!(self.output, "4. View Statistics")?;
            writeln!(self.output, "5. Add New Item")?;
            writeln!(self.output, "6. Export Transactions (CSV)")?;
            writeln!(self.output, "7. Cash Out")?;
            writeln!(self.output, "8. Exit Admin Panel")?;

            let Some(choice) = self.prompt("\nEnter choice (1-8): ")? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => self.view_inventory()?,
                "2" => self.restock()?,
                "3" => self.view_transactions()?,
                "4" => {
                    self.show_statistics(self.machine.statistics())?;
                    let summary = self.machine.inventory().summary();
                    writeln!(self.output, "\n--- Inventory Summary ---")?;
                    writeln!(self.output, "Total items in stock: {}", summary.total_units)?;
                    writeln!(self.output, "Products out of stock: {}", summary.out_of_stock)?;
                    writeln!(self.output, "Unique products: {}", summary.unique_products)?;
                }
                "5" => self.add_item()?,
                "6" => self.machine.ledger().write_csv(&mut self.output)?,
                "7" => {
                    let amount = self.machine.cash_out();
                    self.success(&format!("Cashed out ${}", amount))?;
                }
                "8" => return self.info("Exiting admin panel..."),
                _ => self.error("Invalid choice. Please enter 1-8.")?,
            }
        }
    }

    fn view_inventory(&mut self) -> Result<()> {
        self.header("INVENTORY MANAGEMENT")?;
        let items = self.machine.menu();
        if items.is_empty() {
            return self.warning("Inventory is empty!");
        }

        writeln!(
            self.output,
            "\n{:<6} | {:<18} | {:<8} | {:<5} | {:<10} | Description",
            "Code", "Name", "Price", "Qty", "Category"
        )?;
        writeln!(self.output, "{}", "-".repeat(85))?;
        for item in &items {
            writeln!(
                self.output,
                "{:<6} | {:<18} | ${:<7} | {:<5} | {:<10} | {}",
                item.code,
                item.name,
                item.price,
                item.quantity,
                item.category,
                item.description
            )?;
        }
        writeln!(self.output, "{}", "-".repeat(85))?;
        writeln!(self.output, "Total unique products: {}", items.len())?;
        Ok(())
    }

    fn restock(&mut self) -> Result<()> {
        self.view_inventory()?;

        let Some(code) = self.prompt("\nEnter item code to restock: ")? else {
            return Ok(());
        };
        let code = code.to_uppercase();
        if !self.machine.inventory().contains(&code) {
            return self.error(&format!("Item {} not found!", code));
        }

        let Some(raw) = self.prompt("Enter quantity to add: ")? else {
            return Ok(());
        };
        let Ok(amount) = raw.parse::<u32>() else {
            return self.error("Please enter a valid number!");
        };

        match self.machine.inventory_mut().restock(&code, amount) {
            Ok(quantity) => {
                self.success(&format!("Restocked {}. New quantity: {}", code, quantity))
            }
            Err(e) => self.error(&e.to_string()),
        }
    }

    fn view_transactions(&mut self) -> Result<()> {
        self.header("TRANSACTION HISTORY")?;
        if self.machine.ledger().is_empty() {
            return self.warning("No transactions recorded yet.");
        }

        writeln!(
            self.output,
            "\n{:<10} | {:<19} | {:<15} | {:<7} | {:<7} | {:<7} | Status",
            "ID", "Time", "Item", "Price", "Paid", "Change"
        )?;
        writeln!(self.output, "{}", "-".repeat(95))?;
        for record in self.machine.ledger().history() {
            let status = match record.reason {
                Some(reason) => format!("{} ({})", record.status, reason),
                None => record.status.to_string(),
            };
            writeln!(
                self.output,
                "{:<10} | {:<19} | {:<15} | ${:<6} | ${:<6} | ${:<6} | {}",
                record.reference(),
                record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                record.item_name,
                record.price,
                record.paid,
                record.change,
                status
            )?;
        }
        writeln!(self.output, "{}", "-".repeat(95))?;
        writeln!(
            self.output,
            "Total transactions: {}",
            self.machine.ledger().len()
        )?;
        Ok(())
    }

    fn add_item(&mut self) -> Result<()> {
        self.header("ADD NEW ITEM")?;
        writeln!(self.output, "\nSelect drink type:")?;
        writeln!(self.output, "1. Soda")?;
        writeln!(self.output, "2. Juice")?;
        writeln!(self.output, "3. Water")?;

        let Some(kind) = self.prompt("Enter choice (1-3): ")? else {
            return Ok(());
        };
        if !matches!(kind.as_str(), "1" | "2" | "3") {
            return self.error("Invalid drink type!");
        }

        let Some(code) = self.prompt("Enter product code (e.g., D1): ")? else {
            return Ok(());
        };
        let code = code.to_uppercase();
        if self.machine.inventory().contains(&code) {
            return self.error(&format!("Item with code {} already exists!", code));
        }

        let Some(name) = self.prompt("Enter product name: ")? else {
            return Ok(());
        };
        let Some(raw_price) = self.prompt("Enter price: $")? else {
            return Ok(());
        };
        let Some(raw_quantity) = self.prompt("Enter initial stock quantity: ")? else {
            return Ok(());
        };

        let (Ok(price), Ok(quantity)) = (Money::from_str(&raw_price), raw_quantity.parse::<u32>())
        else {
            return self.error("Invalid input! Please enter valid numbers for price and quantity.");
        };

        let drink = match kind.as_str() {
            "1" => {
                let Some(answer) = self.prompt("Is it diet? (y/n): ")? else {
                    return Ok(());
                };
                Drink::soda(&code, &name, price, is_yes(&answer))
            }
            "2" => {
                let Some(fruit) = self.prompt("Enter fruit type (e.g., Orange): ")? else {
                    return Ok(());
                };
                Drink::juice(&code, &name, price, &fruit)
            }
            _ => {
                let Some(answer) = self.prompt("Is it sparkling? (y/n): ")? else {
                    return Ok(());
                };
                Drink::water(&code, &name, price, is_yes(&answer))
            }
        };

        let added = drink.and_then(|drink| self.machine.inventory_mut().add_item(drink, quantity));
        match added {
            Ok(()) => self.success(&format!(
                "Added {} ({}) to inventory with {} units!",
                name, code, quantity
            )),
            Err(e) => self.error(&e.to_string()),
        }
    }

    /// Writes `text` and reads one trimmed line; `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn header(&mut self, title: &str) -> Result<()> {
        let rule = "=".repeat(WIDTH);
        writeln!(self.output, "\n{}\n{:^width$}\n{}", rule, title, rule, width = WIDTH)?;
        Ok(())
    }

    fn section(&mut self, title: &str) -> Result<()> {
        writeln!(self.output, "\n{}\n{}", title, "-".repeat(title.len()))?;
        Ok(())
    }

    fn success(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "[SUCCESS] {}", message)?;
        Ok(())
    }

    fn error(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "[ERROR] {}", message)?;
        Ok(())
    }

    fn warning(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "[WARNING] {}", message)?;
        Ok(())
    }

    fn info(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "[INFO] {}", message)?;
        Ok(())
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
