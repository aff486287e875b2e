//! Initial stock for the machine.
//!
//! Stock comes either from the built-in catalog or from a CSV file with the
//! columns `code,category,name,price,quantity,attribute`. The attribute column
//! is interpreted per category: `diet` for sodas, the fruit for juices and
//! `sparkling` for waters.

use crate::drink::{Category, Drink, DrinkKind};
use crate::error::Result;
use crate::inventory::Inventory;
use crate::money::Money;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

/// Raw stock row as read from CSV.
#[derive(Debug, Deserialize)]
pub struct StockRecord {
    pub code: String,
    pub category: String,
    pub name: String,
    pub price: Money,
    pub quantity: u32,
    pub attribute: Option<String>,
}

impl StockRecord {
    /// Parses the raw row into a catalog entry.
    pub fn parse(&self) -> Result<Drink> {
        let category = Category::from_str(&self.category)?;
        let attribute = self
            .attribute
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty());

        let kind = match category {
            Category::Soda => DrinkKind::Soda {
                diet: is_flag_set(attribute, "diet"),
            },
            Category::Juice => DrinkKind::Juice {
                fruit: attribute.unwrap_or("Mixed").to_string(),
            },
            Category::Water => DrinkKind::Water {
                sparkling: is_flag_set(attribute, "sparkling"),
            },
        };

        Drink::new(self.code.trim().to_uppercase(), self.name.trim(), self.price, kind)
    }
}

fn is_flag_set(attribute: Option<&str>, flag: &str) -> bool {
    attribute.is_some_and(|a| {
        let a = a.to_lowercase();
        a == flag || a == "true" || a == "yes" || a == "y"
    })
}

/// Builds an inventory from CSV stock rows.
///
/// Malformed rows and duplicate codes are logged at warn level and skipped.
pub fn load_stock<R: Read>(reader: R) -> Result<Inventory> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut inventory = Inventory::new();

    for (row_idx, result) in csv_reader.deserialize::<StockRecord>().enumerate() {
        let row_num = row_idx + 2; // 1-indexed, accounting for header row

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Row {}: CSV parse error: {}", row_num, e);
                continue;
            }
        };

        let drink = match record.parse() {
            Ok(drink) => drink,
            Err(e) => {
                warn!("Row {}: {}", row_num, e);
                continue;
            }
        };

        if let Err(e) = inventory.add_item(drink, record.quantity) {
            warn!("Row {}: {}, ignoring", row_num, e);
        }
    }

    debug!("Loaded {} products from stock file", inventory.len());
    Ok(inventory)
}

/// Opens and loads a stock file.
pub fn load_stock_file(path: &Path) -> Result<Inventory> {
    let file = File::open(path)?;
    load_stock(BufReader::new(file))
}

/// The factory stock: four sodas, three juices and two waters.
pub fn default_inventory() -> Result<Inventory> {
    let mut inventory = Inventory::new();
    let c = Money::from_cents;

    inventory.add_item(Drink::soda("A1", "Coca-Cola", c(150), false)?, 5)?;
    inventory.add_item(Drink::soda("A2", "Pepsi", c(150), false)?, 4)?;
    inventory.add_item(Drink::soda("A3", "Diet Coke", c(150), true)?, 3)?;
    inventory.add_item(Drink::soda("A4", "Sprite", c(125), false)?, 6)?;

    inventory.add_item(Drink::juice("B1", "Orange Juice", c(200), "Orange")?, 3)?;
    inventory.add_item(Drink::juice("B2", "Apple Juice", c(200), "Apple")?, 3)?;
    inventory.add_item(Drink::juice("B3", "Grape Juice", c(225), "Grape")?, 2)?;

    inventory.add_item(Drink::water("C1", "Spring Water", c(100), false)?, 10)?;
    inventory.add_item(Drink::water("C2", "Sparkling Water", c(125), true)?, 5)?;

    Ok(inventory)
}
