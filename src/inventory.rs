//! Stock tracking for the machine.
//!
//! Maps product codes to a catalog entry and a unit count. Listing order is
//! the order in which products were added.

use crate::drink::Drink;
use crate::error::{Result, VendingError};
use log::debug;
use std::collections::HashMap;

/// A catalog entry together with its current stock level.
///
/// # Invariants
///
/// - `quantity` never goes negative
/// - `quantity` only decreases through a confirmed sale
#[derive(Debug, Clone)]
pub struct StockItem {
    pub drink: Drink,
    pub quantity: u32,
}

/// Aggregate stock figures for the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventorySummary {
    /// Sum of all units in the machine.
    pub total_units: u64,

    /// Number of products with zero units.
    pub out_of_stock: usize,

    /// Number of distinct product codes.
    pub unique_products: usize,
}

/// In-memory stock keyed by product code.
#[derive(Debug, Default)]
pub struct Inventory {
    items: Vec<StockItem>,
    index: HashMap<String, usize>,
}

impl Inventory {
    /// Creates an empty inventory.
    pub fn new() -> Self {
        Inventory {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Adds a new product with an initial stock level.
    ///
    /// Codes are unique; re-adding an existing code fails with
    /// [`VendingError::DuplicateProduct`] instead of overwriting it.
    pub fn add_item(&mut self, drink: Drink, quantity: u32) -> Result<()> {
        if self.index.contains_key(drink.code()) {
            return Err(VendingError::DuplicateProduct(drink.code().to_string()));
        }

        debug!("Adding {} ({}) with {} units", drink.name(), drink.code(), quantity);
        self.index.insert(drink.code().to_string(), self.items.len());
        self.items.push(StockItem { drink, quantity });
        Ok(())
    }

    /// Looks up the stock record for `code`, if any.
    pub fn entry(&self, code: &str) -> Option<&StockItem> {
        self.index.get(code).map(|&idx| &self.items[idx])
    }

    /// Looks up the catalog entry for `code`.
    pub fn get(&self, code: &str) -> Result<&Drink> {
        self.item(code).map(|item| &item.drink)
    }

    /// Returns `true` if at least one unit of `code` is left.
    pub fn has_stock(&self, code: &str) -> Result<bool> {
        Ok(self.item(code)?.quantity > 0)
    }

    /// Returns the number of units left for `code`.
    pub fn quantity(&self, code: &str) -> Result<u32> {
        Ok(self.item(code)?.quantity)
    }

    /// Removes one unit of `code` after a confirmed sale.
    pub fn decrement(&mut self, code: &str) -> Result<()> {
        let item = self.item_mut(code)?;
        if item.quantity == 0 {
            return Err(VendingError::OutOfStock(item.drink.name().to_string()));
        }

        item.quantity -= 1;
        Ok(())
    }

    /// Adds `amount` units to an existing product and returns the new level.
    pub fn restock(&mut self, code: &str, amount: u32) -> Result<u32> {
        if amount == 0 {
            return Err(VendingError::InvalidQuantity {
                code: code.to_string(),
                quantity: amount,
            });
        }

        let item = self.item_mut(code)?;
        item.quantity = item
            .quantity
            .checked_add(amount)
            .ok_or_else(|| VendingError::InvalidQuantity {
                code: code.to_string(),
                quantity: amount,
            })?;
        debug!("Restocked {} by {}, now {}", code, amount, item.quantity);
        Ok(item.quantity)
    }

    /// Snapshot of every product in insertion order.
    pub fn list_all(&self) -> &[StockItem] {
        &self.items
    }

    /// Catalog entries that currently have stock.
    pub fn available(&self) -> impl Iterator<Item = &Drink> {
        self.items
            .iter()
            .filter(|item| item.quantity > 0)
            .map(|item| &item.drink)
    }

    pub fn summary(&self) -> InventorySummary {
        InventorySummary {
            total_units: self.items.iter().map(|item| u64::from(item.quantity)).sum(),
            out_of_stock: self.items.iter().filter(|item| item.quantity == 0).count(),
            unique_products: self.items.len(),
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn item(&self, code: &str) -> Result<&StockItem> {
        self.entry(code)
            .ok_or_else(|| VendingError::InvalidProduct(code.to_string()))
    }

    fn item_mut(&mut self, code: &str) -> Result<&mut StockItem> {
        match self.index.get(code) {
            Some(&idx) => Ok(&mut self.items[idx]),
            None => Err(VendingError::InvalidProduct(code.to_string())),
        }
    }
}
