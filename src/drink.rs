//! Drink catalog entries.
//!
//! Every product shares a common field set (code, name, price) plus one
//! category-specific attribute carried by [`DrinkKind`].

use crate::error::{Result, VendingError};
use crate::money::Money;
use std::fmt;
use std::str::FromStr;

/// Product category, derived from the drink's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Soda,
    Juice,
    Water,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Soda => "Soda",
            Category::Juice => "Juice",
            Category::Water => "Water",
        };
        f.pad(name)
    }
}

impl FromStr for Category {
    type Err = VendingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "soda" => Ok(Category::Soda),
            "juice" => Ok(Category::Juice),
            "water" => Ok(Category::Water),
            other => Err(VendingError::InvalidConfig(format!(
                "unknown drink category '{}'",
                other
            ))),
        }
    }
}

/// Category-specific attribute of a drink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrinkKind {
    /// Carbonated soft drink.
    Soda { diet: bool },

    /// Fruit juice.
    Juice { fruit: String },

    /// Bottled mineral water.
    Water { sparkling: bool },
}

impl DrinkKind {
    pub fn category(&self) -> Category {
        match self {
            DrinkKind::Soda { .. } => Category::Soda,
            DrinkKind::Juice { .. } => Category::Juice,
            DrinkKind::Water { .. } => Category::Water,
        }
    }
}

/// An immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drink {
    code: String,
    name: String,
    price: Money,
    kind: DrinkKind,
}

impl Drink {
    /// Creates a catalog entry.
    ///
    /// Fails with [`VendingError::InvalidPrice`] unless `price` is positive.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        kind: DrinkKind,
    ) -> Result<Self> {
        if !price.is_positive() {
            return Err(VendingError::InvalidPrice(price));
        }

        Ok(Drink {
            code: code.into(),
            name: name.into(),
            price,
            kind,
        })
    }

    pub fn soda(code: &str, name: &str, price: Money, diet: bool) -> Result<Self> {
        Drink::new(code, name, price, DrinkKind::Soda { diet })
    }

    pub fn juice(code: &str, name: &str, price: Money, fruit: &str) -> Result<Self> {
        Drink::new(
            code,
            name,
            price,
            DrinkKind::Juice {
                fruit: fruit.to_string(),
            },
        )
    }

    pub fn water(code: &str, name: &str, price: Money, sparkling: bool) -> Result<Self> {
        Drink::new(code, name, price, DrinkKind::Water { sparkling })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn kind(&self) -> &DrinkKind {
        &self.kind
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Human-readable description built from the category attribute.
    pub fn description(&self) -> String {
        match &self.kind {
            DrinkKind::Soda { diet: true } => "Diet Carbonated soft drink".to_string(),
            DrinkKind::Soda { diet: false } => "Carbonated soft drink".to_string(),
            DrinkKind::Juice { fruit } => format!("Fresh {} juice", fruit),
            DrinkKind::Water { sparkling: true } => "Sparkling mineral water".to_string(),
            DrinkKind::Water { sparkling: false } => "Still mineral water".to_string(),
        }
    }
}

impl fmt::Display for Drink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (${})", self.name, self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn test_soda_description_and_category() {
        let cola = Drink::soda("A1", "Cola", money("1.50"), false).unwrap();
        let diet = Drink::soda("A3", "Diet Coke", money("1.50"), true).unwrap();

        assert_eq!(cola.category(), Category::Soda);
        assert_eq!(cola.description(), "Carbonated soft drink");
        assert_eq!(diet.description(), "Diet Carbonated soft drink");
    }

    #[test]
    fn test_juice_description_uses_fruit() {
        let oj = Drink::juice("B1", "Orange Juice", money("2.00"), "Orange").unwrap();
        assert_eq!(oj.category(), Category::Juice);
        assert_eq!(oj.description(), "Fresh Orange juice");
    }

    #[test]
    fn test_water_description() {
        let still = Drink::water("C1", "Spring Water", money("1.00"), false).unwrap();
        let fizzy = Drink::water("C2", "Sparkling Water", money("1.25"), true).unwrap();

        assert_eq!(still.category(), Category::Water);
        assert_eq!(still.description(), "Still mineral water");
        assert_eq!(fizzy.description(), "Sparkling mineral water");
    }

    #[test]
    fn test_rejects_non_positive_price() {
        assert!(matches!(
            Drink::soda("A1", "Cola", Money::ZERO, false),
            Err(VendingError::InvalidPrice(_))
        ));
        assert!(matches!(
            Drink::water("C1", "Water", money("-1.00"), false),
            Err(VendingError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_display() {
        let cola = Drink::soda("A1", "Cola", money("1.5"), false).unwrap();
        assert_eq!(cola.to_string(), "Cola ($1.50)");
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(Category::from_str(" SODA ").unwrap(), Category::Soda);
        assert_eq!(Category::from_str("juice").unwrap(), Category::Juice);
        assert!(Category::from_str("coffee").is_err());
    }
}
