//! Append-only record of purchase attempts.
//!
//! Every call to select an item produces exactly one [`TransactionRecord`],
//! whether the sale went through or not. Records are never edited or removed.

use crate::error::Result;
use crate::money::Money;
use chrono::{DateTime, SecondsFormat, Utc};
use log::warn;
use std::fmt;
use std::io::Write;

/// Final status of a purchase attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Success,
    Failure,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Success => f.write_str("SUCCESS"),
            TransactionStatus::Failure => f.write_str("FAILED"),
        }
    }
}

/// Why a purchase attempt was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    InvalidProduct,
    OutOfStock,
    InsufficientFunds,
    ReserveFull,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            FailureReason::InvalidProduct => "invalid product",
            FailureReason::OutOfStock => "out of stock",
            FailureReason::InsufficientFunds => "insufficient funds",
            FailureReason::ReserveFull => "cash reserve full",
        };
        f.write_str(reason)
    }
}

/// How an attempt ended, as reported to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Item dispensed; `change` was returned to the customer.
    Dispensed { change: Money },

    /// Nothing dispensed and nothing charged.
    Rejected(FailureReason),
}

/// A purchase attempt before it has been assigned an id and timestamp.
#[derive(Debug, Clone)]
pub struct PurchaseAttempt {
    pub code: String,
    pub item_name: String,
    pub price: Money,

    /// Balance inserted at the time of the attempt.
    pub paid: Money,

    pub outcome: AttemptOutcome,
}

/// An immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Monotonic sequence number, starting at 1.
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub code: String,
    pub item_name: String,
    pub price: Money,
    pub paid: Money,

    /// Amount kept by the machine: the price on success, zero otherwise.
    pub charged: Money,
    pub change: Money,
    pub status: TransactionStatus,
    pub reason: Option<FailureReason>,
}

impl TransactionRecord {
    /// Display form of the id, e.g. `TXN-0007`.
    pub fn reference(&self) -> String {
        format!("TXN-{:04}", self.id)
    }

    pub fn is_success(&self) -> bool {
        self.status == TransactionStatus::Success
    }
}

/// Aggregate figures derived from the full history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,

    /// Sum of `charged` over successful records.
    pub revenue: Money,

    /// `successful / total`, or 0 when nothing has been recorded.
    pub success_rate: f64,
}

/// In-memory transaction history.
#[derive(Debug)]
pub struct Ledger {
    records: Vec<TransactionRecord>,
    next_id: u64,

    /// Running sum of `charged` over successful records.
    revenue: Money,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Ledger {
            records: Vec::new(),
            next_id: 1,
            revenue: Money::ZERO,
        }
    }

    /// Appends an attempt with a fresh id and the current time.
    pub fn record(&mut self, attempt: PurchaseAttempt) -> TransactionRecord {
        let (status, reason, charged, change) = match attempt.outcome {
            AttemptOutcome::Dispensed { change } => {
                (TransactionStatus::Success, None, attempt.price, change)
            }
            AttemptOutcome::Rejected(reason) => (
                TransactionStatus::Failure,
                Some(reason),
                Money::ZERO,
                Money::ZERO,
            ),
        };

        let id = self.next_id;
        self.next_id += 1;

        let record = TransactionRecord {
            id,
            timestamp: Utc::now(),
            code: attempt.code,
            item_name: attempt.item_name,
            price: attempt.price,
            paid: attempt.paid,
            charged,
            change,
            status,
            reason,
        };
        match self.revenue.checked_add(charged) {
            Some(revenue) => self.revenue = revenue,
            None => warn!(
                "{}: revenue total out of range, ${} not counted",
                record.reference(),
                charged
            ),
        }

        self.records.push(record.clone());
        record
    }

    /// Iterates over every record in insertion order.
    pub fn history(&self) -> std::slice::Iter<'_, TransactionRecord> {
        self.records.iter()
    }

    pub fn successful(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.records.iter().filter(|r| r.is_success())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total charged across all successful records.
    pub fn revenue(&self) -> Money {
        self.revenue
    }

    /// Computes statistics from the full history.
    pub fn statistics(&self) -> Statistics {
        let total = self.records.len();
        let successful = self.successful().count();
        let success_rate = if total == 0 {
            0.0
        } else {
            successful as f64 / total as f64
        };

        Statistics {
            total,
            successful,
            failed: total - successful,
            revenue: self.revenue,
            success_rate,
        }
    }

    /// Writes the full history as CSV.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id", "timestamp", "code", "item", "price", "paid", "charged", "change", "status",
            "reason",
        ])?;

        for record in &self.records {
            csv_writer.write_record([
                record.reference(),
                record.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
                record.code.clone(),
                record.item_name.clone(),
                record.price.to_string(),
                record.paid.to_string(),
                record.charged.to_string(),
                record.change.to_string(),
                record.status.to_string(),
                record.reason.map(|r| r.to_string()).unwrap_or_default(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
