//! Validation of the bodies sent to create or replace a transaction.

use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    transaction::{TransactionType, date::parse_date, money::Money, money::RawAmount},
};

/// The category given to transactions that do not name one.
pub const DEFAULT_CATEGORY: &str = "Outros";

/// The body of a request to create or replace a transaction, as received.
///
/// Every field is optional here so that a missing field produces a clear
/// validation message instead of a generic JSON error.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionForm {
    /// What the transaction was for.
    pub description: Option<String>,
    /// A JSON number or numeric string.
    pub amount: Option<RawAmount>,
    /// "income" or "expense", in any case.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// A calendar date or date-time.
    pub date: Option<String>,
    /// An optional category.
    pub category: Option<String>,
}

/// A transaction body that passed validation and can be written to the database.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTransaction {
    /// The trimmed, non-empty description.
    pub description: String,
    /// The amount rounded to cents, always greater than zero.
    pub amount: Money,
    /// Whether the money was earned or spent.
    pub kind: TransactionType,
    /// The calendar date of the transaction.
    pub date: Date,
    /// The trimmed category, [DEFAULT_CATEGORY] if none was given.
    pub category: String,
}

impl TryFrom<TransactionForm> for ValidatedTransaction {
    type Error = Error;

    fn try_from(form: TransactionForm) -> Result<Self, Self::Error> {
        let description = form
            .description
            .as_deref()
            .map(str::trim)
            .filter(|description| !description.is_empty())
            .ok_or_else(|| Error::Validation("description is required".to_owned()))?
            .to_owned();

        let amount = form
            .amount
            .as_ref()
            .ok_or_else(|| Error::Validation("amount is required".to_owned()))?
            .to_money()?;

        let kind = form
            .kind
            .as_deref()
            .and_then(TransactionType::parse)
            .ok_or_else(|| {
                Error::Validation("type must be either \"income\" or \"expense\"".to_owned())
            })?;

        let date = form
            .date
            .as_deref()
            .and_then(parse_date)
            .ok_or_else(|| Error::Validation("date must be a valid date".to_owned()))?;

        let category = form
            .category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
            .to_owned();

        Ok(Self {
            description,
            amount,
            kind,
            date,
            category,
        })
    }
}
