//! Translates the optional query string of the transaction list into a
//! parameterized SQL predicate scoped to the caller.

use rusqlite::{Connection, params_from_iter, types::Value};
use serde::Deserialize;
use time::Date;

use crate::{
    Error, UserID,
    transaction::{
        Transaction, TransactionType,
        core::{TRANSACTION_COLUMNS, map_transaction_row},
        date::parse_date,
    },
};

/// The query string accepted by the transaction list, as received.
///
/// Empty values are treated the same as missing ones.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionQueryParams {
    /// "income" or "expense", in any case. Other values are ignored.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// The first day of the date range, inclusive.
    pub start_date: Option<String>,
    /// The last day of the date range, inclusive.
    pub end_date: Option<String>,
    /// "date" or "amount", in any case. Other values are ignored.
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    /// "asc" or "desc", in any case. Defaults to ascending.
    pub order: Option<String>,
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// The first day in the range.
    pub start: Date,
    /// The last day in the range.
    pub end: Date,
}

impl DateRange {
    /// Build a date range from the raw `start_date` and `end_date` query values.
    ///
    /// Returns `Ok(None)` unless both values are present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] if either date fails to parse or if the
    /// start comes after the end.
    pub fn from_params(start: Option<&str>, end: Option<&str>) -> Result<Option<Self>, Error> {
        let (Some(start), Some(end)) = (non_empty(start), non_empty(end)) else {
            return Ok(None);
        };

        let (Some(start), Some(end)) = (parse_date(start), parse_date(end)) else {
            return Err(Error::Validation("invalid date range".to_owned()));
        };

        if start > end {
            return Err(Error::Validation(
                "invalid date range: start_date must not be after end_date".to_owned(),
            ));
        }

        Ok(Some(Self { start, end }))
    }
}

/// The column to sort transactions by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Sort by the date of the transaction.
    Date,
    /// Sort by the amount of the transaction.
    Amount,
}

impl SortField {
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        if text.eq_ignore_ascii_case("date") {
            Some(Self::Date)
        } else if text.eq_ignore_ascii_case("amount") {
            Some(Self::Amount)
        } else {
            None
        }
    }

    fn column(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
        }
    }
}

/// The order to sort transactions in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    #[default]
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}

impl SortOrder {
    fn parse(text: &str) -> Self {
        if text.trim().eq_ignore_ascii_case("desc") {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    fn keyword(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// The validated filters and ordering for a transaction query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransactionFilter {
    /// Only include transactions of this type.
    pub kind: Option<TransactionType>,
    /// Only include transactions dated within this range.
    pub date_range: Option<DateRange>,
    /// Sort by this column, then by ID. Sorted by ID alone if `None`.
    pub sort: Option<(SortField, SortOrder)>,
}

impl TryFrom<&TransactionQueryParams> for TransactionFilter {
    type Error = Error;

    fn try_from(params: &TransactionQueryParams) -> Result<Self, Self::Error> {
        let date_range =
            DateRange::from_params(params.start_date.as_deref(), params.end_date.as_deref())?;

        let kind = non_empty(params.kind.as_deref()).and_then(TransactionType::parse);

        let sort = non_empty(params.sort_by.as_deref())
            .and_then(SortField::parse)
            .map(|field| {
                let order = params
                    .order
                    .as_deref()
                    .map(SortOrder::parse)
                    .unwrap_or_default();
                (field, order)
            });

        Ok(Self {
            kind,
            date_range,
            sort,
        })
    }
}

impl TransactionFilter {
    /// Build the `WHERE` clause and its bound values for the transactions of `user_id`.
    ///
    /// Only fixed column names are written into the SQL text. Every value
    /// from the client is bound as a parameter.
    pub fn where_clause(&self, user_id: UserID) -> (String, Vec<Value>) {
        let mut conditions = vec!["user_id = ?"];
        let mut params = vec![Value::Integer(user_id.as_i64())];

        if let Some(kind) = self.kind {
            conditions.push("type = ?");
            params.push(Value::Text(kind.as_str().to_owned()));
        }

        if let Some(range) = self.date_range {
            conditions.push("date BETWEEN ? AND ?");
            params.push(Value::Text(range.start.to_string()));
            params.push(Value::Text(range.end.to_string()));
        }

        (format!("WHERE {}", conditions.join(" AND ")), params)
    }

    /// Build the `ORDER BY` clause.
    ///
    /// Ties are broken by ID so that the order is stable across queries.
    pub fn order_clause(&self) -> String {
        match self.sort {
            Some((field, order)) => {
                format!("ORDER BY {} {}, id ASC", field.column(), order.keyword())
            }
            None => "ORDER BY id ASC".to_owned(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

/// Get the transactions of `user_id` that match `filter`, in the order it asks for.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn query_transactions(
    user_id: UserID,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let (where_clause, params) = filter.where_clause(user_id);
    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" {where_clause} {}",
        filter.order_clause()
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params.iter()), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}
