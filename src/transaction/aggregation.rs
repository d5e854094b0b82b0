//! Totals computed over a user's transactions.

use rusqlite::{Connection, params_from_iter};
use serde::Serialize;

use crate::{
    Error, UserID,
    transaction::{
        TransactionType,
        filter::{DateRange, TransactionFilter},
        money::Money,
    },
};

/// A user's total income and expenses, and the difference between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// The sum of all income.
    pub total_income: Money,
    /// The sum of all expenses.
    pub total_expense: Money,
    /// `total_income` minus `total_expense`.
    pub balance: Money,
}

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    /// The category name.
    pub category: String,
    /// The sum of the expenses in the category.
    pub value: Money,
}

/// Sum the income and expenses of `user_id`.
///
/// Every total is zero for a user with no transactions.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_summary(user_id: UserID, connection: &Connection) -> Result<Summary, Error> {
    let (total_income, total_expense) = connection.query_row(
        "SELECT
            COALESCE(SUM(CASE WHEN type = 'income' THEN amount ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN type = 'expense' THEN amount ELSE 0 END), 0)
         FROM \"transaction\"
         WHERE user_id = ?1",
        (user_id.as_i64(),),
        |row| Ok((row.get::<_, Money>(0)?, row.get::<_, Money>(1)?)),
    )?;

    Ok(Summary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
    })
}

/// Sum the expenses of `user_id` per category, optionally within `date_range`.
///
/// Categories are ordered from the largest total to the smallest, and by
/// name when totals are equal.
///
/// # Errors
/// Returns a:
/// - [Error::NoExpenses] if the user has no expenses in the range,
/// - or [Error::SqlError] if the query fails.
pub fn get_category_breakdown(
    user_id: UserID,
    date_range: Option<DateRange>,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    let filter = TransactionFilter {
        kind: Some(TransactionType::Expense),
        date_range,
        sort: None,
    };
    let (where_clause, params) = filter.where_clause(user_id);
    let query = format!(
        "SELECT category, SUM(amount) AS value FROM \"transaction\" {where_clause} \
         GROUP BY category ORDER BY value DESC, category ASC"
    );

    let breakdown = connection
        .prepare(&query)?
        .query_map(params_from_iter(params.iter()), |row| {
            Ok(CategoryTotal {
                category: row.get(0)?,
                value: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    if breakdown.is_empty() {
        return Err(Error::NoExpenses);
    }

    Ok(breakdown)
}
