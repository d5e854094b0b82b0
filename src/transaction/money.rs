//! Exact amounts of money.
//!
//! Amounts are kept as whole cents so that totals never pick up floating
//! point error, and are shown to clients as plain JSON numbers.

use std::{fmt::Display, ops::Sub, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use serde::{Deserialize, Serialize, Serializer};

use crate::Error;

/// An amount of money stored as a whole number of cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// No money at all.
    pub const ZERO: Money = Money(0);

    /// The largest amount a single transaction may hold, 99 999 999.99.
    pub const MAX: Money = Money(9_999_999_999);

    /// Create an amount from a number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount as a number of cents.
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// The amount as a decimal number with two fractional digits.
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Round `amount` half away from zero to whole cents.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] unless the rounded amount is greater than
    /// zero and no more than [Money::MAX].
    pub fn positive_from_decimal(amount: Decimal) -> Result<Self, Error> {
        let cents = amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .map(Money)
            .ok_or_else(amount_out_of_range)?;

        if cents <= Money::ZERO || cents > Money::MAX {
            return Err(amount_out_of_range());
        }

        Ok(cents)
    }
}

fn amount_out_of_range() -> Error {
    Error::Validation(format!(
        "amount must be a number greater than 0 and at most {}",
        Money::MAX
    ))
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.to_decimal())
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        rust_decimal::serde::float::serialize(&self.to_decimal(), serializer)
    }
}

impl ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.cents()))
    }
}

impl FromSql for Money {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Money::from_cents)
    }
}

/// An amount as a client sent it: either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    /// A JSON number, e.g. `25.5`.
    Number(f64),
    /// A string holding a number, e.g. `"25.50"`.
    Text(String),
}

impl RawAmount {
    /// Parse and round the amount to a positive number of cents.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] if the amount is not a number, or is zero,
    /// negative or too large once rounded.
    pub fn to_money(&self) -> Result<Money, Error> {
        let amount = match self {
            RawAmount::Number(number) => Decimal::from_f64(*number),
            RawAmount::Text(text) => {
                let text = text.trim();
                Decimal::from_str(text)
                    .or_else(|_| Decimal::from_scientific(text))
                    .ok()
            }
        }
        .ok_or_else(|| Error::Validation("amount must be a number".to_owned()))?;

        Money::positive_from_decimal(amount)
    }
}

#[cfg(test)]
mod money_tests {
    use rust_decimal::Decimal;

    use crate::{
        Error,
        transaction::money::{Money, RawAmount},
    };

    #[test]
    fn number_is_rounded_to_cents() {
        assert_eq!(
            RawAmount::Number(25.5).to_money(),
            Ok(Money::from_cents(2550))
        );
        assert_eq!(
            RawAmount::Number(0.005).to_money(),
            Ok(Money::from_cents(1))
        );
        assert_eq!(
            RawAmount::Number(10.994).to_money(),
            Ok(Money::from_cents(1099))
        );
    }

    #[test]
    fn numeric_string_is_accepted() {
        assert_eq!(
            RawAmount::Text(" 1000.00 ".to_owned()).to_money(),
            Ok(Money::from_cents(100_000))
        );
        assert_eq!(
            RawAmount::Text("1e3".to_owned()).to_money(),
            Ok(Money::from_cents(100_000))
        );
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        for raw in [
            RawAmount::Number(0.0),
            RawAmount::Number(-5.0),
            RawAmount::Number(0.004),
            RawAmount::Text("-0.01".to_owned()),
            RawAmount::Text("0".to_owned()),
        ] {
            assert!(
                matches!(raw.to_money(), Err(Error::Validation(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn non_numeric_string_is_rejected() {
        assert!(matches!(
            RawAmount::Text("twelve".to_owned()).to_money(),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn amount_above_maximum_is_rejected() {
        assert_eq!(
            Money::positive_from_decimal(Decimal::new(9_999_999_999, 2)),
            Ok(Money::MAX)
        );
        assert!(Money::positive_from_decimal(Decimal::new(10_000_000_000, 2)).is_err());
        assert!(RawAmount::Number(1e30).to_money().is_err());
    }

    #[test]
    fn serializes_as_json_number() {
        let json = serde_json::to_value(Money::from_cents(-2550)).unwrap();

        assert_eq!(json.as_f64(), Some(-25.5));
    }

    #[test]
    fn display_shows_two_decimal_places() {
        assert_eq!(Money::from_cents(70_000).to_string(), "700.00");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
    }
}
