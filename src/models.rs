// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(CategoryKind::Income),
            "expense" => Ok(CategoryKind::Expense),
            other => Err(LedgerError::InvalidData(format!(
                "unknown category type '{}', expected income|expense",
                other
            ))),
        }
    }
}

/// Direction a transaction of this category moves its asset balance.
///
/// The sign is never stored on the transaction: it is looked up from the
/// category's current kind every time an amount is aggregated.
pub fn sign_for(kind: CategoryKind) -> Decimal {
    match kind {
        CategoryKind::Income => Decimal::ONE,
        CategoryKind::Expense => Decimal::NEGATIVE_ONE,
    }
}

pub fn signed_amount(kind: CategoryKind, amount: Decimal) -> Decimal {
    sign_for(kind) * amount
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetCategory {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    pub name: String,
    pub category_id: Option<i64>,
    pub balance: Decimal,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetBalance {
    pub id: i64,
    pub asset_id: i64,
    pub date: NaiveDate,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionCategory {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub asset_id: i64,
    pub category_id: i64,
    pub amount: Decimal, // magnitude only
    pub date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub details: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub excluded_from_reports: bool,
}

/// Input for a transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub asset_id: i64,
    pub category_id: i64,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub details: Option<String>,
    pub description: Option<String>,
    pub photos: Vec<String>,
    pub excluded_from_reports: bool,
}

impl NewTransaction {
    pub fn new(asset_id: i64, category_id: i64, amount: Decimal, date: NaiveDate) -> Self {
        NewTransaction {
            asset_id,
            category_id,
            amount,
            date,
            details: None,
            description: None,
            photos: Vec::new(),
            excluded_from_reports: false,
        }
    }
}

/// Partial update for a stored transaction; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub asset_id: Option<i64>,
    pub category_id: Option<i64>,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub details: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub photos: Option<Vec<String>>,
    pub excluded_from_reports: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub category_id: i64,
    pub amount: Decimal,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_repeating: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    pub category_id: i64,
    pub amount: Decimal,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_repeating: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub id: i64,
    pub setup_completed: bool,
    pub date_format: String,
    pub currency_symbol: String,
    pub week_start: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            id: 1,
            setup_completed: false,
            date_format: "%Y-%m-%d".to_string(),
            currency_symbol: "$".to_string(),
            week_start: "monday".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_follows_category_kind() {
        let amt = Decimal::new(1250, 2);
        assert_eq!(signed_amount(CategoryKind::Income, amt), amt);
        assert_eq!(signed_amount(CategoryKind::Expense, amt), -amt);
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!(" Income ".parse::<CategoryKind>().unwrap(), CategoryKind::Income);
        assert_eq!("EXPENSE".parse::<CategoryKind>().unwrap(), CategoryKind::Expense);
        assert!("transfer".parse::<CategoryKind>().is_err());
    }
}
