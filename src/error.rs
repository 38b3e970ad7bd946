// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Errors raised by the ledger core.
//!
//! - [`NotFound`] when a referenced asset, category, transaction or budget
//!   id does not exist.
//! - [`Validation`] when an input or a stored row cannot be acted upon
//!   (negative amount, budget without a period, ...).
//! - [`InvalidData`] when a stored value cannot be parsed back.
//!
//! [`NotFound`]: LedgerError::NotFound
//! [`Validation`]: LedgerError::Validation
//! [`InvalidData`]: LedgerError::InvalidData

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{entity} #{id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

impl LedgerError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        LedgerError::NotFound { entity, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound { .. })
    }
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::NotFound { entity: a, id: x },
                Self::NotFound { entity: b, id: y },
            ) => a == b && x == y,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::InvalidData(a), Self::InvalidData(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
