// Copyright (c) 2025 Fintrack contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Error taxonomy for the ledger core.
///
/// Divide-by-zero never appears here: ratios and percentages with a zero
/// denominator evaluate to zero by policy instead of failing.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Rejected input. The message names the offending field.
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// The referenced row does not exist for the requesting owner. Rows owned
    /// by other users are reported the same way.
    #[error("{what} not found")]
    NotFound { what: String },

    /// Any failure from the underlying store, propagated unmodified.
    #[error(transparent)]
    Store(#[from] rusqlite::Error),
}

impl LedgerError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        LedgerError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        LedgerError::NotFound { what: what.into() }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
