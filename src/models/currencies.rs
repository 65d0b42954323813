// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::LoadError;

/// A single currency entry from the rate file.
///
/// `rate` is the number of units of this currency per one unit of the
/// common reference currency.
#[derive(Debug, Clone, Deserialize)]
pub struct Currency {
    pub rate: f64,
    pub symbol: String,
    pub name: String,
}

/// On-disk shape of the rate file: a top-level object whose `rates` field
/// maps currency codes to entries.
#[derive(Debug, Deserialize)]
pub struct CurrencyFile {
    pub rates: IndexMap<String, Currency>,
}

/// Read-only lookup table from currency code to [`Currency`].
///
/// Codes are stored in canonical uppercase form and lookups uppercase their
/// argument, so queries are case-insensitive. Iteration preserves the entry
/// order of the source file.
#[derive(Debug)]
pub struct RateTable {
    rates: IndexMap<String, Currency>,
}

impl RateTable {
    /// Build a table from a decoded rate file, normalizing codes to
    /// uppercase. Rates that cannot be converted through (zero, negative,
    /// NaN, infinite) are rejected.
    pub fn from_file(file: CurrencyFile) -> Result<RateTable, LoadError> {
        let mut rates = IndexMap::with_capacity(file.rates.len());
        for (code, currency) in file.rates {
            if !(currency.rate.is_finite() && currency.rate > 0.0) {
                return Err(LoadError::InvalidRate {
                    code,
                    rate: currency.rate,
                });
            }
            // Codes that collide after uppercasing keep the last entry.
            rates.insert(code.to_uppercase(), currency);
        }
        Ok(RateTable { rates })
    }

    /// Look up a currency by code, case-insensitively.
    pub fn get(&self, code: &str) -> Option<&Currency> {
        self.rates.get(&code.to_uppercase())
    }

    /// Entries in the order they appeared in the source file.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Currency)> {
        self.rates.iter()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
