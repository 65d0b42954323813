// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::LoadError;
use crate::models::{Currency, CurrencyFile, RateTable};

/// Load the currency rate table from a JSON file.
///
/// Each failure mode gets its own diagnostic: the file is missing, the file
/// cannot be read, the content does not parse as the expected shape, or an
/// entry carries a non-positive rate.
pub fn load_currency_data(path: &Path) -> Result<RateTable, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let json_data = fs::read_to_string(path)?;
    let file: CurrencyFile = serde_json::from_str(&json_data)?;
    let table = RateTable::from_file(file)?;
    debug!("Loaded {} currencies from {}", table.len(), path.display());
    Ok(table)
}

/// Convert an amount from one currency to another.
///
/// Each rate is expressed in units per one unit of the common reference
/// currency, so dividing by the source rate moves the amount into the
/// reference currency and multiplying by the target rate moves it out.
pub fn convert_currency(amount: f64, from: &Currency, to: &Currency) -> f64 {
    (amount / from.rate) * to.rate
}
