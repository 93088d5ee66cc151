use serde::Serialize;

use splitcalc_core::{Entity, SplitError, SplitResult};

/// A participant in the bill, identified by display name.
///
/// `owed_amount` is derived: the ledger overwrites it after every change to
/// people or items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    name: String,
    owed_amount: f64,
}

impl Person {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            owed_amount: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unrounded share of all items this person is part of.
    pub fn owed_amount(&self) -> f64 {
        self.owed_amount
    }

    pub(crate) fn set_owed_amount(&mut self, amount: f64) {
        self.owed_amount = amount;
    }
}

impl Entity for Person {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.name
    }
}

/// Trim a raw display name, rejecting empty or whitespace-only input.
pub fn normalize_name(raw: &str) -> SplitResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(SplitError::InvalidName);
    }
    Ok(name.to_string())
}
