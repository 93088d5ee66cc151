//! Session files: the people and items of one bill, as JSON.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use splitcalc_ledger::Ledger;

/// A bill to split.
///
/// ```json
/// {
///   "people": ["Alice", "Bob"],
///   "items": [
///     { "name": "Pizza", "price": 20.0, "quantity": 1, "shared_by": ["Alice", "Bob"] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Session {
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub items: Vec<SessionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionItem {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub shared_by: Vec<String>,
}

impl Session {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("session is not valid JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read session file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Replay people then items, in file order. The first rejected entry
    /// aborts the replay.
    pub fn into_ledger(self) -> Result<Ledger> {
        let mut ledger = Ledger::new();

        for (index, name) in self.people.into_iter().enumerate() {
            ledger
                .add_person(name.clone())
                .with_context(|| format!("people[{index}] ({name:?}) was rejected"))?;
        }

        for (index, item) in self.items.into_iter().enumerate() {
            let SessionItem {
                name,
                price,
                quantity,
                shared_by,
            } = item;
            ledger
                .add_item(name.clone(), price, quantity, shared_by)
                .with_context(|| format!("items[{index}] ({name:?}) was rejected"))?;
        }

        tracing::info!(
            people = ledger.people().len(),
            items = ledger.items().len(),
            "session loaded"
        );
        Ok(ledger)
    }
}
