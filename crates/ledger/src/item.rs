use serde::Serialize;

use splitcalc_core::{Entity, ItemId, SplitError, SplitResult};

/// A priced line on the bill, split evenly among `shared_by`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    id: ItemId,
    name: String,
    unit_price: f64,
    quantity: u32,
    shared_by: Vec<String>,
}

impl Item {
    pub(crate) fn new(
        id: ItemId,
        name: String,
        unit_price: f64,
        quantity: u32,
        shared_by: Vec<String>,
    ) -> Self {
        Self {
            id,
            name,
            unit_price,
            quantity,
            shared_by,
        }
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Sharer names in the order they were selected.
    pub fn shared_by(&self) -> &[String] {
        &self.shared_by
    }

    /// `unit_price × quantity`, unrounded.
    pub fn total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }

    /// Whether nobody currently shares this item.
    pub fn is_unassigned(&self) -> bool {
        self.shared_by.is_empty()
    }

    pub fn is_shared_by(&self, name: &str) -> bool {
        self.shared_by.iter().any(|p| p == name)
    }

    pub(crate) fn set_shared_by(&mut self, shared_by: Vec<String>) {
        self.shared_by = shared_by;
    }

    /// Returns true if `name` was a sharer.
    pub(crate) fn remove_sharer(&mut self, name: &str) -> bool {
        let before = self.shared_by.len();
        self.shared_by.retain(|p| p != name);
        self.shared_by.len() != before
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Missing or non-positive quantities fall back to 1; quantities that do not
/// fit in a `u32` are rejected.
pub fn normalize_quantity(quantity: Option<i64>) -> SplitResult<u32> {
    match quantity {
        Some(q) if q > 0 => u32::try_from(q)
            .map_err(|_| SplitError::invalid_item(format!("quantity out of range: {q}"))),
        _ => Ok(1),
    }
}

/// Trim sharer names, dropping blanks and repeats, keeping first-selection order.
pub fn normalize_sharers<I, S>(shared_by: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for raw in shared_by {
        let name = raw.as_ref().trim();
        if !name.is_empty() && !out.iter().any(|p| p == name) {
            out.push(name.to_string());
        }
    }
    out
}
