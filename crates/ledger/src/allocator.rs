//! Split allocation: derives each person's owed amount from the item list.
//!
//! Everything here is a pure function of its inputs. Amounts are left
//! unrounded; rounding to currency precision happens at presentation time.

use std::collections::BTreeMap;

use crate::item::Item;

/// Compute every person's owed amount from scratch.
///
/// Each known person starts at zero. An item with sharers adds
/// `total / |shared_by|` to each of them; an item without sharers is skipped
/// (it still shows up in [`grand_total`]). Sharers that are not in `people`
/// get nothing.
pub fn recompute<'a, P>(people: P, items: &[Item]) -> BTreeMap<String, f64>
where
    P: IntoIterator<Item = &'a str>,
{
    let mut owed: BTreeMap<String, f64> = people
        .into_iter()
        .map(|name| (name.to_string(), 0.0))
        .collect();

    for item in items {
        if item.is_unassigned() {
            continue;
        }

        let share = item.total() / item.shared_by().len() as f64;
        for sharer in item.shared_by() {
            match owed.get_mut(sharer) {
                Some(amount) => *amount += share,
                None => tracing::warn!(
                    item_id = %item.id_typed(),
                    sharer = %sharer,
                    "ignoring share for unknown person"
                ),
            }
        }
    }

    owed
}

/// Sum of `unit_price × quantity` over all items, regardless of sharing.
pub fn grand_total(items: &[Item]) -> f64 {
    items.iter().map(Item::total).sum()
}

/// Value of the items nobody currently shares.
pub fn unassigned_total(items: &[Item]) -> f64 {
    items
        .iter()
        .filter(|item| item.is_unassigned())
        .map(Item::total)
        .sum()
}
