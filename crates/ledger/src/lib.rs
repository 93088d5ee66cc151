//! Ledger module (people, items, and the split allocation).
//!
//! Pure domain logic only: no IO, no presentation concerns.

pub mod allocator;
pub mod item;
pub mod ledger;
pub mod person;

pub use allocator::{grand_total, recompute, unassigned_total};
pub use item::Item;
pub use ledger::{
    AddItem, AddPerson, ItemAdded, ItemRemoved, ItemSharersChanged, Ledger, LedgerCommand,
    LedgerEvent, LedgerSummary, PersonAdded, PersonRemoved, PersonShare, RemoveItem,
    RemovePerson, SetItemSharedBy,
};
pub use person::Person;
