//! Visibility filtering by item type and caller supplied predicates.

mod manager;
mod predicate;
mod types;

pub use manager::{FilterChangedEvent, FilterChangedListener, FilterManager};
pub use predicate::{FilterTarget, GraphFilter, PredicateFilter};
pub use types::TypeSync;
