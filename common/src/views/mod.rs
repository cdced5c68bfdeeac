//! Read-only projections of the control collection used by the board views.
//!
//! Everything here is a pure function of its inputs. Intents coming from the
//! rendered views go back through the store, never through these functions.

pub mod filter;
pub mod kanban;
pub mod timeline;

pub use filter::{ControlFilters, DateRange, UNASSIGNED};
pub use kanban::{ControlGroup, GroupBy, GroupKey, group_controls};
pub use timeline::{TimelineBucket, TimelineGroup, bucket_timeline, classify};
