//! Target collection, filtering, ordering and the optimistic mutation store.

pub mod fallback;
pub mod filter;
pub mod model;
pub mod sort;
pub mod stats;
pub mod store;
pub mod validate;

pub use filter::FilterCriteria;
pub use model::{Priority, Status, Target};
pub use stats::Statistics;
pub use store::{DataSource, LoadOutcome, MutationState, Notice, NoticeLevel, TargetStore};
pub use validate::TargetForm;
