//! Distribution tables, allocation and count recommendation.
//!
//! A category label selects a distribution table; [`allocate`] turns a
//! target total and a table into integer counts per unit type that always
//! sum to the total.

mod allocate;
mod recommend;
mod table;

pub use allocate::{allocate, Allocation, AllocatorConfig};
pub use recommend::{RecommendConfig, Recommendation, TimeEstimate};
pub use table::{
    Distribution, DistributionEntry, DistributionTables, Selection, Slot, TableFamily,
    QUESTION_TYPES,
};
