//! Tree comparison: freshness rule and reconciliation plan

pub mod compare;
pub mod plan;

pub use compare::compare_mtime;
pub use plan::{plan_removals, ReconcilePlan, Removal};
