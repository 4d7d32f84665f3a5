pub mod planner;

pub use planner::QueryPlan;
