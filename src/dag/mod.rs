// src/dag/mod.rs

//! Target graph and execution planning.
//!
//! - [`graph`] holds the declared targets and their relations.
//! - [`planner`] turns a request into an ordered execution plan, detecting
//!   cycles before anything runs.
//! - [`record`] remembers which targets already ran in this process.

pub mod graph;
pub mod planner;
pub mod record;

pub use graph::{TargetAction, TargetGraph, TargetSpec};
pub use planner::{resolve_plan, ExecutionPlan};
pub use record::ExecutionRecord;
