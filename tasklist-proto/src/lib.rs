//! Shared data model for `Tasklist`: the task entity, its document layout,
//! and the static records served by the mock REST endpoint.

pub mod fixture;
pub mod task;
