//! Mission and task type definitions.
//!
//! Core domain types for the mission lifecycle:
//! - `Mission`: aggregate root for field work tied to a lead
//! - `Task`: unit of work within a mission, assignable to a team member
//! - `store`: SQL persistence composing with the `db` transaction helper

mod status;
pub mod store;
mod types;

pub use status::{MissionStatus, TaskStatus};
pub use types::{Mission, MissionType, Priority, Task};
