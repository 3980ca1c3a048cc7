pub mod activity;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod mission;
pub mod quality;
pub mod realtime;
pub mod workflow;

pub use activity::{Activity, ActivityEntry, ActivityLog, ActivityType};
pub use auth::{Actor, MissionAccess, Operation, Role, allowed_operations};
pub use config::EnarvaConfig;
pub use db::Database;
pub use error::{EnarvaError, Result};
pub use mission::{Mission, MissionStatus, MissionType, Priority, Task, TaskStatus};
pub use quality::{QualityCheck, QualityCheckPatch, QualityStatus};
pub use realtime::{Broadcaster, EventKind, PushSender, WorkflowEvent};
pub use workflow::{
    CreateMissionRequest, CreateQualityCheckRequest, CreateTaskRequest, MissionDetail, Workflow,
};
