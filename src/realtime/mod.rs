//! Real-time event fan-out.
//!
//! Best-effort by design: broadcast and push delivery happen after the
//! causing transaction commits, and their failures are logged, never
//! propagated.

mod broadcaster;
mod events;
mod push;

pub use broadcaster::Broadcaster;
pub use events::{EventKind, WorkflowEvent};
pub use push::PushSender;
