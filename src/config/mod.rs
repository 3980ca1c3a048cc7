//! Configuration types and loading.
//!
//! Provides the configuration structures for enarva-os:
//! - `EnarvaConfig`: Top-level configuration with validation
//! - Section configs: server, database, retention, realtime, push

mod settings;

pub use settings::{
    DatabaseConfig, EnarvaConfig, PushConfig, RealtimeConfig, RetentionConfig, ServerConfig,
};
