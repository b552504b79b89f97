//! Core library surface for the EazyChoir terminal client.
//!
//! The navigation core (`router`, `sections`, `search`, `codec`) has no
//! terminal dependency; `ui` is one host for it and the integration tests
//! drive it with another.
pub mod cli;
pub mod codec;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod router;
pub mod search;
pub mod sections;
pub mod share;
pub mod store;
pub mod ui;
pub mod view;

/// Persistence entry points used by `main.rs` to open and seed the content
/// database.
pub use db::{data_dir, default_db_path, ensure_schema, seed_if_empty};

pub use codec::{Location, ScheduleId};
pub use config::Config;
pub use error::ShellError;
pub use router::{Router, RouterSettings, ViewHost};
pub use sections::SectionName;
pub use store::ContentStore;

/// The interactive application entry point and state container.
pub use ui::{run_app, App, TerminalHost};
