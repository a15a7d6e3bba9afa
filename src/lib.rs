//! Core library for the Process Settings Console.
//! Provides the settings-table controller (staged edits over a grouped, sorted
//! view of process records) and the process-variables editor, both talking to
//! pluggable backend services.

pub mod coerce;
pub mod config;
mod error;
mod gui;
pub mod projection;
mod record;
pub mod service;
mod settings;
mod staging;
pub mod statics;
pub mod store;
mod variables;

pub use config::AppConfig;
pub use error::WidgetError;
pub use gui::run_gui;
pub use projection::{GroupProjection, GroupStatus};
pub use record::{ConfigRecord, EditValue, RecordField, RecordStatus};
pub use settings::{CommitOutcome, SettingsTable};
pub use staging::StagedChanges;
pub use variables::{FieldPhase, ProcessVariables, VariableField, VariableKind};
