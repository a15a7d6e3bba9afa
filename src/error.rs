use thiserror::Error;

/// Failures surfaced by the settings and process-variable controllers.
/// Every variant is recoverable: the controller stays usable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    #[error("failed to load: {0}")]
    Fetch(String),

    #[error("failed to save: {0}")]
    Save(String),

    #[error("no record with identifier '{0}'")]
    Lookup(String),

    #[error("invalid {field} value '{input}'")]
    Conversion { field: &'static str, input: String },

    #[error("a save is already in progress")]
    SaveInFlight,

    #[error("nothing has been loaded yet")]
    NotLoaded,
}

impl WidgetError {
    pub fn conversion(field: &'static str, input: &str) -> Self {
        WidgetError::Conversion {
            field,
            input: input.to_string(),
        }
    }
}
