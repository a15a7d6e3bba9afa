use crate::service::{LabelOverrides, Notifier, ProcessVariablesService, VariableValues};
use crate::{WidgetError, coerce, statics};
use time::{OffsetDateTime, UtcOffset};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Flag,
    Timestamp,
}

/// Lifecycle of one editable variable: Loaded -> Editing -> (Saved | Cancelled),
/// and back to Editing on the next edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldPhase {
    #[default]
    Loaded,
    Editing,
    Saved,
    Cancelled,
}

/// A committed value plus the in-edit draft while its form is open.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableField<T, D> {
    pub label: String,
    pub committed: T,
    pub draft: Option<D>,
    pub phase: FieldPhase,
}

impl<T: Default, D> VariableField<T, D> {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            committed: T::default(),
            draft: None,
            phase: FieldPhase::Loaded,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.phase == FieldPhase::Editing
    }
}

/// Editor for the global process on/off flag and its companion timestamp.
///
/// The timestamp draft is kept as the text typed into the form, in the
/// configured display offset; it is only converted to a canonical UTC
/// instant on save.
#[derive(Debug, Clone)]
pub struct ProcessVariables {
    pub flag: VariableField<bool, bool>,
    pub timestamp: VariableField<Option<OffsetDateTime>, String>,
    display_offset: UtcOffset,
    loaded: bool,
    saving: bool,
}

impl Default for ProcessVariables {
    fn default() -> Self {
        Self::new(UtcOffset::UTC)
    }
}

impl ProcessVariables {
    pub fn new(display_offset: UtcOffset) -> Self {
        Self {
            flag: VariableField::new(statics::EN_LABEL_PROCESS_FLAG),
            timestamp: VariableField::new(statics::EN_LABEL_PROCESS_TIMESTAMP),
            display_offset,
            loaded: false,
            saving: false,
        }
    }

    pub fn with_default_labels(mut self, flag: &str, timestamp: &str) -> Self {
        self.flag.label = flag.to_string();
        self.timestamp.label = timestamp.to_string();
        self
    }

    pub fn display_offset(&self) -> UtcOffset {
        self.display_offset
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_editing(&self) -> bool {
        self.flag.is_editing() || self.timestamp.is_editing()
    }

    /// Fetch values and label overrides independently. A failed label fetch
    /// keeps the current labels; a failed value fetch keeps the current values.
    pub fn load(
        &mut self,
        service: &mut impl ProcessVariablesService,
        notifier: &mut impl Notifier,
    ) -> Result<(), WidgetError> {
        match service.fetch_label_overrides() {
            Ok(labels) => self.apply_labels(labels),
            Err(e) => warn!("label overrides unavailable: {e:#}"),
        }

        match service.fetch_process_variables() {
            Ok(values) => {
                self.adopt(values);
                self.flag.phase = FieldPhase::Loaded;
                self.timestamp.phase = FieldPhase::Loaded;
                self.loaded = true;
                info!(flag = self.flag.committed, "loaded process variables");
                Ok(())
            }
            Err(e) => {
                let err = WidgetError::Fetch(format!("{e:#}"));
                notifier.error(statics::EN_TITLE_LOAD_FAILED, err.to_string());
                Err(err)
            }
        }
    }

    fn apply_labels(&mut self, labels: LabelOverrides) {
        if let Some(label) = labels.flag.filter(|l| !l.trim().is_empty()) {
            self.flag.label = label;
        }
        if let Some(label) = labels.timestamp.filter(|l| !l.trim().is_empty()) {
            self.timestamp.label = label;
        }
    }

    /// Make backend values the committed ones and drop any open drafts.
    fn adopt(&mut self, values: VariableValues) {
        self.flag.committed = values.flag;
        self.timestamp.committed = match values.timestamp.as_deref().map(coerce::parse_canonical) {
            Some(Ok(dt)) => Some(dt),
            Some(Err(e)) => {
                warn!("{e}; treating stored timestamp as unset");
                None
            }
            None => None,
        };
        self.flag.draft = None;
        self.timestamp.draft = None;
    }

    /// Open the form for `kind`, seeding the draft from the committed value.
    pub fn begin_edit(&mut self, kind: VariableKind) -> Result<(), WidgetError> {
        self.ensure_editable()?;
        match kind {
            VariableKind::Flag => {
                self.flag.draft = Some(self.flag.committed);
                self.flag.phase = FieldPhase::Editing;
            }
            VariableKind::Timestamp => {
                self.timestamp.draft = Some(self.committed_timestamp_text());
                self.timestamp.phase = FieldPhase::Editing;
            }
        }
        Ok(())
    }

    pub fn set_flag_draft(&mut self, value: bool) -> Result<(), WidgetError> {
        self.ensure_editable()?;
        self.flag.phase = FieldPhase::Editing;
        self.flag.draft = Some(value);
        Ok(())
    }

    pub fn set_timestamp_draft(&mut self, text: &str) -> Result<(), WidgetError> {
        self.ensure_editable()?;
        self.timestamp.phase = FieldPhase::Editing;
        self.timestamp.draft = Some(text.to_string());
        Ok(())
    }

    /// Close the form for `kind`, discarding its draft.
    pub fn cancel(&mut self, kind: VariableKind) -> Result<(), WidgetError> {
        if self.saving {
            return Err(WidgetError::SaveInFlight);
        }
        match kind {
            VariableKind::Flag => {
                self.flag.draft = None;
                self.flag.phase = FieldPhase::Cancelled;
            }
            VariableKind::Timestamp => {
                self.timestamp.draft = None;
                self.timestamp.phase = FieldPhase::Cancelled;
            }
        }
        Ok(())
    }

    // Drafts are frozen while a save is outstanding; its result replaces them.
    fn ensure_editable(&self) -> Result<(), WidgetError> {
        if self.saving {
            return Err(WidgetError::SaveInFlight);
        }
        if !self.loaded {
            return Err(WidgetError::NotLoaded);
        }
        Ok(())
    }

    /// The values a save would send: drafts where a form is open, committed values elsewhere.
    pub fn pending_values(&self) -> Result<VariableValues, WidgetError> {
        let flag = self.flag.draft.unwrap_or(self.flag.committed);
        let timestamp = match self.timestamp.draft.as_deref() {
            // An untouched draft keeps the committed instant, seconds included.
            Some(text) if text == self.committed_timestamp_text() => self.timestamp.committed,
            Some(text) if text.trim().is_empty() => None,
            Some(text) => Some(coerce::local_to_canonical(text, self.display_offset)?),
            None => self.timestamp.committed,
        };
        Ok(VariableValues {
            flag,
            timestamp: timestamp.map(coerce::format_canonical),
        })
    }

    /// Convert the drafts and persist them in one call.
    pub fn save(
        &mut self,
        service: &mut impl ProcessVariablesService,
        notifier: &mut impl Notifier,
    ) -> Result<(), WidgetError> {
        let values = self.begin_save(notifier)?;
        let result = service.persist_process_variables(&values);
        self.finish_save(result, notifier)
    }

    /// Mark a save as in flight and hand back the values to persist.
    /// Conversion failures are notified and leave the drafts untouched.
    pub fn begin_save(&mut self, notifier: &mut impl Notifier) -> Result<VariableValues, WidgetError> {
        if self.saving {
            return Err(WidgetError::SaveInFlight);
        }
        if !self.loaded {
            return Err(WidgetError::NotLoaded);
        }

        let values = match self.pending_values() {
            Ok(v) => v,
            Err(e) => {
                notifier.error(statics::EN_TITLE_INVALID_INPUT, e.to_string());
                return Err(e);
            }
        };
        self.saving = true;
        Ok(values)
    }

    /// Settle a save started by [`ProcessVariables::begin_save`]. On failure the
    /// drafts stay open for a retry.
    pub fn finish_save(
        &mut self,
        result: anyhow::Result<VariableValues>,
        notifier: &mut impl Notifier,
    ) -> Result<(), WidgetError> {
        self.saving = false;

        match result {
            Ok(stored) => {
                let flag_edited = self.flag.is_editing();
                let timestamp_edited = self.timestamp.is_editing();
                self.adopt(stored);
                if flag_edited {
                    self.flag.phase = FieldPhase::Saved;
                }
                if timestamp_edited {
                    self.timestamp.phase = FieldPhase::Saved;
                }
                info!(flag = self.flag.committed, "saved process variables");
                notifier.success(statics::EN_TITLE_SAVED, statics::EN_MSG_VARIABLES_SAVED);
                Ok(())
            }
            Err(e) => {
                let err = WidgetError::Save(format!("{e:#}"));
                notifier.error(statics::EN_TITLE_SAVE_FAILED, err.to_string());
                Err(err)
            }
        }
    }

    fn committed_timestamp_text(&self) -> String {
        self.timestamp
            .committed
            .map(|dt| coerce::canonical_to_local(dt, self.display_offset))
            .unwrap_or_default()
    }

    pub fn flag_display(&self) -> &'static str {
        if self.flag.committed {
            statics::EN_VALUE_ON
        } else {
            statics::EN_VALUE_OFF
        }
    }

    pub fn timestamp_display(&self) -> String {
        match self.timestamp.committed {
            Some(dt) => coerce::canonical_to_local(dt, self.display_offset),
            None => statics::EN_VALUE_UNSET.to_string(),
        }
    }
}
