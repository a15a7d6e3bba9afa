use crate::projection::{self, GroupProjection};
use crate::service::{Notifier, ProcessSettingsService};
use crate::{ConfigRecord, EditValue, RecordField, StagedChanges, WidgetError, statics};
use std::collections::HashSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    NothingToSave,
    Saved(usize),
}

/// State behind the process settings table: the backend baseline, the
/// working copy the operator edits, the staged changes, and the grouped view
/// derived from the working copy.
///
/// The grouped view is recomputed from scratch after every mutation.
#[derive(Debug, Clone, Default)]
pub struct SettingsTable {
    original: Vec<ConfigRecord>,
    records: Vec<ConfigRecord>,
    staged: StagedChanges,
    groups: Vec<GroupProjection>,
    loaded: bool,
    saving: bool,
}

impl SettingsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ConfigRecord] {
        &self.records
    }

    /// The last backend-confirmed state, used by [`SettingsTable::discard_changes`].
    pub fn original(&self) -> &[ConfigRecord] {
        &self.original
    }

    pub fn groups(&self) -> &[GroupProjection] {
        &self.groups
    }

    pub fn staged(&self) -> &StagedChanges {
        &self.staged
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.staged.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.staged.len()
    }

    pub fn is_modified(&self, identifier: &str) -> bool {
        self.staged.contains(identifier)
    }

    pub fn record(&self, identifier: &str) -> Option<&ConfigRecord> {
        self.records.iter().find(|r| r.identifier == identifier)
    }

    /// Fetch the full record list and make it both the baseline and the working set.
    /// On failure the previous state is kept as it was.
    pub fn load(
        &mut self,
        service: &mut impl ProcessSettingsService,
        notifier: &mut impl Notifier,
    ) -> Result<usize, WidgetError> {
        match self.reload(service) {
            Ok(count) => {
                info!(count, "loaded process settings");
                Ok(count)
            }
            Err(e) => {
                notifier.error(statics::EN_TITLE_LOAD_FAILED, e.to_string());
                Err(e)
            }
        }
    }

    fn reload(&mut self, service: &mut impl ProcessSettingsService) -> Result<usize, WidgetError> {
        let fetched = service
            .fetch_config_records()
            .map_err(|e| WidgetError::Fetch(format!("{e:#}")))?;
        self.adopt_baseline(fetched);
        Ok(self.records.len())
    }

    fn adopt_baseline(&mut self, fetched: Vec<ConfigRecord>) {
        self.original = fetched.into_iter().map(ConfigRecord::normalized).collect();
        let mut seen = HashSet::new();
        for rec in &self.original {
            if !seen.insert(rec.identifier.as_str()) {
                warn!(
                    identifier = %rec.identifier,
                    group = rec.group_name(),
                    "duplicate record identifier; edits will address the first match"
                );
            }
        }
        self.records = self.original.clone();
        self.staged.clear();
        self.loaded = true;
        self.recompute();
    }

    /// Set one field of a working record and stage the full resulting record.
    ///
    /// Unknown identifiers are reported as [`WidgetError::Lookup`] and change
    /// nothing. A record whose values match its baseline again is unstaged.
    /// Refused with [`WidgetError::SaveInFlight`] while a save is outstanding.
    pub fn apply_edit(
        &mut self,
        identifier: &str,
        field: RecordField,
        value: impl Into<EditValue>,
    ) -> Result<(), WidgetError> {
        if self.saving {
            return Err(WidgetError::SaveInFlight);
        }
        let value = value.into();
        let Some(rec) = self.records.iter_mut().find(|r| r.identifier == identifier) else {
            return Err(WidgetError::Lookup(identifier.to_string()));
        };

        rec.set_field(field, &value)?;
        debug!(record = identifier, %field, value = %value.to_text(), "applied edit");

        let unchanged = self
            .original
            .iter()
            .find(|o| o.identifier == identifier)
            .is_some_and(|o| o.same_values(rec));
        if unchanged {
            self.staged.unstage(identifier);
        } else {
            self.staged.stage(rec.clone());
        }

        self.recompute();
        Ok(())
    }

    /// Set the active flag of every member of `group` (the header toggle).
    pub fn set_group_active(&mut self, group: &str, active: bool) -> Result<usize, WidgetError> {
        if self.saving {
            return Err(WidgetError::SaveInFlight);
        }
        let members: Vec<String> = self
            .records
            .iter()
            .filter(|r| r.group_name() == group)
            .map(|r| r.identifier.clone())
            .collect();
        if members.is_empty() {
            return Err(WidgetError::Lookup(group.to_string()));
        }
        for id in &members {
            self.apply_edit(id, RecordField::Active, active)?;
        }
        Ok(members.len())
    }

    /// Send every staged snapshot to the backend as one batch.
    pub fn commit_changes(
        &mut self,
        service: &mut impl ProcessSettingsService,
        notifier: &mut impl Notifier,
    ) -> Result<CommitOutcome, WidgetError> {
        let batch = match self.begin_commit() {
            Ok(Some(batch)) => batch,
            Ok(None) => {
                notifier.info(statics::EN_TITLE_NO_CHANGES, statics::EN_MSG_NO_CHANGES);
                return Ok(CommitOutcome::NothingToSave);
            }
            Err(e) => {
                notifier.info(statics::EN_TITLE_SAVE_PENDING, e.to_string());
                return Err(e);
            }
        };
        let result = service.persist_config_records(&batch);
        self.finish_commit(result, service, notifier)
    }

    /// Mark a save as in flight and hand back the batch to persist.
    /// `Ok(None)` when nothing is staged. The working set is frozen until
    /// [`SettingsTable::finish_commit`], so the batch is exactly what gets settled.
    pub fn begin_commit(&mut self) -> Result<Option<Vec<ConfigRecord>>, WidgetError> {
        if self.saving {
            return Err(WidgetError::SaveInFlight);
        }
        if self.staged.is_empty() {
            return Ok(None);
        }
        self.saving = true;
        Ok(Some(self.staged.snapshots()))
    }

    /// Settle a save started by [`SettingsTable::begin_commit`].
    ///
    /// On failure the staged edits stay in place for a retry. On success the
    /// staging map is cleared and the baseline is re-fetched; if that re-fetch
    /// fails, the committed working set becomes the baseline.
    pub fn finish_commit(
        &mut self,
        result: anyhow::Result<()>,
        service: &mut impl ProcessSettingsService,
        notifier: &mut impl Notifier,
    ) -> Result<CommitOutcome, WidgetError> {
        self.saving = false;

        if let Err(e) = result {
            let err = WidgetError::Save(format!("{e:#}"));
            warn!(pending = self.staged.len(), "{err}");
            notifier.error(statics::EN_TITLE_SAVE_FAILED, err.to_string());
            return Err(err);
        }

        let saved = self.staged.len();
        info!(saved, "saved process settings");

        if let Err(e) = self.reload(service) {
            warn!("{e}; keeping committed records as baseline");
            let committed = std::mem::take(&mut self.records);
            self.adopt_baseline(committed);
            notifier.error(statics::EN_TITLE_LOAD_FAILED, e.to_string());
        }

        notifier.success(
            statics::EN_TITLE_SAVED,
            format!("{saved} {}", statics::EN_MSG_RECORDS_SAVED),
        );
        Ok(CommitOutcome::Saved(saved))
    }

    /// Throw away all staged edits and restore the working set from the baseline.
    pub fn discard_changes(&mut self, notifier: &mut impl Notifier) -> Result<(), WidgetError> {
        if !self.loaded {
            return Err(WidgetError::NotLoaded);
        }
        if self.saving {
            return Err(WidgetError::SaveInFlight);
        }
        let discarded = self.staged.len();
        self.records = self
            .original
            .iter()
            .cloned()
            .map(ConfigRecord::normalized)
            .collect();
        self.staged.clear();
        self.recompute();

        debug!(discarded, "discarded staged edits");
        notifier.info(statics::EN_TITLE_CANCELLED, statics::EN_MSG_CHANGES_DISCARDED);
        Ok(())
    }

    fn recompute(&mut self) {
        self.groups = projection::project(&self.records);
    }
}
