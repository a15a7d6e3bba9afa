use crate::ConfigRecord;
use crate::service::{
    LabelOverrides, ProcessSettingsService, ProcessVariablesService, VariableValues,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// On-disk shape of the backend document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendDocument {
    #[serde(default)]
    pub processes: Vec<ConfigRecord>,
    #[serde(default)]
    pub variables: VariableValues,
    #[serde(default)]
    pub labels: LabelOverrides,
}

impl BackendDocument {
    pub fn parse_json5(text: &str) -> anyhow::Result<Self> {
        let mut doc = json5::from_str::<BackendDocument>(text)?;
        doc.processes = doc
            .processes
            .into_iter()
            .map(ConfigRecord::normalized)
            .collect();
        Ok(doc)
    }

    /// Upsert by identifier; records the document doesn't know yet are appended.
    pub fn upsert_records(&mut self, records: &[ConfigRecord]) {
        for incoming in records {
            // Keep the caller's identifier: a renamed record without a surrogate id
            // must still land on the entry it was loaded from.
            let incoming = if incoming.identifier.is_empty() {
                incoming.clone().normalized()
            } else {
                incoming.clone()
            };
            match self
                .processes
                .iter_mut()
                .find(|p| p.identifier == incoming.identifier)
            {
                Some(slot) => *slot = incoming,
                None => self.processes.push(incoming),
            }
        }
    }
}

/// A JSON5 file standing in for the remote settings and variables services.
///
/// Every call re-reads the file so external edits are picked up; writes
/// replace the whole document with pretty-printed JSON (valid JSON5).
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `doc` to `path`, creating parent directories as needed.
    pub fn create(path: impl Into<PathBuf>, doc: &BackendDocument) -> anyhow::Result<Self> {
        let store = Self::new(path);
        if let Some(parent) = store.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| format!("creating {parent:?}"))?;
        }
        store.write(doc)?;
        Ok(store)
    }

    pub fn read(&self) -> anyhow::Result<BackendDocument> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {:?}", self.path))?;
        BackendDocument::parse_json5(&text).with_context(|| format!("parsing {:?}", self.path))
    }

    /// Replace the document on disk. The new text goes to a sibling temp file
    /// that is renamed over the original, so a failed write leaves the old
    /// document in place.
    pub fn write(&self, doc: &BackendDocument) -> anyhow::Result<()> {
        let mut text = serde_json::to_string_pretty(doc).context("serializing backend")?;
        text.push('\n');

        let tmp = self.temp_path();
        fs::write(&tmp, text).with_context(|| format!("writing {tmp:?}"))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e).with_context(|| format!("replacing {:?}", self.path));
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(format!(".tmp.{}", std::process::id()));
        self.path.with_file_name(name)
    }
}

impl ProcessSettingsService for JsonStore {
    fn fetch_config_records(&mut self) -> anyhow::Result<Vec<ConfigRecord>> {
        Ok(self.read()?.processes)
    }

    fn persist_config_records(&mut self, records: &[ConfigRecord]) -> anyhow::Result<()> {
        let mut doc = self.read()?;
        doc.upsert_records(records);
        self.write(&doc)
    }
}

impl ProcessVariablesService for JsonStore {
    fn fetch_process_variables(&mut self) -> anyhow::Result<VariableValues> {
        Ok(self.read()?.variables)
    }

    fn fetch_label_overrides(&mut self) -> anyhow::Result<LabelOverrides> {
        Ok(self.read()?.labels)
    }

    fn persist_process_variables(
        &mut self,
        values: &VariableValues,
    ) -> anyhow::Result<VariableValues> {
        let mut doc = self.read()?;
        doc.variables = values.clone();
        self.write(&doc)?;
        Ok(doc.variables)
    }
}
