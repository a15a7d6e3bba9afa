#![allow(dead_code)]

use anyhow::bail;
use procset::ConfigRecord;
use procset::service::{
    LabelOverrides, ProcessSettingsService, ProcessVariablesService, VariableValues,
};

pub fn record(name: &str, group: Option<&str>, order: Option<i64>, active: bool) -> ConfigRecord {
    ConfigRecord {
        active,
        group: group.map(str::to_string),
        order,
        handler: format!("{name}Handler"),
        target_object: "Account".to_string(),
        ..ConfigRecord::new(name)
    }
    .normalized()
}

/// In-memory settings backend that records every persisted batch.
#[derive(Debug, Default)]
pub struct MockSettings {
    pub records: Vec<ConfigRecord>,
    pub persisted: Vec<Vec<ConfigRecord>>,
    pub fetch_calls: usize,
    pub fail_fetch: bool,
    pub fail_persist: Option<String>,
}

impl MockSettings {
    pub fn with(records: Vec<ConfigRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }
}

impl ProcessSettingsService for MockSettings {
    fn fetch_config_records(&mut self) -> anyhow::Result<Vec<ConfigRecord>> {
        self.fetch_calls += 1;
        if self.fail_fetch {
            bail!("service unavailable");
        }
        Ok(self.records.clone())
    }

    fn persist_config_records(&mut self, records: &[ConfigRecord]) -> anyhow::Result<()> {
        if let Some(msg) = &self.fail_persist {
            bail!("{msg}");
        }
        self.persisted.push(records.to_vec());
        for incoming in records {
            match self
                .records
                .iter_mut()
                .find(|r| r.identifier == incoming.identifier)
            {
                Some(slot) => *slot = incoming.clone(),
                None => self.records.push(incoming.clone()),
            }
        }
        Ok(())
    }
}

/// In-memory variables backend.
#[derive(Debug, Default)]
pub struct MockVariables {
    pub values: VariableValues,
    pub labels: LabelOverrides,
    pub persisted: Vec<VariableValues>,
    pub fail_labels: bool,
    pub fail_fetch: bool,
    pub fail_persist: bool,
}

impl ProcessVariablesService for MockVariables {
    fn fetch_process_variables(&mut self) -> anyhow::Result<VariableValues> {
        if self.fail_fetch {
            bail!("variables unavailable");
        }
        Ok(self.values.clone())
    }

    fn fetch_label_overrides(&mut self) -> anyhow::Result<LabelOverrides> {
        if self.fail_labels {
            bail!("labels unavailable");
        }
        Ok(self.labels.clone())
    }

    fn persist_process_variables(
        &mut self,
        values: &VariableValues,
    ) -> anyhow::Result<VariableValues> {
        if self.fail_persist {
            bail!("write rejected");
        }
        self.persisted.push(values.clone());
        self.values = values.clone();
        Ok(self.values.clone())
    }
}
