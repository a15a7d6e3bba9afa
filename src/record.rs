use crate::{WidgetError, coerce, statics};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Display tag derived from the active flag. Recomputed on every edit and on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordStatus {
    Active,
    #[default]
    Inactive,
}

impl RecordStatus {
    pub fn from_active(active: bool) -> Self {
        if active {
            RecordStatus::Active
        } else {
            RecordStatus::Inactive
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RecordStatus::Active => statics::EN_STATUS_ACTIVE,
            RecordStatus::Inactive => statics::EN_STATUS_INACTIVE,
        }
    }
}

/// A process configuration item as returned by the settings service.
///
/// `identifier` and `status` are derived and never serialized; call
/// [`ConfigRecord::normalized`] after constructing or fetching a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default)]
    pub handler: String,
    #[serde(default)]
    pub target_object: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,

    #[serde(skip)]
    pub identifier: String,
    #[serde(skip)]
    pub status: RecordStatus,
}

impl ConfigRecord {
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            active: false,
            group: None,
            handler: String::new(),
            target_object: String::new(),
            order: None,
            identifier: String::new(),
            status: RecordStatus::default(),
        }
        .normalized()
    }

    /// Derive `identifier` (surrogate id, falling back to the name) and the status tag.
    pub fn normalized(mut self) -> Self {
        self.identifier = match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => self.name.clone(),
        };
        self.refresh_derived();
        self
    }

    pub fn refresh_derived(&mut self) {
        self.status = RecordStatus::from_active(self.active);
    }

    /// True when every editable field matches `other`. Derived fields are ignored.
    pub fn same_values(&self, other: &ConfigRecord) -> bool {
        self.name == other.name
            && self.active == other.active
            && self.group == other.group
            && self.handler == other.handler
            && self.target_object == other.target_object
            && self.order == other.order
    }

    pub fn group_name(&self) -> &str {
        self.group.as_deref().unwrap_or(statics::UNGROUPED)
    }

    /// Current value of `field` rendered as the text an inline editor shows.
    pub fn field_text(&self, field: RecordField) -> String {
        match field {
            RecordField::Name => self.name.clone(),
            RecordField::Active => self.active.to_string(),
            RecordField::Group => self.group.clone().unwrap_or_default(),
            RecordField::Handler => self.handler.clone(),
            RecordField::TargetObject => self.target_object.clone(),
            RecordField::Order => self.order.map(|o| o.to_string()).unwrap_or_default(),
        }
    }

    /// Set `field` from UI input, coercing text as needed. The derived status
    /// tag is refreshed before returning.
    ///
    /// A malformed order is stored as absent so the record sorts last; any
    /// other conversion failure leaves the record untouched.
    pub fn set_field(&mut self, field: RecordField, value: &EditValue) -> Result<(), WidgetError> {
        match field {
            RecordField::Name => self.name = value.to_text(),
            RecordField::Handler => self.handler = value.to_text(),
            RecordField::TargetObject => self.target_object = value.to_text(),
            RecordField::Group => self.group = coerce::parse_group(&value.to_text()),
            RecordField::Active => {
                self.active = match value {
                    EditValue::Bool(b) => *b,
                    EditValue::Text(t) => coerce::parse_flag(t)?,
                };
            }
            RecordField::Order => {
                let text = value.to_text();
                self.order = coerce::parse_order(&text).unwrap_or_else(|e| {
                    tracing::warn!(record = %self.identifier, "{e}; treating order as absent");
                    None
                });
            }
        }
        self.refresh_derived();
        Ok(())
    }
}

/// The inline-editable columns of the settings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Name,
    Active,
    Group,
    Handler,
    TargetObject,
    Order,
}

impl RecordField {
    pub const ALL: [RecordField; 6] = [
        RecordField::Name,
        RecordField::Active,
        RecordField::Group,
        RecordField::Handler,
        RecordField::TargetObject,
        RecordField::Order,
    ];

    pub fn key(self) -> &'static str {
        match self {
            RecordField::Name => "name",
            RecordField::Active => "active",
            RecordField::Group => "group",
            RecordField::Handler => "handler",
            RecordField::TargetObject => "targetObject",
            RecordField::Order => "order",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RecordField {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordField::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| WidgetError::conversion("field name", s))
    }
}

/// A value coming from an inline editor: free text or a checkbox state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditValue {
    Text(String),
    Bool(bool),
}

impl EditValue {
    pub fn to_text(&self) -> String {
        match self {
            EditValue::Text(t) => t.clone(),
            EditValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for EditValue {
    fn from(value: &str) -> Self {
        EditValue::Text(value.to_string())
    }
}

impl From<String> for EditValue {
    fn from(value: String) -> Self {
        EditValue::Text(value)
    }
}

impl From<bool> for EditValue {
    fn from(value: bool) -> Self {
        EditValue::Bool(value)
    }
}
