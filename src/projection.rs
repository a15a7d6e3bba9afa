use crate::{ConfigRecord, statics};
use std::{cmp::Ordering, collections::HashMap};

/// Header style of a group, from scanning every member's active flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStatus {
    Active,
    Inactive,
    Mixed,
}

impl GroupStatus {
    pub fn style_class(self) -> &'static str {
        match self {
            GroupStatus::Active => "active",
            GroupStatus::Inactive => "inactive",
            GroupStatus::Mixed => "mixed",
        }
    }
}

/// One group of the settings table. Derived state only: rebuilt from the
/// working set by [`project`] and never edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupProjection {
    pub name: String,
    pub records: Vec<ConfigRecord>,
    pub all_active: bool,
    pub status: GroupStatus,
    pub active_count: usize,
    pub total: usize,
}

impl GroupProjection {
    fn from_members(name: String, mut records: Vec<ConfigRecord>) -> Self {
        records.sort_by(compare_members);

        let total = records.len();
        let active_count = records.iter().filter(|r| r.active).count();
        let status = if active_count == total {
            GroupStatus::Active
        } else if active_count == 0 {
            GroupStatus::Inactive
        } else {
            GroupStatus::Mixed
        };

        Self {
            name,
            records,
            all_active: active_count == total,
            status,
            active_count,
            total,
        }
    }

    /// "N/M Active"
    pub fn ratio_label(&self) -> String {
        format!(
            "{}/{} {}",
            self.active_count,
            self.total,
            statics::EN_STATUS_ACTIVE
        )
    }
}

/// Group the working set by group name and sort both the groups and their members.
pub fn project(records: &[ConfigRecord]) -> Vec<GroupProjection> {
    let mut by_group: HashMap<&str, Vec<ConfigRecord>> = HashMap::new();
    for rec in records {
        by_group
            .entry(rec.group_name())
            .or_default()
            .push(rec.clone());
    }

    let mut groups: Vec<GroupProjection> = by_group
        .into_iter()
        .map(|(name, members)| GroupProjection::from_members(name.to_string(), members))
        .collect();
    groups.sort_by(|a, b| a.name.cmp(&b.name));
    groups
}

/// Order ascending with absent orders last, then name.
fn compare_members(a: &ConfigRecord, b: &ConfigRecord) -> Ordering {
    let oa = a.order.unwrap_or(i64::MAX);
    let ob = b.order.unwrap_or(i64::MAX);
    oa.cmp(&ob).then_with(|| compare_names(&a.name, &b.name))
}

/// Locale-style name comparison: letters compare case-insensitively first and
/// case only breaks the remaining ties, lowercase first: "apple" < "banana" < "Banana".
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}
