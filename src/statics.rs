// Central place for UI strings and other non-localized constants.
// Keep these out of gui.rs to reduce duplication and make tweaks safer.

// Group name used for records without one.
pub const UNGROUPED: &str = "Ungrouped";

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "Process Settings Console";

pub const EN_TAB_SETTINGS: &str = "Process Settings";
pub const EN_TAB_VARIABLES: &str = "Process Variables";

pub const EN_BTN_OPEN_BACKEND: &str = "Open Backend...";
pub const EN_BTN_REFRESH: &str = "Refresh";
pub const EN_BTN_SAVE: &str = "Save";
pub const EN_BTN_CANCEL: &str = "Cancel";
pub const EN_BTN_EDIT: &str = "Edit";
pub const EN_BTN_TOGGLE_THEME: &str = "Theme";
pub const EN_BTN_DISMISS: &str = "x";
pub const EN_BTN_EXPAND_ALL: &str = "Expand all";
pub const EN_BTN_COLLAPSE_ALL: &str = "Collapse all";

pub const EN_COL_ACTIVE: &str = "Active";
pub const EN_COL_NAME: &str = "Name";
pub const EN_COL_ORDER: &str = "Order";
pub const EN_COL_GROUP: &str = "Group";
pub const EN_COL_HANDLER: &str = "Handler";
pub const EN_COL_TARGET_OBJECT: &str = "Target Object";
pub const EN_COL_STATUS: &str = "Status";

pub const EN_STATUS_ACTIVE: &str = "Active";
pub const EN_STATUS_INACTIVE: &str = "Inactive";

pub const EN_LABEL_PROCESS_FLAG: &str = "Process Enabled";
pub const EN_LABEL_PROCESS_TIMESTAMP: &str = "Process Timestamp";
pub const EN_LABEL_CHANGES_COUNT: &str = "changes:";
pub const EN_LABEL_BACKEND: &str = "Backend:";
pub const EN_LABEL_ALL_ACTIVE: &str = "All active";
pub const EN_HINT_LOCAL_TIME: &str = "YYYY-MM-DDTHH:MM";
pub const EN_LABEL_OFFSET: &str = "UTC offset:";

pub const EN_VALUE_ON: &str = "On";
pub const EN_VALUE_OFF: &str = "Off";
pub const EN_VALUE_UNSET: &str = "(not set)";

pub const EN_BADGE_MODIFIED: &str = "Modified";
pub const EN_BADGE_SAVING: &str = "saving...";

pub const EN_HOME_INSTRUCTIONS: &str = "Open a backend document (.json5/.json) to begin.";
pub const EN_SETTINGS_EMPTY: &str = "No process records.";

// Notification titles and messages.
pub const EN_TITLE_LOAD_FAILED: &str = "Load failed";
pub const EN_TITLE_SAVE_FAILED: &str = "Save failed";
pub const EN_TITLE_SAVED: &str = "Saved";
pub const EN_TITLE_NO_CHANGES: &str = "No changes";
pub const EN_TITLE_SAVE_PENDING: &str = "Save pending";
pub const EN_TITLE_CANCELLED: &str = "Cancelled";
pub const EN_TITLE_INVALID_INPUT: &str = "Invalid input";

pub const EN_MSG_NO_CHANGES: &str = "There are no changes to save.";
pub const EN_MSG_RECORDS_SAVED: &str = "process record(s) saved.";
pub const EN_MSG_CHANGES_DISCARDED: &str = "Unsaved changes were discarded.";
pub const EN_MSG_VARIABLES_SAVED: &str = "Process variables saved.";
