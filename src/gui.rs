use crate::service::{NotificationLog, Notifier, Severity};
use crate::store::JsonStore;
use crate::{
    AppConfig, EditValue, GroupProjection, GroupStatus, ProcessVariables, RecordField,
    SettingsTable, VariableKind, statics,
};
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::{collections::HashMap, path::PathBuf};

pub fn run_gui(config: AppConfig) -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            if !config.dark_theme {
                cc.egui_ctx.set_visuals(egui::Visuals::light());
            }
            Ok(Box::new(ConsoleApp::new(config)))
        }),
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
enum Tab {
    #[default]
    Settings,
    Variables,
}

/// The main application state: both controllers, the backend they talk to,
/// and per-frame UI buffers.
struct ConsoleApp {
    store: Option<JsonStore>,
    dialog_dir: Option<PathBuf>,
    tab: Tab,
    settings: SettingsTable,
    variables: ProcessVariables,
    notifications: NotificationLog,

    // Text typed into the focused inline cell, keyed by (record identifier, field).
    // Cleared whenever the working set is replaced wholesale.
    cell_buffers: HashMap<(String, RecordField), String>,
    // One-frame request to force every group open or closed.
    expand_request: Option<bool>,

    theme_dark: bool,
}

impl ConsoleApp {
    fn new(config: AppConfig) -> Self {
        let offset = config.utc_offset().unwrap_or_else(|e| {
            tracing::warn!("{e:#}; using UTC for the timestamp editor");
            time::UtcOffset::UTC
        });
        let variables = ProcessVariables::new(offset)
            .with_default_labels(&config.flag_label, &config.timestamp_label);

        let mut app = Self {
            store: None,
            dialog_dir: config.backend_path.parent().map(PathBuf::from),
            tab: Tab::default(),
            settings: SettingsTable::new(),
            variables,
            notifications: NotificationLog::default(),
            cell_buffers: HashMap::new(),
            expand_request: None,
            theme_dark: config.dark_theme,
        };
        if config.backend_path.exists() {
            app.open_backend(config.backend_path);
        }
        app
    }

    fn open_backend_dialog(&mut self) {
        let mut dlg = rfd::FileDialog::new().add_filter("JSON5", &["json5", "json"]);
        if let Some(dir) = self.dialog_dir.clone() {
            dlg = dlg.set_directory(dir);
        }
        let Some(path) = dlg.pick_file() else {
            return;
        };
        self.dialog_dir = path.parent().map(PathBuf::from);
        self.open_backend(path);
    }

    fn open_backend(&mut self, path: PathBuf) {
        tracing::info!(path = %path.display(), "opening backend");
        self.store = Some(JsonStore::new(path));
        self.refresh();
    }

    fn refresh(&mut self) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        // Failures are already reported through the notification log.
        let _ = self.settings.load(store, &mut self.notifications);
        let _ = self.variables.load(store, &mut self.notifications);
        self.cell_buffers.clear();
    }

    fn save_settings(&mut self) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        if self
            .settings
            .commit_changes(store, &mut self.notifications)
            .is_ok()
        {
            self.cell_buffers.clear();
        }
    }

    fn cancel_settings(&mut self) {
        if self.settings.discard_changes(&mut self.notifications).is_ok() {
            self.cell_buffers.clear();
        }
    }

    fn save_variables(&mut self) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        let _ = self.variables.save(store, &mut self.notifications);
    }

    fn status_color(status: GroupStatus) -> egui::Color32 {
        match status {
            GroupStatus::Active => egui::Color32::from_rgb(0x3f, 0xb9, 0x50),
            GroupStatus::Inactive => egui::Color32::GRAY,
            GroupStatus::Mixed => egui::Color32::from_rgb(0xe3, 0xa0, 0x08),
        }
    }

    fn severity_color(severity: Severity) -> egui::Color32 {
        match severity {
            Severity::Info => egui::Color32::LIGHT_BLUE,
            Severity::Success => egui::Color32::from_rgb(0x3f, 0xb9, 0x50),
            Severity::Error => egui::Color32::RED,
        }
    }

    /// An inline text cell keyed by record and field, so focus follows the
    /// record when the projection re-sorts. The typed text is applied when the
    /// cell loses focus (Enter or click away); Escape drops it.
    fn text_cell(
        &mut self,
        ui: &mut egui::Ui,
        identifier: &str,
        field: RecordField,
        current: String,
        edits: &mut Vec<(String, RecordField, EditValue)>,
    ) {
        let key = (identifier.to_string(), field);
        let mut text = self
            .cell_buffers
            .get(&key)
            .cloned()
            .unwrap_or_else(|| current.clone());
        let resp = ui.add(
            egui::TextEdit::singleline(&mut text)
                .id(cell_id(identifier, field))
                .desired_width(f32::INFINITY),
        );
        if resp.lost_focus() {
            self.cell_buffers.remove(&key);
            let escaped = ui.input(|i| i.key_pressed(egui::Key::Escape));
            if let Some(text) = settled_cell_text(text, &current, escaped) {
                edits.push((key.0, field, EditValue::Text(text)));
            }
        } else if resp.has_focus() {
            self.cell_buffers.insert(key, text);
        }
    }

    fn render_group_table(
        &mut self,
        ui: &mut egui::Ui,
        group: &GroupProjection,
        edits: &mut Vec<(String, RecordField, EditValue)>,
    ) {
        let row_h = ui.text_style_height(&egui::TextStyle::Body) + 8.0;
        ui.push_id(("group_table", group.name.as_str()), |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::initial(56.0).resizable(false))
                .column(Column::initial(200.0).resizable(true))
                .column(Column::initial(60.0).resizable(false))
                .column(Column::initial(140.0).resizable(true))
                .column(Column::initial(180.0).resizable(true))
                .column(Column::initial(150.0).resizable(true))
                .column(Column::remainder().resizable(false))
                .header(row_h, |mut header| {
                    for title in [
                        statics::EN_COL_ACTIVE,
                        statics::EN_COL_NAME,
                        statics::EN_COL_ORDER,
                        statics::EN_COL_GROUP,
                        statics::EN_COL_HANDLER,
                        statics::EN_COL_TARGET_OBJECT,
                        statics::EN_COL_STATUS,
                    ] {
                        header.col(|ui| {
                            ui.strong(title);
                        });
                    }
                })
                .body(|mut body| {
                    for rec in &group.records {
                        body.row(row_h, |mut row| {
                            let id = rec.identifier.as_str();
                            row.col(|ui| {
                                let mut active = rec.active;
                                if ui.checkbox(&mut active, "").changed() {
                                    edits.push((
                                        id.to_string(),
                                        RecordField::Active,
                                        EditValue::Bool(active),
                                    ));
                                }
                            });
                            row.col(|ui| {
                                self.text_cell(ui, id, RecordField::Name, rec.name.clone(), edits);
                            });
                            row.col(|ui| {
                                let current = rec.field_text(RecordField::Order);
                                self.text_cell(ui, id, RecordField::Order, current, edits);
                            });
                            row.col(|ui| {
                                let current = rec.field_text(RecordField::Group);
                                self.text_cell(ui, id, RecordField::Group, current, edits);
                            });
                            row.col(|ui| {
                                let current = rec.handler.clone();
                                self.text_cell(ui, id, RecordField::Handler, current, edits);
                            });
                            row.col(|ui| {
                                let current = rec.target_object.clone();
                                self.text_cell(ui, id, RecordField::TargetObject, current, edits);
                            });
                            row.col(|ui| {
                                let color = if rec.active {
                                    Self::status_color(GroupStatus::Active)
                                } else {
                                    Self::status_color(GroupStatus::Inactive)
                                };
                                ui.colored_label(color, rec.status.label());
                                if self.settings.is_modified(id) {
                                    ui.small(statics::EN_BADGE_MODIFIED);
                                }
                            });
                        });
                    }
                });
        });
    }

    fn render_settings_tab(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let has_store = self.store.is_some();
            if ui
                .add_enabled(has_store, egui::Button::new(statics::EN_BTN_REFRESH))
                .clicked()
            {
                self.refresh();
            }

            let pending = self.settings.has_pending_changes();
            let can_save = pending && !self.settings.is_saving();
            if ui
                .add_enabled(can_save, egui::Button::new(statics::EN_BTN_SAVE))
                .clicked()
            {
                self.save_settings();
            }
            if ui
                .add_enabled(pending, egui::Button::new(statics::EN_BTN_CANCEL))
                .clicked()
            {
                self.cancel_settings();
            }

            ui.separator();
            if ui.button(statics::EN_BTN_EXPAND_ALL).clicked() {
                self.expand_request = Some(true);
            }
            if ui.button(statics::EN_BTN_COLLAPSE_ALL).clicked() {
                self.expand_request = Some(false);
            }

            if pending {
                ui.separator();
                ui.label(format!(
                    "{} {}",
                    statics::EN_LABEL_CHANGES_COUNT,
                    self.settings.pending_count()
                ));
            }
            if self.settings.is_saving() {
                ui.label(statics::EN_BADGE_SAVING);
            }
        });
        ui.separator();

        if self.settings.groups().is_empty() {
            ui.label(statics::EN_SETTINGS_EMPTY);
            return;
        }

        // The projection is small; clone it so the table can borrow `self` mutably.
        let groups = self.settings.groups().to_vec();
        let mut edits = Vec::new();
        let mut group_toggles = Vec::new();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for group in &groups {
                    let header = egui::RichText::new(format!(
                        "{}    {}",
                        group.name,
                        group.ratio_label()
                    ))
                    .color(Self::status_color(group.status))
                    .strong();

                    egui::CollapsingHeader::new(header)
                        .id_salt(("group", group.name.as_str()))
                        .default_open(true)
                        .open(self.expand_request)
                        .show(ui, |ui| {
                            let mut all_active = group.all_active;
                            if ui
                                .checkbox(&mut all_active, statics::EN_LABEL_ALL_ACTIVE)
                                .changed()
                            {
                                group_toggles.push((group.name.clone(), all_active));
                            }
                            self.render_group_table(ui, group, &mut edits);
                        });
                }
            });
        self.expand_request = None;

        for (name, active) in group_toggles {
            if let Err(e) = self.settings.set_group_active(&name, active) {
                tracing::warn!("{e}");
            }
            self.cell_buffers.clear();
        }
        for (id, field, value) in edits {
            if let Err(e) = self.settings.apply_edit(&id, field, value) {
                self.notifications
                    .error(statics::EN_TITLE_INVALID_INPUT, e.to_string());
            }
        }
    }

    fn render_variables_tab(&mut self, ui: &mut egui::Ui) {
        if !self.variables.is_loaded() {
            ui.label(statics::EN_HOME_INSTRUCTIONS);
            return;
        }

        let mut save = false;
        let mut cancel = None;
        let mut begin = None;

        egui::Grid::new("process_variables")
            .num_columns(3)
            .spacing([24.0, 10.0])
            .show(ui, |ui| {
                ui.strong(self.variables.flag.label.as_str());
                if self.variables.flag.is_editing() {
                    let flag = &self.variables.flag;
                    let mut draft = flag.draft.unwrap_or(flag.committed);
                    if ui.checkbox(&mut draft, "").changed()
                        && let Err(e) = self.variables.set_flag_draft(draft)
                    {
                        tracing::warn!("{e}");
                    }
                } else {
                    ui.label(self.variables.flag_display());
                }
                Self::variable_buttons(
                    ui,
                    self.variables.flag.is_editing(),
                    VariableKind::Flag,
                    &mut begin,
                    &mut save,
                    &mut cancel,
                );
                ui.end_row();

                ui.strong(self.variables.timestamp.label.as_str());
                if self.variables.timestamp.is_editing() {
                    let mut text = self.variables.timestamp.draft.clone().unwrap_or_default();
                    ui.horizontal(|ui| {
                        let resp = ui.add(
                            egui::TextEdit::singleline(&mut text)
                                .hint_text(statics::EN_HINT_LOCAL_TIME)
                                .desired_width(180.0),
                        );
                        if resp.changed()
                            && let Err(e) = self.variables.set_timestamp_draft(&text)
                        {
                            tracing::warn!("{e}");
                        }
                        ui.small(format!(
                            "{} {}",
                            statics::EN_LABEL_OFFSET,
                            self.variables.display_offset()
                        ));
                    });
                } else {
                    ui.label(self.variables.timestamp_display());
                }
                Self::variable_buttons(
                    ui,
                    self.variables.timestamp.is_editing(),
                    VariableKind::Timestamp,
                    &mut begin,
                    &mut save,
                    &mut cancel,
                );
                ui.end_row();
            });

        if let Some(kind) = begin
            && let Err(e) = self.variables.begin_edit(kind)
        {
            tracing::warn!("{e}");
        }
        if let Some(kind) = cancel
            && let Err(e) = self.variables.cancel(kind)
        {
            tracing::warn!("{e}");
        }
        if save {
            self.save_variables();
        }
    }

    fn variable_buttons(
        ui: &mut egui::Ui,
        editing: bool,
        kind: VariableKind,
        begin: &mut Option<VariableKind>,
        save: &mut bool,
        cancel: &mut Option<VariableKind>,
    ) {
        ui.horizontal(|ui| {
            if editing {
                if ui.button(statics::EN_BTN_SAVE).clicked() {
                    *save = true;
                }
                if ui.button(statics::EN_BTN_CANCEL).clicked() {
                    *cancel = Some(kind);
                }
            } else if ui.button(statics::EN_BTN_EDIT).clicked() {
                *begin = Some(kind);
            }
        });
    }

    fn render_notifications(&mut self, ctx: &egui::Context) {
        if self.notifications.is_empty() {
            return;
        }
        let mut dismiss = None;
        egui::TopBottomPanel::bottom("notifications").show(ctx, |ui| {
            // Newest first, at most a handful on screen.
            for (i, n) in self.notifications.entries().iter().enumerate().rev().take(4) {
                ui.horizontal(|ui| {
                    ui.colored_label(Self::severity_color(n.severity), n.title.as_str());
                    ui.label(&n.message);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button(statics::EN_BTN_DISMISS).clicked() {
                            dismiss = Some(i);
                        }
                    });
                });
            }
        });
        if let Some(i) = dismiss {
            self.notifications.dismiss(i);
        }
    }
}

/// What a text cell hands to the table once it loses focus: nothing when the
/// edit was escaped or left the value as it was.
fn settled_cell_text(typed: String, current: &str, escaped: bool) -> Option<String> {
    (!escaped && typed != current).then_some(typed)
}

fn cell_id(identifier: &str, field: RecordField) -> egui::Id {
    egui::Id::new(("cell", identifier, field))
}

impl eframe::App for ConsoleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                if ui.button(statics::EN_BTN_OPEN_BACKEND).clicked() {
                    self.open_backend_dialog();
                }
                if ui.button(statics::EN_BTN_TOGGLE_THEME).clicked() {
                    self.theme_dark = !self.theme_dark;
                    if self.theme_dark {
                        ctx.set_visuals(egui::Visuals::dark());
                    } else {
                        ctx.set_visuals(egui::Visuals::light());
                    }
                }

                ui.separator();
                ui.selectable_value(&mut self.tab, Tab::Settings, statics::EN_TAB_SETTINGS);
                ui.selectable_value(&mut self.tab, Tab::Variables, statics::EN_TAB_VARIABLES);

                if let Some(store) = self.store.as_ref() {
                    ui.separator();
                    ui.label(format!(
                        "{} {}",
                        statics::EN_LABEL_BACKEND,
                        store.path().display()
                    ));
                }
            });
        });

        self.render_notifications(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.store.is_none() {
                ui.heading(statics::EN_APP_TITLE);
                ui.label(statics::EN_HOME_INSTRUCTIONS);
                return;
            }
            match self.tab {
                Tab::Settings => self.render_settings_tab(ui),
                Tab::Variables => self.render_variables_tab(ui),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{cell_id, settled_cell_text};
    use crate::RecordField;

    #[test]
    fn cell_text_applies_only_real_changes() {
        assert_eq!(settled_cell_text("7".to_string(), "1", false), Some("7".to_string()));
        assert_eq!(settled_cell_text("1".to_string(), "1", false), None);
        assert_eq!(settled_cell_text("7".to_string(), "1", true), None);
    }

    #[test]
    fn cell_ids_follow_the_record_not_the_row() {
        assert_eq!(
            cell_id("Sync", RecordField::Order),
            cell_id("Sync", RecordField::Order)
        );
        assert_ne!(
            cell_id("Sync", RecordField::Order),
            cell_id("Purge", RecordField::Order)
        );
        assert_ne!(
            cell_id("Sync", RecordField::Order),
            cell_id("Sync", RecordField::Group)
        );
    }
}
