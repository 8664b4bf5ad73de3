//! Modal input and confirmation dialogs

use std::path::PathBuf;

use eframe::egui;

use crate::app::InkstoneApp;
use crate::core::project::ItemKind;

/// A pending dialog and its input state
#[derive(Debug, Clone)]
pub enum Dialog {
    NewProject { path: PathBuf, title: String },
    NewVolume { topic: String },
    NewChapter { volume_id: String, topic: String },
    Rename { item_id: String, title: String },
    ConfirmDelete { item_id: String, kind: ItemKind, title: String },
}

enum Choice {
    Pending,
    Cancel,
    Accept,
}

impl Dialog {
    fn heading(&self) -> &'static str {
        match self {
            Self::NewProject { .. } => "New Book",
            Self::NewVolume { .. } => "New Volume",
            Self::NewChapter { .. } => "New Chapter",
            Self::Rename { .. } => "Rename",
            Self::ConfirmDelete { .. } => "Confirm Delete",
        }
    }

    /// Show the dialog; returns true once it is closed
    pub fn show(&mut self, ctx: &egui::Context, app: &mut InkstoneApp) -> bool {
        let mut choice = Choice::Pending;

        egui::Window::new(self.heading())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                let submitted = match self {
                    Self::NewProject { path, title } => {
                        ui.label(format!("Folder: {}", path.display()));
                        text_row(ui, "Book title:", title)
                    }
                    Self::NewVolume { topic } => text_row(ui, "Volume topic:", topic),
                    Self::NewChapter { topic, .. } => text_row(ui, "Chapter topic:", topic),
                    Self::Rename { title, .. } => text_row(ui, "New name:", title),
                    Self::ConfirmDelete { kind, title, .. } => {
                        ui.label(format!("Delete '{title}'? This cannot be undone."));
                        if *kind == ItemKind::Volume {
                            ui.label("Its chapters move to the first remaining volume.");
                        }
                        false
                    }
                };

                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        choice = Choice::Cancel;
                    }
                    if ui.button("OK").clicked() || submitted {
                        choice = Choice::Accept;
                    }
                });
            });

        match choice {
            Choice::Pending => false,
            Choice::Cancel => true,
            Choice::Accept => {
                self.apply(app);
                true
            }
        }
    }

    fn apply(&self, app: &mut InkstoneApp) {
        match self {
            Self::NewProject { path, title } => app.create_project(path.clone(), title),
            Self::NewVolume { topic } => app.add_volume(topic),
            Self::NewChapter { volume_id, topic } => app.add_chapter(volume_id, topic),
            Self::Rename { item_id, title } => app.rename_item(item_id, title),
            Self::ConfirmDelete { item_id, .. } => app.delete_item(item_id),
        }
    }
}

/// Labelled single-line input; true when Enter was pressed in it
fn text_row(ui: &mut egui::Ui, label: &str, value: &mut String) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        let response = ui.text_edit_singleline(value);
        response.request_focus();
        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
    })
    .inner
}
