//! Bookshelf screen listing known projects

use eframe::egui;

use crate::app::InkstoneApp;
use crate::ui::dialogs::Dialog;

/// Bookshelf panel
pub struct BookshelfPanel;

impl BookshelfPanel {
    /// Show the bookshelf
    pub fn show(ui: &mut egui::Ui, app: &mut InkstoneApp) {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading("My Books");
            ui.add_space(10.0);
        });

        ui.horizontal(|ui| {
            if ui.button("New Book...").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .set_title("Choose an empty folder for the project")
                    .pick_folder()
                {
                    app.dialog = Some(Dialog::NewProject {
                        path,
                        title: String::new(),
                    });
                }
            }
            if ui.button("Add Existing...").clicked() {
                if let Some(path) = rfd::FileDialog::new().pick_folder() {
                    app.add_existing_project(path);
                }
            }
        });

        ui.separator();

        let mut open = None;
        let mut remove = None;
        egui::ScrollArea::vertical()
            .id_salt("bookshelf_scroll")
            .show(ui, |ui| {
                if app.bookshelf.entries.is_empty() {
                    ui.label("No books yet. Create one to get started.");
                }
                for entry in &app.bookshelf.entries {
                    ui.horizontal(|ui| {
                        let response = ui
                            .selectable_label(false, entry.title.as_str())
                            .on_hover_text(entry.path.display().to_string());
                        if response.double_clicked() {
                            open = Some(entry.path.clone());
                        }
                        response.context_menu(|ui| {
                            if ui.button("Open").clicked() {
                                open = Some(entry.path.clone());
                                ui.close();
                            }
                            if ui.button("Remove from Bookshelf").clicked() {
                                remove = Some(entry.path.clone());
                                ui.close();
                            }
                        });
                    });
                }
            });

        if let Some(path) = remove {
            app.remove_project(&path);
        }
        if let Some(path) = open {
            app.open_project(path);
        }
    }
}
