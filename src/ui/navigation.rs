//! Navigation sidebar: volume/chapter tree, title search and chapter find

use eframe::egui;

use crate::app::{InkstoneApp, SidebarTab};
use crate::core::project::ItemKind;
use crate::ui::dialogs::Dialog;

/// Deferred tree interaction, applied after rendering
enum NavAction {
    OpenChapter(String),
    Dialog(Dialog),
}

/// Navigation sidebar
pub struct NavigationPanel;

impl NavigationPanel {
    /// Show the sidebar
    pub fn show(ui: &mut egui::Ui, app: &mut InkstoneApp) {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut app.sidebar_tab, SidebarTab::Tree, "Structure");
            ui.selectable_value(&mut app.sidebar_tab, SidebarTab::Search, "Search");
        });
        ui.separator();

        match app.sidebar_tab {
            SidebarTab::Tree => Self::show_tree(ui, app),
            SidebarTab::Search => Self::show_search(ui, app),
        }
    }

    fn show_tree(ui: &mut egui::Ui, app: &mut InkstoneApp) {
        let Some(ws) = app.workspace.as_ref() else {
            return;
        };
        let active = ws.chapter.as_ref().map(|c| c.id.clone());
        let latest = ws.project.latest_chapter().map(|c| c.id.clone());
        let mut action = None;

        ui.horizontal(|ui| {
            ui.heading(ws.project.book_title.as_str());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("+").on_hover_text("New volume").clicked() {
                    action = Some(NavAction::Dialog(Dialog::NewVolume {
                        topic: String::new(),
                    }));
                }
            });
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt("structure_scroll")
            .show(ui, |ui| {
                if ws.project.structure.is_empty() {
                    ui.label("No volumes yet. Use + to add one.");
                }
                for volume in &ws.project.structure {
                    let id = ui.make_persistent_id(&volume.id);
                    egui::collapsing_header::CollapsingState::load_with_default_open(
                        ui.ctx(),
                        id,
                        true,
                    )
                    .show_header(ui, |ui| {
                        let response = ui.selectable_label(false, volume.title.as_str());
                        response.context_menu(|ui| {
                            if ui.button("New Chapter").clicked() {
                                action = Some(NavAction::Dialog(Dialog::NewChapter {
                                    volume_id: volume.id.clone(),
                                    topic: String::new(),
                                }));
                                ui.close();
                            }
                            if ui.button("Rename").clicked() {
                                action = Some(NavAction::Dialog(Dialog::Rename {
                                    item_id: volume.id.clone(),
                                    title: volume.title.clone(),
                                }));
                                ui.close();
                            }
                            if ui.button("Delete").clicked() {
                                action = Some(NavAction::Dialog(Dialog::ConfirmDelete {
                                    item_id: volume.id.clone(),
                                    kind: ItemKind::Volume,
                                    title: volume.title.clone(),
                                }));
                                ui.close();
                            }
                        });
                    })
                    .body(|ui| {
                        for chapter in &volume.children {
                            let is_active = active.as_deref() == Some(chapter.id.as_str());
                            let response = ui.selectable_label(is_active, chapter.title.as_str());
                            if response.clicked() {
                                action = Some(NavAction::OpenChapter(chapter.id.clone()));
                            }
                            response.context_menu(|ui| {
                                if ui.button("Rename").clicked() {
                                    action = Some(NavAction::Dialog(Dialog::Rename {
                                        item_id: chapter.id.clone(),
                                        title: chapter.title.clone(),
                                    }));
                                    ui.close();
                                }
                                let deletable = latest.as_deref() == Some(chapter.id.as_str());
                                let delete = ui
                                    .add_enabled(deletable, egui::Button::new("Delete"))
                                    .on_disabled_hover_text("Only the latest chapter can be deleted");
                                if delete.clicked() {
                                    action = Some(NavAction::Dialog(Dialog::ConfirmDelete {
                                        item_id: chapter.id.clone(),
                                        kind: ItemKind::Chapter,
                                        title: chapter.title.clone(),
                                    }));
                                    ui.close();
                                }
                            });
                        }
                    });
                }
            });

        match action {
            Some(NavAction::OpenChapter(id)) => app.open_chapter(&id),
            Some(NavAction::Dialog(dialog)) => app.dialog = Some(dialog),
            None => {}
        }
    }

    fn show_search(ui: &mut egui::Ui, app: &mut InkstoneApp) {
        ui.label("Project search (titles)");
        let response = ui.add(
            egui::TextEdit::singleline(&mut app.search_input).hint_text("Keyword, then Enter"),
        );
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            app.search_titles();
        }

        let mut open = None;
        egui::ScrollArea::vertical()
            .id_salt("search_scroll")
            .max_height(200.0)
            .show(ui, |ui| {
                for hit in &app.search_hits {
                    if ui.selectable_label(false, hit.title.as_str()).clicked()
                        && hit.kind == ItemKind::Chapter
                    {
                        open = Some(hit.id.clone());
                    }
                }
            });
        if let Some(id) = open {
            app.open_chapter(&id);
        }

        ui.separator();
        ui.label("Find in chapter (Ctrl+F)");
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut app.find_input)
                    .hint_text("Text to find")
                    .desired_width(120.0),
            );
            if app.focus_find {
                response.request_focus();
                app.focus_find = false;
            }
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                app.find_submit();
            }
            if ui.button("Prev").clicked() {
                app.find_prev();
            }
            if ui.button("Next").clicked() {
                app.find_next();
            }
            ui.label(app.find.counter());
        });
    }
}
