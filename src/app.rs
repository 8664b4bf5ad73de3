//! Main application state and UI coordination

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::core::autosave::AutoSaveTimer;
use crate::core::config::AppConfig;
use crate::core::content::{is_load_error, ChapterContentStore};
use crate::core::find::FindEngine;
use crate::core::library::Bookshelf;
use crate::core::project::{ItemKind, Project};
use crate::core::structure::{SearchHit, StructureStore};
use crate::core::ProjectError;
use crate::ui::{
    bookshelf::BookshelfPanel, dialogs::Dialog, editor::EditorPanel, navigation::NavigationPanel,
};

const STATUS_TTL: Duration = Duration::from_millis(2500);

/// Which page the left panel shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidebarTab {
    #[default]
    Tree,
    Search,
}

/// Chapter loaded into the editor
#[derive(Debug, Clone)]
pub struct OpenChapter {
    pub id: String,
    pub title: String,
    pub filename: String,
    pub text: String,
    pub modified: bool,
    /// Text is a load-failure placeholder; never written back
    pub load_failed: bool,
}

/// An opened project and its stores
pub struct Workspace {
    pub structure: StructureStore,
    pub content: ChapterContentStore,
    pub project: Project,
    pub chapter: Option<OpenChapter>,
}

/// Main application state
pub struct InkstoneApp {
    /// Application configuration
    pub config: AppConfig,
    /// Known projects
    pub bookshelf: Bookshelf,
    /// Currently open project
    pub workspace: Option<Workspace>,
    /// In-chapter find session
    pub find: FindEngine,
    pub find_input: String,
    /// Request keyboard focus for the find field next frame
    pub focus_find: bool,
    pub search_input: String,
    pub search_hits: Vec<SearchHit>,
    pub sidebar_tab: SidebarTab,
    pub sidebar_visible: bool,
    pub autosave: AutoSaveTimer,
    pub dialog: Option<Dialog>,
    /// Transient status line message
    pub status: Option<(String, Instant)>,
    /// Blocking error shown until acknowledged
    pub error: Option<String>,
}

impl InkstoneApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = AppConfig::load().unwrap_or_else(|e| {
            tracing::warn!("Using default config: {}", e);
            AppConfig::default()
        });

        Self::configure_fonts(&cc.egui_ctx, &config.editor.font_family);
        cc.egui_ctx.set_visuals(if config.editor.is_dark() {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });
        Self::with_config(config)
    }

    pub fn with_config(config: AppConfig) -> Self {
        let bookshelf = Bookshelf::from_config(&config);
        let autosave = AutoSaveTimer::new(config.editor.auto_save_interval);
        Self {
            config,
            bookshelf,
            workspace: None,
            find: FindEngine::new(),
            find_input: String::new(),
            focus_find: false,
            search_input: String::new(),
            search_hits: Vec::new(),
            sidebar_tab: SidebarTab::default(),
            sidebar_visible: true,
            autosave,
            dialog: None,
            status: None,
            error: None,
        }
    }

    /// Add a system CJK font as a fallback family, preferring `family`
    fn configure_fonts(ctx: &egui::Context, family: &str) {
        const FONT_FILES: &[(&str, &str)] = &[
            ("Microsoft YaHei", "C:\\Windows\\Fonts\\msyh.ttc"),
            ("SimSun", "C:\\Windows\\Fonts\\simsun.ttc"),
            ("PingFang SC", "/System/Library/Fonts/PingFang.ttc"),
            ("STHeiti", "/System/Library/Fonts/STHeiti Light.ttc"),
            ("Noto Sans CJK SC", "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc"),
            ("Noto Sans CJK SC", "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc"),
            ("WenQuanYi Micro Hei", "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc"),
        ];

        let preferred = FONT_FILES.iter().filter(|(name, _)| name.eq_ignore_ascii_case(family));
        let Some(bytes) = preferred
            .chain(FONT_FILES.iter())
            .find_map(|(_, path)| std::fs::read(path).ok())
        else {
            tracing::warn!("No CJK font found; Chinese text may not render");
            return;
        };

        let mut fonts = egui::FontDefinitions::default();
        fonts
            .font_data
            .insert("cjk".to_owned(), Arc::new(egui::FontData::from_owned(bytes)));
        for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
            fonts.families.entry(family).or_default().push("cjk".to_owned());
        }
        ctx.set_fonts(fonts);
    }

    fn save_config(&mut self) {
        if let Err(e) = self.config.save() {
            tracing::error!("Failed to save config: {}", e);
        }
        self.bookshelf = Bookshelf::from_config(&self.config);
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), Instant::now()));
    }

    fn report(&mut self, err: ProjectError) {
        tracing::error!("{}", err);
        if err.is_severe() {
            self.error = Some(format!("Could not save project.json: {err}"));
        } else {
            self.error = Some(err.to_string());
        }
    }

    // ---- bookshelf ----

    /// Create a project in an empty folder and put it on the bookshelf
    pub fn create_project(&mut self, path: PathBuf, book_title: &str) {
        let store = StructureStore::new(&path, self.config.numbering.clone());
        match store.create(book_title) {
            Ok(project) => {
                self.config.add_project(&path);
                self.save_config();
                self.set_status(format!("Created '{}'", project.book_title));
            }
            Err(e) => self.report(e),
        }
    }

    /// Put an existing project folder on the bookshelf and open it
    pub fn add_existing_project(&mut self, path: PathBuf) {
        if self.config.add_project(&path) {
            self.save_config();
        }
        self.open_project(path);
    }

    /// Remove from the bookshelf only; files stay on disk
    pub fn remove_project(&mut self, path: &Path) {
        if self.config.remove_project(path) {
            self.save_config();
        }
    }

    pub fn open_project(&mut self, path: PathBuf) {
        self.close_project();
        let structure = StructureStore::new(&path, self.config.numbering.clone());
        match structure.load() {
            Ok(project) => {
                self.workspace = Some(Workspace {
                    structure,
                    content: ChapterContentStore::new(&path),
                    project,
                    chapter: None,
                });
            }
            Err(e) => self.report(e),
        }
    }

    /// Save pending edits and return to the bookshelf
    pub fn close_project(&mut self) {
        self.save_active_chapter();
        self.workspace = None;
        self.find = FindEngine::new();
        self.search_hits.clear();
        self.bookshelf = Bookshelf::from_config(&self.config);
    }

    // ---- chapters ----

    pub fn open_chapter(&mut self, chapter_id: &str) {
        self.save_active_chapter();
        let Some(ws) = self.workspace.as_mut() else {
            return;
        };
        let Some(chapter) = ws.project.chapter(chapter_id) else {
            return;
        };

        let text = ws.content.load_content(&chapter.filename);
        ws.chapter = Some(OpenChapter {
            id: chapter.id.clone(),
            title: chapter.title.clone(),
            filename: chapter.filename.clone(),
            load_failed: is_load_error(&text),
            text,
            modified: false,
        });
        self.find.invalidate();
    }

    /// Called after every edit of the open chapter
    pub fn on_chapter_edited(&mut self) {
        if let Some(chapter) = self.workspace.as_mut().and_then(|ws| ws.chapter.as_mut()) {
            chapter.modified = true;
        }
        self.find.invalidate();
        self.autosave.touch(Instant::now());
    }

    pub fn save_active_chapter(&mut self) {
        self.autosave.cancel();
        let Some(ws) = self.workspace.as_mut() else {
            return;
        };
        let Some(chapter) = ws.chapter.as_mut() else {
            return;
        };
        if !chapter.modified || chapter.load_failed {
            return;
        }

        let outcome = ws.content.save_content(&chapter.filename, &chapter.text);
        if outcome.ok {
            chapter.modified = false;
            self.set_status(outcome.message);
        } else {
            // Stays modified; retried on the next auto-save tick
            self.set_status(format!("Save failed: {}", outcome.message));
        }
    }

    // ---- structure ----

    fn persist(&mut self, message: &str) {
        let Some(ws) = self.workspace.as_ref() else {
            return;
        };
        match ws.structure.save(&ws.project) {
            Ok(()) => self.set_status(message),
            Err(e) => self.report(e),
        }
    }

    fn with_structure<T>(
        &mut self,
        op: impl FnOnce(&StructureStore, &mut Project) -> crate::core::Result<T>,
    ) -> Option<T> {
        let ws = self.workspace.as_mut()?;
        match op(&ws.structure, &mut ws.project) {
            Ok(value) => Some(value),
            Err(e) => {
                self.report(e);
                None
            }
        }
    }

    pub fn add_volume(&mut self, topic: &str) {
        if self.with_structure(|s, p| s.add_volume(p, topic)).is_some() {
            self.persist("Volume created");
        }
    }

    pub fn add_chapter(&mut self, volume_id: &str, topic: &str) {
        if let Some(chapter) = self.with_structure(|s, p| s.add_chapter(p, volume_id, topic)) {
            self.persist("Chapter created");
            self.open_chapter(&chapter.id);
        }
    }

    pub fn rename_item(&mut self, item_id: &str, title: &str) {
        if self.with_structure(|s, p| s.rename(p, item_id, title)).is_some() {
            if let Some(chapter) = self
                .workspace
                .as_mut()
                .and_then(|ws| ws.chapter.as_mut())
                .filter(|c| c.id == item_id)
            {
                chapter.title = title.trim().to_string();
            }
            self.persist("Renamed");
        }
    }

    pub fn delete_item(&mut self, item_id: &str) {
        let kind = self
            .workspace
            .as_ref()
            .and_then(|ws| ws.project.kind_of(item_id));

        let deleted = match kind {
            Some(ItemKind::Volume) => self
                .with_structure(|s, p| s.merge_and_delete_volume(p, item_id))
                .is_some(),
            _ => self.with_structure(|s, p| s.delete(p, item_id)).is_some(),
        };
        if !deleted {
            return;
        }

        if let Some(ws) = self.workspace.as_mut() {
            if ws.chapter.as_ref().is_some_and(|c| c.id == item_id) {
                ws.chapter = None;
                self.autosave.cancel();
            }
        }
        self.persist(match kind {
            Some(ItemKind::Volume) => "Volume merged and deleted",
            _ => "Chapter deleted",
        });
    }

    // ---- search & find ----

    pub fn search_titles(&mut self) {
        self.search_hits = self
            .workspace
            .as_ref()
            .map(|ws| StructureStore::search_titles(&ws.project, &self.search_input))
            .unwrap_or_default();
    }

    fn chapter_text(&self) -> &str {
        self.workspace
            .as_ref()
            .and_then(|ws| ws.chapter.as_ref())
            .map_or("", |c| c.text.as_str())
    }

    pub fn find_submit(&mut self) {
        let text = self.chapter_text().to_string();
        let pattern = self.find_input.trim().to_string();
        self.find.submit(&text, &pattern);
    }

    pub fn find_next(&mut self) {
        let text = self.chapter_text().to_string();
        self.find.next(&text);
    }

    pub fn find_prev(&mut self) {
        let text = self.chapter_text().to_string();
        self.find.prev(&text);
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if self.workspace.is_some() {
                        if ui.button("Save Chapter").clicked() {
                            self.save_active_chapter();
                            ui.close();
                        }
                        if ui.button("Back to Bookshelf").clicked() {
                            self.close_project();
                            ui.close();
                        }
                        ui.separator();
                    }
                    if ui.button("Exit").clicked() {
                        self.save_active_chapter();
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Toggle Sidebar").clicked() {
                        self.sidebar_visible = !self.sidebar_visible;
                        ui.close();
                    }
                    if ui.button("Find in Chapter").clicked() {
                        self.sidebar_tab = SidebarTab::Search;
                        self.focus_find = true;
                        ui.close();
                    }
                });
            });
        });
    }

    fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some((message, _)) = &self.status {
                    ui.label(message.as_str());
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    EditorPanel::show_stats(ui, self);
                });
            });
        });
    }

    fn render_error(&mut self, ctx: &egui::Context) {
        let Some(message) = self.error.clone() else {
            return;
        };
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    self.error = None;
                }
            });
    }
}

impl eframe::App for InkstoneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle keyboard shortcuts
        let (save, find) = ctx.input(|i| {
            (
                i.modifiers.command && i.key_pressed(egui::Key::S),
                i.modifiers.command && i.key_pressed(egui::Key::F),
            )
        });
        if save || ctx.input(|i| i.viewport().close_requested()) {
            self.save_active_chapter();
        }
        if find && self.workspace.is_some() {
            self.sidebar_visible = true;
            self.sidebar_tab = SidebarTab::Search;
            self.focus_find = true;
        }

        let now = Instant::now();
        if self.autosave.poll(now) {
            self.save_active_chapter();
        }
        if let Some(remaining) = self.autosave.remaining(now) {
            ctx.request_repaint_after(remaining);
        }
        if let Some((_, at)) = &self.status {
            if at.elapsed() >= STATUS_TTL {
                self.status = None;
            } else {
                ctx.request_repaint_after(STATUS_TTL.saturating_sub(at.elapsed()));
            }
        }

        self.render_menu_bar(ctx);
        self.render_status_bar(ctx);

        if self.workspace.is_none() {
            egui::CentralPanel::default().show(ctx, |ui| {
                BookshelfPanel::show(ui, self);
            });
        } else {
            if self.sidebar_visible {
                egui::SidePanel::left("sidebar")
                    .resizable(true)
                    .default_width(260.0)
                    .min_width(180.0)
                    .show(ctx, |ui| {
                        NavigationPanel::show(ui, self);
                    });
            }
            egui::CentralPanel::default().show(ctx, |ui| {
                EditorPanel::show(ui, self);
            });
        }

        if let Some(mut dialog) = self.dialog.take() {
            if !dialog.show(ctx, self) {
                self.dialog = Some(dialog);
            }
        }
        self.render_error(ctx);
    }
}
