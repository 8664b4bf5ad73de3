//! Chapter editor panel

use std::ops::Range;

use eframe::egui;
use egui::text::{CCursor, CCursorRange, LayoutJob, TextFormat};

use crate::app::InkstoneApp;
use crate::core::find::Highlight;
use crate::core::stats::TextStats;

const MATCH_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 230, 150);
const CURRENT_MATCH_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 180, 60);

/// Chapter editor panel
pub struct EditorPanel;

impl EditorPanel {
    /// Show the editor panel
    pub fn show(ui: &mut egui::Ui, app: &mut InkstoneApp) {
        let highlights = app.find.highlights();
        let focus = app.find.current_match();
        let font = egui::FontId::proportional(app.config.editor.font_size);
        let line_height = app.config.editor.line_height();
        let mut edited = false;

        let Some(chapter) = app.workspace.as_mut().and_then(|ws| ws.chapter.as_mut()) else {
            Self::show_welcome(ui);
            return;
        };

        ui.horizontal(|ui| {
            let title = if chapter.modified {
                format!("{} ●", chapter.title)
            } else {
                chapter.title.clone()
            };
            ui.heading(title);
        });
        if chapter.load_failed {
            ui.colored_label(egui::Color32::RED, "This chapter could not be loaded; edits will not be saved.");
        }
        ui.separator();

        let text_color = ui.visuals().text_color();
        let mut layouter = |ui: &egui::Ui, buf: &dyn egui::TextBuffer, wrap_width: f32| {
            let mut job =
                highlighted_job(buf.as_str(), &highlights, font.clone(), text_color, line_height);
            job.wrap.max_width = wrap_width;
            ui.fonts(|f| f.layout_job(job))
        };

        egui::ScrollArea::vertical()
            .id_salt("editor_scroll")
            .show(ui, |ui| {
                let mut output = egui::TextEdit::multiline(&mut chapter.text)
                    .desired_width(f32::INFINITY)
                    .desired_rows(30)
                    .layouter(&mut layouter)
                    .show(ui);

                if output.response.changed() {
                    // Find offsets describe the text before this edit
                    edited = true;
                    return;
                }

                // Move the cursor onto the focused match once per navigation
                let target = focus.map(|m| m.char_range(&chapter.text));
                let id = output.response.id;
                let key = id.with("find_focus");
                let last = ui.data(|d| d.get_temp::<Option<Range<usize>>>(key)).flatten();
                if target != last {
                    if let Some(range) = target.clone() {
                        output.state.cursor.set_char_range(Some(CCursorRange::two(
                            CCursor::new(range.start),
                            CCursor::new(range.end),
                        )));
                        output.state.store(ui.ctx(), id);
                        output.response.request_focus();
                    }
                    ui.data_mut(|d| d.insert_temp(key, target));
                }
            });

        if edited {
            app.on_chapter_edited();
        }
    }

    /// Character statistics for the status bar
    pub fn show_stats(ui: &mut egui::Ui, app: &InkstoneApp) {
        match app.workspace.as_ref().and_then(|ws| ws.chapter.as_ref()) {
            Some(chapter) => {
                let stats = TextStats::of(&chapter.text);
                ui.label(stats.summary(app.config.editor.show_line_numbers));
            }
            None => {
                ui.label("Open a chapter to start writing");
            }
        }
    }

    /// Show welcome screen when no chapter is open
    fn show_welcome(ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(100.0);

            ui.heading("Welcome to Inkstone");
            ui.add_space(20.0);

            ui.label("Pick a chapter in the sidebar, or right-click a volume to add one.");
            ui.add_space(10.0);

            ui.label("Keyboard shortcuts:");
            ui.label("  Ctrl+S - Save chapter");
            ui.label("  Ctrl+F - Find in chapter");
        });
    }
}

/// Lay out `text` with every match given a background, the current one stronger
///
/// Highlights that no longer fit the text (it was edited since the find) are
/// skipped.
pub fn highlighted_job(
    text: &str,
    highlights: &[Highlight],
    font: egui::FontId,
    color: egui::Color32,
    line_height: f32,
) -> LayoutJob {
    let plain = TextFormat {
        line_height: Some(line_height),
        ..TextFormat::simple(font, color)
    };
    let mut job = LayoutJob::default();
    let mut pos = 0;

    for h in highlights {
        let range = h.range.range();
        let fits = range.start >= pos
            && range.end <= text.len()
            && text.is_char_boundary(range.start)
            && text.is_char_boundary(range.end);
        if !fits {
            continue;
        }
        job.append(&text[pos..range.start], 0.0, plain.clone());
        job.append(
            &text[range.clone()],
            0.0,
            TextFormat {
                background: if h.current { CURRENT_MATCH_COLOR } else { MATCH_COLOR },
                ..plain.clone()
            },
        );
        pos = range.end;
    }
    job.append(&text[pos..], 0.0, plain);
    job
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::find::FindEngine;

    #[test]
    fn test_highlighted_job_sections() {
        let text = "abcabcabc";
        let mut engine = FindEngine::new();
        engine.submit(text, "abc");
        engine.next(text);

        let job = highlighted_job(
            text,
            &engine.highlights(),
            egui::FontId::default(),
            egui::Color32::WHITE,
            20.0,
        );
        assert!(job.sections.iter().all(|s| s.format.line_height == Some(20.0)));
        assert_eq!(job.text, text);
        let backgrounds: Vec<_> = job
            .sections
            .iter()
            .filter(|s| !s.byte_range.is_empty())
            .map(|s| s.format.background)
            .collect();
        assert_eq!(backgrounds, [MATCH_COLOR, CURRENT_MATCH_COLOR, MATCH_COLOR]);
    }

    #[test]
    fn test_stale_highlights_are_skipped() {
        let mut engine = FindEngine::new();
        engine.submit("晨光晨光", "晨光");
        // Text shrank since the find
        let job = highlighted_job(
            "晨",
            &engine.highlights(),
            egui::FontId::default(),
            egui::Color32::WHITE,
            20.0,
        );
        assert_eq!(job.text, "晨");
        assert!(job.sections.iter().all(|s| s.format.background == egui::Color32::TRANSPARENT));
    }
}
