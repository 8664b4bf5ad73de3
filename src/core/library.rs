//! Bookshelf of known projects

use std::path::PathBuf;

use super::config::AppConfig;
use super::structure::StructureStore;

/// A project listed on the bookshelf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookEntry {
    pub path: PathBuf,
    /// Manifest `bookTitle`, or the directory name if the manifest is unreadable
    pub title: String,
}

/// Projects from the config that still exist on disk
#[derive(Debug, Clone, Default)]
pub struct Bookshelf {
    pub entries: Vec<BookEntry>,
}

impl Bookshelf {
    pub fn from_config(config: &AppConfig) -> Self {
        let entries = config
            .projects
            .iter()
            .filter(|path| path.exists())
            .map(|path| {
                let store = StructureStore::new(path, config.numbering.clone());
                let title = match store.load() {
                    Ok(project) => project.book_title,
                    Err(e) => {
                        tracing::warn!("Unreadable project {}: {}", path.display(), e);
                        path.file_name()
                            .map(|s| s.to_string_lossy().to_string())
                            .unwrap_or_else(|| path.display().to_string())
                    }
                };
                BookEntry {
                    path: path.clone(),
                    title,
                }
            })
            .collect();
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::NumberingConfig;
    use tempfile::TempDir;

    #[test]
    fn test_titles_and_missing_paths() {
        let dir = TempDir::new().unwrap();
        let book = dir.path().join("book");
        StructureStore::new(&book, NumberingConfig::default())
            .create("长夜")
            .unwrap();
        let broken = dir.path().join("broken");
        std::fs::create_dir_all(&broken).unwrap();

        let mut config = AppConfig::default();
        config.add_project(&book);
        config.add_project(&broken);
        config.add_project(&dir.path().join("gone"));

        let shelf = Bookshelf::from_config(&config);
        let titles: Vec<_> = shelf.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["长夜", "broken"]);
    }
}
