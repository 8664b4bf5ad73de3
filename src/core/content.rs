//! Chapter content files and their plain-text backups

use std::fs;
use std::path::PathBuf;

use super::plain_text::to_plain_text;
use super::structure::{CHAPTERS_DIR, PLAIN_BACKUP_DIR};

/// Prefix of every placeholder returned by [`ChapterContentStore::load_content`]
pub const LOAD_ERROR_PREFIX: &str = "错误：";

/// Outcome of a content save, reported to the editor status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub ok: bool,
    pub message: String,
}

/// Loads and saves chapter bodies under a project root
#[derive(Debug, Clone)]
pub struct ChapterContentStore {
    root: PathBuf,
}

impl ChapterContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn content_path(&self, filename: &str) -> PathBuf {
        self.root.join(CHAPTERS_DIR).join(filename)
    }

    pub fn backup_path(&self, filename: &str) -> PathBuf {
        self.root.join(PLAIN_BACKUP_DIR).join(filename)
    }

    /// Read a chapter body
    ///
    /// I/O failures come back as a human-readable placeholder in place of the
    /// content; see [`is_load_error`].
    pub fn load_content(&self, filename: &str) -> String {
        let path = self.content_path(filename);
        match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Chapter file missing: {}", path.display());
                format!("{LOAD_ERROR_PREFIX}无法加载文件\n路径：{}", path.display())
            }
            Err(e) => {
                tracing::error!("Failed to read chapter {}: {}", path.display(), e);
                format!("{LOAD_ERROR_PREFIX}读取文件失败\n{e}")
            }
        }
    }

    /// Write a chapter body, then refresh its plain-text backup
    ///
    /// Backup failures are logged and never change the reported outcome.
    pub fn save_content(&self, filename: &str, rich_content: &str) -> SaveOutcome {
        let path = self.content_path(filename);
        if let Err(e) = fs::write(&path, rich_content) {
            tracing::error!("Failed to save chapter {}: {}", path.display(), e);
            return SaveOutcome {
                ok: false,
                message: e.to_string(),
            };
        }

        if let Err(e) = self.write_backup(filename, rich_content) {
            tracing::warn!("Plain backup for {} skipped: {}", filename, e);
        }

        tracing::debug!("Saved chapter: {}", path.display());
        SaveOutcome {
            ok: true,
            message: "保存成功".to_string(),
        }
    }

    fn write_backup(&self, filename: &str, rich_content: &str) -> std::io::Result<()> {
        let dir = self.root.join(PLAIN_BACKUP_DIR);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(filename), to_plain_text(rich_content))
    }
}

/// Whether loaded content is a load-failure placeholder
pub fn is_load_error(content: &str) -> bool {
    content.starts_with(LOAD_ERROR_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ChapterContentStore) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(CHAPTERS_DIR)).unwrap();
        let store = ChapterContentStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_save_writes_content_and_backup() {
        let (_dir, store) = setup();
        let outcome = store.save_content("001-a.txt", "<p>Hello</p><p>World</p>");
        assert!(outcome.ok);

        assert_eq!(store.load_content("001-a.txt"), "<p>Hello</p><p>World</p>");
        let backup = fs::read_to_string(store.backup_path("001-a.txt")).unwrap();
        assert_eq!(backup, "Hello\nWorld\n");
    }

    #[test]
    fn test_load_missing_returns_placeholder() {
        let (_dir, store) = setup();
        let content = store.load_content("404.txt");
        assert!(is_load_error(&content));
        assert!(content.contains("404.txt"));
        assert!(!is_load_error("正文"));
    }

    #[test]
    fn test_save_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = ChapterContentStore::new(dir.path());
        // No chapters/ directory
        let outcome = store.save_content("001-a.txt", "x");
        assert!(!outcome.ok);
        assert!(!outcome.message.is_empty());
    }

    #[test]
    fn test_backup_failure_is_swallowed() {
        let (dir, store) = setup();
        // A file where the backup directory should be
        fs::write(dir.path().join(PLAIN_BACKUP_DIR), "blocker").unwrap();
        let outcome = store.save_content("001-a.txt", "<p>x</p>");
        assert!(outcome.ok);
        assert_eq!(store.load_content("001-a.txt"), "<p>x</p>");
    }
}
