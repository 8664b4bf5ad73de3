//! Volume/chapter tree operations and manifest persistence

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::config::NumberingConfig;
use super::error::{ProjectError, Result};
use super::numbering::{sanitize_filename, Numbering};
use super::project::{Chapter, ItemKind, Project, Volume};

/// Manifest file name inside a project root
pub const MANIFEST_FILE: &str = "project.json";
/// Directory holding chapter content files
pub const CHAPTERS_DIR: &str = "chapters";
/// Directory holding derived plain-text backups
pub const PLAIN_BACKUP_DIR: &str = "plain_backup";

/// A project-wide title search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub id: String,
    pub kind: ItemKind,
    pub title: String,
}

/// Owns numbering rules and the on-disk layout of one project root
///
/// Mutations only touch the in-memory [`Project`]; callers persist with
/// [`StructureStore::save`] after each structural edit.
#[derive(Debug, Clone)]
pub struct StructureStore {
    root: PathBuf,
    numbering: Numbering,
}

impl StructureStore {
    pub fn new(root: impl Into<PathBuf>, numbering: NumberingConfig) -> Self {
        Self {
            root: root.into(),
            numbering: Numbering::new(numbering),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    pub fn chapter_path(&self, filename: &str) -> PathBuf {
        self.root.join(CHAPTERS_DIR).join(filename)
    }

    pub fn backup_path(&self, filename: &str) -> PathBuf {
        self.root.join(PLAIN_BACKUP_DIR).join(filename)
    }

    /// Initialize a new project in an empty (or absent) directory
    pub fn create(&self, book_title: &str) -> Result<Project> {
        let book_title = book_title.trim();
        if book_title.is_empty() {
            return Err(ProjectError::Validation("book title is empty".into()));
        }

        match fs::read_dir(&self.root) {
            Ok(mut entries) => {
                if entries.next().is_some() {
                    return Err(ProjectError::NotEmptyDirectory(self.root.clone()));
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(ProjectError::io(&self.root, e)),
        }

        let chapters = self.root.join(CHAPTERS_DIR);
        fs::create_dir_all(&chapters).map_err(|e| ProjectError::io(&chapters, e))?;

        let project = Project::new(book_title);
        self.save(&project)?;
        tracing::info!("Created project '{}' at {}", book_title, self.root.display());
        Ok(project)
    }

    /// Read and deserialize the manifest
    pub fn load(&self) -> Result<Project> {
        let path = self.manifest_path();
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ProjectError::NotFound(path.display().to_string()),
            _ => ProjectError::io(&path, e),
        })?;

        let project: Project = serde_json::from_str(&content)
            .map_err(|source| ProjectError::Parse {
                path: path.clone(),
                source,
            })?;
        tracing::info!(
            "Loaded project '{}' ({} volumes)",
            project.book_title,
            project.structure.len()
        );
        Ok(project)
    }

    /// Serialize the full tree and overwrite the manifest
    pub fn save(&self, project: &Project) -> Result<()> {
        let path = self.manifest_path();
        let content = to_manifest_json(project).map_err(|source| ProjectError::Parse {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, content).map_err(|e| {
            tracing::error!("Failed to save manifest {}: {}", path.display(), e);
            ProjectError::io(&path, e)
        })?;
        tracing::debug!("Saved manifest: {}", path.display());
        Ok(())
    }

    /// Append a new volume numbered after the highest existing one
    pub fn add_volume(&self, project: &mut Project, topic: &str) -> Result<Volume> {
        let topic = validate_topic(topic)?;
        let number = self.numbering.next_volume_number(project)?;
        let volume = Volume {
            id: unique_id(project, "vol"),
            title: self.numbering.volume_title(number, topic),
            children: Vec::new(),
        };
        project.structure.push(volume.clone());
        tracing::info!("Added volume '{}'", volume.title);
        Ok(volume)
    }

    /// Append a chapter to a volume and create its empty content file
    ///
    /// Numbering is global across the project. If the file cannot be created
    /// the tree is left unchanged.
    pub fn add_chapter(&self, project: &mut Project, volume_id: &str, topic: &str) -> Result<Chapter> {
        let topic = validate_topic(topic)?;
        if sanitize_filename(topic).is_empty() {
            return Err(ProjectError::Validation(format!(
                "topic '{topic}' has no filename-safe characters"
            )));
        }
        if project.volume(volume_id).is_none() {
            return Err(ProjectError::NotFound(volume_id.to_string()));
        }

        let padded = self
            .numbering
            .chapter_number(self.numbering.next_chapter_number(project)?);
        let chapter = Chapter {
            id: unique_id(project, "chap"),
            title: self.numbering.chapter_title(&padded, topic),
            filename: self.numbering.chapter_filename(&padded, topic),
        };

        let volume = project
            .volume_mut(volume_id)
            .ok_or_else(|| ProjectError::NotFound(volume_id.to_string()))?;
        volume.children.push(chapter.clone());

        if let Err(e) = self.create_content_file(&chapter.filename) {
            volume.children.pop();
            tracing::error!("Error creating chapter file: {}", e);
            return Err(e);
        }

        tracing::info!("Added chapter '{}' ({})", chapter.title, chapter.filename);
        Ok(chapter)
    }

    fn create_content_file(&self, filename: &str) -> Result<()> {
        let dir = self.root.join(CHAPTERS_DIR);
        fs::create_dir_all(&dir).map_err(|e| ProjectError::io(&dir, e))?;
        let path = dir.join(filename);
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| ProjectError::io(&path, e))?;
        Ok(())
    }

    /// Change the title of a volume or chapter; id and filename never change
    pub fn rename(&self, project: &mut Project, item_id: &str, new_title: &str) -> Result<()> {
        let new_title = new_title.trim();
        if new_title.is_empty() {
            return Err(ProjectError::Validation("title is empty".into()));
        }

        for volume in &mut project.structure {
            if volume.id == item_id {
                volume.title = new_title.to_string();
                return Ok(());
            }
            if let Some(chapter) = volume.children.iter_mut().find(|c| c.id == item_id) {
                chapter.title = new_title.to_string();
                return Ok(());
            }
        }
        Err(ProjectError::NotFound(item_id.to_string()))
    }

    /// Delete a chapter (latest only, with its files) or a volume node
    ///
    /// Volume deletion does not cascade to the children's content files.
    pub fn delete(&self, project: &mut Project, item_id: &str) -> Result<()> {
        if let Some(index) = project.structure.iter().position(|v| v.id == item_id) {
            let volume = project.structure.remove(index);
            tracing::info!(
                "Deleted volume '{}' ({} chapters detached)",
                volume.title,
                volume.children.len()
            );
            return Ok(());
        }

        let latest = project
            .latest_chapter()
            .ok_or_else(|| ProjectError::NotFound(item_id.to_string()))?;
        if latest.id != item_id {
            if project.chapter(item_id).is_none() {
                return Err(ProjectError::NotFound(item_id.to_string()));
            }
            return Err(ProjectError::NotLatestChapter {
                latest: latest.title.clone(),
            });
        }

        let filename = latest.filename.clone();
        self.remove_file_if_exists(&self.chapter_path(&filename))?;
        if let Err(e) = self.remove_file_if_exists(&self.backup_path(&filename)) {
            tracing::warn!("Plain backup for {} left behind: {}", filename, e);
        }

        for volume in &mut project.structure {
            if let Some(index) = volume.children.iter().position(|c| c.id == item_id) {
                let chapter = volume.children.remove(index);
                tracing::info!("Deleted chapter '{}'", chapter.title);
                break;
            }
        }
        Ok(())
    }

    fn remove_file_if_exists(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ProjectError::io(path, e)),
        }
    }

    /// Move a volume's chapters to the end of the first other volume, then
    /// remove it. Returns the id of the volume that received the chapters.
    pub fn merge_and_delete_volume(&self, project: &mut Project, volume_id: &str) -> Result<Option<String>> {
        let index = project
            .structure
            .iter()
            .position(|v| v.id == volume_id)
            .ok_or_else(|| ProjectError::NotFound(volume_id.to_string()))?;
        let removed = project.structure.remove(index);

        let target = project.structure.first_mut().map(|target| {
            target.children.extend(removed.children);
            target.id.clone()
        });
        tracing::info!("Merged and deleted volume '{}'", removed.title);
        Ok(target)
    }

    /// Case-insensitive title search over volumes and chapters
    pub fn search_titles(project: &Project, keyword: &str) -> Vec<SearchHit> {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for volume in &project.structure {
            if volume.title.to_lowercase().contains(&keyword) {
                hits.push(SearchHit {
                    id: volume.id.clone(),
                    kind: ItemKind::Volume,
                    title: volume.title.clone(),
                });
            }
            for chapter in &volume.children {
                if chapter.title.to_lowercase().contains(&keyword) {
                    hits.push(SearchHit {
                        id: chapter.id.clone(),
                        kind: ItemKind::Chapter,
                        title: chapter.title.clone(),
                    });
                }
            }
        }
        hits
    }
}

fn validate_topic(topic: &str) -> Result<&str> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(ProjectError::Validation("topic is empty".into()));
    }
    Ok(topic)
}

/// `<prefix>-<8 hex chars>`, regenerated until unused in the project
fn unique_id(project: &Project, prefix: &str) -> String {
    loop {
        let hex = Uuid::new_v4().simple().to_string();
        let id = format!("{}-{}", prefix, &hex[..8]);
        if !project.contains_id(&id) {
            return id;
        }
    }
}

/// Pretty JSON with 4-space indentation, non-ASCII kept verbatim
fn to_manifest_json(project: &Project) -> std::result::Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    serde::Serialize::serialize(project, &mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, StructureStore, Project) {
        let dir = TempDir::new().unwrap();
        let store = StructureStore::new(dir.path(), NumberingConfig::default());
        let project = store.create("测试之书").unwrap();
        (dir, store, project)
    }

    #[test]
    fn test_create_requires_empty_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("stray.txt"), "x").unwrap();
        let store = StructureStore::new(dir.path(), NumberingConfig::default());
        assert!(matches!(
            store.create("书"),
            Err(ProjectError::NotEmptyDirectory(_))
        ));
        assert!(matches!(store.create("  "), Err(ProjectError::Validation(_))));
    }

    #[test]
    fn test_create_writes_manifest() {
        let (dir, store, project) = setup();
        assert!(dir.path().join(CHAPTERS_DIR).is_dir());
        assert_eq!(project.author, Project::DEFAULT_AUTHOR);
        assert_eq!(store.load().unwrap(), project);
    }

    #[test]
    fn test_load_missing_and_malformed() {
        let dir = TempDir::new().unwrap();
        let store = StructureStore::new(dir.path(), NumberingConfig::default());
        assert!(matches!(store.load(), Err(ProjectError::NotFound(_))));

        std::fs::write(store.manifest_path(), r#"{"bookTitle": "x", "structure": ["#).unwrap();
        assert!(matches!(store.load(), Err(ProjectError::Parse { .. })));
    }

    #[test]
    fn test_end_to_end_titles() {
        let (dir, store, mut project) = setup();
        let volume = store.add_volume(&mut project, "开篇").unwrap();
        assert_eq!(volume.title, "第一卷：开篇");

        let chapter = store.add_chapter(&mut project, &volume.id, "晨光").unwrap();
        assert_eq!(chapter.title, "第001章 晨光");
        assert_eq!(chapter.filename, "001-晨光.txt");
        assert!(dir.path().join(CHAPTERS_DIR).join("001-晨光.txt").is_file());
    }

    #[test]
    fn test_volume_numbering_after_deletion() {
        let (_dir, store, mut project) = setup();
        store.add_volume(&mut project, "a").unwrap();
        let second = store.add_volume(&mut project, "b").unwrap();
        let third = store.add_volume(&mut project, "c").unwrap();
        assert_eq!(third.title, "第三卷：c");

        store.delete(&mut project, &third.id).unwrap();
        assert_eq!(store.add_volume(&mut project, "d").unwrap().title, "第三卷：d");

        store.rename(&mut project, &second.id, "第十一卷：改").unwrap();
        assert_eq!(store.add_volume(&mut project, "e").unwrap().title, "第十二卷：e");
    }

    #[test]
    fn test_chapter_numbering_is_global() {
        let (_dir, store, mut project) = setup();
        let a = store.add_volume(&mut project, "a").unwrap();
        let b = store.add_volume(&mut project, "b").unwrap();
        store.add_chapter(&mut project, &b.id, "一").unwrap();
        store.add_chapter(&mut project, &b.id, "二").unwrap();
        let c = store.add_chapter(&mut project, &a.id, "三").unwrap();
        assert_eq!(c.title, "第003章 三");
        assert_eq!(project.volume(&a.id).unwrap().children.len(), 1);
    }

    #[test]
    fn test_numbering_overflow_is_rejected() {
        let (_dir, store, mut project) = setup();
        let volume = store.add_volume(&mut project, "a").unwrap();
        let chapter = store.add_chapter(&mut project, &volume.id, "x").unwrap();

        store
            .rename(&mut project, &chapter.id, &format!("第{}章 x", u64::MAX))
            .unwrap();
        let before = project.clone();
        assert!(matches!(
            store.add_chapter(&mut project, &volume.id, "y"),
            Err(ProjectError::Validation(_))
        ));
        assert_eq!(project, before);

        store
            .rename(&mut project, &volume.id, &format!("第{}卷：a", u32::MAX))
            .unwrap();
        assert!(matches!(
            store.add_volume(&mut project, "b"),
            Err(ProjectError::Validation(_))
        ));
        assert_eq!(project.structure.len(), 1);
    }

    #[test]
    fn test_add_chapter_failures() {
        let (dir, store, mut project) = setup();
        let volume = store.add_volume(&mut project, "a").unwrap();
        assert!(matches!(
            store.add_chapter(&mut project, "vol-missing", "x"),
            Err(ProjectError::NotFound(_))
        ));
        assert!(matches!(
            store.add_chapter(&mut project, &volume.id, "   "),
            Err(ProjectError::Validation(_))
        ));

        // Existing file blocks creation; tree must roll back
        std::fs::write(dir.path().join(CHAPTERS_DIR).join("001-x.txt"), "keep").unwrap();
        let before = project.clone();
        assert!(matches!(
            store.add_chapter(&mut project, &volume.id, "x"),
            Err(ProjectError::Io { .. })
        ));
        assert_eq!(project, before);
    }

    #[test]
    fn test_rename_keeps_id_and_filename() {
        let (_dir, store, mut project) = setup();
        let volume = store.add_volume(&mut project, "a").unwrap();
        let chapter = store.add_chapter(&mut project, &volume.id, "x").unwrap();

        store.rename(&mut project, &chapter.id, "新标题").unwrap();
        let renamed = project.chapter(&chapter.id).unwrap();
        assert_eq!(renamed.title, "新标题");
        assert_eq!(renamed.filename, chapter.filename);

        assert!(matches!(
            store.rename(&mut project, "nope", "t"),
            Err(ProjectError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_latest_chapter_removes_files() {
        let (_dir, store, mut project) = setup();
        let volume = store.add_volume(&mut project, "a").unwrap();
        let first = store.add_chapter(&mut project, &volume.id, "x").unwrap();
        let last = store.add_chapter(&mut project, &volume.id, "y").unwrap();
        std::fs::create_dir_all(store.root().join(PLAIN_BACKUP_DIR)).unwrap();
        std::fs::write(store.backup_path(&last.filename), "y\n").unwrap();

        assert!(matches!(
            store.delete(&mut project, &first.id),
            Err(ProjectError::NotLatestChapter { .. })
        ));

        store.delete(&mut project, &last.id).unwrap();
        assert!(!store.chapter_path(&last.filename).exists());
        assert!(!store.backup_path(&last.filename).exists());
        assert_eq!(project.chapters().count(), 1);

        // Missing backup is fine
        store.delete(&mut project, &first.id).unwrap();
        assert_eq!(project.chapters().count(), 0);
    }

    #[test]
    fn test_delete_survives_stuck_backup() {
        let (_dir, store, mut project) = setup();
        let volume = store.add_volume(&mut project, "a").unwrap();
        let chapter = store.add_chapter(&mut project, &volume.id, "x").unwrap();
        // A directory in place of the backup file cannot be unlinked
        std::fs::create_dir_all(store.backup_path(&chapter.filename)).unwrap();

        store.delete(&mut project, &chapter.id).unwrap();
        assert!(!store.chapter_path(&chapter.filename).exists());
        assert_eq!(project.chapters().count(), 0);
    }

    #[test]
    fn test_delete_unknown_leaves_tree_unchanged() {
        let (_dir, store, mut project) = setup();
        let volume = store.add_volume(&mut project, "a").unwrap();
        store.add_chapter(&mut project, &volume.id, "x").unwrap();
        let before = project.clone();
        assert!(matches!(
            store.delete(&mut project, "chap-unknown"),
            Err(ProjectError::NotFound(_))
        ));
        assert_eq!(project, before);
    }

    #[test]
    fn test_delete_volume_keeps_chapter_files() {
        let (_dir, store, mut project) = setup();
        let volume = store.add_volume(&mut project, "a").unwrap();
        let chapter = store.add_chapter(&mut project, &volume.id, "x").unwrap();
        store.delete(&mut project, &volume.id).unwrap();
        assert!(project.structure.is_empty());
        assert!(store.chapter_path(&chapter.filename).exists());
    }

    #[test]
    fn test_merge_and_delete_volume() {
        let (_dir, store, mut project) = setup();
        let a = store.add_volume(&mut project, "a").unwrap();
        let b = store.add_volume(&mut project, "b").unwrap();
        store.add_chapter(&mut project, &a.id, "x").unwrap();
        store.add_chapter(&mut project, &b.id, "y").unwrap();
        store.add_chapter(&mut project, &b.id, "z").unwrap();

        let target = store.merge_and_delete_volume(&mut project, &b.id).unwrap();
        assert_eq!(target.as_deref(), Some(a.id.as_str()));
        let titles: Vec<_> = project.chapters().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["第001章 x", "第002章 y", "第003章 z"]);
    }

    #[test]
    fn test_round_trip() {
        let (_dir, store, mut project) = setup();
        let volume = store.add_volume(&mut project, "开篇").unwrap();
        store.add_chapter(&mut project, &volume.id, "晨光").unwrap();
        store.add_chapter(&mut project, &volume.id, "the noon").unwrap();
        store.save(&project).unwrap();

        let raw = std::fs::read_to_string(store.manifest_path()).unwrap();
        assert!(raw.contains("第一卷：开篇"));
        assert!(raw.contains("\n    \"author\""));
        assert_eq!(store.load().unwrap(), project);
    }

    #[test]
    fn test_search_titles() {
        let (_dir, store, mut project) = setup();
        let volume = store.add_volume(&mut project, "Dawn").unwrap();
        store.add_chapter(&mut project, &volume.id, "dawn light").unwrap();
        store.add_chapter(&mut project, &volume.id, "dusk").unwrap();

        let hits = StructureStore::search_titles(&project, "  DAWN ");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].kind, ItemKind::Volume);
        assert_eq!(hits[1].title, "第001章 dawn light");
        assert!(StructureStore::search_titles(&project, " ").is_empty());
    }
}
