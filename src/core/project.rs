//! Project document model: volumes, chapters and the manifest layout

use serde::{Deserialize, Serialize};

/// Root aggregate of a writing project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub book_title: String,
    pub author: String,
    pub project_version: String,
    /// Volumes in canonical (insertion) order
    pub structure: Vec<Volume>,
}

/// A top-level grouping of chapters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "volume")]
pub struct Volume {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub children: Vec<Chapter>,
}

/// A leaf content unit backed by its own file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "chapter")]
pub struct Chapter {
    pub id: String,
    pub title: String,
    /// Fixed at creation; content lives in `chapters/<filename>`
    pub filename: String,
}

/// Kind of a structure node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Volume,
    Chapter,
}

impl Project {
    pub const DEFAULT_AUTHOR: &'static str = "（请填写作者名）";
    pub const DEFAULT_VERSION: &'static str = "1.0";

    /// Create an empty project
    pub fn new(book_title: impl Into<String>) -> Self {
        Self {
            book_title: book_title.into(),
            author: Self::DEFAULT_AUTHOR.to_string(),
            project_version: Self::DEFAULT_VERSION.to_string(),
            structure: Vec::new(),
        }
    }

    /// All chapters across every volume, in canonical order
    pub fn chapters(&self) -> impl Iterator<Item = &Chapter> {
        self.structure.iter().flat_map(|v| v.children.iter())
    }

    pub fn volume(&self, id: &str) -> Option<&Volume> {
        self.structure.iter().find(|v| v.id == id)
    }

    pub fn volume_mut(&mut self, id: &str) -> Option<&mut Volume> {
        self.structure.iter_mut().find(|v| v.id == id)
    }

    pub fn chapter(&self, id: &str) -> Option<&Chapter> {
        self.chapters().find(|c| c.id == id)
    }

    /// The most recently added chapter project-wide
    pub fn latest_chapter(&self) -> Option<&Chapter> {
        self.chapters().last()
    }

    /// Kind of the item with the given id, volumes searched first
    pub fn kind_of(&self, id: &str) -> Option<ItemKind> {
        if self.volume(id).is_some() {
            Some(ItemKind::Volume)
        } else if self.chapter(id).is_some() {
            Some(ItemKind::Chapter)
        } else {
            None
        }
    }

    /// Whether any node already uses this id
    pub fn contains_id(&self, id: &str) -> bool {
        self.kind_of(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Project {
        let mut project = Project::new("书");
        project.structure.push(Volume {
            id: "vol-1".into(),
            title: "第一卷：开篇".into(),
            children: vec![Chapter {
                id: "chap-1".into(),
                title: "第001章 晨光".into(),
                filename: "001-晨光.txt".into(),
            }],
        });
        project
    }

    #[test]
    fn test_manifest_schema() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["bookTitle"], "书");
        assert_eq!(json["projectVersion"], "1.0");
        assert_eq!(json["structure"][0]["type"], "volume");
        assert_eq!(json["structure"][0]["children"][0]["type"], "chapter");
        assert_eq!(json["structure"][0]["children"][0]["filename"], "001-晨光.txt");
    }

    #[test]
    fn test_lookup() {
        let project = sample();
        assert_eq!(project.kind_of("vol-1"), Some(ItemKind::Volume));
        assert_eq!(project.kind_of("chap-1"), Some(ItemKind::Chapter));
        assert_eq!(project.kind_of("nope"), None);
        assert_eq!(project.latest_chapter().map(|c| c.id.as_str()), Some("chap-1"));
    }
}
