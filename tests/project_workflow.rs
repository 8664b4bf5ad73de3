use inkstone::core::config::NumberingConfig;
use inkstone::core::content::ChapterContentStore;
use inkstone::core::find::{FindEngine, FindState};
use inkstone::core::structure::StructureStore;
use inkstone::core::ProjectError;
use tempfile::TempDir;

#[test]
fn test_write_a_book_end_to_end() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("long-night");
    let structure = StructureStore::new(&root, NumberingConfig::default());
    let content = ChapterContentStore::new(&root);

    let mut project = structure.create("长夜").unwrap();
    let first = structure.add_volume(&mut project, "开篇").unwrap();
    assert_eq!(first.title, "第一卷：开篇");
    let chapter = structure.add_chapter(&mut project, &first.id, "晨光").unwrap();
    assert_eq!(chapter.title, "第001章 晨光");
    assert_eq!(chapter.filename, "001-晨光.txt");
    structure.save(&project).unwrap();

    // Content starts empty, save derives the backup
    assert_eq!(content.load_content(&chapter.filename), "");
    let outcome = content.save_content(&chapter.filename, "<p>Hello</p><p>World</p>");
    assert!(outcome.ok);
    assert_eq!(
        std::fs::read_to_string(content.backup_path(&chapter.filename)).unwrap(),
        "Hello\nWorld\n"
    );

    // Global numbering continues in the next volume
    let second = structure.add_volume(&mut project, "中局").unwrap();
    let next = structure.add_chapter(&mut project, &second.id, "正午 时分").unwrap();
    assert_eq!(next.title, "第002章 正午 时分");
    assert_eq!(next.filename, "002-正午_时分.txt");
    structure.save(&project).unwrap();

    // Only the latest chapter may go
    assert!(matches!(
        structure.delete(&mut project, &chapter.id),
        Err(ProjectError::NotLatestChapter { .. })
    ));
    structure.delete(&mut project, &next.id).unwrap();
    structure.save(&project).unwrap();

    let reloaded = structure.load().unwrap();
    assert_eq!(reloaded, project);
    assert_eq!(reloaded.chapters().count(), 1);
}

#[test]
fn test_find_over_loaded_chapter() {
    let dir = TempDir::new().unwrap();
    let structure = StructureStore::new(dir.path(), NumberingConfig::default());
    let content = ChapterContentStore::new(dir.path());
    let mut project = structure.create("b").unwrap();
    let volume = structure.add_volume(&mut project, "v").unwrap();
    let chapter = structure.add_chapter(&mut project, &volume.id, "c").unwrap();
    content.save_content(&chapter.filename, "风起，风停，风又起");

    let text = content.load_content(&chapter.filename);
    let mut find = FindEngine::new();
    assert_eq!(find.submit(&text, "风"), FindState::HasMatches(0));
    assert_eq!(find.counter(), "1/3");
    assert_eq!(find.prev(&text), FindState::HasMatches(2));
    assert_eq!(find.counter(), "3/3");
    assert_eq!(find.next(&text), FindState::HasMatches(0));
}
