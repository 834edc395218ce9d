//! Tests for story files and transcripts on disk.

use nexus_core::persist::{
    export_story_file, import_story_file, list_story_exports, story_export_path, transcript_path,
    write_transcript,
};
use nexus_core::sample::FOREST_TRAIL;
use nexus_core::{PersistError, Playthrough, StoryError, StoryGraph};
use tempfile::TempDir;

#[tokio::test]
async fn test_authored_story_survives_export_and_import() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = story_export_path(temp_dir.path());

    let mut play = Playthrough::sample().unwrap();
    play.choose(FOREST_TRAIL).unwrap();
    let id = play.add_scene("A quiet spring", "spring water", "peaceful").unwrap();

    export_story_file(play.graph(), &path)
        .await
        .expect("Export should succeed");

    let definition = import_story_file(&path)
        .await
        .expect("Import should succeed");
    let mut fresh = Playthrough::sample().unwrap();
    fresh.import_definition(definition).unwrap();

    assert_eq!(fresh.graph().export(), play.graph().export());
    let scene = fresh.graph().get_node(id.as_str()).unwrap();
    assert_eq!(scene.image_prompt, "spring water");
    assert_eq!(scene.mood.as_str(), "peaceful");

    let exports = list_story_exports(temp_dir.path()).await.unwrap();
    assert_eq!(exports.len(), 1);
    assert_eq!(exports[0].nodes, 15);
}

#[tokio::test]
async fn test_failed_import_keeps_playthrough() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("story_tree_broken.json");
    std::fs::write(&path, r#"{"start": {"text": 42}}"#).unwrap();

    let mut play = Playthrough::sample().unwrap();
    play.choose(FOREST_TRAIL).unwrap();

    let result = import_story_file(&path).await;
    assert!(matches!(
        result,
        Err(PersistError::Story(StoryError::MalformedDefinition(_)))
    ));

    // A readable file whose story has no root is refused by the playthrough
    let empty = temp_dir.path().join("story_tree_empty.json");
    std::fs::write(&empty, "{}").unwrap();
    let definition = import_story_file(&empty).await.unwrap();
    assert_eq!(
        play.import_definition(definition).unwrap_err(),
        StoryError::NoRootDefined
    );
    assert_eq!(play.current_id(), "forest_entrance");
    assert_eq!(play.graph().len(), 14);
}

#[tokio::test]
async fn test_import_camel_case_prompt() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("legacy.json");
    std::fs::write(
        &path,
        r#"{"start": {"text": "Dawn", "imagePrompt": "sunrise", "mood": "hopeful"}}"#,
    )
    .unwrap();

    let definition = import_story_file(&path).await.unwrap();
    let graph = StoryGraph::from_definition(definition);

    assert_eq!(graph.get_root().unwrap().image_prompt, "sunrise");
}

#[tokio::test]
async fn test_transcript_of_a_walk() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = transcript_path(temp_dir.path());

    let mut play = Playthrough::sample().unwrap();
    play.choose(FOREST_TRAIL).unwrap();
    write_transcript(play.session(), &path).await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let chapters: Vec<_> = content.split("\n\n").filter(|c| c.starts_with("Chapter ")).collect();
    assert_eq!(chapters.len(), 2);
    assert!(chapters[0].starts_with("Chapter 1:\n🌅 The Awakening"));
    assert!(chapters[1].starts_with("Chapter 2:\n🌲 The Whispering Woods"));
}
