//! Story files on disk.
//!
//! Stories are exchanged as pretty-printed JSON documents (see
//! [`GraphDefinition`]); transcripts are plain text. Default file names carry
//! a local timestamp so repeated exports don't overwrite each other.

use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::fs;

use crate::error::PersistError;
use crate::graph::{GraphDefinition, StoryGraph};
use crate::session::Session;

/// File name prefix of story exports.
pub const STORY_EXPORT_PREFIX: &str = "story_tree_";

/// File name prefix of transcripts.
pub const TRANSCRIPT_PREFIX: &str = "my_adventure_";

/// Write `graph` as a story document.
pub async fn export_story_file(
    graph: &StoryGraph,
    path: impl AsRef<Path>,
) -> Result<(), PersistError> {
    let path = path.as_ref();
    let content = graph.export().to_json_pretty()?;
    fs::write(path, content).await?;
    tracing::info!(path = %path.display(), nodes = graph.len(), "Exported story");
    Ok(())
}

/// Read and validate a story document.
///
/// Nothing is loaded; hand the result to [`StoryGraph::load`] or
/// `Playthrough::import_definition`.
pub async fn import_story_file(path: impl AsRef<Path>) -> Result<GraphDefinition, PersistError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).await?;
    let definition = GraphDefinition::from_json(&content).inspect_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Rejected story file");
    })?;
    tracing::info!(path = %path.display(), nodes = definition.len(), "Read story file");
    Ok(definition)
}

/// Write the session's visited text as numbered chapters.
pub async fn write_transcript(
    session: &Session,
    path: impl AsRef<Path>,
) -> Result<(), PersistError> {
    let path = path.as_ref();
    fs::write(path, session.compile_transcript()).await?;
    tracing::info!(path = %path.display(), chapters = session.history().len(), "Wrote transcript");
    Ok(())
}

/// `story_tree_YYYYmmdd_HHMM.json` in `dir`, stamped with local time.
pub fn story_export_path(dir: impl AsRef<Path>) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M");
    dir.as_ref()
        .join(format!("{STORY_EXPORT_PREFIX}{stamp}.json"))
}

/// `my_adventure_YYYYmmdd.txt` in `dir`, stamped with local date.
pub fn transcript_path(dir: impl AsRef<Path>) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d");
    dir.as_ref().join(format!("{TRANSCRIPT_PREFIX}{stamp}.txt"))
}

/// Information about an exported story file.
#[derive(Debug, Clone)]
pub struct StoryFileInfo {
    pub path: PathBuf,
    pub nodes: usize,
}

/// List readable story exports in a directory, newest name first.
///
/// Files that fail to parse are skipped.
pub async fn list_story_exports(
    dir: impl AsRef<Path>,
) -> Result<Vec<StoryFileInfo>, PersistError> {
    let mut exports = Vec::new();
    let mut entries = fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_export = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with(STORY_EXPORT_PREFIX) && name.ends_with(".json"))
            .unwrap_or(false);
        if !is_export {
            continue;
        }
        if let Ok(definition) = import_story_file(&path).await {
            exports.push(StoryFileInfo {
                path,
                nodes: definition.len(),
            });
        }
    }

    // Timestamped names sort chronologically
    exports.sort_by(|a, b| b.path.cmp(&a.path));
    Ok(exports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoryError;
    use crate::sample::sample_story;
    use tempfile::TempDir;

    #[test]
    fn test_story_export_path() {
        let path = story_export_path("/tmp/stories");
        let name = path.file_name().unwrap().to_str().unwrap();

        assert!(path.starts_with("/tmp/stories"));
        assert!(name.starts_with("story_tree_"));
        assert!(name.ends_with(".json"));
        // story_tree_ + YYYYmmdd_HHMM + .json
        assert_eq!(name.len(), "story_tree_".len() + 13 + ".json".len());
    }

    #[test]
    fn test_transcript_path() {
        let path = transcript_path(".");
        let name = path.file_name().unwrap().to_str().unwrap();

        assert!(name.starts_with("my_adventure_"));
        assert!(name.ends_with(".txt"));
        assert_eq!(name.len(), "my_adventure_".len() + 8 + ".txt".len());
    }

    #[tokio::test]
    async fn test_export_and_import() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("story.json");
        let graph = sample_story();

        export_story_file(&graph, &path)
            .await
            .expect("Export should succeed");
        let definition = import_story_file(&path)
            .await
            .expect("Import should succeed");

        assert_eq!(definition, graph.export());
        let ids: Vec<_> = definition.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids.first(), Some(&"start"));
    }

    #[tokio::test]
    async fn test_export_is_pretty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("story.json");

        export_story_file(&sample_story(), &path).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("{\n  \"start\": {"));
        assert!(content.contains("\"image_prompt\""));
    }

    #[tokio::test]
    async fn test_import_malformed_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let err = import_story_file(&path).await.unwrap_err();

        assert!(matches!(
            err,
            PersistError::Story(StoryError::MalformedDefinition(_))
        ));
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let err = import_story_file(temp_dir.path().join("nope.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, PersistError::Io(_)));
    }

    #[tokio::test]
    async fn test_write_transcript() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("adventure.txt");
        let graph = sample_story();
        let session = Session::start(&graph).unwrap();

        write_transcript(&session, &path).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Chapter 1:\n🌅 The Awakening"));
    }

    #[tokio::test]
    async fn test_list_story_exports() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path();
        let graph = sample_story();

        export_story_file(&graph, dir.join("story_tree_20240101_0900.json"))
            .await
            .unwrap();
        export_story_file(&graph, dir.join("story_tree_20240301_1200.json"))
            .await
            .unwrap();
        std::fs::write(dir.join("story_tree_20240501_0000.json"), "not json").unwrap();
        std::fs::write(dir.join("notes.json"), "{}").unwrap();

        let exports = list_story_exports(dir).await.unwrap();

        assert_eq!(exports.len(), 2);
        assert!(exports[0].path.ends_with("story_tree_20240301_1200.json"));
        assert_eq!(exports[0].nodes, 14);
    }

    #[tokio::test]
    async fn test_list_story_exports_empty_dir() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let exports = list_story_exports(temp_dir.path()).await.unwrap();
        assert!(exports.is_empty());
    }
}
