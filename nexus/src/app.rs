//! Main application state and logic

use std::path::{Path, PathBuf};

use nexus_core::authoring::SCENE_MOODS;
use nexus_core::persist::{story_export_path, transcript_path};
use nexus_core::{
    ChoiceOutcome, GraphDefinition, Mood, Playthrough, StoryError, StoryNode, UndoOutcome,
};

use crate::ui::theme::StoryTheme;
use crate::ui::Overlay;

/// Vim-style input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - choosing and hotkeys (default)
    #[default]
    Normal,
    /// Insert mode - writing a new scene
    Insert,
    /// Command mode - entering : commands
    Command,
}

/// File work the run loop performs between frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingIo {
    Export(PathBuf),
    Import(PathBuf),
    /// Import the newest export in the export directory.
    ImportLatest,
    Transcript(PathBuf),
}

/// Main application state
pub struct App {
    pub play: Playthrough,

    // UI state
    pub theme: StoryTheme,
    overlay: Option<Overlay>,
    pub selected: usize,
    pub story_scroll: u16,

    // Input state
    pub input_mode: InputMode,
    input_buffer: String,
    cursor_position: usize,

    // Settings for scenes written from the player
    pub scene_mood: Mood,
    pub scene_prompt: String,

    // Status
    status_message: Option<String>,
    pub pending_io: Option<PendingIo>,
    pub should_quit: bool,
}

impl App {
    pub fn new(play: Playthrough) -> Self {
        let mut app = Self {
            play,
            theme: StoryTheme::default(),
            overlay: None,
            selected: 0,
            story_scroll: 0,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            cursor_position: 0,
            scene_mood: Mood::default(),
            scene_prompt: String::new(),
            status_message: None,
            pending_io: None,
            should_quit: false,
        };
        app.set_status("Press 1-9 or Enter to choose, ? for help");
        app
    }

    /// The node being read, or `None` if the graph lost it.
    pub fn current_node(&self) -> Option<&StoryNode> {
        self.play.current_node().ok()
    }

    fn choice_count(&self) -> usize {
        self.current_node().map(|n| n.choices.len()).unwrap_or(0)
    }

    // =========================================================================
    // Story actions
    // =========================================================================

    /// Follow the `n`th choice, counting from 1.
    pub fn choose(&mut self, n: usize) {
        let result = self.play.choose_index(n);
        self.after_choice(result);
    }

    /// Follow the highlighted choice.
    pub fn choose_selected(&mut self) {
        self.choose(self.selected + 1);
    }

    fn after_choice(&mut self, result: Result<ChoiceOutcome, StoryError>) {
        match result {
            Ok(outcome) => {
                self.reset_view();
                match outcome.unlocked {
                    Some(unlock) if unlock.was_new => {
                        self.set_status(format!("🏆 Achievement unlocked: {}", unlock.name));
                        self.overlay = Some(Overlay::Achievement(unlock.name));
                    }
                    _ if outcome.at_ending => self.set_status("🏁 The story concludes here"),
                    _ => self.clear_status(),
                }
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    pub fn select_next(&mut self) {
        let count = self.choice_count();
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    pub fn select_prev(&mut self) {
        let count = self.choice_count();
        if count > 0 {
            self.selected = (self.selected + count - 1) % count;
        }
    }

    pub fn undo(&mut self) {
        match self.play.undo() {
            UndoOutcome::Undone(_) => {
                self.reset_view();
                self.set_status("Went back one step");
            }
            UndoOutcome::NothingToUndo => self.set_status("Nothing to undo"),
        }
    }

    pub fn restart(&mut self) {
        match self.play.restart() {
            Ok(()) => {
                self.reset_view();
                self.set_status("Story restarted");
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    /// Write a scene linked from the current node.
    pub fn add_scene(&mut self, text: &str) {
        let result = self
            .play
            .add_scene(text, &self.scene_prompt, self.scene_mood.clone());
        match result {
            Ok(_) => self.set_status("New scene added to this page"),
            Err(e) => self.set_status(e.to_string()),
        }
    }

    /// Write a scene behind a new junction at the current node.
    pub fn add_branch(&mut self, text: &str) {
        let result = self
            .play
            .add_branch(text, &self.scene_prompt, self.scene_mood.clone());
        match result {
            Ok(_) => self.set_status("New branch added to this page"),
            Err(e) => self.set_status(e.to_string()),
        }
    }

    /// Swap in an imported story. A story without a root is rejected and
    /// the current one kept.
    pub fn load_story(&mut self, definition: GraphDefinition, source: &Path) {
        let nodes = definition.len();
        match self.play.import_definition(definition) {
            Ok(()) => {
                self.reset_view();
                self.close_overlay();
                self.set_status(format!(
                    "Imported {nodes} scenes from {}",
                    source.display()
                ));
            }
            Err(e) => self.set_status(format!("Import failed: {e}")),
        }
    }

    fn reset_view(&mut self) {
        self.selected = 0;
        self.story_scroll = 0;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.story_scroll = self.story_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.story_scroll = self.story_scroll.saturating_add(lines);
    }

    // =========================================================================
    // Modes and input
    // =========================================================================

    /// Enter command mode (starts with :)
    pub fn enter_command_mode(&mut self) {
        self.input_mode = InputMode::Command;
        self.input_buffer.clear();
        self.input_buffer.push(':');
        self.cursor_position = 1;
    }

    /// Enter insert mode to write a scene
    pub fn enter_insert_mode(&mut self) {
        self.input_mode = InputMode::Insert;
        self.set_status(format!(
            "Writing a scene (mood: {}). Enter to add, Esc to cancel",
            self.scene_mood
        ));
    }

    /// Exit to normal mode
    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.clear_input();
    }

    /// Take the input buffer, leaving it empty
    pub fn submit_input(&mut self) -> Option<String> {
        if self.input_buffer.is_empty() {
            return None;
        }
        self.cursor_position = 0;
        Some(std::mem::take(&mut self.input_buffer))
    }

    /// Handle a typed character (unicode-safe)
    pub fn type_char(&mut self, c: char) {
        // Convert cursor position (character index) to byte index
        let byte_pos = self
            .input_buffer
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len());
        self.input_buffer.insert(byte_pos, c);
        self.cursor_position += 1;
    }

    /// Handle backspace (unicode-safe)
    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position)
            {
                self.input_buffer
                    .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            }
        }
    }

    /// Handle delete (unicode-safe)
    pub fn delete(&mut self) {
        if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position) {
            self.input_buffer
                .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.input_buffer.chars().count();
        self.cursor_position = (self.cursor_position + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.input_buffer.chars().count();
    }

    /// Clear the input buffer
    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Process a colon command
    pub fn process_command(&mut self, command: &str) {
        let cmd = command.trim_start_matches(':').trim();
        let (name, arg) = match cmd.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (cmd, ""),
        };

        let export_dir = self.play.config().export_dir.clone();
        match name {
            "" => {}
            "q" | "quit" | "exit" => self.should_quit = true,
            "export" | "w" => {
                let path = optional_path(arg).unwrap_or_else(|| story_export_path(&export_dir));
                self.set_status("Exporting...");
                self.pending_io = Some(PendingIo::Export(path));
            }
            "import" | "e" => {
                self.set_status("Importing...");
                self.pending_io = Some(match optional_path(arg) {
                    Some(path) => PendingIo::Import(path),
                    None => PendingIo::ImportLatest,
                });
            }
            "transcript" => {
                let path = optional_path(arg).unwrap_or_else(|| transcript_path(&export_dir));
                self.set_status("Writing transcript...");
                self.pending_io = Some(PendingIo::Transcript(path));
            }
            "scene" => self.add_scene(arg),
            "branch" => self.add_branch(arg),
            "mood" => {
                if arg.is_empty() {
                    self.set_status(format!("Moods: {}", SCENE_MOODS.join(", ")));
                } else {
                    self.scene_mood = Mood::from(arg);
                    self.set_status(format!("New scenes will feel {arg}"));
                }
            }
            "prompt" => {
                self.scene_prompt = arg.to_string();
                if arg.is_empty() {
                    self.set_status("Image prompt cleared");
                } else {
                    self.set_status("Image prompt set for new scenes");
                }
            }
            "undo" => self.undo(),
            "restart" => self.restart(),
            "help" | "h" => self.toggle_help(),
            other => self.set_status(format!("Unknown command: {other}")),
        }
    }

    // =========================================================================
    // Overlays and status
    // =========================================================================

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        if matches!(self.overlay, Some(Overlay::Help)) {
            self.overlay = None;
        } else {
            self.overlay = Some(Overlay::Help);
        }
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// Set status message (always overwrites)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }
}

fn optional_path(arg: &str) -> Option<PathBuf> {
    (!arg.is_empty()).then(|| PathBuf::from(arg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_core::sample::FOREST_TRAIL;

    fn app() -> App {
        App::new(Playthrough::sample().unwrap())
    }

    #[test]
    fn test_choose_by_number() {
        let mut app = app();
        app.choose(1);
        assert_eq!(app.play.current_id(), "forest_entrance");

        app.choose(7);
        assert_eq!(app.play.current_id(), "forest_entrance");
        assert!(app.status_message().unwrap().contains("not available"));
    }

    #[test]
    fn test_selection_wraps() {
        let mut app = app();
        app.select_prev();
        assert_eq!(app.selected, 1);
        app.select_next();
        assert_eq!(app.selected, 0);
        app.select_next();
        app.choose_selected();
        assert_eq!(app.play.current_id(), "village_gate");
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_new_achievement_opens_overlay() {
        let mut app = app();
        app.choose(1);
        app.choose(2);
        app.choose(1);

        assert_eq!(app.play.current_id(), "key_taken");
        assert!(matches!(
            app.overlay(),
            Some(Overlay::Achievement(name)) if name == "True North of the Heart"
        ));

        app.close_overlay();
        app.undo();
        app.choose(1);
        assert!(!app.has_overlay());
    }

    #[test]
    fn test_undo_at_start_reports() {
        let mut app = app();
        app.undo();
        assert_eq!(app.status_message(), Some("Nothing to undo"));
    }

    #[test]
    fn test_scene_command_uses_mood_and_prompt() {
        let mut app = app();
        app.process_command(":mood epic");
        app.process_command(":prompt stormy sea");
        app.process_command(":scene A ship appears on the horizon");

        let node = app.current_node().unwrap();
        let target = node.choices.nth(2).unwrap().target.clone();
        let scene = app.play.graph().get_node(target.as_str()).unwrap();
        assert_eq!(scene.mood.as_str(), "epic");
        assert_eq!(scene.image_prompt, "stormy sea");
    }

    #[test]
    fn test_blank_scene_command_reports() {
        let mut app = app();
        app.process_command(":scene   ");
        assert_eq!(app.status_message(), Some("Scene text cannot be empty"));
    }

    #[test]
    fn test_file_commands_queue_io() {
        let mut app = app();

        app.process_command(":export out.json");
        assert_eq!(app.pending_io, Some(PendingIo::Export(PathBuf::from("out.json"))));

        app.process_command(":import");
        assert_eq!(app.pending_io, Some(PendingIo::ImportLatest));

        app.process_command(":transcript");
        assert!(matches!(app.pending_io, Some(PendingIo::Transcript(_))));
    }

    #[test]
    fn test_quit_command() {
        let mut app = app();
        app.process_command(":q");
        assert!(app.should_quit);
    }

    #[test]
    fn test_restart_command() {
        let mut app = app();
        app.play.choose(FOREST_TRAIL).unwrap();
        app.process_command(":restart");
        assert_eq!(app.play.current_id(), "start");
    }

    #[test]
    fn test_load_story_replaces_graph() {
        let mut app = app();
        app.choose(1);
        let definition = GraphDefinition::from_json(
            r#"{"start": {"text": "Fresh page", "choices": {}}}"#,
        )
        .unwrap();

        app.load_story(definition, Path::new("fresh.json"));
        assert_eq!(app.play.current_id(), "start");
        assert_eq!(app.play.graph().len(), 1);
        assert!(app.status_message().unwrap().contains("Imported 1 scenes"));
    }

    #[test]
    fn test_load_empty_story_keeps_current() {
        let mut app = app();
        app.choose(1);
        let definition = GraphDefinition::from_json("{}").unwrap();

        app.load_story(definition, Path::new("empty.json"));
        assert_eq!(app.play.current_id(), "forest_entrance");
        assert!(app.status_message().unwrap().starts_with("Import failed"));
    }

    #[test]
    fn test_unicode_input_editing() {
        let mut app = app();
        for c in "🌊ab".chars() {
            app.type_char(c);
        }
        app.cursor_home();
        app.delete();
        assert_eq!(app.input_buffer(), "ab");
        app.cursor_end();
        app.backspace();
        assert_eq!(app.submit_input().as_deref(), Some("a"));
        assert_eq!(app.input_buffer(), "");
    }
}
