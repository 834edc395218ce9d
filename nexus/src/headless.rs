//! Headless mode for the story player.
//!
//! A line-oriented interface for running stories without a TUI, for
//! scripting and automated testing.
//!
//! - Lines starting with `#` are commands (export, import, undo, quit, ...)
//! - Any other line is a choice, by number or by label

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use nexus_core::persist::{
    export_story_file, import_story_file, story_export_path, transcript_path, write_transcript,
};
use nexus_core::{ChoiceOutcome, Mood, Playthrough, StoryError, UndoOutcome};

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlessCommand {
    /// Choice by 1-based number
    ChooseIndex(usize),
    /// Choice by label
    Choose(String),
    Undo,
    Restart,
    Status,
    Export(Option<PathBuf>),
    Import(PathBuf),
    Transcript(Option<PathBuf>),
    Scene(String),
    Branch(String),
    Help,
    Quit,
}

/// Parse one input line. Blank lines are rejected by the caller.
pub fn parse_command(line: &str) -> Result<HeadlessCommand, String> {
    let line = line.trim();
    let Some(command) = line.strip_prefix('#') else {
        return Ok(match line.parse::<usize>() {
            Ok(n) => HeadlessCommand::ChooseIndex(n),
            Err(_) => HeadlessCommand::Choose(line.to_string()),
        });
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };
    let path = (!arg.is_empty()).then(|| PathBuf::from(arg));

    match name {
        "choose" if arg.is_empty() => Err("Usage: #choose <number|label>".to_string()),
        "choose" => parse_command(arg),
        "undo" => Ok(HeadlessCommand::Undo),
        "restart" => Ok(HeadlessCommand::Restart),
        "status" => Ok(HeadlessCommand::Status),
        "export" => Ok(HeadlessCommand::Export(path)),
        "import" => path
            .map(HeadlessCommand::Import)
            .ok_or_else(|| "Usage: #import <path>".to_string()),
        "transcript" => Ok(HeadlessCommand::Transcript(path)),
        "scene" if arg.is_empty() => Err("Usage: #scene <text>".to_string()),
        "scene" => Ok(HeadlessCommand::Scene(arg.to_string())),
        "branch" if arg.is_empty() => Err("Usage: #branch <text>".to_string()),
        "branch" => Ok(HeadlessCommand::Branch(arg.to_string())),
        "help" => Ok(HeadlessCommand::Help),
        "quit" | "exit" => Ok(HeadlessCommand::Quit),
        _ => Err("Unknown command. Type #help for help.".to_string()),
    }
}

/// Executes commands against a playthrough, writing tagged output.
pub struct HeadlessRunner {
    pub play: Playthrough,
}

impl HeadlessRunner {
    pub fn new(play: Playthrough) -> Self {
        Self { play }
    }

    /// Run one command. Returns `false` once the reader has quit.
    pub async fn execute(
        &mut self,
        command: HeadlessCommand,
        out: &mut impl Write,
    ) -> io::Result<bool> {
        match command {
            HeadlessCommand::ChooseIndex(n) => {
                let result = self.play.choose_index(n);
                self.report_choice(result, out)?;
            }
            HeadlessCommand::Choose(label) => {
                let result = self.play.choose(&label);
                self.report_choice(result, out)?;
            }
            HeadlessCommand::Undo => match self.play.undo() {
                UndoOutcome::Undone(_) => self.print_node(out)?,
                UndoOutcome::NothingToUndo => writeln!(out, "[ERROR] Nothing to undo")?,
            },
            HeadlessCommand::Restart => match self.play.restart() {
                Ok(()) => {
                    writeln!(out, "[RESTARTED]")?;
                    self.print_node(out)?;
                }
                Err(e) => writeln!(out, "[ERROR] {e}")?,
            },
            HeadlessCommand::Status => self.print_status(out)?,
            HeadlessCommand::Export(path) => {
                let path =
                    path.unwrap_or_else(|| story_export_path(&self.play.config().export_dir));
                match export_story_file(self.play.graph(), &path).await {
                    Ok(()) => writeln!(out, "[EXPORTED] {}", path.display())?,
                    Err(e) => writeln!(out, "[ERROR] Export failed: {e}")?,
                }
            }
            HeadlessCommand::Import(path) => {
                let result = match import_story_file(&path).await {
                    Ok(definition) => self
                        .play
                        .import_definition(definition)
                        .map_err(|e| e.to_string()),
                    Err(e) => Err(e.to_string()),
                };
                match result {
                    Ok(()) => {
                        writeln!(
                            out,
                            "[IMPORTED] {} scenes from {}",
                            self.play.graph().len(),
                            path.display()
                        )?;
                        self.print_node(out)?;
                    }
                    Err(e) => writeln!(out, "[ERROR] Import failed: {e}")?,
                }
            }
            HeadlessCommand::Transcript(path) => {
                let path = path.unwrap_or_else(|| transcript_path(&self.play.config().export_dir));
                match write_transcript(self.play.session(), &path).await {
                    Ok(()) => writeln!(out, "[TRANSCRIPT] {}", path.display())?,
                    Err(e) => writeln!(out, "[ERROR] Transcript failed: {e}")?,
                }
            }
            HeadlessCommand::Scene(text) => {
                match self.play.add_scene(&text, "", Mood::default()) {
                    Ok(id) => {
                        writeln!(out, "[ADDED] {id}")?;
                        self.print_node(out)?;
                    }
                    Err(e) => writeln!(out, "[ERROR] {e}")?,
                }
            }
            HeadlessCommand::Branch(text) => {
                match self.play.add_branch(&text, "", Mood::default()) {
                    Ok(branch) => {
                        writeln!(out, "[ADDED] {} -> {}", branch.junction, branch.leaf)?;
                        self.print_node(out)?;
                    }
                    Err(e) => writeln!(out, "[ERROR] {e}")?,
                }
            }
            HeadlessCommand::Help => print_help(out)?,
            HeadlessCommand::Quit => {
                writeln!(out, "Goodbye!")?;
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn report_choice(
        &self,
        result: Result<ChoiceOutcome, StoryError>,
        out: &mut impl Write,
    ) -> io::Result<()> {
        match result {
            Ok(outcome) => {
                self.print_node(out)?;
                if let Some(unlock) = outcome.unlocked.filter(|u| u.was_new) {
                    writeln!(out, "[ACHIEVEMENT] {}", unlock.name)?;
                }
                Ok(())
            }
            Err(e) => writeln!(out, "[ERROR] {e}"),
        }
    }

    /// Print the current scene and its numbered choices.
    pub fn print_node(&self, out: &mut impl Write) -> io::Result<()> {
        let node = match self.play.current_node() {
            Ok(node) => node,
            Err(e) => return writeln!(out, "[ERROR] {e}"),
        };

        writeln!(out, "[SCENE] {}", node.id)?;
        for para in node.text.split("\n\n") {
            writeln!(out, "{para}")?;
        }
        writeln!(out)?;

        if node.is_ending() {
            writeln!(out, "[ENDING]")?;
        } else {
            for (i, choice) in node.choices.iter().enumerate() {
                writeln!(out, "  {}. {}", i + 1, choice.label)?;
            }
        }
        writeln!(out)
    }

    fn print_status(&self, out: &mut impl Write) -> io::Result<()> {
        let stats = self.play.stats();
        writeln!(out, "[STATUS]")?;
        writeln!(out, "  Scene: {}", self.play.current_id())?;
        writeln!(out, "  Choices made: {}", stats.choices_made)?;
        writeln!(out, "  Minutes: {}", stats.minutes_played)?;
        writeln!(
            out,
            "  Achievements: {}/{}",
            stats.achievements_unlocked, stats.achievements_available
        )?;
        for name in self.play.achievements().iter() {
            writeln!(out, "    🏆 {name}")?;
        }
        writeln!(out, "  Progress: {:.0}%", self.play.progress() * 100.0)?;
        writeln!(out, "  Path: {}", self.play.journey_path())
    }
}

fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "[HELP]")?;
    writeln!(out, "  <number> or <label>  - Take a choice")?;
    writeln!(out, "  #undo                - Go back one step")?;
    writeln!(out, "  #restart             - Begin again")?;
    writeln!(out, "  #status              - Show journey statistics")?;
    writeln!(out, "  #scene <text>        - Write a scene linked from here")?;
    writeln!(out, "  #branch <text>       - Write a scene behind a new crossroads")?;
    writeln!(out, "  #export [path]       - Save the story as JSON")?;
    writeln!(out, "  #import <path>       - Load a story")?;
    writeln!(out, "  #transcript [path]   - Save your adventure as text")?;
    writeln!(out, "  #quit                - Exit")
}

/// Run the player in headless mode over stdin and stdout.
pub async fn run_headless(play: Playthrough) -> anyhow::Result<()> {
    let mut runner = HeadlessRunner::new(play);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    writeln!(stdout, "=== Narrative Nexus Headless Mode ===")?;
    writeln!(stdout, "Scenes: {}", runner.play.graph().len())?;
    writeln!(stdout)?;
    print_help(&mut stdout)?;
    writeln!(stdout)?;
    runner.print_node(&mut stdout)?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::error!(error = %e, "Error reading input");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let keep_going = match parse_command(&line) {
            Ok(command) => runner.execute(command, &mut stdout).await?,
            Err(message) => {
                writeln!(stdout, "[ERROR] {message}")?;
                true
            }
        };
        stdout.flush()?;

        if !keep_going {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_core::sample::FOREST_TRAIL;
    use tempfile::TempDir;

    fn runner() -> HeadlessRunner {
        HeadlessRunner::new(Playthrough::sample().unwrap())
    }

    async fn run(runner: &mut HeadlessRunner, line: &str) -> String {
        let mut out = Vec::new();
        let command = parse_command(line).unwrap();
        runner.execute(command, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_choices() {
        assert_eq!(parse_command("2"), Ok(HeadlessCommand::ChooseIndex(2)));
        assert_eq!(
            parse_command("#choose Return to the crossroads"),
            Ok(HeadlessCommand::Choose("Return to the crossroads".to_string()))
        );
        assert!(parse_command("#choose").is_err());
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("#undo"), Ok(HeadlessCommand::Undo));
        assert_eq!(parse_command("#exit"), Ok(HeadlessCommand::Quit));
        assert_eq!(parse_command("#export"), Ok(HeadlessCommand::Export(None)));
        assert_eq!(
            parse_command("#export out.json"),
            Ok(HeadlessCommand::Export(Some(PathBuf::from("out.json"))))
        );
        assert!(parse_command("#import").is_err());
        assert!(parse_command("#scene   ").is_err());
        assert!(parse_command("#dance").is_err());
    }

    #[tokio::test]
    async fn test_choose_prints_next_scene() {
        let mut runner = runner();
        let output = run(&mut runner, FOREST_TRAIL).await;

        assert!(output.starts_with("[SCENE] forest_entrance"));
        assert!(output.contains("  1. ✨ Follow the mysterious light"));
        assert!(output.contains("  3. 🔙 Return to the crossroads"));
    }

    #[tokio::test]
    async fn test_invalid_choice_reports_error() {
        let mut runner = runner();
        let output = run(&mut runner, "9").await;

        assert!(output.starts_with("[ERROR]"));
        assert_eq!(runner.play.current_id(), "start");
    }

    #[tokio::test]
    async fn test_ending_reports_achievement_once() {
        let mut runner = runner();
        for line in ["1", "2", "1"] {
            run(&mut runner, line).await;
        }
        assert_eq!(runner.play.current_id(), "key_taken");
        assert!(runner.play.achievements().contains("True North of the Heart"));

        run(&mut runner, "#undo").await;
        let output = run(&mut runner, "1").await;
        assert!(output.contains("[ENDING]"));
        assert!(!output.contains("[ACHIEVEMENT]"));
    }

    #[tokio::test]
    async fn test_first_unlock_is_reported() {
        let mut runner = runner();
        run(&mut runner, "1").await;
        run(&mut runner, "2").await;
        let output = run(&mut runner, "1").await;

        assert!(output.contains("[ENDING]"));
        assert!(output.contains("[ACHIEVEMENT] True North of the Heart"));
    }

    #[tokio::test]
    async fn test_undo_at_start() {
        let mut runner = runner();
        let output = run(&mut runner, "#undo").await;
        assert_eq!(output, "[ERROR] Nothing to undo\n");
    }

    #[tokio::test]
    async fn test_scene_then_follow() {
        let mut runner = runner();
        let output = run(&mut runner, "#scene A fox watches from the ferns").await;
        assert!(output.starts_with("[ADDED] "));
        assert!(output.contains("Continue to: A fox watches from the ferns..."));

        let output = run(&mut runner, "3").await;
        assert!(output.contains("A fox watches from the ferns"));
        assert!(output.contains("[ENDING]"));
    }

    #[tokio::test]
    async fn test_export_and_import() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("story.json");
        let mut runner = runner();

        run(&mut runner, "#scene A quiet harbor at dawn").await;
        let output = run(&mut runner, &format!("#export {}", path.display())).await;
        assert!(output.starts_with("[EXPORTED]"));

        let mut fresh = HeadlessRunner::new(Playthrough::sample().unwrap());
        let output = run(&mut fresh, &format!("#import {}", path.display())).await;
        assert!(output.starts_with("[IMPORTED] 15 scenes"));
        assert_eq!(fresh.play.graph().len(), 15);
    }

    #[tokio::test]
    async fn test_import_missing_file_keeps_story() {
        let mut runner = runner();
        run(&mut runner, "1").await;
        let output = run(&mut runner, "#import /nonexistent/story.json").await;

        assert!(output.starts_with("[ERROR] Import failed"));
        assert_eq!(runner.play.current_id(), "forest_entrance");
    }

    #[tokio::test]
    async fn test_status_and_quit() {
        let mut runner = runner();
        run(&mut runner, "1").await;
        let output = run(&mut runner, "#status").await;
        assert!(output.contains("  Scene: forest_entrance"));
        assert!(output.contains("  Choices made: 1"));
        assert!(output.contains("  Achievements: 0/5"));

        let mut out = Vec::new();
        let keep_going = runner
            .execute(HeadlessCommand::Quit, &mut out)
            .await
            .unwrap();
        assert!(!keep_going);
    }
}
