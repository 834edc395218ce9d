//! End-to-end tests for reading and extending stories.
//!
//! These tests drive the public API only, through `StoryHarness` and
//! `Playthrough`.

use nexus_core::sample::{sample_story, FOREST_TRAIL, VILLAGE_ROAD};
use nexus_core::testing::{
    assert_achievement, assert_at, assert_choice_count, assert_session_consistent, StoryHarness,
};
use nexus_core::{NodeId, StoryError, StoryGraph, UndoOutcome};

// =============================================================================
// SAMPLE STORY
// =============================================================================

#[test]
fn test_forest_trail_and_back() {
    let mut harness = StoryHarness::new();
    assert_at(&harness, "start");

    let outcome = harness.choose(FOREST_TRAIL);
    assert_eq!(outcome.node_id, "forest_entrance");
    assert_eq!(harness.play.session().choice_count(), 1);

    assert_eq!(harness.undo(), UndoOutcome::Undone(NodeId::from("start")));
    assert_at(&harness, "start");
    assert_eq!(harness.play.session().choice_count(), 0);
    assert_session_consistent(&harness);
}

#[test]
fn test_every_ending_awards_its_achievement() {
    let routes: [(&[&str], &str); 5] = [
        (
            &[
                FOREST_TRAIL,
                "🚪 Enter the hollow trunk - brave the darkness",
                "🗝️ Take the iron key - embrace your destiny",
            ],
            "True North of the Heart",
        ),
        (
            &[
                VILLAGE_ROAD,
                "💎 Buy the mysterious amulet - invest in magic",
                "🌊 Follow the vision to the lighthouse - heed the call",
            ],
            "Keeper of the Light",
        ),
        (
            &[
                VILLAGE_ROAD,
                "🧠 Politely refuse and ask about the map - seek knowledge",
                "🌊 Seek the hidden library - pursue knowledge",
            ],
            "Librarian of Lost Tales",
        ),
        (
            &[
                VILLAGE_ROAD,
                "🧠 Politely refuse and ask about the map - seek knowledge",
                "🏪 Ignore and explore the village - enjoy the present",
            ],
            "Master of the Present Moment",
        ),
        (
            &[
                FOREST_TRAIL,
                "✨ Follow the mysterious light - curiosity calls",
                "🎯 Answer 'an echo' - trust your intuition",
                "🌳 Continue deeper into the forest - embrace the journey",
            ],
            "Archaeologist of the Arcane",
        ),
    ];

    for (route, achievement) in routes {
        let mut harness = StoryHarness::new();
        let last = harness.walk(route).unwrap();

        assert!(last.at_ending, "route to {achievement} should end");
        assert_eq!(last.unlocked.unwrap().name, achievement);
        assert_choice_count(&harness, 0);
        assert_session_consistent(&harness);
    }
}

#[test]
fn test_achievements_accumulate_until_restart() {
    let mut harness = StoryHarness::new();
    harness.walk(&[
        VILLAGE_ROAD,
        "🧠 Politely refuse and ask about the map - seek knowledge",
        "🏪 Ignore and explore the village - enjoy the present",
    ]);
    harness.undo();
    harness.choose("🌊 Seek the hidden library - pursue knowledge");

    assert_achievement(&harness, "Master of the Present Moment");
    assert_achievement(&harness, "Librarian of Lost Tales");
    let stats = harness.play.stats();
    assert_eq!(stats.achievements_unlocked, 2);
    assert_eq!(stats.achievements_available, 5);

    harness.play.restart().unwrap();
    assert_at(&harness, "start");
    assert!(harness.play.achievements().is_empty());
    assert_session_consistent(&harness);
}

#[test]
fn test_loop_back_to_start_extends_history() {
    let mut harness = StoryHarness::new();
    harness.walk(&[
        FOREST_TRAIL,
        "🔙 Return to the crossroads - reconsider your path",
        VILLAGE_ROAD,
    ]);

    assert_at(&harness, "village_gate");
    assert_eq!(harness.play.session().history().len(), 4);
    assert_eq!(harness.play.journey_path(), "Step 1 → Step 2 → Step 3 → Step 4");
    assert_session_consistent(&harness);
}

// =============================================================================
// HISTORY INVARIANT
// =============================================================================

#[test]
fn test_history_invariant_over_mixed_operations() {
    let mut harness = StoryHarness::new();

    harness.choose(FOREST_TRAIL);
    assert!(harness.try_choose("Not a choice").is_err());
    harness.choose("✨ Follow the mysterious light - curiosity calls");
    harness.undo();
    harness.undo();
    harness.undo();
    assert_eq!(harness.undo(), UndoOutcome::NothingToUndo);
    harness.choose(VILLAGE_ROAD);

    assert_at(&harness, "village_gate");
    assert_session_consistent(&harness);
}

#[test]
fn test_dangling_link_reported() {
    let mut harness = StoryHarness::from_json(
        r#"{
            "start": {"text": "A bridge", "choices": {"Cross": "far_side", "Wait": "start"}}
        }"#,
    );

    let err = harness.try_choose("Cross").unwrap_err();

    assert_eq!(
        err,
        StoryError::DanglingLink {
            from: NodeId::from("start"),
            label: "Cross".to_string(),
            target: NodeId::from("far_side"),
        }
    );
    assert_at(&harness, "start");
    assert_session_consistent(&harness);
}

// =============================================================================
// AUTHORING WHILE READING
// =============================================================================

#[test]
fn test_author_then_read_new_scene() {
    let mut harness = StoryHarness::new();
    harness.choose(FOREST_TRAIL);

    let id = harness
        .play
        .add_scene("Moonlight spills over a silver pond", "silver pond", "magical")
        .unwrap();
    assert_choice_count(&harness, 4);

    let label = harness.choice_labels().pop().unwrap();
    assert_eq!(label, "Continue to: Moonlight spills over a silver...");
    let outcome = harness.choose(&label);

    assert_eq!(outcome.node_id, id);
    assert!(outcome.at_ending);
    assert!(outcome.unlocked.is_none());
    assert_session_consistent(&harness);
}

#[test]
fn test_ending_stops_being_ending_after_authoring() {
    let mut harness = StoryHarness::new();
    harness.walk(&[
        VILLAGE_ROAD,
        "🧠 Politely refuse and ask about the map - seek knowledge",
        "🏪 Ignore and explore the village - enjoy the present",
    ]);
    assert!(harness.play.is_at_ending().unwrap());

    let branch = harness.play.add_branch("Night falls on the market", "", "epic").unwrap();

    assert!(!harness.play.is_at_ending().unwrap());
    harness.choose("Face a new challenge");
    harness.choose("Take the left path");
    assert_at(&harness, branch.leaf.as_str());
    assert_session_consistent(&harness);
}

#[test]
fn test_exported_story_reads_the_same() {
    let mut original = StoryHarness::new();
    original.choose(FOREST_TRAIL);
    original.play.add_scene("A hidden grove", "", "wise").unwrap();

    let json = original.play.export_json().unwrap();
    let mut copy = StoryHarness::from_json(&json);

    assert_at(&copy, "start");
    copy.choose(FOREST_TRAIL);
    assert_eq!(copy.choice_labels(), original.choice_labels());
    copy.choose("Continue to: A hidden grove...");
    assert_eq!(copy.play.current_node().unwrap().text, "A hidden grove");
}

#[test]
fn test_root_rule_ignores_declaration_order() {
    let graph = StoryGraph::from_json(
        r#"{"epilogue": {"text": "Fin"}, "start": {"text": "Once"}, "middle": {"text": "Then"}}"#,
    )
    .unwrap();
    assert_eq!(graph.root_id().unwrap(), "start");

    let graph = StoryGraph::from_json(r#"{"epilogue": {"text": "Fin"}, "middle": {"text": "Then"}}"#)
        .unwrap();
    assert_eq!(graph.root_id().unwrap(), "epilogue");
}

#[test]
fn test_sample_is_closed() {
    assert!(sample_story().dangling_choices().is_empty());
}
