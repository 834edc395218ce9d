//! The built-in "Awakening" story.
//!
//! Fourteen nodes, five endings, one achievement per ending.

use crate::graph::{GraphDefinition, NodeDefinition, StoryGraph};

/// Label of the root choice that leads into the forest.
pub const FOREST_TRAIL: &str = "🌲 Take the forest trail - embrace the unknown";

/// Label of the root choice that leads to the village.
pub const VILLAGE_ROAD: &str = "🏡 Walk to the village - seek civilization";

fn scene(text: &str, choices: &[(&str, &str)], image_prompt: &str, mood: &str) -> NodeDefinition {
    NodeDefinition {
        text: text.to_string(),
        choices: choices.iter().copied().collect(),
        image_prompt: image_prompt.to_string(),
        mood: mood.into(),
        ..NodeDefinition::default()
    }
}

/// The sample story as an exchange document.
pub fn sample_definition() -> GraphDefinition {
    GraphDefinition::new()
        .with_node(
            "start",
            scene(
                "🌅 The Awakening

You awaken beneath a sky painted with violet clouds, the air crisp with unknown magic.
At your feet lies a faded map adorned with glowing runes, and before you, two paths diverge:

• A narrow, mysterious trail that disappears into the whispering darkness of an ancient forest
• A sunlit cobbled road leading to a distant village where chimney smoke dances in the breeze",
                &[
                    (FOREST_TRAIL, "forest_entrance"),
                    (VILLAGE_ROAD, "village_gate"),
                ],
                "fantasy landscape with violet clouds, ancient map, two diverging paths in magical forest",
                "mysterious",
            ),
        )
        .with_node(
            "forest_entrance",
            scene(
                "🌲 The Whispering Woods

The forest envelops you in a cathedral of ancient trees. Silence hangs heavy, broken only by
distant whispers that seem to call your name. A soft, ethereal light pulses between the gnarled
oaks, while a massive hollow tree trunk gapes like a doorway to forgotten realms.",
                &[
                    ("✨ Follow the mysterious light - curiosity calls", "mystic_clearing"),
                    ("🚪 Enter the hollow trunk - brave the darkness", "hollow_trunk"),
                    ("🔙 Return to the crossroads - reconsider your path", "start"),
                ],
                "enchanted forest with glowing lights, ancient trees, mysterious hollow trunk",
                "magical",
            ),
        )
        .with_node(
            "village_gate",
            scene(
                "🏡 Ravenwood Village Gates

The village gates open to reveal a charming settlement bustling with life. A merchant with
twinkling eyes offers you a strange amulet that hums with latent power. Nearby, children
pause their game to point curiously at your glowing map.",
                &[
                    ("💎 Buy the mysterious amulet - invest in magic", "amulet_shop"),
                    ("🧠 Politely refuse and ask about the map - seek knowledge", "old_scholar"),
                    ("🔙 Return to the crossroads", "start"),
                ],
                "fantasy village gate with merchant, children playing, magical amulet",
                "hopeful",
            ),
        )
        .with_node(
            "mystic_clearing",
            scene(
                "🦌 The Stag's Clearing

You emerge into a sun-dappled clearing where an ancient stag with antlers like crystalline
branches awaits. Its eyes hold ancient wisdom as it offers a riddle that echoes in your mind:

'I speak without a mouth and hear without ears. I have no body, but I come alive with wind. What am I?'",
                &[
                    ("🎯 Answer 'an echo' - trust your intuition", "riddle_success"),
                    ("🙏 Withdraw respectfully - some mysteries are not meant to be solved", "forest_exit"),
                ],
                "magical clearing with ancient crystalline stag, sunbeams through trees",
                "wise",
            ),
        )
        .with_node(
            "hollow_trunk",
            scene(
                "🔑 Chamber of Whispers

Inside the hollow trunk, you find a hidden chamber illuminated by glowing runes that pulse
with ancient magic. An iron key rests on a moss-covered stone altar, humming with potential energy.",
                &[
                    ("🗝️ Take the iron key - embrace your destiny", "key_taken"),
                    ("🚶 Leave it and go back - some power is too great", "forest_entrance"),
                ],
                "hidden chamber inside tree trunk with glowing runes, ancient key on altar",
                "mysterious",
            ),
        )
        .with_node(
            "amulet_shop",
            scene(
                "💎 Visions of the Amulet

The amulet hums warmly in your palm, and suddenly you're swept into a vision: a lone lighthouse
stands against storm-tossed cliffs, its beam cutting through torrential rain like a blade of hope.",
                &[
                    ("🌊 Follow the vision to the lighthouse - heed the call", "lighthouse_path"),
                    ("🔄 Discard the amulet - reject the vision", "village_gate"),
                ],
                "magical amulet showing vision of lighthouse on stormy cliff",
                "visionary",
            ),
        )
        .with_node(
            "old_scholar",
            scene(
                "📚 The Scholar's Discovery

An old scholar with spectacles perched on his nose examines your map with trembling hands.
'These markings...' he whispers, 'they point to the Library of Whispers - a place thought
to be myth, hidden beneath the rolling seas!'",
                &[
                    ("🌊 Seek the hidden library - pursue knowledge", "undersea_library"),
                    ("🏪 Ignore and explore the village - enjoy the present", "village_market"),
                ],
                "old scholar in study examining ancient map with magnifying glass",
                "discovery",
            ),
        )
        .with_node(
            "riddle_success",
            scene(
                "✅ The Stag's Blessing

'An echo!' you declare. The stag bows its magnificent head, and a shimmering ward of protection
settles around you like an invisible cloak. 'You have proven worthy,' it whispers into your mind.",
                &[
                    ("🌳 Continue deeper into the forest - embrace the journey", "forest_depths"),
                    ("🗺️ Return to the map - reconsider your options", "start"),
                ],
                "magical stag bestowing protective ward on adventurer in forest",
                "triumphant",
            ),
        )
        .with_node(
            "forest_exit",
            scene(
                "☀️ Emerging Renewed

You step back into the sunlight, carrying the forest's profound silence within you.
Sometimes wisdom lies in knowing which mysteries to leave untouched.",
                &[("Return to the crossroads", "start")],
                "person emerging from dark forest into sunlight, looking back thoughtfully",
                "peaceful",
            ),
        )
        .with_node(
            "key_taken",
            scene(
                "🧭 Ending: The Heart's Compass

Days later, you find a small chest hidden behind a waterfall. The iron key fits perfectly.
Inside, a compass glows with inner light, its needle pointing not north, but toward
where your heart truly wishes to go. Your greatest adventure is just beginning...

Achievement Unlocked: True North of the Heart 🏆",
                &[],
                "ancient compass glowing with magical light, pointing toward destiny",
                "fulfilling",
            ),
        )
        .with_node(
            "lighthouse_path",
            scene(
                "🌊 Ending: Guardian of the Storm

Following the vision, you reach the storm-lashed cliffs. The lighthouse keeper, an old woman
with sea-foam eyes, greets you. 'I've been waiting,' she says, offering you the lantern.
You become the new guardian, watching over lost souls at sea for generations to come.

Achievement Unlocked: Keeper of the Light 🏆",
                &[],
                "ancient lighthouse on stormy cliff, keeper holding lantern against the gale",
                "epic",
            ),
        )
        .with_node(
            "undersea_library",
            scene(
                "📖 Ending: Keeper of Stories

The map leads you to a hidden cove. At low tide, a crystal door appears. Inside, the Library
of Whispers stretches into infinity, each book containing stories never told. You become
its guardian, preserving tales that would otherwise be lost to time.

Achievement Unlocked: Librarian of Lost Tales 🏆",
                &[],
                "undersea crystal library with floating books and ancient knowledge",
                "wonderous",
            ),
        )
        .with_node(
            "village_market",
            scene(
                "🛍️ Ending: Simple Joys

You trade the map for rare spices and a warm meal at the village inn. As night falls,
you realize that sometimes the greatest adventures are found not in ancient magic,
but in connection, good food, and stories shared around a fire.

Achievement Unlocked: Master of the Present Moment 🏆",
                &[],
                "bustling fantasy market with spices, food, and happy villagers",
                "content",
            ),
        )
        .with_node(
            "forest_depths",
            scene(
                "🏛️ Ending: Discoverer of Ruins

Deep in the forest, you find overgrown ruins humming with ancient power. Placing the stag's
ward on a stone altar, hidden chambers unlock revealing manuscripts that rewrite history.
Your discoveries change how the world understands its own past.

Achievement Unlocked: Archaeologist of the Arcane 🏆",
                &[],
                "ancient overgrown ruins with magical artifacts and ancient manuscripts",
                "discovery",
            ),
        )
}

/// The sample story, loaded and ready to play.
pub fn sample_story() -> StoryGraph {
    StoryGraph::from_definition(sample_definition())
}
