//! Prompt templates.
//!
//! Every prompt starts with the project context so the model interprets card
//! titles in terms of the game being built. The context is a parameter; the
//! built-in [`PROJECT_CONTEXT`] is only the default.

/// Default project context: a medieval sandbox game built in Unreal Engine.
pub const PROJECT_CONTEXT: &str = "\
You are assisting with a game development project built in Unreal Engine.

🎮 Game Overview:
- A medieval sandbox game with open-world mechanics, modular systems, and third-person combat.
- Two primary modes:

1. World Map Mode:
   - Strategic layer where players travel, trade, build, and enter POIs or Dungeons.
   - Can build Houses, Crop Fields, Watch Towers, etc.

2. Settlement Mode (Combat Mode):
   - Real-time combat: Battles, Sieges, Skirmishes, and Dungeons.
   - Player commands an army, rides horses, and loots dungeons.
   - Combat systems include Followers, Formations, and Boss fights.

Assume Trello tasks may relate to AI, UI, animation, loot, multiplayer, or level design within this framework.
";

/// Prompt used by the model comparison job when none is supplied.
pub const DEFAULT_COMPARISON_PROMPT: &str = "\
[Context]
GameSystem: Settlement Mode
Mode: Dungeon
Subsystem: Loot

Task:
When the boss dies in a Dungeon, a locked chest should spawn nearby with randomized loot based on dungeon tier. The player must open it manually.

What should be implemented next?
";

/// Prompt asking the model for a `[Context]` block for a card without one.
pub fn metadata_prompt(
    project_context: &str,
    name: &str,
    description: &str,
    comment: Option<&str>,
) -> String {
    let comment_line = comment
        .filter(|c| !c.trim().is_empty())
        .map(|c| format!("Comment: {c}"))
        .unwrap_or_default();

    format!(
        "{project_context}

You're reviewing a Trello card without metadata.

Infer the following:
- GameSystem (World Map, Settlement Mode, Dungeon)
- Mode (Battle, Siege, Skirmish, Dungeon)
- Subsystem (Combat AI, UI, Animation, Loot, etc.)

Format like:
[Context]
GameSystem: ...
Mode: ...
Subsystem: ...

Card Title: {name}
Description: {description}
{comment_line}
"
    )
}

/// Prompt asking the model what the developer should do next.
pub fn advice_prompt(
    project_context: &str,
    metadata: &str,
    name: &str,
    description: &str,
    comment: Option<&str>,
) -> String {
    let comment = comment.unwrap_or_default();
    format!(
        "{project_context}

🧩 Metadata:
{metadata}

📌 Task: {name}
📝 Description: {description}
💬 Comment: {comment}

Explain what the developer should do next in the context of Unreal Engine development. Keep it helpful, technical, and relevant.
"
    )
}

/// Prompt asking for a short stand-up style summary of an in-progress card.
pub fn morning_summary_prompt(project_context: &str, name: &str, description: &str) -> String {
    format!(
        "{project_context}

The following Trello card is currently in progress.

📌 Task: {name}
📝 Description: {description}

Write a short morning stand-up summary (two or three sentences) of where this task stands and the most useful next step for today.
"
    )
}
