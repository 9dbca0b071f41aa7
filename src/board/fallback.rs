use chrono::{DateTime, Duration, Utc};

use super::model::{Priority, ReactionCounts, Status, Target};

pub const SAMPLE_SIZE: usize = 3;

/// Built-in demo records shown when the live list cannot be loaded.
///
/// Dates are relative to `now`: today, one day ago and two days ago.
pub fn sample_targets(now: DateTime<Utc>) -> Vec<Target> {
    vec![
        sample(
            1,
            "TestPlayer1",
            "hypixel.net",
            "bedwars",
            "Using cheats in game. Suspicious movement and reactions.",
            Priority::High,
            &["cheat", "suspicious"],
            "Admin",
            now,
            "Seen using aimbot and wallhack",
            (15, ReactionCounts { fragged: 3, killed: 5, exploded: 2, slayed: 0 }),
            (8, 1),
            true,
        ),
        sample(
            2,
            "ToxicPlayer99",
            "minemen.club",
            "kitpvp",
            "Toxic behaviour in chat, insulting other players",
            Priority::Medium,
            &["toxic", "chat"],
            "Moderator",
            now - Duration::days(1),
            "Repeated complaints about behaviour",
            (7, ReactionCounts { fragged: 1, killed: 2, exploded: 1, slayed: 0 }),
            (5, 2),
            false,
        ),
        sample(
            3,
            "SpeedHacker",
            "cubecraft.net",
            "skywars",
            "Speed hacks, teleportation",
            Priority::Critical,
            &["cheat", "speed", "teleport"],
            "Admin",
            now - Duration::days(2),
            "Critical violations of server rules",
            (25, ReactionCounts { fragged: 8, killed: 7, exploded: 4, slayed: 0 }),
            (15, 0),
            true,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: u64,
    nickname: &str,
    server: &str,
    gamemode: &str,
    reason: &str,
    priority: Priority,
    tags: &[&str],
    added_by: &str,
    date_added: DateTime<Utc>,
    description: &str,
    (total_reactions, reactions): (u32, ReactionCounts),
    (likes, dislikes): (u32, u32),
    has_bleeding_effect: bool,
) -> Target {
    Target {
        id,
        nickname: nickname.to_string(),
        server: server.to_string(),
        gamemode: gamemode.to_string(),
        reason: reason.to_string(),
        description: Some(description.to_string()),
        priority,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        status: Status::Active,
        added_by: Some(added_by.to_string()),
        date_added: Some(date_added),
        last_updated: None,
        date_completed: None,
        total_reactions,
        reactions,
        has_bleeding_effect,
        likes,
        dislikes,
    }
}
