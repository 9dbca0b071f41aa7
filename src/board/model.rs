use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
    /// Label the server sent that is not one of the four known ranks.
    Other(String),
}

impl Priority {
    pub fn parse(value: &str) -> Self {
        match value {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "critical" => Self::Critical,
            "" => Self::Medium,
            other => Self::Other(other.to_string()),
        }
    }

    /// Raw label, used for exact-match filtering.
    pub fn label(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
            Self::Other(label) => label.as_str(),
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium | Self::Other(_) => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }

    /// Known level used for display; unknown labels show as medium.
    pub fn level(&self) -> Priority {
        match self {
            Self::Other(_) => Self::Medium,
            known => known.clone(),
        }
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Priority> for String {
    fn from(value: Priority) -> Self {
        value.label().to_string()
    }
}

impl Serialize for Priority {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Active,
    Completed,
    Other(String),
}

impl Status {
    pub fn parse(value: &str) -> Self {
        match value {
            "active" => Self::Active,
            "completed" => Self::Completed,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Other(label) => label.as_str(),
        }
    }
}

impl Serialize for Status {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReactionCounts {
    #[serde(rename = "fragged_count")]
    pub fragged: u32,
    #[serde(rename = "killed_count")]
    pub killed: u32,
    #[serde(rename = "exploded_count")]
    pub exploded: u32,
    #[serde(rename = "slayed_count")]
    pub slayed: u32,
}

impl ReactionCounts {
    pub fn any(&self) -> bool {
        self.fragged > 0 || self.killed > 0 || self.exploded > 0 || self.slayed > 0
    }
}

/// A reported player as served by `/api/targets`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "TargetWire")]
pub struct Target {
    pub id: u64,
    pub nickname: String,
    pub server: String,
    pub gamemode: String,
    pub reason: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub status: Status,
    pub added_by: Option<String>,
    pub date_added: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
    pub date_completed: Option<DateTime<Utc>>,
    pub total_reactions: u32,
    #[serde(flatten)]
    pub reactions: ReactionCounts,
    pub has_bleeding_effect: bool,
    pub likes: u32,
    pub dislikes: u32,
}

impl Target {
    pub fn is_bloodied(&self) -> bool {
        self.total_reactions >= 10 || self.has_bleeding_effect
    }
}

#[derive(Deserialize)]
struct TargetWire {
    id: u64,
    #[serde(default, deserialize_with = "nullable")]
    nickname: String,
    #[serde(default, deserialize_with = "nullable")]
    server: String,
    #[serde(default, deserialize_with = "nullable")]
    gamemode: String,
    #[serde(default, deserialize_with = "nullable")]
    reason: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    priority: String,
    #[serde(default, deserialize_with = "nullable")]
    tags: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    status: String,
    #[serde(default)]
    added_by: Option<String>,
    #[serde(default, deserialize_with = "timestamp")]
    date_added: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    last_updated: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    date_completed: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "counter")]
    total_reactions: u32,
    #[serde(default, deserialize_with = "optional_counter")]
    fragged_count: Option<u32>,
    #[serde(default, deserialize_with = "optional_counter")]
    killed_count: Option<u32>,
    #[serde(default, deserialize_with = "optional_counter")]
    exploded_count: Option<u32>,
    #[serde(default, deserialize_with = "optional_counter")]
    slayed_count: Option<u32>,
    #[serde(default, deserialize_with = "counter_map")]
    reactions: HashMap<String, u32>,
    #[serde(default, deserialize_with = "nullable")]
    has_bleeding_effect: bool,
    #[serde(default, deserialize_with = "counter")]
    likes: u32,
    #[serde(default, deserialize_with = "counter")]
    dislikes: u32,
}

impl From<TargetWire> for Target {
    fn from(wire: TargetWire) -> Self {
        // Flat `<kind>_count` fields win over the nested `reactions` object.
        let count = |flat: Option<u32>, kind: &str| {
            flat.or_else(|| wire.reactions.get(kind).copied())
                .unwrap_or(0)
        };
        let reactions = ReactionCounts {
            fragged: count(wire.fragged_count, "fragged"),
            killed: count(wire.killed_count, "killed"),
            exploded: count(wire.exploded_count, "exploded"),
            slayed: count(wire.slayed_count, "slayed"),
        };
        Target {
            id: wire.id,
            nickname: wire.nickname,
            server: wire.server,
            gamemode: wire.gamemode,
            reason: wire.reason,
            description: wire.description.filter(|d| !d.is_empty()),
            priority: Priority::parse(&wire.priority),
            tags: wire.tags,
            status: Status::parse(&wire.status),
            added_by: wire.added_by.filter(|a| !a.is_empty()),
            date_added: wire.date_added,
            last_updated: wire.last_updated,
            date_completed: wire.date_completed,
            total_reactions: wire.total_reactions,
            reactions,
            has_bleeding_effect: wire.has_bleeding_effect,
            likes: wire.likes,
            dislikes: wire.dislikes,
        }
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Display counters are clamped into `u32`; a bad value never fails the record.
fn clamp_counter(raw: f64) -> u32 {
    if raw.is_nan() || raw <= 0.0 {
        0
    } else if raw >= u32::MAX as f64 {
        u32::MAX
    } else {
        raw as u32
    }
}

fn counter<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_counter(deserializer)?.unwrap_or(0))
}

fn optional_counter<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.map(clamp_counter))
}

fn counter_map<'de, D>(deserializer: D) -> Result<HashMap<String, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<HashMap<String, Option<f64>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(kind, n)| (kind, n.map(clamp_counter).unwrap_or(0)))
        .collect())
}

fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// Parses RFC 3339 timestamps and the server's naive ISO-8601 form.
///
/// Naive values are UTC: the server stamps rows with `utcnow()`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}
