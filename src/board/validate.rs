use serde::Serialize;

use super::model::Priority;
use crate::error::ValidationError;

pub const MAX_NICKNAME_CHARS: usize = 20;
pub const MAX_REASON_CHARS: usize = 320;
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Raw "add target" form input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetForm {
    pub nickname: String,
    pub gamemode: String,
    pub server: String,
    pub priority: String,
    /// Comma-separated.
    pub tags: String,
    pub reason: String,
    pub description: String,
}

/// JSON body for `POST /api/targets`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewTargetRequest {
    pub nickname: String,
    pub gamemode: String,
    pub server: String,
    pub priority: String,
    pub priority_rank: u8,
    pub tags: Vec<String>,
    pub reason: String,
    pub description: String,
}

impl TargetForm {
    pub fn validate(&self) -> Result<NewTargetRequest, ValidationError> {
        let nickname = required("nickname", &self.nickname)?;
        let gamemode = required("gamemode", &self.gamemode)?;
        let server = required("server", &self.server)?;
        let reason = required("reason", &self.reason)?;

        max_chars("nickname", nickname, MAX_NICKNAME_CHARS)?;
        max_chars("reason", reason, MAX_REASON_CHARS)?;

        let priority = Priority::parse(self.priority.trim());
        let tags = self
            .tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        let description: String = self
            .description
            .trim()
            .chars()
            .take(MAX_DESCRIPTION_CHARS)
            .collect();

        Ok(NewTargetRequest {
            nickname: nickname.to_string(),
            gamemode: gamemode.to_string(),
            server: server.to_string(),
            priority: priority.label().to_string(),
            priority_rank: priority.rank(),
            tags,
            reason: reason.to_string(),
            description,
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Missing { field });
    }
    Ok(value)
}

fn max_chars(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterLevel {
    Normal,
    Warning,
    Danger,
}

/// Colour band of the reason character counter.
pub fn reason_counter_level(reason: &str) -> CounterLevel {
    match reason.chars().count() {
        n if n > 300 => CounterLevel::Danger,
        n if n > 250 => CounterLevel::Warning,
        _ => CounterLevel::Normal,
    }
}
