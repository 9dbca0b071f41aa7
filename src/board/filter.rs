use serde::{Deserialize, Serialize};

use super::model::Target;

/// Filter inputs as typed by the user. Empty strings impose no constraint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub gamemode: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
    pub tags: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        TargetFilter::from_criteria(self).is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetFilter {
    gamemode: Option<String>,
    priority: Option<String>,
    search: Option<String>,
    tags: Vec<String>,
}

impl TargetFilter {
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        let exact = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);
        Self {
            gamemode: exact(&criteria.gamemode),
            priority: exact(&criteria.priority),
            search: criteria
                .search
                .as_deref()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
            tags: criteria
                .tags
                .as_deref()
                .map(parse_tag_filter)
                .unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.gamemode.is_none()
            && self.priority.is_none()
            && self.search.is_none()
            && self.tags.is_empty()
    }

    pub fn matches(&self, target: &Target) -> bool {
        if let Some(gamemode) = self.gamemode.as_deref() {
            if target.gamemode != gamemode {
                return false;
            }
        }
        if let Some(priority) = self.priority.as_deref() {
            if target.priority.label() != priority {
                return false;
            }
        }
        if let Some(needle) = self.search.as_deref() {
            let haystack =
                format!("{} {} {}", target.nickname, target.server, target.reason).to_lowercase();
            if !haystack.contains(needle) {
                return false;
            }
        }
        if !self.tags.is_empty() {
            let has_tag = target.tags.iter().any(|tag| {
                let tag = tag.to_lowercase();
                self.tags.iter().any(|wanted| tag.contains(wanted.as_str()))
            });
            if !has_tag {
                return false;
            }
        }
        true
    }
}

/// Splits a comma-separated tag filter into lowercase, trimmed, non-empty tokens.
pub fn parse_tag_filter(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Returns the targets matching every supplied criterion, in source order.
pub fn apply_filters(targets: &[Target], criteria: &FilterCriteria) -> Vec<Target> {
    let filter = TargetFilter::from_criteria(criteria);
    targets
        .iter()
        .filter(|t| filter.matches(t))
        .cloned()
        .collect()
}
