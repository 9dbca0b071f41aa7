pub mod report;

use serde::Serialize;

use crate::board::model::Target;
use crate::board::stats::Statistics;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

/// One line per target: `#id [PRIORITY] nickname @ server (gamemode) - reason`.
pub fn render_text(view: &[Target]) -> Vec<u8> {
    let mut out = String::new();
    for t in view {
        out.push_str(&format!(
            "#{} [{}] {} @ {} ({}) - {}",
            t.id,
            report::priority_text(&t.priority),
            t.nickname,
            t.server,
            t.gamemode,
            t.reason
        ));
        if !t.tags.is_empty() {
            out.push_str(&format!(" [{}]", t.tags.join(", ")));
        }
        out.push('\n');
    }
    out.into_bytes()
}

#[derive(Serialize)]
struct JsonReport<'a> {
    statistics: &'a Statistics,
    targets: &'a [Target],
}

pub fn render_json(view: &[Target], stats: &Statistics) -> Vec<u8> {
    let report = JsonReport {
        statistics: stats,
        targets: view,
    };
    serde_json::to_vec_pretty(&report).unwrap_or_else(|_| b"{}\n".to_vec())
}

pub fn render_stats_text(stats: &Statistics) -> String {
    format!(
        "Total: {}\nActive: {}\nCompleted: {}\nToday: {}\n",
        stats.total, stats.active, stats.completed, stats.today
    )
}
