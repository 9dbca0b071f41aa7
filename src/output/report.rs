use std::collections::BTreeSet;

use chrono::{DateTime, Local, Utc};

use crate::board::model::{Priority, Target};
use crate::board::stats::Statistics;
use crate::effects::Particle;

pub const EMPTY_STATE_MARKER: &str = r#"id="emptyState""#;
pub const CARD_CLASS: &str = "enhanced-target-card";
pub const REMOVING_CLASS: &str = "target-removing";

#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    /// Show the complete/delete actions.
    pub is_admin: bool,
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn priority_icon(priority: &Priority) -> &'static str {
    match priority.level() {
        Priority::Low => r#"<i class="fas fa-info-circle me-1"></i>"#,
        Priority::High => r#"<i class="fas fa-exclamation-triangle me-1"></i>"#,
        Priority::Critical => r#"<i class="fas fa-skull me-1"></i>"#,
        _ => r#"<i class="fas fa-exclamation-circle me-1"></i>"#,
    }
}

pub fn priority_text(priority: &Priority) -> &'static str {
    match priority.level() {
        Priority::Low => "LOW",
        Priority::High => "HIGH",
        Priority::Critical => "CRITICAL",
        _ => "MEDIUM",
    }
}

pub fn format_date(value: Option<DateTime<Utc>>) -> String {
    match value {
        Some(d) => d.with_timezone(&Local).format("%d.%m.%Y %H:%M").to_string(),
        None => "Unknown".to_string(),
    }
}

/// Card list for the current view, or the empty state when there is nothing to show.
pub fn render_board(view: &[Target], pending: &BTreeSet<u64>, options: &RenderOptions) -> String {
    if view.is_empty() {
        return render_empty_state();
    }
    let mut out = String::from("<div id=\"targetItems\">\n");
    for (index, target) in view.iter().enumerate() {
        out.push_str(&render_card(
            target,
            index,
            pending.contains(&target.id),
            options,
        ));
    }
    out.push_str("</div>\n");
    out
}

fn render_empty_state() -> String {
    format!(
        r#"<div class="empty-state" {EMPTY_STATE_MARKER}>
  <i class="fas fa-crosshairs"></i>
  <h4>No targets found</h4>
  <p>Try changing the filters.</p>
</div>
"#
    )
}

pub fn render_card(target: &Target, index: usize, removing: bool, options: &RenderOptions) -> String {
    let mut classes = vec![CARD_CLASS];
    if target.is_bloodied() {
        classes.push("bloodied");
    }
    if removing {
        classes.push(REMOVING_CLASS);
    }
    let priority_label = escape_html(target.priority.label());
    let gamemode = escape_html(&target.gamemode);

    let mut out = String::new();
    out.push_str(&format!(
        "<div class=\"{}\" data-priority=\"{}\" data-target-id=\"{}\" style=\"animation-delay: {:.1}s\">\n",
        classes.join(" "),
        priority_label,
        target.id,
        index as f32 * 0.1
    ));
    out.push_str("  <div class=\"target-item-header\">\n");
    out.push_str(&format!(
        "    <span class=\"target-nickname\">{}</span>\n",
        escape_html(&target.nickname)
    ));
    out.push_str(&format!(
        "    <span class=\"gamemode-badge {gamemode}\">{}</span>\n",
        escape_html(&target.gamemode.to_uppercase())
    ));
    out.push_str(&format!(
        "    <span class=\"priority-badge priority-{priority_label}\">{} {}</span>\n",
        priority_icon(&target.priority),
        priority_text(&target.priority)
    ));
    if target.total_reactions > 0 {
        out.push_str(&format!(
            "    <span class=\"badge reactions-total\">{} reactions</span>\n",
            target.total_reactions
        ));
    }
    if !target.tags.is_empty() {
        out.push_str("    <div class=\"target-tags\">");
        for tag in target.tags.iter() {
            out.push_str(&format!(
                "<span class=\"badge bg-danger\">{}</span>",
                escape_html(tag)
            ));
        }
        out.push_str("</div>\n");
    }
    out.push_str("  </div>\n");

    out.push_str(&format!(
        "  <div class=\"server-info-card\"><span class=\"server-label\">Server:</span> <span class=\"server-name\">{}</span></div>\n",
        escape_html(&target.server)
    ));
    out.push_str(&format!(
        "  <div class=\"target-reason\">{}</div>\n",
        escape_html(&target.reason)
    ));
    if let Some(description) = target.description.as_deref() {
        out.push_str(&format!(
            "  <div class=\"target-description\">{}</div>\n",
            escape_html(description)
        ));
    }

    if target.reactions.any() {
        let r = &target.reactions;
        out.push_str("  <div class=\"target-reactions\">");
        for (kind, count) in [
            ("fragged", r.fragged),
            ("killed", r.killed),
            ("exploded", r.exploded),
            ("slayed", r.slayed),
        ] {
            if count > 0 {
                out.push_str(&format!(
                    "<span class=\"reaction reaction-{kind}\">{count}</span>"
                ));
            }
        }
        out.push_str(&format!(
            "<span class=\"likes\">{}</span><span class=\"dislikes\">{}</span></div>\n",
            target.likes, target.dislikes
        ));
    }

    if options.is_admin {
        out.push_str(&format!(
            "  <div class=\"target-actions\"><button class=\"btn-action btn-complete\" data-action=\"complete\" data-target-id=\"{id}\">Completed</button><button class=\"btn-action btn-delete\" data-action=\"delete\" data-target-id=\"{id}\">Delete</button></div>\n",
            id = target.id
        ));
    }

    let mut footer = format!(
        "Added: {} | Author: {}",
        format_date(target.date_added),
        escape_html(target.added_by.as_deref().unwrap_or("Unknown"))
    );
    if target.last_updated.is_some() && target.last_updated != target.date_added {
        footer.push_str(&format!(" | Updated: {}", format_date(target.last_updated)));
    }
    out.push_str(&format!("  <div class=\"target-footer\">{footer}</div>\n"));
    out.push_str("</div>\n");
    out
}

pub fn render_particles(particles: &[Particle]) -> String {
    particles
        .iter()
        .map(|p| format!("<div class=\"explosion-particle\" style=\"{}\"></div>", p.style()))
        .collect::<Vec<_>>()
        .join("")
}

/// Standalone page: statistics header, board and the last success burst.
pub fn render_page(board: &str, stats: &Statistics, particles: &[Particle]) -> String {
    format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Target List</title>
  <style>
    body {{ background: #111; color: #eee; font-family: 'Inter', sans-serif; }}
    .stats {{ display: flex; gap: 1.5rem; margin: 1rem 0; }}
    .{CARD_CLASS} {{ border: 1px solid #333; border-radius: 12px; padding: 1rem; margin-bottom: 1rem; }}
    .{CARD_CLASS}.bloodied {{ border-color: #dc3545; box-shadow: 0 0 12px rgba(220,53,69,0.4); }}
    .{REMOVING_CLASS} {{ opacity: 0.4; transform: scale(0.98); }}
    .priority-critical {{ color: #ff1744; }}
    .priority-high {{ color: #ff9800; }}
    .priority-medium {{ color: #ffc107; }}
    .priority-low {{ color: #17a2b8; }}
    #particleSystem {{ position: fixed; inset: 0; pointer-events: none; }}
  </style>
</head>
<body>
  <div id="particleSystem">{particles}</div>
  <div class="stats">
    <div>Total: <span id="totalTargets">{total}</span></div>
    <div>Active: <span id="activeTargets">{active}</span></div>
    <div>Completed: <span id="completedTargets">{completed}</span></div>
    <div>Today: <span id="todayTargets">{today}</span></div>
  </div>
  {board}
</body>
</html>
"####,
        particles = render_particles(particles),
        total = stats.total,
        active = stats.active,
        completed = stats.completed,
        today = stats.today,
    )
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::board::fallback::sample_targets;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_view_renders_only_the_empty_state() {
        let html = render_board(&[], &BTreeSet::new(), &RenderOptions::default());
        assert!(html.contains(EMPTY_STATE_MARKER));
        assert!(!html.contains(CARD_CLASS));
    }

    #[test]
    fn user_text_is_escaped() {
        let mut targets = sample_targets(now());
        targets[0].nickname = "<script>x</script>".to_string();
        targets[0].tags = vec!["\"><img src=x onerror=alert(1)>".to_string()];
        targets[0].gamemode = "bed\"wars".to_string();
        let html = render_board(&targets[..1], &BTreeSet::new(), &RenderOptions::default());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<img"));
        assert!(!html.contains("bed\"wars"));
    }

    #[test]
    fn unknown_priority_displays_as_medium() {
        let mut targets = sample_targets(now());
        targets[0].priority = Priority::Other("urgent".to_string());
        let html = render_card(&targets[0], 0, false, &RenderOptions::default());
        assert!(html.contains("MEDIUM"));
        assert!(html.contains("data-priority=\"urgent\""));
    }

    #[test]
    fn pending_removal_and_admin_actions() {
        let targets = sample_targets(now());
        let pending: BTreeSet<u64> = [2].into_iter().collect();
        let html = render_board(&targets, &pending, &RenderOptions { is_admin: true });
        assert_eq!(html.matches(REMOVING_CLASS).count(), 1);
        assert_eq!(html.matches("data-action=\"delete\"").count(), 3);

        let viewer = render_board(&targets, &pending, &RenderOptions::default());
        assert!(!viewer.contains("data-action"));
    }

    #[test]
    fn reaction_block_and_bloodied_marker() {
        let mut targets = sample_targets(now());
        let t = &mut targets[1];
        let html = render_card(t, 0, false, &RenderOptions::default());
        assert!(html.contains("target-reactions"));
        assert!(!html.contains("bloodied"));

        t.reactions = Default::default();
        t.total_reactions = 12;
        let html = render_card(t, 0, false, &RenderOptions::default());
        assert!(!html.contains("target-reactions"));
        assert!(html.contains("bloodied"));
    }

    #[test]
    fn footer_shows_update_only_when_different() {
        let mut targets = sample_targets(now());
        let t = &mut targets[0];
        t.added_by = None;
        t.last_updated = t.date_added;
        let html = render_card(t, 0, false, &RenderOptions::default());
        assert!(html.contains("Author: Unknown"));
        assert!(!html.contains("Updated:"));

        t.last_updated = Some(now() + chrono::Duration::hours(2));
        let html = render_card(t, 0, false, &RenderOptions::default());
        assert!(html.contains("Updated:"));
        assert_eq!(format_date(None), "Unknown");
    }

    #[test]
    fn page_embeds_stats_and_board() {
        let stats = Statistics {
            total: 3,
            active: 2,
            completed: 1,
            today: 0,
        };
        let page = render_page("<div id=\"targetItems\"></div>", &stats, &[]);
        assert!(page.contains("<span id=\"totalTargets\">3</span>"));
        assert!(page.contains("<span id=\"completedTargets\">1</span>"));
        assert!(page.contains("targetItems"));
    }
}
