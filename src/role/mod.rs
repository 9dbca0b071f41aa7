//! Preview of a custom profile role: the inline CSS and classes a role label
//! would be rendered with.

use crate::output::report::escape_html;

pub const DEFAULT_ROLE_TEXT: &str = "My role";
pub const DEFAULT_ROLE_EMOJI: &str = "🌟";

const DEFAULT_COLOR: &str = "#ffd700";
const DEFAULT_GRADIENT_START: &str = "#ff6b35";
const DEFAULT_GRADIENT_END: &str = "#f7931e";
const NO_BACKGROUND: &str = "#000000";
const DEFAULT_GLOW: &str = "#ffd700";
const DEFAULT_SHADOW: &str = "#000000";
const DEFAULT_BORDER: &str = "#ffd700";
const DEFAULT_ANIMATION_SPEED: &str = "3s";

/// Role styling options. `None` or blank values fall back to the defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleStyle {
    pub color: Option<String>,
    pub gradient: bool,
    pub gradient_start: Option<String>,
    pub gradient_end: Option<String>,
    pub background: Option<String>,
    pub glow: bool,
    pub glow_color: Option<String>,
    pub shadow: bool,
    pub shadow_color: Option<String>,
    pub border: bool,
    pub border_color: Option<String>,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
    pub text_transform: Option<String>,
    pub animated: bool,
    pub animation_speed: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RolePreview {
    pub styles: Vec<String>,
    pub classes: Vec<&'static str>,
}

impl RolePreview {
    pub fn css(&self) -> String {
        self.styles.join("; ")
    }

    pub fn class_attr(&self) -> String {
        self.classes.join(" ")
    }
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

impl RoleStyle {
    pub fn preview(&self) -> RolePreview {
        let mut styles: Vec<String> = Vec::new();
        let mut classes = vec!["preview-role-text"];

        if self.gradient {
            let start = or_default(&self.gradient_start, DEFAULT_GRADIENT_START);
            let end = or_default(&self.gradient_end, DEFAULT_GRADIENT_END);
            styles.push(format!("background: linear-gradient(45deg, {start}, {end})"));
            styles.push("background-size: 200% 200%".to_string());
            styles.push("-webkit-background-clip: text".to_string());
            styles.push("-webkit-text-fill-color: transparent".to_string());
            styles.push("background-clip: text".to_string());
            classes.push("gradient-text");
        } else {
            styles.push(format!("color: {}", or_default(&self.color, DEFAULT_COLOR)));
        }

        let background = or_default(&self.background, NO_BACKGROUND);
        if !background.eq_ignore_ascii_case(NO_BACKGROUND) {
            styles.push(format!("background-color: {background}"));
            styles.push("padding: 4px 8px".to_string());
            styles.push("border-radius: 4px".to_string());
            styles.push("display: inline-block".to_string());
        }

        if self.glow {
            let glow = or_default(&self.glow_color, DEFAULT_GLOW);
            styles.push(format!(
                "text-shadow: 0 0 10px {glow}, 0 0 20px {glow}, 0 0 30px {glow}"
            ));
            classes.push("glow-effect");
        }

        if self.shadow {
            let shadow = or_default(&self.shadow_color, DEFAULT_SHADOW);
            // A glow already owns the text-shadow declaration; append to it.
            match styles.iter_mut().find(|s| s.starts_with("text-shadow")) {
                Some(existing) => existing.push_str(&format!(", 2px 2px 4px {shadow}")),
                None => styles.push(format!("text-shadow: 2px 2px 4px {shadow}")),
            }
        }

        if self.border {
            let border = or_default(&self.border_color, DEFAULT_BORDER);
            styles.push(format!("border: 1px solid {border}"));
            styles.push("padding: 2px 6px".to_string());
            styles.push("border-radius: 4px".to_string());
            styles.push("display: inline-block".to_string());
        }

        styles.push(format!("font-weight: {}", or_default(&self.font_weight, "bold")));
        styles.push(format!("font-style: {}", or_default(&self.font_style, "normal")));
        styles.push(format!(
            "text-transform: {}",
            or_default(&self.text_transform, "none")
        ));

        if self.animated {
            let speed = or_default(&self.animation_speed, DEFAULT_ANIMATION_SPEED);
            styles.push(format!("animation: gradientShift {speed} ease-in-out infinite"));
            classes.push("animated-role");
        }

        RolePreview { styles, classes }
    }

    /// Emoji plus styled role text as an HTML fragment.
    pub fn render_preview(&self, text: &str, emoji: &str) -> String {
        let text = if text.trim().is_empty() {
            DEFAULT_ROLE_TEXT
        } else {
            text
        };
        let emoji = if emoji.trim().is_empty() {
            DEFAULT_ROLE_EMOJI
        } else {
            emoji
        };
        let preview = self.preview();
        format!(
            "<span id=\"preview-emoji\">{}</span> <span id=\"preview-text\" class=\"{}\" style=\"{}\">{}</span>",
            escape_html(emoji),
            preview.class_attr(),
            escape_html(&preview.css()),
            escape_html(text)
        )
    }
}
