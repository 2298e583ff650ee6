//! Terminal rendering helpers

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
}

/// Wrap `text` in `color` when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Level as filled and empty pips, e.g. `●●●○○○`
pub fn level_pips(level: u8, max: u8) -> String {
    let filled = level.min(max) as usize;
    format!("{}{}", "●".repeat(filled), "○".repeat(max as usize - filled))
}

/// Score in [0, 1] as a fixed-width bar
pub fn score_bar(score: f64, width: usize) -> String {
    let filled = ((score.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Truncate to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

pub fn correctness(correct: bool, use_color: bool) -> String {
    if correct {
        paint("✓ correct", Color::GREEN, use_color)
    } else {
        paint("✗ wrong", Color::RED, use_color)
    }
}
