//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;
use serde::{Deserialize, Serialize};

use crate::scoring::Verdict;

/// Theme selection as written in the config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Auto,
    Dark,
    Light,
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Score-based colors (traffic light pattern, higher is better)
    pub score_high: Color,
    pub score_mid: Color,
    pub score_low: Color,
    pub bar_empty: Color,

    // Table colors
    pub row_alt_bg: Color,
    pub index_color: Color,
    pub header_style: Style,
    pub row_selected: Style,

    // Form colors
    pub label_color: Color,
    pub focus_style: Style,
    pub cursor_color: Color,

    // General colors
    pub muted: Color,
    pub title_color: Color,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_warning: Color,
    pub flash_error: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            score_high: Color::Green,
            score_mid: Color::Yellow,
            score_low: Color::Red,
            bar_empty: Color::DarkGray,
            row_alt_bg: Color::Indexed(235),
            index_color: Color::DarkGray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            label_color: Color::Gray,
            focus_style: Style::new().fg(Color::Cyan).bold(),
            cursor_color: Color::Cyan,
            muted: Color::Gray,
            title_color: Color::Cyan,
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_warning: Color::Yellow,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
        }
    }

    pub fn light() -> Self {
        Self {
            score_high: Color::Green,
            score_mid: Color::Rgb(180, 120, 0),
            score_low: Color::Red,
            bar_empty: Color::Indexed(250),
            row_alt_bg: Color::Indexed(254),
            index_color: Color::Indexed(244),
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            label_color: Color::Indexed(238),
            focus_style: Style::new().fg(Color::Blue).bold(),
            cursor_color: Color::Blue,
            muted: Color::Indexed(242),
            title_color: Color::Blue,
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Blue,
            flash_success: Color::Green,
            flash_warning: Color::Rgb(180, 120, 0),
            flash_error: Color::Red,
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
        }
    }

    /// Color for a 1-5 score (slider value or final score)
    pub fn score_color(&self, score: f64) -> Color {
        if score >= 4.0 {
            self.score_high
        } else if score >= 3.0 {
            self.score_mid
        } else {
            self.score_low
        }
    }

    pub fn verdict_color(&self, verdict: Verdict) -> Color {
        match verdict {
            Verdict::StrongGem => self.score_high,
            Verdict::Monitor => self.score_mid,
            Verdict::Skip => self.score_low,
        }
    }
}

/// Pick the palette for a theme, probing the terminal background for `Auto`
pub fn resolve_theme(theme: Theme) -> ThemeColors {
    match theme {
        Theme::Dark => ThemeColors::dark(),
        Theme::Light => ThemeColors::light(),
        Theme::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => ThemeColors::light(),
            Ok(_) => ThemeColors::dark(),
            Err(e) => {
                log::debug!("Could not detect terminal background ({}), using dark theme", e);
                ThemeColors::dark()
            }
        },
    }
}
