use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::{ThemeMode, UiConfig};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub mode: ThemeMode,
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub green: Color,
    pub selection_bg: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
    /// Per-category label colors
    pub category_colors: HashMap<String, Color>,
}

fn default_category_colors() -> HashMap<String, Color> {
    let mut colors = HashMap::new();
    colors.insert("work".into(), Color::Rgb(0x44, 0x88, 0xFF));
    colors.insert("personal".into(), Color::Rgb(0x44, 0xDD, 0x88));
    colors.insert("study".into(), Color::Rgb(0xCC, 0x66, 0xFF));
    colors
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            mode: ThemeMode::Dark,
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            search_match_bg: Color::Rgb(0x40, 0xE0, 0xD0),
            search_match_fg: Color::Rgb(0x0C, 0x00, 0x1B),
            category_colors: default_category_colors(),
        }
    }

    pub fn light() -> Self {
        Theme {
            mode: ThemeMode::Light,
            background: Color::Rgb(0xFA, 0xFA, 0xF7),
            text: Color::Rgb(0x2A, 0x25, 0x40),
            text_bright: Color::Rgb(0x00, 0x00, 0x00),
            highlight: Color::Rgb(0xC2, 0x18, 0x5B),
            dim: Color::Rgb(0x8A, 0x86, 0x9E),
            red: Color::Rgb(0xC6, 0x28, 0x28),
            green: Color::Rgb(0x2E, 0x7D, 0x32),
            selection_bg: Color::Rgb(0xE8, 0xE2, 0xF4),
            search_match_bg: Color::Rgb(0xFF, 0xE0, 0x82),
            search_match_fg: Color::Rgb(0x00, 0x00, 0x00),
            category_colors: default_category_colors(),
        }
    }

    /// Build the theme for `mode`, applying `[ui.dark_colors]` or
    /// `[ui.light_colors]` and `[ui.category_colors]` from config
    pub fn for_mode(mode: ThemeMode, ui: &UiConfig) -> Self {
        let (mut theme, overrides) = match mode {
            ThemeMode::Dark => (Theme::dark(), &ui.dark_colors),
            ThemeMode::Light => (Theme::light(), &ui.light_colors),
        };

        for (key, value) in overrides {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key, value, "ignoring invalid color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "green" => theme.green = color,
                "selection_bg" => theme.selection_bg = color,
                "search_match_bg" => theme.search_match_bg = color,
                "search_match_fg" => theme.search_match_fg = color,
                _ => {}
            }
        }

        for (category, value) in &ui.category_colors {
            if let Some(color) = parse_hex_color(value) {
                theme.category_colors.insert(category.clone(), color);
            }
        }

        theme
    }

    /// Color for a category label, falling back to the dim color
    pub fn category_color(&self, category: &str) -> Color {
        self.category_colors.get(category).copied().unwrap_or(self.dim)
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
