//! Nord palette for truecolor terminals.

use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

const POLAR_NIGHT_1: Color = Color::Rgb(0x3B, 0x42, 0x52);
const POLAR_NIGHT_2: Color = Color::Rgb(0x43, 0x4C, 0x5E);
const POLAR_NIGHT_3: Color = Color::Rgb(0x4C, 0x56, 0x6A);
const COMMENT: Color = Color::Rgb(0x61, 0x6E, 0x88);

const SNOW_STORM_0: Color = Color::Rgb(0xD8, 0xDE, 0xE9);
const SNOW_STORM_1: Color = Color::Rgb(0xE5, 0xE9, 0xF0);
const SNOW_STORM_2: Color = Color::Rgb(0xEC, 0xEF, 0xF4);

const FROST: Color = Color::Rgb(0x88, 0xC0, 0xD0);

const AURORA_RED: Color = Color::Rgb(0xBF, 0x61, 0x6A);
const AURORA_ORANGE: Color = Color::Rgb(0xD0, 0x87, 0x70);
const AURORA_GREEN: Color = Color::Rgb(0xA3, 0xBE, 0x8C);

/// Default truecolor theme.
#[derive(Debug, Clone)]
pub struct NordTheme {
    roles: ThemeRoles,
}

impl NordTheme {
    pub fn new() -> Self {
        Self {
            roles: ThemeRoles {
                surface: POLAR_NIGHT_1,
                surface_muted: POLAR_NIGHT_2,
                border: POLAR_NIGHT_1,
                focus: FROST,

                text: SNOW_STORM_0,
                text_secondary: SNOW_STORM_1,
                text_muted: COMMENT,
                accent: FROST,

                success: AURORA_GREEN,
                warning: AURORA_ORANGE,
                error: AURORA_RED,

                selection_bg: POLAR_NIGHT_3,
                selection_fg: SNOW_STORM_2,
                row_even: shade(POLAR_NIGHT_1, 0.6),
                row_odd: shade(POLAR_NIGHT_2, 0.6),
            },
        }
    }
}

impl Default for NordTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for NordTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}

/// Scale each RGB channel by `factor` (clamped to `0.0..=1.0`); indexed colors pass through.
fn shade(color: Color, factor: f32) -> Color {
    let factor = factor.clamp(0.0, 1.0);
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(
            (r as f32 * factor) as u8,
            (g as f32 * factor) as u8,
            (b as f32 * factor) as u8,
        ),
        other => other,
    }
}
