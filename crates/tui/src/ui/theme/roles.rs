use std::fmt::Debug;

use ratatui::style::{Color, Modifier, Style};

/// Colors a theme assigns to each part of the console.
#[derive(Debug, Clone)]
pub struct ThemeRoles {
    /// Panel background.
    pub surface: Color,
    /// Table headers and gauge troughs.
    pub surface_muted: Color,
    pub border: Color,
    pub focus: Color,

    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub accent: Color,

    /// Healthy gauges and running servers.
    pub success: Color,
    /// Gauges over their threshold and stopped servers.
    pub warning: Color,
    pub error: Color,

    pub selection_bg: Color,
    pub selection_fg: Color,
    pub row_even: Color,
    pub row_odd: Color,
}

fn fg(color: Color) -> Style {
    Style::default().fg(color)
}

/// A palette plus the styles every component draws with.
pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    fn text_primary_style(&self) -> Style {
        fg(self.roles().text)
    }

    fn text_secondary_style(&self) -> Style {
        fg(self.roles().text_secondary)
    }

    fn text_muted_style(&self) -> Style {
        fg(self.roles().text_muted)
    }

    fn border_style(&self, focused: bool) -> Style {
        let roles = self.roles();
        fg(if focused { roles.focus } else { roles.border })
    }

    fn selection_style(&self) -> Style {
        fg(self.roles().selection_fg).bg(self.roles().selection_bg)
    }

    fn success_style(&self) -> Style {
        fg(self.roles().success)
    }

    fn warning_style(&self) -> Style {
        fg(self.roles().warning)
    }

    fn error_style(&self) -> Style {
        fg(self.roles().error)
    }

    fn accent_style(&self) -> Style {
        fg(self.roles().accent)
    }

    fn accent_bold_style(&self) -> Style {
        self.accent_style().add_modifier(Modifier::BOLD)
    }
}
