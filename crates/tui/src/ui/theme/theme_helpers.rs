//! Widget builders shared by the console views.

use fakernet_engine::GaugeStyle;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph, Tabs},
};

use super::roles::Theme;

/// Bordered panel; the border lights up when `focused`.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    match title {
        Some(title) => block.title(Span::styled(title, theme.text_secondary_style().add_modifier(Modifier::BOLD))),
        None => block,
    }
}

pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    theme.text_primary_style().bg(theme.roles().surface)
}

pub fn table_header_row_style<T: Theme + ?Sized>(theme: &T) -> Style {
    theme
        .text_secondary_style()
        .bg(theme.roles().surface_muted)
        .add_modifier(Modifier::BOLD)
}

/// Zebra striping by row index.
pub fn table_row_style<T: Theme + ?Sized>(theme: &T, row_index: usize) -> Style {
    let roles = theme.roles();
    let bg = if row_index % 2 == 0 { roles.row_even } else { roles.row_odd };
    theme.text_primary_style().bg(bg)
}

pub fn table_selected_style<T: Theme + ?Sized>(theme: &T) -> Style {
    theme.selection_style().add_modifier(Modifier::BOLD)
}

/// Route tabs; the active one is bold and underlined.
pub fn tabs<'a, T: Theme + ?Sized>(theme: &T, titles: Vec<Span<'a>>, index: usize) -> Tabs<'a> {
    let active = theme.text_primary_style().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    Tabs::new(titles).select(index).highlight_style(active).style(theme.text_secondary_style())
}

/// Selects and inputs: muted while disabled, bold while focused.
pub fn input_style<T: Theme + ?Sized>(theme: &T, enabled: bool, focused: bool) -> Style {
    let base = if enabled { theme.text_primary_style() } else { theme.text_muted_style() };
    let style = base.bg(theme.roles().surface);
    if focused { style.add_modifier(Modifier::BOLD) } else { style }
}

/// Gauge fill for the two-tier metric styling.
pub fn gauge_style<T: Theme + ?Sized>(theme: &T, style: GaugeStyle) -> Style {
    let fill = match style {
        GaugeStyle::Normal => theme.success_style(),
        GaugeStyle::Warning => theme.warning_style(),
    };
    fill.bg(theme.roles().surface_muted)
}

pub fn render_button<T: Theme + ?Sized>(frame: &mut Frame, area: Rect, label: &str, is_enabled: bool, is_focused: bool, theme: &T) {
    let (border, text) = match (is_enabled, is_focused) {
        (false, _) => (theme.text_muted_style(), theme.text_muted_style()),
        (true, true) => (theme.border_style(true), theme.accent_bold_style().bg(theme.roles().selection_bg)),
        (true, false) => (theme.border_style(false), theme.accent_style()),
    };
    let button = Paragraph::new(label).centered().style(text).block(Block::bordered().border_style(border));
    frame.render_widget(button, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::NordTheme;

    #[test]
    fn zebra_rows_alternate() {
        let theme = NordTheme::new();
        assert_eq!(table_row_style(&theme, 0).bg, Some(theme.roles().row_even));
        assert_eq!(table_row_style(&theme, 1).bg, Some(theme.roles().row_odd));
    }

    #[test]
    fn warning_gauges_use_warning_role() {
        let theme = NordTheme::new();
        assert_eq!(gauge_style(&theme, GaugeStyle::Warning).fg, Some(theme.roles().warning));
        assert_eq!(gauge_style(&theme, GaugeStyle::Normal).fg, Some(theme.roles().success));
    }

    #[test]
    fn disabled_inputs_are_muted() {
        let theme = NordTheme::new();
        assert_eq!(input_style(&theme, false, true).fg, Some(theme.roles().text_muted));
        assert!(input_style(&theme, true, true).add_modifier.contains(Modifier::BOLD));
    }
}
