//! Status tab: host metrics gauges and the live server roster.

use crossterm::event::{KeyCode, KeyEvent};
use fakernet_types::Msg;
use fakernet_types::roster::STATUS_FIELD;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Gauge, Paragraph, Row, Table, TableState},
};

use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::surface::GaugeState;
use crate::ui::theme::Theme;
use crate::ui::theme::theme_helpers::{block, gauge_style, table_header_row_style, table_row_style, table_selected_style};

const ROSTER_HEADERS: [&str; 5] = ["Module", "ID", "IP", "Description", "Status"];

#[derive(Debug, Default)]
pub struct StatusView {
    table_state: TableState,
}

impl StatusView {
    fn render_gauge(frame: &mut Frame, area: Rect, theme: &dyn Theme, title: &str, gauge: &GaugeState, details: &str) {
        let [bar, text] = Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(area);
        let ratio = (gauge.percent / 100.0).clamp(0.0, 1.0);
        let widget = Gauge::default()
            .block(block(theme, Some(title), false))
            .gauge_style(gauge_style(theme, gauge.style))
            .ratio(ratio)
            .label(gauge.label.as_str());
        frame.render_widget(widget, bar);
        frame.render_widget(Paragraph::new(details).style(theme.text_muted_style()), text);
    }

    fn render_roster(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.theme.as_ref();
        let title = format!("Servers ({})", app.view.roster.len());
        let header = Row::new(ROSTER_HEADERS.iter().map(|heading| Cell::from(*heading))).style(table_header_row_style(theme));
        let rows = app
            .view
            .roster
            .values()
            .enumerate()
            .map(|(index, cells)| {
                let row = cells.iter().enumerate().map(|(column, cell)| {
                    if column == STATUS_FIELD {
                        Cell::from(cell.as_str()).style(status_style(theme, cell))
                    } else {
                        Cell::from(cell.as_str())
                    }
                });
                Row::new(row).style(table_row_style(theme, index))
            });
        let widths = [
            Constraint::Length(14),
            Constraint::Length(6),
            Constraint::Length(16),
            Constraint::Min(20),
            Constraint::Length(12),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(block(theme, Some(title.as_str()), true))
            .row_highlight_style(table_selected_style(theme));

        if app.view.roster.is_empty() {
            self.table_state.select(None);
        } else if let Some(selected) = self.table_state.selected()
            && selected >= app.view.roster.len()
        {
            self.table_state.select(Some(app.view.roster.len() - 1));
        }
        frame.render_stateful_widget(table, area, &mut self.table_state);
    }
}

/// Docker reports `running` for healthy containers; anything else is flagged.
fn status_style(theme: &dyn Theme, status: &str) -> Style {
    if status == "running" { theme.success_style() } else { theme.warning_style() }
}

impl Component for StatusView {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Msg> {
        let count = app.view.roster.len();
        if count == 0 {
            return Vec::new();
        }
        let selected = self.table_state.selected();
        let next = match key.code {
            KeyCode::Down => selected.map_or(0, |index| (index + 1).min(count - 1)),
            KeyCode::Up => selected.map_or(0, |index| index.saturating_sub(1)),
            KeyCode::Home => 0,
            KeyCode::End => count - 1,
            _ => return Vec::new(),
        };
        self.table_state.select(Some(next));
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &App) {
        let theme = app.theme.as_ref();
        let view = &app.view;
        let [name, gauges, roster] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(4), Constraint::Min(3)]).areas(rect);

        let system = if view.system_name.is_empty() { "waiting for metrics" } else { view.system_name.as_str() };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("System: ", theme.text_secondary_style()),
                Span::styled(system, theme.accent_bold_style()),
            ])),
            name,
        );

        let [cpu, memory, disk] = Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(gauges);
        Self::render_gauge(frame, cpu, theme, "CPU", &view.cpu, "");
        Self::render_gauge(frame, memory, theme, "Memory", &view.memory, &view.memory_details);
        Self::render_gauge(frame, disk, theme, "Disk", &view.disk, &view.disk_details);

        self.render_roster(frame, roster, app);
    }

    fn hints(&self, _app: &App) -> Vec<(&'static str, &'static str)> {
        vec![("↑/↓", "scroll servers")]
    }
}
