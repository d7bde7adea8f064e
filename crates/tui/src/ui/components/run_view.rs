//! Run tab: module and function selects, the parameter form, and the output pane.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fakernet_engine::InputKind;
use fakernet_types::{Msg, ResultTable};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Cell, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::surface::{ConsoleView, SelectState};
use crate::ui::theme::Theme;
use crate::ui::theme::theme_helpers::{
    block, input_style, render_button, table_header_row_style, table_row_style, table_selected_style,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum RunFocus {
    #[default]
    Modules,
    Functions,
    Params,
    Submit,
}

#[derive(Debug, Default)]
pub struct RunView {
    focus: RunFocus,
    param_cursor: usize,
    output_scroll: u16,
}

impl RunView {
    fn focus_order(view: &ConsoleView) -> Vec<RunFocus> {
        let mut order = vec![RunFocus::Modules];
        if view.function_select.enabled {
            order.push(RunFocus::Functions);
        }
        if !view.inputs.is_empty() {
            order.push(RunFocus::Params);
        }
        if view.submit_enabled {
            order.push(RunFocus::Submit);
        }
        order
    }

    fn cycle_focus(&mut self, view: &ConsoleView, forward: bool) {
        let order = Self::focus_order(view);
        let current = order.iter().position(|focus| *focus == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    /// Keep focus on a control that still exists after the last dispatch.
    fn normalize_focus(&mut self, view: &ConsoleView) {
        if !Self::focus_order(view).contains(&self.focus) {
            self.focus = RunFocus::Modules;
        }
        if self.param_cursor >= view.inputs.len() {
            self.param_cursor = view.inputs.len().saturating_sub(1);
        }
    }

    fn handle_select_key(select: &mut SelectState, key: KeyEvent) -> Option<Option<String>> {
        match key.code {
            KeyCode::Up => select.move_highlight(-1),
            KeyCode::Down => select.move_highlight(1),
            KeyCode::Enter => {
                select.committed = Some(select.highlighted);
                return Some(select.option_at(select.highlighted).map(str::to_string));
            }
            _ => {}
        }
        None
    }

    fn handle_param_key(&mut self, view: &mut ConsoleView, key: KeyEvent) -> Vec<Msg> {
        let count = view.inputs.len();
        match key.code {
            KeyCode::Up => {
                self.param_cursor = self.param_cursor.saturating_sub(1);
                return Vec::new();
            }
            KeyCode::Down | KeyCode::Enter if self.param_cursor + 1 < count => {
                self.param_cursor += 1;
                return Vec::new();
            }
            KeyCode::Enter => {
                self.focus = RunFocus::Submit;
                return Vec::new();
            }
            _ => {}
        }

        let Some(input) = view.inputs.get_mut(self.param_cursor) else {
            return Vec::new();
        };
        let changed = match key.code {
            KeyCode::Left => input.cycle_choice(-1) || {
                input.text.move_left();
                false
            },
            KeyCode::Right => input.cycle_choice(1) || {
                input.text.move_right();
                false
            },
            KeyCode::Backspace if !matches!(input.widget.kind, InputKind::Choice(_)) => {
                input.text.backspace();
                true
            }
            KeyCode::Char(c)
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                    && !matches!(input.widget.kind, InputKind::Choice(_)) =>
            {
                input.text.insert_char(c);
                true
            }
            _ => false,
        };
        if !changed {
            return Vec::new();
        }
        vec![Msg::ParamEdited {
            name: input.widget.name.clone(),
            value: input.value(),
        }]
    }

    fn render_select(&self, frame: &mut Frame, area: Rect, theme: &dyn Theme, title: &str, select: &SelectState, focused: bool) {
        let items: Vec<ListItem> = select
            .entries()
            .enumerate()
            .map(|(index, entry)| {
                let marker = if select.committed == Some(index) { "● " } else { "  " };
                ListItem::new(format!("{marker}{entry}"))
            })
            .collect();
        let style = input_style(theme, select.enabled, focused);
        let list = List::new(items)
            .block(block(theme, Some(title), focused))
            .style(style)
            .highlight_style(table_selected_style(theme));
        let mut state = ListState::default();
        if select.enabled && select.entry_count() > 0 {
            state.select(Some(select.highlighted));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_params(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.theme.as_ref();
        let focused = self.focus == RunFocus::Params;
        let label_width = app.view.inputs.iter().map(|input| input.widget.name.width()).max().unwrap_or(0);

        let lines: Vec<Line> = if app.view.inputs.is_empty() {
            vec![Line::styled("No parameters", theme.text_muted_style())]
        } else {
            app.view
                .inputs
                .iter()
                .enumerate()
                .map(|(index, input)| {
                    let row_style = if focused && index == self.param_cursor {
                        table_selected_style(theme)
                    } else {
                        theme.text_primary_style()
                    };
                    Line::from(vec![
                        Span::styled(format!("{:label_width$} ", input.widget.name), theme.text_secondary_style()),
                        Span::styled(format!("[{}] ", kind_hint(&input.widget.kind)), theme.text_muted_style()),
                        Span::styled(input.display(), row_style),
                    ])
                })
                .collect()
        };
        frame.render_widget(Paragraph::new(lines).block(block(theme, Some("Parameters"), focused)), area);

        if focused && let Some(input) = app.view.inputs.get(self.param_cursor) {
            if matches!(input.widget.kind, InputKind::Choice(_)) {
                return;
            }
            let typed = match input.widget.kind {
                InputKind::Secret => input.text.cursor(),
                _ => input.text.before_cursor().width(),
            };
            let hint = kind_hint(&input.widget.kind).width() + 3;
            let x = area.x + 1 + (label_width + 1 + hint + typed) as u16;
            let y = area.y + 1 + self.param_cursor as u16;
            if x < area.right() && y < area.bottom() {
                frame.set_cursor_position((x, y));
            }
        }
    }

    fn render_output(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.theme.as_ref();
        let view = &app.view;
        let title = if view.busy {
            format!("Output {} running", app.throbber())
        } else {
            "Output".to_string()
        };
        let output_block = block(theme, Some(title.as_str()), false);

        if view.error_visible {
            let error = Paragraph::new(view.error_text.as_str())
                .style(theme.error_style())
                .wrap(Wrap { trim: false })
                .block(output_block);
            frame.render_widget(error, area);
            return;
        }
        match &view.result {
            Some(result) => match &result.table {
                Some(table) => render_result_table(frame, area, theme, table, output_block),
                None => {
                    let pretty = Paragraph::new(result.pretty.as_str())
                        .scroll((self.output_scroll, 0))
                        .block(output_block);
                    frame.render_widget(pretty, area);
                }
            },
            None => frame.render_widget(Paragraph::new("").block(output_block), area),
        }
    }
}

impl Component for RunView {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Msg> {
        self.normalize_focus(&app.view);
        if key.code == KeyCode::Char('r') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Msg::Submit];
        }
        match key.code {
            KeyCode::Tab => {
                self.cycle_focus(&app.view, true);
                return Vec::new();
            }
            KeyCode::BackTab => {
                self.cycle_focus(&app.view, false);
                return Vec::new();
            }
            KeyCode::PageDown => {
                self.output_scroll = self.output_scroll.saturating_add(5);
                return Vec::new();
            }
            KeyCode::PageUp => {
                self.output_scroll = self.output_scroll.saturating_sub(5);
                return Vec::new();
            }
            _ => {}
        }

        match self.focus {
            RunFocus::Modules => match Self::handle_select_key(&mut app.view.module_select, key) {
                Some(module) => {
                    self.output_scroll = 0;
                    if module.is_some() {
                        self.focus = RunFocus::Functions;
                    }
                    vec![Msg::ModuleSelected(module)]
                }
                None => Vec::new(),
            },
            RunFocus::Functions => match Self::handle_select_key(&mut app.view.function_select, key) {
                Some(function) => {
                    self.output_scroll = 0;
                    self.param_cursor = 0;
                    if function.is_some() {
                        self.focus = RunFocus::Params;
                    }
                    vec![Msg::FunctionSelected(function)]
                }
                None => Vec::new(),
            },
            RunFocus::Params => self.handle_param_key(&mut app.view, key),
            RunFocus::Submit if key.code == KeyCode::Enter => {
                self.output_scroll = 0;
                vec![Msg::Submit]
            }
            RunFocus::Submit => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &App) {
        self.normalize_focus(&app.view);
        let theme = app.theme.as_ref();
        let [left, right] = Layout::horizontal([Constraint::Percentage(30), Constraint::Percentage(70)]).areas(rect);
        let [modules, functions] = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(left);
        self.render_select(frame, modules, theme, "Modules", &app.view.module_select, self.focus == RunFocus::Modules);
        self.render_select(
            frame,
            functions,
            theme,
            "Functions",
            &app.view.function_select,
            self.focus == RunFocus::Functions,
        );

        let params_height = (app.view.inputs.len().max(1) + 2) as u16;
        let [description, params, submit, output] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(params_height),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .areas(right);

        frame.render_widget(
            Paragraph::new(app.view.description.as_str())
                .style(theme.text_secondary_style())
                .block(block(theme, Some("Description"), false)),
            description,
        );
        self.render_params(frame, params, app);
        let [submit, _] = Layout::horizontal([Constraint::Length(16), Constraint::Min(0)]).areas(submit);
        render_button(
            frame,
            submit,
            "Submit",
            app.view.submit_enabled && !app.view.busy,
            self.focus == RunFocus::Submit,
            theme,
        );
        self.render_output(frame, output, app);
    }

    fn hints(&self, _app: &App) -> Vec<(&'static str, &'static str)> {
        let mut hints = vec![("Tab", "focus"), ("Ctrl+R", "submit"), ("PgUp/PgDn", "scroll")];
        match self.focus {
            RunFocus::Modules | RunFocus::Functions => hints.push(("Enter", "select")),
            RunFocus::Params => hints.push(("←/→", "choice")),
            RunFocus::Submit => hints.push(("Enter", "submit")),
        }
        hints
    }
}

fn kind_hint(kind: &InputKind) -> &str {
    match kind {
        InputKind::Text { hint } => hint.as_str(),
        InputKind::Secret => "PASSWORD",
        InputKind::Choice(_) => "CHOICE",
    }
}

fn render_result_table(frame: &mut Frame, area: Rect, theme: &dyn Theme, table: &ResultTable, output_block: Block<'_>) {
    if table.is_empty() {
        frame.render_widget(
            Paragraph::new("No results").style(theme.text_muted_style()).block(output_block),
            area,
        );
        return;
    }
    let header = Row::new(table.columns.iter().map(|column| Cell::from(column.as_str()))).style(table_header_row_style(theme));
    let rows = table
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| Row::new(row.iter().map(|cell| Cell::from(cell.as_str()))).style(table_row_style(theme, index)));
    let widths = column_widths(table);
    frame.render_widget(Table::new(rows, widths).header(header).block(output_block), area);
}

/// Width of each column: its widest cell, header included.
fn column_widths(table: &ResultTable) -> Vec<Constraint> {
    let mut widths: Vec<usize> = table.columns.iter().map(|column| column.width()).collect();
    for row in &table.rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.width());
            }
        }
    }
    widths.into_iter().map(|width| Constraint::Length(width as u16)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_widths_cover_header_and_cells() {
        let table = ResultTable {
            columns: vec!["id".into(), "fqdn".into()],
            rows: vec![vec!["1".into(), "mail.fn.test".into()]],
        };
        assert_eq!(column_widths(&table), vec![Constraint::Length(2), Constraint::Length(12)]);
    }
}
