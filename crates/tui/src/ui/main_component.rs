use crossterm::event::{KeyCode, KeyEvent};
use fakernet_types::Msg;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use super::components::component::Component;
use super::components::{RunView, StatusView};
use super::theme::theme_helpers as th;
use crate::app::{App, Route};

/// Top-level layout: header with tabs, the active route, and a hint footer.
#[derive(Debug, Default)]
pub struct MainView {
    run_view: RunView,
    status_view: StatusView,
}

impl MainView {
    pub fn new() -> Self {
        Self::default()
    }

    fn active(&mut self, route: Route) -> &mut dyn Component {
        match route {
            Route::Run => &mut self.run_view,
            Route::Status => &mut self.status_view,
        }
    }

    fn render_header(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.theme.as_ref();
        let [tabs_area, server_area] = Layout::horizontal([Constraint::Length(28), Constraint::Min(0)]).areas(area);
        let titles = Route::ALL.iter().map(|route| Span::raw(route.title())).collect();
        frame.render_widget(th::tabs(theme, titles, app.route.index()), tabs_area);

        let mut spans = vec![
            Span::styled("FakerNet ", theme.accent_bold_style()),
            Span::styled(app.server_url.as_str(), theme.text_secondary_style()),
        ];
        if let Some(version) = &app.server_version {
            spans.push(Span::styled(format!("  v{version}"), theme.text_muted_style()));
        }
        if app.view.busy {
            spans.push(Span::styled(format!("  {}", app.throbber()), theme.accent_style()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).right_aligned(), server_area);
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect, app: &App, hints: Vec<(&'static str, &'static str)>) {
        let theme = app.theme.as_ref();
        let mut spans = Vec::new();
        for (key, action) in [("F1/F2", "switch tab"), ("Ctrl+C", "quit")].into_iter().chain(hints) {
            spans.push(Span::styled(format!(" {key} "), theme.accent_style()));
            spans.push(Span::styled(format!("{action} "), theme.text_muted_style()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Component for MainView {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Msg> {
        match key.code {
            KeyCode::F(1) => {
                app.route = Route::Run;
                Vec::new()
            }
            KeyCode::F(2) => {
                app.route = Route::Status;
                Vec::new()
            }
            _ => {
                let route = app.route;
                self.active(route).handle_key_events(app, key)
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &App) {
        frame.render_widget(Block::default().style(th::panel_style(app.theme.as_ref())), rect);
        let [header, body, footer] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)]).areas(rect);
        Self::render_header(frame, header, app);
        let active = self.active(app.route);
        active.render(frame, body, app);
        let hints = active.hints(app);
        self.render_hints(frame, footer, app, hints);
    }
}
