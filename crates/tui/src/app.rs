//! Application state for the console TUI.

use fakernet_engine::{ConsoleSession, PollEvent, RenderSurface, Update};
use fakernet_types::{Effect, Msg};

use crate::ui::surface::ConsoleView;
use crate::ui::theme::{self, Theme};

/// Top-level views selectable from the tab bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Run,
    Status,
}

impl Route {
    pub const ALL: [Route; 2] = [Route::Run, Route::Status];

    pub fn title(self) -> &'static str {
        match self {
            Route::Run => "Run [F1]",
            Route::Status => "Status [F2]",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Route::Run => 0,
            Route::Status => 1,
        }
    }
}

pub struct App {
    pub session: ConsoleSession,
    pub view: ConsoleView,
    pub theme: Box<dyn Theme>,
    pub route: Route,
    pub server_url: String,
    pub server_version: Option<String>,
    pub throbber_idx: usize,
}

impl App {
    pub fn new(session: ConsoleSession, server_url: String, server_version: Option<String>) -> Self {
        let mut view = ConsoleView::default();
        view.apply_all(session.initial_render());
        Self {
            session,
            view,
            theme: theme::load(),
            route: Route::default(),
            server_url,
            server_version,
            throbber_idx: 0,
        }
    }

    /// Run one message through the session and apply the resulting ops.
    pub fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let Update { ops, effects } = self.session.update(msg);
        self.view.apply_all(ops);
        effects
    }

    pub fn dispatch_all(&mut self, msgs: impl IntoIterator<Item = Msg>) -> Vec<Effect> {
        msgs.into_iter().flat_map(|msg| self.dispatch(msg)).collect()
    }

    pub fn handle_poll(&mut self, event: PollEvent) {
        let ops = self.session.handle_poll(event);
        self.view.apply_all(ops);
    }

    /// Advance the busy throbber; `true` when a redraw is needed.
    pub fn tick(&mut self) -> bool {
        if !self.view.busy {
            self.throbber_idx = 0;
            return false;
        }
        self.throbber_idx = (self.throbber_idx + 1) % THROBBER.len();
        true
    }

    pub fn throbber(&self) -> &'static str {
        THROBBER[self.throbber_idx % THROBBER.len()]
    }
}

const THROBBER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];
