//! Component abstraction for the console views.

use crossterm::event::KeyEvent;
use fakernet_types::Msg;
use ratatui::{Frame, layout::Rect};

use crate::app::App;

/// A self-contained view with local UI state.
///
/// Components translate keys into engine [`Msg`]s and draw themselves from
/// the retained [`crate::ui::surface::ConsoleView`]. They never mutate engine
/// state directly; the runtime dispatches the returned messages.
pub(crate) trait Component {
    /// Handle a key while this component is active.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Msg> {
        Vec::new()
    }

    /// Draw into `rect`.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &App);

    /// Key hints shown in the footer as `(key, action)` pairs.
    fn hints(&self, _app: &App) -> Vec<(&'static str, &'static str)> {
        Vec::new()
    }
}
