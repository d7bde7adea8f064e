//! Terminal rendering: retained view state, components, theming, and the
//! event loop that ties them to the engine.

pub mod components;
pub mod main_component;
pub mod runtime;
pub mod surface;
pub mod theme;
