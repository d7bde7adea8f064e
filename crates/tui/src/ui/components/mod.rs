pub mod component;
pub mod run_view;
pub mod status_view;
pub mod text_input;

pub use run_view::RunView;
pub use status_view::StatusView;
