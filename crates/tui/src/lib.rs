//! # FakerNet Console TUI
//!
//! Terminal front end for a FakerNet server. The Run tab builds invocations
//! from the server's module catalogue; the Status tab shows host metrics and
//! the live server roster, refreshed by background pollers.
//!
//! ## Architecture
//!
//! All console behavior lives in `fakernet-engine`. This crate only:
//! - translates keys into engine messages
//! - applies the engine's render ops to a retained [`ui::surface::ConsoleView`]
//! - draws that view with Ratatui and runs the effects the engine requests

mod app;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use fakernet_api::ConsoleApi;
use fakernet_engine::{CatalogueStore, ConsoleSession};
use fakernet_util::ConsoleConfig;

/// Runs the interactive console until the user quits.
///
/// `catalogue` must already be loaded; the pollers start with the intervals
/// in `config` and stop before this returns.
///
/// # Errors
///
/// Terminal setup or drawing failures.
pub async fn run(api: Arc<dyn ConsoleApi>, config: ConsoleConfig, catalogue: CatalogueStore, version: Option<String>) -> Result<()> {
    ui::runtime::run_app(api, config, ConsoleSession::new(catalogue), version).await
}
