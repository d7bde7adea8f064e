//! # FakerNet Console Engine
//!
//! State machines behind the console, independent of any display:
//!
//! - **`catalogue`**: one-shot discovery of modules, functions and parameters
//! - **`form`**: dependent module/function selects and the parameter form
//! - **`invoker`**: submission, busy state, and result or error routing
//! - **`metrics`**: gauge values and threshold styling
//! - **`roster`**: minimal-diff reconciliation of the server table
//! - **`poller`**: periodic tasks with sequence numbers and cancellation
//! - **`session`**: the owner of all mutable console state
//!
//! Every transition produces [`RenderOp`]s for a [`RenderSurface`].
//!
//! ## Usage
//!
//! ```rust
//! use fakernet_engine::{CatalogueStore, ConsoleSession, RenderOp, RenderSurface};
//! use fakernet_types::{Catalogue, Msg};
//!
//! let catalogue = Catalogue::from_json_str(r#"{"mail":{"send":{"_desc":"Send mail","to":"TEXT"}}}"#)?;
//! let mut session = ConsoleSession::new(CatalogueStore::new(catalogue));
//! let mut surface: Vec<RenderOp> = Vec::new();
//! surface.apply_all(session.initial_render());
//! surface.apply_all(session.update(Msg::ModuleSelected(Some("mail".into()))).ops);
//! surface.apply_all(session.update(Msg::FunctionSelected(Some("send".into()))).ops);
//! assert!(session.form().is_ready());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalogue;
pub mod form;
pub mod invoker;
pub mod metrics;
pub mod poller;
pub mod roster;
pub mod session;
pub mod view;

pub use catalogue::{CatalogueStore, MODULE_PLACEHOLDER};
pub use form::{FUNCTION_PLACEHOLDER, FormBuilder, FormError};
pub use invoker::{Invoker, execute, result_view};
pub use metrics::{CPU_WARNING_PERCENT, DISK_WARNING_PERCENT, MEMORY_WARNING_PERCENT, classify, render_metrics};
pub use poller::{ConsolePollers, PollEvent, PollSchedule, PollTick, PollerHandle, spawn_poller};
pub use roster::RosterReconciler;
pub use session::{ConsoleSession, Update};
pub use view::{ElementId, GaugeStyle, InputKind, InputWidget, RenderOp, RenderSurface, ResultView, param_input_id};
