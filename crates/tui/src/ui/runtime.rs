//! Runtime: terminal lifecycle and the single event loop of the console.
//!
//! The loop multiplexes four sources with `tokio::select!`:
//! - terminal input, read on a dedicated task and forwarded over a channel
//! - poll completions from the metrics and roster pollers
//! - finished invocations spawned for [`Effect::Invoke`]
//! - the throbber ticker, fast while a request is outstanding
//!
//! Rendering happens only after an iteration that changed something.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use fakernet_api::ConsoleApi;
use fakernet_engine::{ConsolePollers, ConsoleSession, PollEvent};
use fakernet_types::{Effect, InvocationOutcome, Msg};
use fakernet_util::ConsoleConfig;
use futures_util::{StreamExt, stream::FuturesUnordered};
use ratatui::{Terminal, prelude::CrosstermBackend};
use tokio::task::JoinHandle;
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::main_component::MainView;

type ConsoleTerminal = Terminal<CrosstermBackend<std::io::Stdout>>;

/// Forward terminal events from a blocking reader onto a channel.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    tokio::task::spawn_blocking(move || {
        let poll_interval = Duration::from_millis(50);
        loop {
            if sender.is_closed() {
                break;
            }
            match event::poll(poll_interval) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(error) => {
                    warn!("Failed to poll terminal input: {}", error);
                    break;
                }
            }
            match event::read() {
                Ok(event) => {
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!("Failed to read terminal input: {}", error);
                    break;
                }
            }
        }
    });
    receiver
}

fn setup_terminal() -> Result<ConsoleTerminal> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn cleanup_terminal(terminal: &mut ConsoleTerminal) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut ConsoleTerminal, app: &App, main_view: &mut MainView) -> Result<()> {
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

/// Spawn one task per requested invocation.
fn process_effects(
    api: &Arc<dyn ConsoleApi>,
    effects: Vec<Effect>,
    pending: &mut FuturesUnordered<JoinHandle<InvocationOutcome>>,
) {
    for effect in effects {
        match effect {
            Effect::Invoke(invocation) => {
                let api = Arc::clone(api);
                pending.push(tokio::spawn(async move { fakernet_engine::execute(api.as_ref(), &invocation).await }));
            }
        }
    }
}

/// Set up the terminal, start the pollers, and run until the user quits.
pub async fn run_app(api: Arc<dyn ConsoleApi>, config: ConsoleConfig, session: ConsoleSession, version: Option<String>) -> Result<()> {
    let (poll_sender, mut poll_receiver) = mpsc::unbounded_channel::<PollEvent>();
    let pollers = ConsolePollers::start(Arc::clone(&api), &config, poll_sender);

    let mut app = App::new(session, config.base_url.clone(), version);
    let mut main_view = MainView::new();
    let mut input_receiver = spawn_input_thread();
    let mut terminal = setup_terminal()?;
    info!(server = %config.base_url, "console started");

    let mut pending: FuturesUnordered<JoinHandle<InvocationOutcome>> = FuturesUnordered::new();

    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut result = render(&mut terminal, &app, &mut main_view);

    while result.is_ok() {
        let target_interval = if app.view.busy { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let mut needs_render = false;
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    debug!("input channel closed");
                    break;
                };
                match event {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                            break;
                        }
                        let msgs = main_view.handle_key_events(&mut app, key);
                        let effects = app.dispatch_all(msgs);
                        process_effects(&api, effects, &mut pending);
                        needs_render = true;
                    }
                    Event::Resize(..) => needs_render = true,
                    _ => {}
                }
            }

            Some(poll) = poll_receiver.recv() => {
                app.handle_poll(poll);
                needs_render = true;
            }

            Some(joined) = pending.next(), if !pending.is_empty() => {
                let outcome = joined.unwrap_or_else(|error| InvocationOutcome::TransportFailed(format!("invocation task failed: {error}")));
                let effects = app.dispatch(Msg::InvocationFinished(outcome));
                process_effects(&api, effects, &mut pending);
                needs_render = true;
            }

            _ = ticker.tick() => {
                needs_render = app.tick();
            }

            _ = signal::ctrl_c() => { break; }
        }

        if needs_render {
            result = render(&mut terminal, &app, &mut main_view);
        }
    }

    drop(input_receiver);
    if let Err(error) = pollers.shutdown().await {
        warn!("Failed to stop pollers during shutdown: {}", error);
    }
    cleanup_terminal(&mut terminal)?;
    info!("console stopped");
    result
}
