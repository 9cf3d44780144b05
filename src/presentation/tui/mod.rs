//! Interactive request form.

pub mod app;
pub mod ui;

use crate::application::cancellation::{CancelHandle, cancellation};
use crate::application::services::RequestExecutor;
use crate::domain::entities::{RequestDescription, ResponseDescription};
use crate::domain::errors::ErrorDescription;
use anyhow::Result;
use app::{Action, App};
use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A send running on the runtime while the form stays responsive.
struct InFlight {
    cancel: CancelHandle,
    result: oneshot::Receiver<Result<ResponseDescription, ErrorDescription>>,
}

impl InFlight {
    fn spawn(runtime: &Handle, executor: Arc<RequestExecutor>, request: RequestDescription) -> Self {
        let (cancel, signal) = cancellation();
        let (tx, result) = oneshot::channel();
        runtime.spawn(async move {
            let outcome = executor.send_with_cancel(request, signal).await;
            let _ = tx.send(outcome);
        });
        Self { cancel, result }
    }
}

/// Runs the form until the user quits. Blocks the calling thread, so call
/// it from a blocking task; sends are spawned onto `runtime`.
pub fn run(runtime: Handle, executor: RequestExecutor, app: App) -> Result<()> {
    let mut terminal = ratatui::init();
    let outcome = event_loop(&mut terminal, &runtime, Arc::new(executor), app);
    ratatui::restore();
    outcome
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    runtime: &Handle,
    executor: Arc<RequestExecutor>,
    mut app: App,
) -> Result<()> {
    let mut in_flight: Option<InFlight> = None;

    loop {
        if let Some(flight) = in_flight.as_mut() {
            match flight.result.try_recv() {
                Ok(outcome) => {
                    app.finish(outcome);
                    in_flight = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Closed) => {
                    app.finish(Err(ErrorDescription::unknown(
                        "Request task ended without a result",
                    )));
                    in_flight = None;
                }
            }
        }

        terminal.draw(|frame| ui::draw(frame, &app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match app.handle_key(key) {
            Action::None => {}
            Action::Send(request) => {
                in_flight = Some(InFlight::spawn(runtime, Arc::clone(&executor), request));
            }
            Action::Cancel => {
                if let Some(flight) = &in_flight {
                    flight.cancel.cancel();
                }
            }
            Action::Quit => {
                if let Some(flight) = &in_flight {
                    flight.cancel.cancel();
                }
                return Ok(());
            }
        }
    }
}
