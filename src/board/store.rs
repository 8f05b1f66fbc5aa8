//! Synchronization between the local board and the remote task store.
//!
//! Optimistic, fire-and-forget, no rollback: local state mutates first, the
//! matching remote call runs as a spawned task, and a failed call is exactly
//! one log line. The board keeps trusting its local mutation until the next
//! full reload, at which point remote truth replaces it wholesale.
//!
//! All state mutation happens on the owning thread: spawned calls never touch
//! `BoardState` directly. Results that feed state (create responses, reloads)
//! come back over an unbounded channel and are applied by [`TaskStore::pump`].
//! In-flight calls cannot be cancelled, and two calls racing on the same task
//! resolve independently — last response wins server-side.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

use super::{BoardState, Task, ToggleOutcome};
use crate::api::TaskApi;

/// One-shot signals from the store to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// A task just went incomplete → complete. Fired exactly once per such
    /// transition, never on the way back down.
    Celebrate,
}

/// Outcome of a spawned remote call, delivered to [`TaskStore::pump`].
#[derive(Debug)]
enum RemoteEvent {
    /// Create succeeded: append the server's record, clear the input buffer.
    Created(Task),
    /// Create failed: the attempted task is dropped, buffer left as typed.
    CreateFailed,
    /// Reload succeeded: replace the sequence with remote truth.
    Loaded(Vec<Task>),
    /// Reload failed: local state stays as it was.
    LoadFailed,
    /// A fire-and-forget call (toggle/delete) finished, successfully or not.
    /// Carries no state change — tracked only so `settle()` can drain.
    Acked,
}

/// The client-side task store: one owner, no locks.
///
/// The UI loop owns this value, feeds it key-driven operations, and calls
/// [`pump`](Self::pump) once per frame to fold in remote results.
pub struct TaskStore {
    state: BoardState,
    api: Arc<dyn TaskApi>,
    remote_tx: mpsc::UnboundedSender<RemoteEvent>,
    remote_rx: mpsc::UnboundedReceiver<RemoteEvent>,
    effects: Vec<Effect>,
    in_flight: usize,
}

impl TaskStore {
    pub fn new(api: Arc<dyn TaskApi>) -> Self {
        let (remote_tx, remote_rx) = mpsc::unbounded_channel();
        Self {
            state: BoardState::new(),
            api,
            remote_tx,
            remote_rx,
            effects: Vec::new(),
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Remote calls issued but not yet finished.
    pub fn pending_remote(&self) -> usize {
        self.in_flight
    }

    // ─── Input buffer ────────────────────────────────────────────────────────

    pub fn input_char(&mut self, c: char) {
        self.state.push_input(c);
    }

    pub fn input_backspace(&mut self) {
        self.state.backspace_input();
    }

    #[cfg(test)]
    fn set_input(&mut self, text: &str) {
        self.state.set_input(text);
    }

    // ─── Operations ──────────────────────────────────────────────────────────

    /// Fetch the full sequence and replace local state. On failure local
    /// state is left unchanged — no retry, no user-visible error.
    pub async fn load(&mut self) {
        match self.api.list().await {
            Ok(tasks) => self.state.replace_tasks(tasks),
            Err(e) => warn!(error = %e, "load failed — keeping local state"),
        }
    }

    /// Same semantics as [`load`](Self::load), but spawned; the result lands
    /// via [`pump`](Self::pump). The UI uses this so the page never blocks.
    pub fn request_reload(&mut self) {
        self.in_flight += 1;
        let api = Arc::clone(&self.api);
        let tx = self.remote_tx.clone();
        tokio::spawn(async move {
            let event = match api.list().await {
                Ok(tasks) => RemoteEvent::Loaded(tasks),
                Err(e) => {
                    warn!(error = %e, "reload failed — keeping local state");
                    RemoteEvent::LoadFailed
                }
            };
            let _ = tx.send(event);
        });
    }

    /// The add-task operation. Trims the input buffer; an all-whitespace
    /// buffer is a complete no-op (count unchanged, buffer unchanged).
    ///
    /// Nothing optimistic is added: the task appears only when the create
    /// response lands, carrying the server-assigned id. The buffer is
    /// cleared at that same moment.
    pub fn submit(&mut self) {
        let title = self.state.input().trim().to_owned();
        if title.is_empty() {
            return;
        }
        self.in_flight += 1;
        let api = Arc::clone(&self.api);
        let tx = self.remote_tx.clone();
        tokio::spawn(async move {
            let event = match api.create(&title).await {
                Ok(task) => RemoteEvent::Created(task),
                Err(e) => {
                    warn!(error = %e, title = %title, "create failed — dropping the attempted task");
                    RemoteEvent::CreateFailed
                }
            };
            let _ = tx.send(event);
        });
    }

    /// The toggle-task operation: flip locally first, celebrate on the way
    /// up, then tell the store. A failed request is not rolled back.
    pub fn toggle(&mut self, id: &str) {
        match self.state.toggle_task(id) {
            ToggleOutcome::NotFound => return,
            ToggleOutcome::Completed => self.effects.push(Effect::Celebrate),
            ToggleOutcome::Uncompleted => {}
        }
        self.in_flight += 1;
        let api = Arc::clone(&self.api);
        let tx = self.remote_tx.clone();
        let id = id.to_owned();
        tokio::spawn(async move {
            if let Err(e) = api.toggle(&id).await {
                warn!(error = %e, id = %id, "toggle not persisted — keeping optimistic state");
            }
            let _ = tx.send(RemoteEvent::Acked);
        });
    }

    /// The delete-task operation: remove locally first, then tell the store.
    /// A failed request is not rolled back.
    pub fn remove(&mut self, id: &str) {
        if !self.state.remove_task(id) {
            return;
        }
        self.in_flight += 1;
        let api = Arc::clone(&self.api);
        let tx = self.remote_tx.clone();
        let id = id.to_owned();
        tokio::spawn(async move {
            if let Err(e) = api.delete(&id).await {
                warn!(error = %e, id = %id, "delete not persisted — keeping optimistic state");
            }
            let _ = tx.send(RemoteEvent::Acked);
        });
    }

    // ─── Remote results ──────────────────────────────────────────────────────

    /// Fold in every remote result that has landed, without blocking.
    /// Called once per UI frame.
    pub fn pump(&mut self) {
        while let Ok(event) = self.remote_rx.try_recv() {
            self.apply(event);
        }
    }

    /// Wait for every issued remote call to finish and fold in its result.
    /// For tests and shutdown paths; the UI loop uses [`pump`](Self::pump).
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            match self.remote_rx.recv().await {
                Some(event) => self.apply(event),
                None => break,
            }
        }
    }

    fn apply(&mut self, event: RemoteEvent) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match event {
            RemoteEvent::Created(task) => {
                self.state.append_task(task);
                self.state.clear_input();
            }
            RemoteEvent::Loaded(tasks) => self.state.replace_tasks(tasks),
            RemoteEvent::CreateFailed | RemoteEvent::LoadFailed | RemoteEvent::Acked => {}
        }
    }

    /// Drain the queued one-shot effects for the renderer.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }
}
