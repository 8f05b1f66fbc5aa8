//! Client-side board state: the ordered task list plus the input buffer.
//!
//! `BoardState` is pure — no I/O, no channels. Every mutation swaps in a
//! freshly built task sequence (copy-on-write), so a renderer can detect
//! change by pointer identity on snapshots. The synchronization layer that
//! talks to the remote store lives in [`store`].

pub mod store;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A single task as stored remotely and mirrored locally.
///
/// `id` is assigned by the remote store on creation and treated as opaque.
/// `title` is immutable after creation — this client has no edit operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// What [`BoardState::toggle_task`] did to the targeted task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Went incomplete → complete. The celebration-worthy direction.
    Completed,
    /// Went complete → incomplete.
    Uncompleted,
    /// No task with that id — state untouched.
    NotFound,
}

/// Presentation band derived from `progress`.
///
/// The four bands partition [0,100]: exactly one is active at a time.
/// Each maps to a distinct visual theme in the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTier {
    /// 0% — nothing done yet (or no tasks at all).
    Untouched,
    /// 1–49%.
    UnderHalf,
    /// 50–99%.
    OverHalf,
    /// 100% — every task complete.
    Complete,
}

impl ProgressTier {
    /// Step function from a progress percentage to its band.
    pub fn for_progress(progress: u8) -> Self {
        match progress {
            0 => ProgressTier::Untouched,
            1..=49 => ProgressTier::UnderHalf,
            50..=99 => ProgressTier::OverHalf,
            _ => ProgressTier::Complete,
        }
    }
}

/// The client's flat view of the board: `{ tasks, input }`.
///
/// Order is insertion order as returned by the remote store or appended
/// locally — never re-sorted. Task ids are unique within the sequence.
#[derive(Debug, Clone)]
pub struct BoardState {
    tasks: Arc<[Task]>,
    input: String,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState {
    pub fn new() -> Self {
        Self {
            tasks: Arc::from(Vec::new()),
            input: String::new(),
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Cheap handle to the current sequence. Two snapshots compare equal with
    /// `Arc::ptr_eq` iff no mutation happened between them.
    pub fn snapshot(&self) -> Arc<[Task]> {
        Arc::clone(&self.tasks)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    // ─── Input buffer ────────────────────────────────────────────────────────

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace_input(&mut self) {
        self.input.pop();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    // ─── Task sequence mutations (each swaps in a new sequence) ──────────────

    /// Replace the whole sequence — the `load()` path.
    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks.into();
    }

    /// Append a task at the end — the create-success path.
    pub fn append_task(&mut self, task: Task) {
        let mut next = self.tasks.to_vec();
        next.push(task);
        self.tasks = next.into();
    }

    /// Flip `completed` on the task with this id.
    ///
    /// Returns `NotFound` without swapping the sequence when the id is absent.
    pub fn toggle_task(&mut self, id: &str) -> ToggleOutcome {
        let Some(pos) = self.tasks.iter().position(|t| t.id == id) else {
            return ToggleOutcome::NotFound;
        };
        let mut next = self.tasks.to_vec();
        let now_complete = !next[pos].completed;
        next[pos].completed = now_complete;
        self.tasks = next.into();
        if now_complete {
            ToggleOutcome::Completed
        } else {
            ToggleOutcome::Uncompleted
        }
    }

    /// Remove exactly the task with this id. Returns false (and leaves the
    /// sequence untouched) when the id is absent.
    pub fn remove_task(&mut self, id: &str) -> bool {
        if !self.tasks.iter().any(|t| t.id == id) {
            return false;
        }
        let next: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| t.id != id)
            .cloned()
            .collect();
        self.tasks = next.into();
        true
    }

    // ─── Derived values (pure, recomputed on demand, never cached) ───────────

    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// Completion percentage, an integer in [0,100]. 0 when the board is
    /// empty; otherwise `round(100 * completed / total)`, half away from zero.
    pub fn progress(&self) -> u8 {
        let total = self.tasks.len();
        if total == 0 {
            return 0;
        }
        let completed = self.completed_count();
        ((completed as f64 / total as f64) * 100.0).round() as u8
    }

    pub fn tier(&self) -> ProgressTier {
        ProgressTier::for_progress(self.progress())
    }
}
