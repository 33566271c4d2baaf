//! # Task Lifecycle
//!
//! ```text
//!   Running ──(cancel observed / channel closed)──> Draining ──(thread exits)──> Stopped
//! ```
//!
//! States live in atomics so the handle can read them without locking.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tracing::{error, info};

use crate::cancel::CancelToken;

/// The three pipeline tasks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TaskKind {
    /// Produces one entity per generation tick.
    Generator = 0,
    /// Moves entities from the handoff channel into the store.
    Inserter = 1,
    /// Reports per-kind count deltas.
    Monitor = 2,
}

impl TaskKind {
    /// Number of tasks.
    pub const COUNT: usize = 3;

    /// Every task, in spawn order.
    pub const ALL: [Self; Self::COUNT] = [Self::Generator, Self::Inserter, Self::Monitor];

    /// Thread name used when spawning.
    #[must_use]
    pub const fn thread_name(self) -> &'static str {
        match self {
            Self::Generator => "goban-generator",
            Self::Inserter => "goban-inserter",
            Self::Monitor => "goban-monitor",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Generator => "generator",
            Self::Inserter => "inserter",
            Self::Monitor => "monitor",
        };
        f.write_str(name)
    }
}

/// Lifecycle state of one task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TaskState {
    /// Waiting on its timer or channel.
    Running = 0,
    /// Termination observed, finishing up.
    Draining = 1,
    /// Thread has exited.
    Stopped = 2,
}

impl From<u8> for TaskState {
    fn from(v: u8) -> Self {
        match v {
            0 => Self::Running,
            1 => Self::Draining,
            _ => Self::Stopped,
        }
    }
}

/// Lock-free state table shared by the handle and the task threads.
#[derive(Debug)]
pub(crate) struct TaskStates {
    states: [AtomicU8; TaskKind::COUNT],
}

impl TaskStates {
    pub(crate) fn new() -> Self {
        Self {
            states: [
                AtomicU8::new(TaskState::Running as u8),
                AtomicU8::new(TaskState::Running as u8),
                AtomicU8::new(TaskState::Running as u8),
            ],
        }
    }

    #[inline]
    pub(crate) fn get(&self, task: TaskKind) -> TaskState {
        TaskState::from(self.states[task as usize].load(Ordering::Acquire))
    }

    /// Only ever moves forward.
    pub(crate) fn advance(&self, task: TaskKind, state: TaskState) {
        self.states[task as usize].fetch_max(state as u8, Ordering::AcqRel);
    }
}

/// Held by a task thread for its whole life.
///
/// On drop the task is marked `Stopped`. If the thread is unwinding, the
/// shared token is cancelled first so sibling tasks wind down too.
pub(crate) struct TaskGuard {
    task: TaskKind,
    states: Arc<TaskStates>,
    token: CancelToken,
}

impl TaskGuard {
    pub(crate) fn enter(task: TaskKind, states: Arc<TaskStates>, token: CancelToken) -> Self {
        info!(task = %task, "task started");
        Self { task, states, token }
    }

    /// Marks the task as draining.
    pub(crate) fn drain(&self) {
        self.states.advance(self.task, TaskState::Draining);
    }

    /// Cancels siblings after a failure in this task.
    pub(crate) fn fail(&self, reason: &dyn fmt::Display) {
        error!(task = %self.task, %reason, "task failed, cancelling pipeline");
        self.token.cancel();
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        if std::thread::panicking() {
            error!(task = %self.task, "task panicked, cancelling pipeline");
            self.token.cancel();
        }
        self.states.advance(self.task, TaskState::Stopped);
        info!(task = %self.task, "task stopped");
    }
}
