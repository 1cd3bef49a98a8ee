//! Script Process Model
//!
//! Lifecycle record for one spawned script process. Tracks the state
//! machine `Running -> Exited | Terminated`; both end states are
//! terminal and the exit code is recorded exactly once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Synthetic exit code recorded when the user kills the process.
/// Distinct from any real exit code a child can return.
pub const TERMINATED_EXIT_CODE: i32 = -1;

/// State of a spawned script process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RunState {
    /// Process is running
    #[default]
    Running,
    /// Process exited on its own
    Exited,
    /// Process was killed by the user
    Terminated,
}

/// Tracks one child process from spawn to exit
#[derive(Debug, Clone)]
pub struct ScriptProcess {
    /// OS process identifier
    pub pid: Option<u32>,

    /// Current state of the process
    pub state: RunState,

    /// When the process was spawned
    pub start_time: DateTime<Utc>,

    /// When the process reached a terminal state
    pub end_time: Option<DateTime<Utc>>,

    /// Exit code, or the terminated sentinel (set once, in a terminal state)
    pub exit_code: Option<i32>,

    /// Command line that was executed
    pub command: String,
}

impl ScriptProcess {
    /// Create a record for a process that was just spawned
    pub fn new(command: String, pid: Option<u32>) -> Self {
        Self {
            pid,
            state: RunState::Running,
            start_time: Utc::now(),
            end_time: None,
            exit_code: None,
            command,
        }
    }

    /// Record a natural exit with the given exit code
    pub fn mark_exited(&mut self, exit_code: i32) {
        if self.is_finished() {
            return;
        }
        self.state = RunState::Exited;
        self.end_time = Some(Utc::now());
        self.exit_code = Some(exit_code);
    }

    /// Record a user-initiated termination with the sentinel code
    pub fn mark_terminated(&mut self) {
        if self.is_finished() {
            return;
        }
        self.state = RunState::Terminated;
        self.end_time = Some(Utc::now());
        self.exit_code = Some(TERMINATED_EXIT_CODE);
    }

    /// Check if the process is still running
    pub fn is_running(&self) -> bool {
        matches!(self.state, RunState::Running)
    }

    /// Check if the process reached a terminal state
    pub fn is_finished(&self) -> bool {
        !self.is_running()
    }

    /// Check if the process exited successfully (exit code 0)
    pub fn exited_successfully(&self) -> bool {
        self.state == RunState::Exited && self.exit_code == Some(0)
    }

    /// Elapsed wall-clock time: start to end, or start to now if running
    pub fn elapsed(&self) -> std::time::Duration {
        let end = self.end_time.unwrap_or_else(Utc::now);
        end.signed_duration_since(self.start_time)
            .to_std()
            .unwrap_or_default()
    }

    /// Elapsed time in seconds, as rendered in the status line
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

impl std::fmt::Display for ScriptProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state_str = match self.state {
            RunState::Running => "Running",
            RunState::Exited => "Exited",
            RunState::Terminated => "Terminated",
        };
        let pid_str = self.pid.map_or("N/A".to_string(), |pid| pid.to_string());
        write!(f, "{} [{}] - {}", self.command, pid_str, state_str)?;
        if let Some(code) = self.exit_code {
            write!(f, " (exit: {})", code)?;
        }
        Ok(())
    }
}
