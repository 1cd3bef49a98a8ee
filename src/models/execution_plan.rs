//! Execution Plan Model
//!
//! The resolver's output: where to write the script and what shell
//! command runs it. Produced once per run and immutable afterwards.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Resolved temp-file path and shell command for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    /// Path under the system temp directory the block body is written to
    pub temp_file_path: PathBuf,

    /// Shell-interpreted command line referencing the temp file
    pub command: String,
}

impl ExecutionPlan {
    /// Create a new execution plan
    pub fn new(temp_file_path: PathBuf, command: String) -> Self {
        Self {
            temp_file_path,
            command,
        }
    }
}

impl std::fmt::Display for ExecutionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.command, self.temp_file_path.display())
    }
}
