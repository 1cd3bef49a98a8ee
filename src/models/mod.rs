//! Data models for blockrun
//!
//! Core domain entities: the extracted code block, the resolved
//! execution plan, and the child-process lifecycle record.

pub mod code_block;
pub mod execution_plan;
pub mod script_process;

pub use code_block::CodeBlock;
pub use execution_plan::ExecutionPlan;
pub use script_process::{RunState, ScriptProcess};
