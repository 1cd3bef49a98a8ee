//! Terminal Session
//!
//! Binds one spawned process to an interactive display surface for its
//! lifetime. The session forwards output chunks verbatim, translates
//! raw input bytes into stdin writes or termination, and renders a
//! status line (elapsed time, exit code, success/failure indicator)
//! exactly once when the process reaches a terminal state.

use crate::error::Result;
use crate::models::script_process::TERMINATED_EXIT_CODE;
use crate::models::{RunState, ScriptProcess};
use crate::runner::{ProcessEvent, ProcessHandle};

/// Interrupt byte ("end of text", the conventional Ctrl-C)
const INTERRUPT: u8 = 0x03;
/// Delete byte
const DELETE: u8 = 0x7f;
/// Backspace byte
const BACKSPACE: u8 = 0x08;

/// Colored indicator next to the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIndicator {
    /// Exit code 0
    Success,
    /// Any other exit code, including the terminated sentinel
    Failure,
}

/// Final status rendered when the process reaches a terminal state
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    /// Wall-clock seconds from spawn to exit
    pub elapsed_secs: f64,
    /// The child's exit code, or the terminated sentinel
    pub exit_code: i32,
}

impl StatusLine {
    pub fn new(elapsed_secs: f64, exit_code: i32) -> Self {
        Self {
            elapsed_secs,
            exit_code,
        }
    }

    pub fn indicator(&self) -> StatusIndicator {
        if self.exit_code == 0 {
            StatusIndicator::Success
        } else {
            StatusIndicator::Failure
        }
    }

    /// Status text with two-decimal elapsed seconds
    pub fn render(&self) -> String {
        format!(
            "Elapsed Time: {:.2}s (exit: {})",
            self.elapsed_secs, self.exit_code
        )
    }
}

/// How carriage return is treated while typing into the session.
///
/// Which behavior is right depends on the child: line-editing programs
/// expect a buffered line, raw-mode programs expect every byte. The
/// session does not guess; the host picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Every byte, carriage return included, goes to stdin verbatim
    #[default]
    Raw,
    /// Printable bytes collect in a local line buffer (DEL/BS edit it);
    /// carriage return flushes the buffer with a newline
    LineBuffered,
}

/// Display surface the session renders into. The host owns scrolling,
/// colors, and layout; the session only pushes content and status.
pub trait TerminalSurface {
    /// Append raw output bytes (control sequences included) verbatim
    fn append(&mut self, data: &[u8]);

    /// Keep the latest content visible
    fn scroll_to_bottom(&mut self);

    /// Render the final status line
    fn set_status(&mut self, status: &StatusLine);

    /// Remove the view from display
    fn close(&mut self);

    /// Reflow to a new container size; advisory
    fn resize(&mut self, _cols: u16, _rows: u16) {}
}

/// Live binding between one spawned process and its display surface
pub struct TerminalSession<S: TerminalSurface> {
    process: Option<ProcessHandle>,
    info: ScriptProcess,
    surface: S,
    input_mode: InputMode,
    line_buffer: Vec<u8>,
}

impl<S: TerminalSurface> TerminalSession<S> {
    /// Bind a freshly spawned process to a surface
    pub fn new(command: impl Into<String>, process: ProcessHandle, surface: S) -> Self {
        let command = command.into();
        let info = ScriptProcess::new(command, process.pid());
        Self {
            process: Some(process),
            info,
            surface,
            input_mode: InputMode::default(),
            line_buffer: Vec::new(),
        }
    }

    /// Select the input translation mode
    pub fn with_input_mode(mut self, mode: InputMode) -> Self {
        self.input_mode = mode;
        self
    }

    /// Current session state
    pub fn state(&self) -> RunState {
        self.info.state
    }

    /// Lifecycle record for the bound process
    pub fn process_info(&self) -> &ScriptProcess {
        &self.info
    }

    /// The surface, for hosts that need to drive rendering
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Apply one process event: output is appended verbatim and the
    /// view auto-scrolled; the exit event settles the status exactly
    /// once (a session already terminated by the user ignores the late
    /// exit notification).
    pub fn handle_event(&mut self, event: ProcessEvent) {
        match event {
            ProcessEvent::Output(data) => {
                self.surface.append(&data);
                self.surface.scroll_to_bottom();
            }
            ProcessEvent::Exited(exit_code) => {
                if self.info.is_running() {
                    self.info.mark_exited(exit_code);
                    self.render_status();
                }
            }
        }
    }

    /// Consume process events until the session reaches a terminal
    /// state or the event stream ends
    pub async fn run_to_completion(&mut self) {
        while self.info.is_running() {
            let event = match self.process.as_mut() {
                Some(process) => process.next_event().await,
                None => None,
            };
            match event {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }
    }

    /// Drain any events that have already arrived, without waiting
    pub fn pump_pending(&mut self) {
        loop {
            let event = match self.process.as_mut() {
                Some(process) => process.try_next_event(),
                None => None,
            };
            match event {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }
    }

    /// Translate raw input bytes.
    ///
    /// The interrupt byte terminates a running process, or closes the
    /// view when the process already exited on its own. Everything else
    /// is forwarded per the configured [`InputMode`]; input after a
    /// terminal state is dropped.
    pub fn handle_input(&mut self, data: &[u8]) -> Result<()> {
        let mut pending: Vec<u8> = Vec::new();

        for &byte in data {
            if byte == INTERRUPT {
                match self.info.state {
                    RunState::Running => {
                        self.flush_pending(&mut pending)?;
                        self.terminate();
                    }
                    RunState::Exited | RunState::Terminated => self.close(),
                }
                return Ok(());
            }

            if !self.info.is_running() {
                continue;
            }

            match self.input_mode {
                InputMode::Raw => pending.push(byte),
                InputMode::LineBuffered => match byte {
                    b'\r' | b'\n' => {
                        self.line_buffer.push(b'\n');
                        pending.extend_from_slice(&self.line_buffer);
                        self.line_buffer.clear();
                    }
                    DELETE | BACKSPACE => {
                        self.line_buffer.pop();
                    }
                    byte if byte < 0x20 => pending.push(byte),
                    byte => self.line_buffer.push(byte),
                },
            }
        }

        self.flush_pending(&mut pending)
    }

    fn flush_pending(&mut self, pending: &mut Vec<u8>) -> Result<()> {
        if pending.is_empty() {
            return Ok(());
        }
        if let Some(process) = self.process.as_ref() {
            process.write_input(pending)?;
        }
        pending.clear();
        Ok(())
    }

    /// Kill the process and settle the session as `Terminated` with the
    /// sentinel exit code. No-op once a terminal state is reached.
    pub fn terminate(&mut self) {
        if !self.info.is_running() {
            return;
        }
        if let Some(process) = self.process.as_mut() {
            if let Err(e) = process.kill() {
                warn!(error = %e, "kill request failed");
            }
        }
        self.info.mark_terminated();
        self.render_status();
        info!(command = %self.info.command, "session terminated by user");
    }

    /// Terminate if still running, then remove the view from display
    pub fn close(&mut self) {
        if self.info.is_running() {
            self.terminate();
        }
        self.surface.close();
    }

    /// Forward a container resize to the surface; advisory
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.surface.resize(cols, rows);
    }

    fn render_status(&mut self) {
        let status = StatusLine::new(
            self.info.elapsed_secs(),
            self.info.exit_code.unwrap_or(TERMINATED_EXIT_CODE),
        );
        self.surface.set_status(&status);
    }
}
