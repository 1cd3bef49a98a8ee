//! Process Runner
//!
//! Writes a block body to its temp file and spawns the resolved command
//! as a shell-interpreted child process with piped stdio (no TTY).
//! Blocking child I/O is bridged to async consumers over channels:
//! reader tasks forward stdout/stderr chunks in arrival order, a writer
//! task drains stdin input, and a supervisor task waits for exit (or a
//! kill request) and emits a single exit event.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::models::ExecutionPlan;

/// Events emitted by a running child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    /// Raw output chunk from stdout or stderr, in arrival order
    Output(Vec<u8>),
    /// The process exited; emitted exactly once. Carries the exit code,
    /// or -1 when the process was killed by a signal.
    Exited(i32),
}

/// Handle onto one spawned child process.
///
/// Exclusively owned by its terminal session. Output and exit arrive
/// through [`next_event`](ProcessHandle::next_event); input goes out
/// through [`write_input`](ProcessHandle::write_input);
/// [`kill`](ProcessHandle::kill) requests best-effort termination and
/// cannot be retried once consumed.
#[derive(Debug)]
pub struct ProcessHandle {
    pid: Option<u32>,
    events: mpsc::UnboundedReceiver<ProcessEvent>,
    input_tx: mpsc::UnboundedSender<Vec<u8>>,
    kill_tx: Option<mpsc::Sender<()>>,
}

impl ProcessHandle {
    /// Assemble a handle from raw channels. Used by the spawn path and
    /// by tests that inject synthetic processes.
    pub fn from_channels(
        pid: Option<u32>,
        events: mpsc::UnboundedReceiver<ProcessEvent>,
        input_tx: mpsc::UnboundedSender<Vec<u8>>,
        kill_tx: mpsc::Sender<()>,
    ) -> Self {
        Self {
            pid,
            events,
            input_tx,
            kill_tx: Some(kill_tx),
        }
    }

    /// OS process id, if the child reported one
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Wait for the next event. Returns `None` once the exit event has
    /// been delivered and the channel drained.
    pub async fn next_event(&mut self) -> Option<ProcessEvent> {
        self.events.recv().await
    }

    /// Non-blocking event poll for callback-driven hosts
    pub fn try_next_event(&mut self) -> Option<ProcessEvent> {
        self.events.try_recv().ok()
    }

    /// Queue bytes for the child's stdin
    pub fn write_input(&self, data: &[u8]) -> Result<()> {
        self.input_tx
            .send(data.to_vec())
            .map_err(|e| Error::ProcessInputSendFailed {
                reason: e.to_string(),
            })
    }

    /// Request termination (signal-based, not instantaneous). Consumes
    /// the kill channel; a second call, or a call after exit has been
    /// observed, is an error.
    pub fn kill(&mut self) -> Result<()> {
        match self.kill_tx.take() {
            Some(tx) => {
                // The supervisor may already be gone if exit raced us;
                // that is equivalent to the kill having taken effect.
                let _ = tx.try_send(());
                Ok(())
            }
            None => Err(Error::ProcessAlreadyExited),
        }
    }

    /// Whether kill is still available
    pub fn can_kill(&self) -> bool {
        self.kill_tx.is_some()
    }
}

/// Write the block body to the plan's temp file, then spawn the
/// command. A write failure aborts before any process is spawned.
pub async fn run(plan: &ExecutionPlan, body: &str) -> Result<ProcessHandle> {
    tokio::fs::write(&plan.temp_file_path, body)
        .await
        .map_err(|e| Error::TempFileWriteFailed {
            path: plan.temp_file_path.clone(),
            reason: e.to_string(),
        })?;
    debug!(path = %plan.temp_file_path.display(), bytes = body.len(), "wrote script file");

    spawn_shell_command(&plan.command)
}

/// Spawn `command` through the platform shell with all three stdio
/// streams piped.
pub fn spawn_shell_command(command: &str) -> Result<ProcessHandle> {
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    };

    let mut child = cmd
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| Error::CommandSpawnFailed {
            command: command.to_string(),
            reason: e.to_string(),
        })?;

    let pid = child.id();
    info!(%command, ?pid, "spawned child process");

    let (events_tx, events_rx) = mpsc::unbounded_channel::<ProcessEvent>();
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<Vec<u8>>();
    let (kill_tx, mut kill_rx) = mpsc::channel::<()>(1);

    // Reader tasks: forward stdout and stderr chunks as they arrive.
    // Interleaving between the two streams is first-come-first-delivered.
    if let Some(mut stdout) = child.stdout.take() {
        let tx = events_tx.clone();
        tokio::spawn(async move {
            let mut buf = [0u8; 4096];
            loop {
                match stdout.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if tx.send(ProcessEvent::Output(buf[..n].to_vec())).is_err() {
                            break;
                        }
                    }
                }
            }
        });
    }
    if let Some(mut stderr) = child.stderr.take() {
        let tx = events_tx.clone();
        tokio::spawn(async move {
            let mut buf = [0u8; 4096];
            loop {
                match stderr.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if tx.send(ProcessEvent::Output(buf[..n].to_vec())).is_err() {
                            break;
                        }
                    }
                }
            }
        });
    }

    // Writer task: drain queued input into the child's stdin
    if let Some(mut stdin) = child.stdin.take() {
        tokio::spawn(async move {
            while let Some(data) = input_rx.recv().await {
                if stdin.write_all(&data).await.is_err() {
                    debug!("child stdin closed, stopping writer task");
                    break;
                }
                if let Err(e) = stdin.flush().await {
                    debug!(error = %e, "stdin flush failed");
                }
            }
        });
    }

    // Supervisor task: wait for natural exit or a kill request, then
    // emit the single exit event
    let supervisor_command = command.to_string();
    tokio::spawn(async move {
        let exit_code = tokio::select! {
            status = child.wait() => match status {
                Ok(status) => status.code().unwrap_or(-1),
                Err(e) => {
                    warn!(error = %e, "failed to wait on child process");
                    -1
                }
            },
            _ = kill_rx.recv() => {
                debug!(command = %supervisor_command, "kill requested");
                if let Err(e) = child.start_kill() {
                    warn!(error = %e, "kill request failed");
                }
                match child.wait().await {
                    Ok(status) => status.code().unwrap_or(-1),
                    Err(_) => -1,
                }
            }
        };
        info!(command = %supervisor_command, exit_code, "child process exited");
        let _ = events_tx.send(ProcessEvent::Exited(exit_code));
    });

    Ok(ProcessHandle::from_channels(
        pid, events_rx, input_tx, kill_tx,
    ))
}
