//! Integration tests for the end-to-end run pipeline
//!
//! Drives real child processes through the public API: extraction,
//! gating, resolution, spawn, and session lifecycle. Process-spawning
//! tests are unix-only; they rely on `sh` and `bash`.

use blockrun::extract::Cursor;
use blockrun::safety::AutoApprove;
use blockrun::{Platform, ProcessEvent, RunContext, RunOutcome, Settings};

#[path = "../test_utils/mod.rs"]
#[allow(dead_code)]
mod test_utils;

use test_utils::{sample_markdown, DeclineAll, RecordingSurface, StaticDocument};

fn ctx(settings: Settings) -> RunContext<AutoApprove> {
    RunContext::with_platform(settings, AutoApprove, Platform::Posix)
}

async fn drain(outcome: &mut RunOutcome) -> (String, i32) {
    let mut output = Vec::new();
    let mut exit_code = i32::MIN;
    while let Some(event) = outcome.handle.next_event().await {
        match event {
            ProcessEvent::Output(chunk) => output.extend_from_slice(&chunk),
            ProcessEvent::Exited(code) => {
                exit_code = code;
                break;
            }
        }
    }
    (String::from_utf8_lossy(&output).into_owned(), exit_code)
}

fn cleanup(outcome: &RunOutcome) {
    let _ = std::fs::remove_file(&outcome.plan.temp_file_path);
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_block_from_markdown_note() {
    let doc = StaticDocument::new(sample_markdown(), Cursor::new(5, 0));
    let mut outcome = ctx(Settings::default())
        .run_code_block(&doc)
        .await
        .unwrap()
        .expect("block should run");

    let (output, exit_code) = drain(&mut outcome).await;
    assert_eq!(output, "checking\n");
    assert_eq!(exit_code, 0);
    cleanup(&outcome);
}

#[cfg(unix)]
#[tokio::test]
async fn test_script_file_contains_the_block_body() {
    let doc = StaticDocument::new(
        "```bash\necho one\necho two\n```",
        Cursor::new(1, 0),
    );
    let mut outcome = ctx(Settings::default())
        .run_code_block(&doc)
        .await
        .unwrap()
        .unwrap();

    let written = std::fs::read_to_string(&outcome.plan.temp_file_path).unwrap();
    assert_eq!(written, "echo one\necho two");

    let (output, exit_code) = drain(&mut outcome).await;
    assert_eq!(output, "one\ntwo\n");
    assert_eq!(exit_code, 0);
    cleanup(&outcome);
}

#[cfg(unix)]
#[tokio::test]
async fn test_failing_script_reports_exit_code() {
    let doc = StaticDocument::new("```bash\nexit 7\n```", Cursor::new(1, 0));
    let mut outcome = ctx(Settings::default())
        .run_code_block(&doc)
        .await
        .unwrap()
        .unwrap();

    let (_, exit_code) = drain(&mut outcome).await;
    assert_eq!(exit_code, 7);
    cleanup(&outcome);
}

#[tokio::test]
async fn test_blacklisted_block_declined_at_the_gate() {
    let prompt = DeclineAll::default();
    let ctx = RunContext::with_platform(Settings::default(), prompt, Platform::Posix);
    let doc = StaticDocument::new("```bash\nsudo rm -rf /\n```", Cursor::new(1, 0));

    let outcome = ctx.run_code_block(&doc).await.unwrap();
    assert!(outcome.is_none());
}

#[cfg(unix)]
#[tokio::test]
async fn test_blacklisted_block_approved_still_runs() {
    let mut settings = Settings::default();
    settings.set_blacklist_from_ui("echo");
    let doc = StaticDocument::new("```bash\necho gated\n```", Cursor::new(1, 0));

    let mut outcome = ctx(settings)
        .run_code_block(&doc)
        .await
        .unwrap()
        .expect("approved block should run");

    let (output, exit_code) = drain(&mut outcome).await;
    assert_eq!(output, "gated\n");
    assert_eq!(exit_code, 0);
    cleanup(&outcome);
}

#[tokio::test]
async fn test_pre_run_prompt_gates_before_any_write() {
    let mut settings = Settings::default();
    settings.prompt_before_run = true;
    let prompt = DeclineAll::default();
    let ctx = RunContext::with_platform(settings, prompt, Platform::Posix);
    let doc = StaticDocument::new("```bash\necho hi\n```", Cursor::new(1, 0));

    let outcome = ctx.run_code_block(&doc).await.unwrap();
    assert!(outcome.is_none());
}

#[tokio::test]
async fn test_empty_block_runs_nothing() {
    let doc = StaticDocument::new("```bash\n\n   \n```", Cursor::new(1, 0));
    let outcome = ctx(Settings::default()).run_code_block(&doc).await.unwrap();
    assert!(outcome.is_none());
}

#[cfg(unix)]
#[tokio::test]
async fn test_session_terminates_long_running_script() {
    use blockrun::models::script_process::TERMINATED_EXIT_CODE;
    use blockrun::RunState;

    let doc = StaticDocument::new("```bash\nsleep 30\n```", Cursor::new(1, 0));
    let outcome = ctx(Settings::default())
        .run_code_block(&doc)
        .await
        .unwrap()
        .unwrap();

    let temp_path = outcome.plan.temp_file_path.clone();
    let mut session = outcome.into_session(RecordingSurface::default());

    // Interrupt byte while running
    session.handle_input(&[0x03]).unwrap();
    assert_eq!(session.state(), RunState::Terminated);

    let status = &session.surface().status;
    assert_eq!(status.len(), 1);
    assert_eq!(status[0].exit_code, TERMINATED_EXIT_CODE);

    // The late exit event from the killed child changes nothing
    session.run_to_completion().await;
    assert_eq!(session.surface().status.len(), 1);

    let _ = std::fs::remove_file(temp_path);
}

#[cfg(unix)]
#[tokio::test]
async fn test_interactive_script_round_trip() {
    let doc = StaticDocument::new(
        "```bash\nread name\necho \"hello $name\"\n```",
        Cursor::new(1, 0),
    );
    let outcome = ctx(Settings::default())
        .run_code_block(&doc)
        .await
        .unwrap()
        .unwrap();

    let temp_path = outcome.plan.temp_file_path.clone();
    let mut session = outcome.into_session(RecordingSurface::default());
    session.handle_input(b"world\n").unwrap();
    session.run_to_completion().await;

    let output = String::from_utf8_lossy(&session.surface().output).into_owned();
    assert_eq!(output, "hello world\n");

    let status = &session.surface().status;
    assert_eq!(status.len(), 1);
    assert_eq!(status[0].exit_code, 0);

    let _ = std::fs::remove_file(temp_path);
}
