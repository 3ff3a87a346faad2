//! Process Runner
//!
//! Executes the commands of one batch run strictly one after another. Each
//! command's stdout and stderr are copied into the run's log sink by two
//! concurrent tasks; both are joined before the next command is launched.
//! Once the process has exited its streams get a short grace period to drain;
//! streams still held open by leftover background processes are abandoned.
//! The first failing command stops the batch.

use async_trait::async_trait;
use remoterun_core::domain::command::{Batch, CommandDescriptor};
use remoterun_core::domain::run::RunStatus;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::repository::{BatchRegistry, LogSink, SinkError};

const COPY_BUFFER_SIZE: usize = 8 * 1024;

/// How long output capture may outlive the process it belongs to
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Why a single command failed. The display form is the line written to the run's log.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Error starting command {program}: {source}")]
    Launch {
        program: String,
        source: std::io::Error,
    },

    #[error("Error executing command {program}: {source}")]
    Wait {
        program: String,
        source: std::io::Error,
    },

    #[error("Error executing command {program}: {status}")]
    Exit { program: String, status: ExitStatus },

    #[error("Error capturing output of command {program}: {reason}")]
    Capture { program: String, reason: String },
}

/// Executes accepted batches
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs every command of `batch` in order, writing output into `sink`
    ///
    /// Closes the sink before returning and records the terminal status of the run.
    async fn run_batch(&self, run_id: Uuid, batch: Batch, sink: Arc<LogSink>) -> RunStatus;
}

/// Runs commands as child processes of the server
pub struct StandardProcessRunner {
    registry: Arc<dyn BatchRegistry>,
}

impl StandardProcessRunner {
    pub fn new(registry: Arc<dyn BatchRegistry>) -> Self {
        Self { registry }
    }

    fn set_status(&self, run_id: Uuid, status: RunStatus) {
        if let Err(e) = self.registry.update_status(run_id, status) {
            warn!(%run_id, error = %e, "failed to update run status");
        }
    }

    fn launch(command: &CommandDescriptor) -> Result<Child, CommandError> {
        Command::new(command.program())
            .args(command.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CommandError::Launch {
                program: command.program().to_string(),
                source,
            })
    }

    /// Streams a launched command's output into the sink and waits for it to exit
    async fn supervise(
        command: &CommandDescriptor,
        mut child: Child,
        sink: &Arc<LogSink>,
    ) -> Result<(), CommandError> {
        let mut copies = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            copies.push(spawn_copy(stdout, Arc::clone(sink)));
        }
        if let Some(stderr) = child.stderr.take() {
            copies.push(spawn_copy(stderr, Arc::clone(sink)));
        }

        let waited = child.wait().await;

        let deadline = tokio::time::Instant::now() + OUTPUT_DRAIN_GRACE;
        let mut capture_failure = None;
        let mut abandoned = false;
        for mut copy in copies {
            let reason = match tokio::time::timeout_at(deadline, &mut copy).await {
                Ok(Ok(Ok(()))) => continue,
                Ok(Ok(Err(e))) => e.to_string(),
                Ok(Err(e)) => e.to_string(),
                Err(_) => {
                    copy.abort();
                    // wait for the cancellation so nothing lands after the note below
                    let _ = copy.await;
                    abandoned = true;
                    continue;
                }
            };
            capture_failure.get_or_insert(reason);
        }

        if abandoned {
            warn!(
                program = command.program(),
                "output still open after process exit, capture stopped"
            );
            let note = format!(
                "Stopped capturing output of command {}: output still open after the process exited",
                command.program()
            );
            if let Err(e) = sink.append_line(&note).await {
                error!(error = %e, "failed to record abandoned output capture");
            }
        }

        let program = command.program().to_string();
        let status = waited.map_err(|source| CommandError::Wait {
            program: program.clone(),
            source,
        })?;

        debug!(program = %program, %status, "command exited");

        if !status.success() {
            return Err(CommandError::Exit { program, status });
        }
        if let Some(reason) = capture_failure {
            return Err(CommandError::Capture { program, reason });
        }

        Ok(())
    }
}

#[async_trait]
impl ProcessRunner for StandardProcessRunner {
    async fn run_batch(&self, run_id: Uuid, batch: Batch, sink: Arc<LogSink>) -> RunStatus {
        info!(%run_id, commands = batch.len(), "starting batch run");

        let mut outcome = RunStatus::Completed;

        for (index, command) in batch.into_iter().enumerate() {
            debug!(
                %run_id,
                order = command.order(),
                program = command.program(),
                "launching command"
            );

            let result = match Self::launch(&command) {
                Ok(child) => {
                    if index == 0 {
                        self.set_status(run_id, RunStatus::Running);
                    }
                    Self::supervise(&command, child, &sink).await
                }
                Err(e) => Err(e),
            };

            if let Err(e) = result {
                warn!(%run_id, order = command.order(), error = %e, "command failed");
                if let Err(write_err) = sink.append_line(&e.to_string()).await {
                    error!(%run_id, error = %write_err, "failed to record command failure");
                }
                outcome = RunStatus::Failed;
                break;
            }
        }

        if let Err(e) = sink.close().await {
            error!(%run_id, error = %e, "failed to close log sink");
        }

        self.set_status(run_id, outcome);
        info!(%run_id, status = ?outcome, "batch run finished");

        outcome
    }
}

fn spawn_copy<R>(reader: R, sink: Arc<LogSink>) -> JoinHandle<Result<(), SinkError>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(copy_stream(reader, sink))
}

/// Copies one output stream into the sink chunk by chunk
///
/// After a failed append the stream is still drained to EOF so the child
/// never blocks on a full pipe; the first append error is reported.
async fn copy_stream<R>(mut reader: R, sink: Arc<LogSink>) -> Result<(), SinkError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut failure = None;

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        if failure.is_none() {
            if let Err(e) = sink.append(&buf[..n]).await {
                failure = Some(e);
            }
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryBatchRegistry;
    use crate::repository::log_sink::log_path;
    use remoterun_core::domain::run::BatchRun;
    use remoterun_core::dto::task::CommandRequest;
    use remoterun_core::sequencer::sequence;
    use remoterun_core::validation::validate_batch;
    use tempfile::TempDir;

    struct Harness {
        dir: TempDir,
        registry: Arc<InMemoryBatchRegistry>,
        runner: StandardProcessRunner,
    }

    impl Harness {
        fn new() -> Self {
            let registry = Arc::new(InMemoryBatchRegistry::new());
            let runner = StandardProcessRunner::new(registry.clone());
            Self {
                dir: TempDir::new().unwrap(),
                registry,
                runner,
            }
        }

        /// Registers and runs a batch to completion, returning its status and log
        async fn run(&self, requests: Vec<CommandRequest>) -> (Uuid, RunStatus, String) {
            let batch = sequence(validate_batch(requests).unwrap());
            let id = Uuid::new_v4();
            let path = log_path(self.dir.path(), id);
            let sink = Arc::new(LogSink::create(path.clone()).await.unwrap());
            self.registry
                .insert(BatchRun::new(id, path.display().to_string(), batch.len()))
                .unwrap();

            let status = self.runner.run_batch(id, batch, sink.clone()).await;
            assert!(sink.is_closed().await);

            let log = String::from_utf8(sink.read().await.unwrap()).unwrap();
            (id, status, log)
        }
    }

    fn sh(script: &str, order: i64) -> CommandRequest {
        CommandRequest::new("sh", &["-c", script], order)
    }

    #[tokio::test]
    async fn test_single_command_output_is_logged() {
        let harness = Harness::new();
        let (id, status, log) = harness
            .run(vec![CommandRequest::new("echo", &["hi"], 1)])
            .await;

        assert_eq!(status, RunStatus::Completed);
        assert_eq!(log, "hi\n");
        assert_eq!(
            harness.registry.get(id).unwrap().status,
            RunStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_commands_run_in_ascending_order() {
        let harness = Harness::new();
        let (_, status, log) = harness
            .run(vec![
                sh("echo three", 30),
                sh("echo one", -1),
                sh("echo two", 4),
            ])
            .await;

        assert_eq!(status, RunStatus::Completed);
        assert_eq!(log, "one\ntwo\nthree\n");
    }

    #[tokio::test]
    async fn test_non_zero_exit_stops_the_batch() {
        let harness = Harness::new();
        let (id, status, log) = harness
            .run(vec![
                CommandRequest::new("false", &[], 1),
                CommandRequest::new("echo", &["never"], 2),
            ])
            .await;

        assert_eq!(status, RunStatus::Failed);
        assert!(!log.contains("never"));
        assert!(log.contains("Error executing command false"));
        assert_eq!(harness.registry.get(id).unwrap().status, RunStatus::Failed);
    }

    #[tokio::test]
    async fn test_later_commands_are_never_launched() {
        let harness = Harness::new();
        let marker = harness.dir.path().join("marker");
        let marker_arg = marker.display().to_string();

        let (_, status, log) = harness
            .run(vec![
                sh("echo first", 1),
                sh("exit 3", 2),
                CommandRequest::new("touch", &[marker_arg.as_str()], 3),
            ])
            .await;

        assert_eq!(status, RunStatus::Failed);
        assert!(log.starts_with("first\n"));
        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn test_launch_failure_is_logged() {
        let harness = Harness::new();
        let (id, status, log) = harness
            .run(vec![
                CommandRequest::new("remoterun-no-such-program", &[], 1),
                CommandRequest::new("echo", &["never"], 2),
            ])
            .await;

        assert_eq!(status, RunStatus::Failed);
        assert!(log.starts_with("Error starting command remoterun-no-such-program:"));
        assert!(!log.contains("never"));
        assert_eq!(harness.registry.get(id).unwrap().status, RunStatus::Failed);
    }

    #[tokio::test]
    async fn test_stdout_and_stderr_are_both_captured() {
        let harness = Harness::new();
        let (_, status, log) = harness
            .run(vec![sh("echo to-stdout; echo to-stderr >&2", 1)])
            .await;

        assert_eq!(status, RunStatus::Completed);
        assert!(log.contains("to-stdout\n"));
        assert!(log.contains("to-stderr\n"));
    }

    #[tokio::test]
    async fn test_output_of_previous_command_precedes_next() {
        let harness = Harness::new();
        let (_, status, log) = harness
            .run(vec![
                sh("seq 1 20000", 1),
                CommandRequest::new("echo", &["tail"], 2),
            ])
            .await;

        assert_eq!(status, RunStatus::Completed);
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 20001);
        assert_eq!(lines[19999], "20000");
        assert_eq!(lines[20000], "tail");
    }

    #[tokio::test]
    async fn test_background_child_does_not_stall_the_batch() {
        let harness = Harness::new();
        let started = std::time::Instant::now();

        let (_, status, log) = harness
            .run(vec![
                sh("echo before; sleep 5 &", 1),
                CommandRequest::new("echo", &["next"], 2),
            ])
            .await;

        assert_eq!(status, RunStatus::Completed);
        assert!(started.elapsed() < Duration::from_secs(4));
        assert!(log.starts_with("before\n"));
        assert!(log.contains("Stopped capturing output of command sh"));
        assert!(log.ends_with("next\n"));
    }

    #[tokio::test]
    async fn test_arguments_are_passed_verbatim() {
        let harness = Harness::new();
        let (_, status, log) = harness
            .run(vec![CommandRequest::new(
                "printf",
                &["%s|%s\n", "a b", "$HOME"],
                1,
            )])
            .await;

        assert_eq!(status, RunStatus::Completed);
        assert_eq!(log, "a b|$HOME\n");
    }
}
