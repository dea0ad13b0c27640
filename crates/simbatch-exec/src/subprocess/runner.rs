use std::{
    io,
    path::{Path, PathBuf},
    process::{ExitStatus, Stdio},
};

use simbatch_core::{
    artifact,
    runner::{BuildContext, Runner, RunnerError, make_run_id},
    task::{TaskError, TaskOutput, TaskRef},
};
use simbatch_model::{EntryArgs, Strategy, TaskSpec};
use time::UtcOffset;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    process::{Child, ChildStdout, Command},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::{
    CHILD_EXIT_IO, EXCLUSIVE_ENV, ExecError, SEED_ENV,
    subprocess::{LogConfig, SubprocessConfig},
};

/// Runs each task of the process strategy in its own child process.
///
/// Child contract: `<program> <leading args> <category> <count>`, working
/// directory = output directory, artifact path as first stdout line.
pub struct ProcessRunner {
    config: SubprocessConfig,
}

impl ProcessRunner {
    pub const NAME: &'static str = "process";

    pub fn new(config: SubprocessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SubprocessConfig {
        &self.config
    }

    fn command(&self, spec: &TaskSpec, ctx: &BuildContext, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.leading_args)
            .args(args)
            .current_dir(ctx.output_dir())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        // Children never inherit these from the parent environment.
        match ctx.seed_for(spec.seq) {
            Some(seed) => cmd.env(SEED_ENV, seed.to_string()),
            None => cmd.env_remove(SEED_ENV),
        };
        if ctx.exclusive_artifacts() {
            cmd.env(EXCLUSIVE_ENV, "1");
        } else {
            cmd.env_remove(EXCLUSIVE_ENV);
        }
        cmd
    }
}

impl Runner for ProcessRunner {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn supports(&self, spec: &TaskSpec) -> bool {
        spec.strategy == Strategy::Process
    }

    fn launch(
        &self,
        spec: &TaskSpec,
        ctx: &BuildContext,
        cancel: CancellationToken,
    ) -> Result<TaskRef, RunnerError> {
        if !self.supports(spec) {
            return Err(ExecError::UnsupportedStrategy {
                expected: Self::NAME,
                actual: spec.strategy.to_string(),
            }
            .into());
        }

        let run_id = make_run_id(self.name(), &spec.label());
        let args = EntryArgs::from(spec).to_args();
        self.config.trace_state(&run_id, &args);

        let mut child = self
            .command(spec, ctx, &args)
            .spawn()
            .map_err(|e| RunnerError::Launch {
                runner: Self::NAME,
                reason: format!("spawn {} failed: {e}", self.config.program.display()),
            })?;
        trace!(task = %run_id, pid = ?child.id(), "child spawned");

        let stdout = child.stdout.take();
        let log = self.config.log;
        let fail_on_non_zero = self.config.fail_on_non_zero;
        let output_dir = ctx.output_dir().to_path_buf();
        let offset = ctx.clock().offset();
        let task_id = run_id.clone();

        let fut = async move {
            let (status, reported) = tokio::select! {
                res = wait_child(&mut child, stdout, log, &task_id) => res.map_err(|e| TaskError::Interrupted {
                    reason: format!("wait failed: {e}"),
                })?,
                _ = cancel.cancelled() => {
                    debug!(task = %task_id, "cancellation requested; killing child");
                    if let Err(e) = child.kill().await {
                        debug!(task = %task_id, "failed to kill child: {e}");
                    }
                    return Err(TaskError::Canceled);
                }
            };

            if !status.success() && fail_on_non_zero {
                return Err(exit_failure(status.code(), &output_dir));
            }
            let Some(reported) = reported else {
                return Err(TaskError::InvalidResult {
                    reason: "child reported no artifact path".into(),
                });
            };

            let path = resolve(&output_dir, &reported);
            let duration = read_duration(&path, offset).await;
            debug!(task = %task_id, artifact = %path.display(), "child finished");
            Ok(TaskOutput {
                artifact: path,
                duration,
            })
        };

        Ok(TaskRef::new(run_id, *spec, fut))
    }
}

/// Classify a failed exit; the child's artifact-write code is an IO failure.
fn exit_failure(code: Option<i32>, output_dir: &Path) -> TaskError {
    match code {
        Some(code) if code == i32::from(CHILD_EXIT_IO) => TaskError::Io {
            path: output_dir.display().to_string(),
            reason: format!("child could not write its artifact (exit code {code})"),
        },
        code => TaskError::NonZeroExit { code },
    }
}

/// Drain stdout and wait for exit; returns the status and the first stdout line.
async fn wait_child(
    child: &mut Child,
    stdout: Option<ChildStdout>,
    log: LogConfig,
    run_id: &str,
) -> io::Result<(ExitStatus, Option<String>)> {
    let read = async {
        let mut first = None;
        if let Some(out) = stdout {
            let mut lines = BufReader::new(out).lines();
            while let Some(line) = lines.next_line().await? {
                if first.is_none() {
                    first = Some(line);
                } else {
                    log.forward(run_id, &line);
                }
            }
        }
        Ok::<_, io::Error>(first)
    };

    let (first, status) = tokio::try_join!(read, child.wait())?;
    Ok((status, first))
}

fn resolve(output_dir: &Path, reported: &str) -> PathBuf {
    let reported = Path::new(reported.trim());
    if reported.is_absolute() {
        reported.to_path_buf()
    } else {
        output_dir.join(reported)
    }
}

/// Duration recorded in the artifact; `None` when it cannot be read back.
async fn read_duration(path: &Path, offset: UtcOffset) -> Option<simbatch_model::DurationMs> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            debug!(artifact = %path.display(), "artifact not readable: {e}");
            return None;
        }
    };
    match artifact::parse(path, &content, offset) {
        Ok(record) => Some(record.duration),
        Err(e) => {
            debug!("{e}");
            None
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use simbatch_core::clock::SystemClock;
    use simbatch_model::Category;
    use std::{sync::Arc, time::Duration};

    const FAKE_CHILD: &str = r#"name="PROT_MP_${0}_n${1}_20240101_000000_00.sim"
printf '20240101_000000_00\n20240101_000001_50\n1_500\n0.5' > "$name"
echo "$name"
echo "extra progress line""#;

    fn spec(category: u8, index: u32) -> TaskSpec {
        TaskSpec::new(Strategy::Process, Category::new(category).unwrap(), 1, index)
    }

    fn ctx_in(dir: &Path) -> BuildContext {
        BuildContext::new(dir, Arc::new(SystemClock::utc()))
    }

    fn sh(script: &str) -> ProcessRunner {
        ProcessRunner::new(SubprocessConfig::new("sh").with_leading_args(["-c", script]))
    }

    #[tokio::test]
    async fn child_artifact_is_reported_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx_in(dir.path());

        let task = sh(FAKE_CHILD)
            .launch(&spec(2, 3), &ctx, CancellationToken::new())
            .unwrap();
        assert!(task.run_id().starts_with("process-mp-c2-s1-"));

        let (_, _, fut) = task.into_parts();
        let out = fut.await.unwrap();
        assert_eq!(out.artifact, dir.path().join("PROT_MP_2_n3_20240101_000000_00.sim"));
        assert_eq!(out.duration.map(|d| d.as_millis()), Some(1_500));
    }

    #[tokio::test]
    async fn non_zero_exit_is_a_task_failure() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx_in(dir.path());

        let (_, _, fut) = sh("exit 3")
            .launch(&spec(1, 1), &ctx, CancellationToken::new())
            .unwrap()
            .into_parts();
        assert_eq!(fut.await.unwrap_err(), TaskError::NonZeroExit { code: Some(3) });
    }

    #[tokio::test]
    async fn artifact_write_failure_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx_in(dir.path());

        let (_, _, fut) = sh("exit 1")
            .launch(&spec(1, 1), &ctx, CancellationToken::new())
            .unwrap()
            .into_parts();
        match fut.await.unwrap_err() {
            TaskError::Io { path, reason } => {
                assert_eq!(path, dir.path().display().to_string());
                assert!(reason.contains("exit code 1"), "{reason}");
            }
            other => panic!("expected io failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn silent_child_has_no_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx_in(dir.path());

        let (_, _, fut) = sh("true")
            .launch(&spec(1, 1), &ctx, CancellationToken::new())
            .unwrap()
            .into_parts();
        assert!(matches!(fut.await, Err(TaskError::InvalidResult { .. })));
    }

    #[tokio::test]
    async fn missing_program_fails_launch() {
        let runner = ProcessRunner::new(SubprocessConfig::new("/nonexistent/simbatch-child"));
        let err = runner
            .launch(&spec(1, 1), &BuildContext::default(), CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, RunnerError::Launch { runner: "process", .. }));
    }

    #[tokio::test]
    async fn cancel_kills_child() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx_in(dir.path());
        let cancel = CancellationToken::new();

        let (_, _, fut) = sh("sleep 30")
            .launch(&spec(1, 1), &ctx, cancel.clone())
            .unwrap()
            .into_parts();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let res = tokio::time::timeout(Duration::from_secs(5), fut).await.unwrap();
        assert_eq!(res.unwrap_err(), TaskError::Canceled);
    }

    #[tokio::test]
    async fn seed_is_forwarded_to_child() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx_in(dir.path())
            .with_seed(Some(5));
        let expected = ctx.seed_for(1).unwrap();

        let script = format!(r#"test "${SEED_ENV}" = "{expected}" || exit 9
{FAKE_CHILD}"#);
        let (_, _, fut) = sh(&script)
            .launch(&spec(4, 1), &ctx, CancellationToken::new())
            .unwrap()
            .into_parts();
        assert!(fut.await.is_ok());
    }

    fn env_of(cmd: &Command, key: &str) -> Option<Option<String>> {
        cmd.as_std()
            .get_envs()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.map(|v| v.to_string_lossy().into_owned()))
    }

    #[test]
    fn unset_options_are_cleared_from_child_env() {
        let ctx = BuildContext::default();
        let cmd = sh("true").command(&spec(1, 1), &ctx, &[]);

        assert_eq!(env_of(&cmd, SEED_ENV), Some(None));
        assert_eq!(env_of(&cmd, EXCLUSIVE_ENV), Some(None));
    }

    #[test]
    fn set_options_are_exported_to_child_env() {
        let ctx = BuildContext::default()
            .with_seed(Some(5))
            .with_exclusive_artifacts(true);
        let cmd = sh("true").command(&spec(1, 1), &ctx, &[]);

        assert_eq!(env_of(&cmd, SEED_ENV), Some(ctx.seed_for(1).map(|s| s.to_string())));
        assert_eq!(env_of(&cmd, EXCLUSIVE_ENV), Some(Some("1".to_string())));
    }

    #[test]
    fn rejects_thread_specs() {
        let runner = sh("true");
        let spec = TaskSpec::new(Strategy::Thread, Category::new(1).unwrap(), 1, 1);
        assert!(!runner.supports(&spec));
        assert!(matches!(
            runner.launch(&spec, &BuildContext::default(), CancellationToken::new()),
            Err(RunnerError::UnsupportedStrategy { .. })
        ));
    }
}
