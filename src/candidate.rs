//! Black-box candidate solver runner.
//!
//! Invokes an external solver binary as `<binary> <instance-path>` under a
//! wall-clock timeout and classifies the run from its exit status and a
//! marker substring in its standard output. The process's side effects are
//! never interpreted as model state; a timeout or abnormal exit means "no
//! answer within budget", which is distinct from a confirmed unsat.

use crate::error::WspError;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Marker substring that candidate binaries print when they find a
/// satisfying assignment.
pub const SOLUTION_MARKER: &str = "Found a solution";

/// Verdict of one candidate run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateVerdict {
    /// The marker appeared in standard output.
    Sat,
    /// The process finished cleanly without printing the marker.
    Unsat,
    /// Timeout or abnormal exit: no answer within budget.
    NoAnswer,
}

/// Result of one candidate run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateReport {
    /// How the run was classified.
    pub verdict: CandidateVerdict,
    /// Wall-clock time from spawn to exit (or kill).
    pub elapsed: Duration,
}

/// An external candidate solver binary.
///
/// # Examples
///
/// ```no_run
/// use wsp_kit::candidate::CandidateSolver;
/// use std::time::Duration;
///
/// let solver = CandidateSolver::new("./target/release/wsp-candidate")
///     .with_time_limit(Duration::from_secs(180));
/// let report = solver.run("workloads/instance1.txt").unwrap();
/// println!("{:?} in {:?}", report.verdict, report.elapsed);
/// ```
#[derive(Debug, Clone)]
pub struct CandidateSolver {
    binary: PathBuf,
    marker: String,
    time_limit: Duration,
}

impl CandidateSolver {
    /// Creates a runner for the given binary with the default marker and a
    /// 180 second budget.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            marker: SOLUTION_MARKER.to_string(),
            time_limit: Duration::from_secs(180),
        }
    }

    /// Sets the marker substring that signals a found solution.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    /// Runs the binary on one instance file.
    pub fn run(&self, instance_path: impl AsRef<Path>) -> Result<CandidateReport, WspError> {
        let start = Instant::now();
        let mut child = Command::new(&self.binary)
            .arg(instance_path.as_ref())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .stdin(Stdio::null())
            .spawn()?;

        // Drain stdout on a thread so a chatty child never blocks on a full
        // pipe while we wait for it.
        let mut stdout_pipe = child.stdout.take().expect("stdout was piped");
        let reader = thread::spawn(move || {
            let mut output = String::new();
            let _ = stdout_pipe.read_to_string(&mut output);
            output
        });

        let status = match self.wait_with_deadline(&mut child, start)? {
            Some(status) => status,
            None => {
                // Deadline passed: kill and classify as no answer. The
                // reader thread is left to drain on its own; a grandchild
                // holding the pipe open must not stall this call.
                let _ = child.kill();
                let _ = child.wait();
                drop(reader);
                let elapsed = start.elapsed();
                debug!(binary = %self.binary.display(), ?elapsed, "candidate timed out");
                return Ok(CandidateReport {
                    verdict: CandidateVerdict::NoAnswer,
                    elapsed,
                });
            }
        };
        let elapsed = start.elapsed();
        let output = reader.join().unwrap_or_default();

        let verdict = if !status.success() {
            CandidateVerdict::NoAnswer
        } else if output.contains(&self.marker) {
            CandidateVerdict::Sat
        } else {
            CandidateVerdict::Unsat
        };
        debug!(binary = %self.binary.display(), ?verdict, ?elapsed, "candidate finished");
        Ok(CandidateReport { verdict, elapsed })
    }

    fn wait_with_deadline(
        &self,
        child: &mut Child,
        start: Instant,
    ) -> Result<Option<std::process::ExitStatus>, WspError> {
        let deadline = start + self.time_limit;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            thread::sleep(Duration::from_millis(5));
        }
    }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut permissions = std::fs::metadata(&path).unwrap().permissions();
        permissions.set_mode(0o755);
        std::fs::set_permissions(&path, permissions).unwrap();
        path
    }

    #[test]
    fn test_marker_means_sat() {
        let dir = tempfile::tempdir().unwrap();
        let binary = script(dir.path(), "sat.sh", "echo 'Found a solution'");
        let report = CandidateSolver::new(binary).run("ignored.txt").unwrap();
        assert_eq!(report.verdict, CandidateVerdict::Sat);
    }

    #[test]
    fn test_clean_exit_without_marker_means_unsat() {
        let dir = tempfile::tempdir().unwrap();
        let binary = script(dir.path(), "unsat.sh", "echo 'No plans worked'");
        let report = CandidateSolver::new(binary).run("ignored.txt").unwrap();
        assert_eq!(report.verdict, CandidateVerdict::Unsat);
    }

    #[test]
    fn test_nonzero_exit_means_no_answer() {
        let dir = tempfile::tempdir().unwrap();
        // A failing run that still prints the marker must not count as sat.
        let binary = script(dir.path(), "crash.sh", "echo 'Found a solution'; exit 3");
        let report = CandidateSolver::new(binary).run("ignored.txt").unwrap();
        assert_eq!(report.verdict, CandidateVerdict::NoAnswer);
    }

    #[test]
    fn test_timeout_means_no_answer() {
        let dir = tempfile::tempdir().unwrap();
        let binary = script(dir.path(), "slow.sh", "sleep 30");
        let report = CandidateSolver::new(binary)
            .with_time_limit(Duration::from_millis(50))
            .run("ignored.txt")
            .unwrap();
        assert_eq!(report.verdict, CandidateVerdict::NoAnswer);
        assert!(report.elapsed < Duration::from_secs(5));
    }

    #[test]
    fn test_missing_binary_is_io_error() {
        let result = CandidateSolver::new("/nonexistent/solver").run("ignored.txt");
        assert!(matches!(result, Err(WspError::Io(_))));
    }

    #[test]
    fn test_custom_marker() {
        let dir = tempfile::tempdir().unwrap();
        let binary = script(dir.path(), "custom.sh", "echo 'SATISFIABLE'");
        let report = CandidateSolver::new(binary)
            .with_marker("SATISFIABLE")
            .run("ignored.txt")
            .unwrap();
        assert_eq!(report.verdict, CandidateVerdict::Sat);
    }
}
