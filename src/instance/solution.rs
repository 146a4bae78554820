//! Solve results and their text format.

use crate::error::WspError;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of one solve attempt.
///
/// `assignment` maps each step to its assigned user (zero-based); it is
/// absent when no satisfying assignment exists. `time` is diagnostic only
/// and takes no part in correctness. Produced fresh per solve attempt and
/// owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution {
    /// Step-to-user assignment, absent when unsatisfiable.
    pub assignment: Option<Vec<usize>>,
    /// Wall-clock solve time.
    pub time: Duration,
}

fn step_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^step\s+(\d+)\s*->\s*user\s+(\d+)\s*$").expect("static regex")
    })
}

impl Solution {
    /// A satisfiable result.
    pub fn sat(assignment: Vec<usize>, time: Duration) -> Self {
        Self {
            assignment: Some(assignment),
            time,
        }
    }

    /// An unsatisfiable result.
    pub fn unsat(time: Duration) -> Self {
        Self {
            assignment: None,
            time,
        }
    }

    /// Whether a satisfying assignment was found.
    pub fn is_sat(&self) -> bool {
        self.assignment.is_some()
    }

    /// Renders the solution text format: `sat`/`unsat`, the solve time in
    /// seconds, then one `Step <i> -> User <j>` line per step (one-based).
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        match &self.assignment {
            Some(assignment) => {
                out.push_str("sat\n");
                out.push_str(&format!("{}\n", self.time.as_secs_f64()));
                for (s, &u) in assignment.iter().enumerate() {
                    out.push_str(&format!("Step {} -> User {}\n", s + 1, u + 1));
                }
            }
            None => {
                out.push_str("unsat\n");
                out.push_str(&format!("{}\n", self.time.as_secs_f64()));
            }
        }
        out
    }

    /// Parses the solution text format back into a [`Solution`].
    pub fn from_text(text: &str) -> Result<Self, WspError> {
        let mut lines = text.lines().enumerate();

        let (line, verdict) = lines
            .next()
            .ok_or_else(|| WspError::Format {
                line: 1,
                content: String::new(),
            })
            .map(|(i, l)| (i + 1, l.trim()))?;
        let is_sat = match verdict.to_ascii_lowercase().as_str() {
            "sat" => true,
            "unsat" => false,
            _ => {
                return Err(WspError::Format {
                    line,
                    content: verdict.to_string(),
                })
            }
        };

        let (time_line, time_text) = lines
            .next()
            .ok_or(WspError::Format {
                line: line + 1,
                content: String::new(),
            })
            .map(|(i, l)| (i + 1, l.trim()))?;
        let seconds: f64 = time_text.parse().map_err(|_| WspError::Format {
            line: time_line,
            content: time_text.to_string(),
        })?;
        // Negative, non-finite, and overflowing times are all unrepresentable.
        let time = Duration::try_from_secs_f64(seconds).map_err(|_| WspError::Format {
            line: time_line,
            content: time_text.to_string(),
        })?;

        if !is_sat {
            return Ok(Solution::unsat(time));
        }

        let mut assignment = Vec::new();
        for (i, raw) in lines {
            let line = i + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            let caps = step_re().captures(trimmed).ok_or(WspError::Format {
                line,
                content: trimmed.to_string(),
            })?;
            let step: usize = caps[1].parse().map_err(|_| WspError::Format {
                line,
                content: trimmed.to_string(),
            })?;
            let user: usize = caps[2].parse().map_err(|_| WspError::Format {
                line,
                content: trimmed.to_string(),
            })?;
            if step != assignment.len() + 1 || user == 0 {
                return Err(WspError::Format {
                    line,
                    content: trimmed.to_string(),
                });
            }
            assignment.push(user - 1);
        }

        Ok(Solution::sat(assignment, time))
    }

    /// Writes the text format to a file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), WspError> {
        std::fs::write(path, self.to_text())?;
        Ok(())
    }

    /// Reads the text format from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WspError> {
        Self::from_text(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sat_round_trip() {
        let solution = Solution::sat(vec![1, 0, 2], Duration::from_millis(250));
        let text = solution.to_text();
        assert!(text.starts_with("sat\n"));
        assert!(text.contains("Step 1 -> User 2"));
        assert!(text.contains("Step 3 -> User 3"));

        let parsed = Solution::from_text(&text).unwrap();
        assert_eq!(parsed.assignment, Some(vec![1, 0, 2]));
        assert_eq!(parsed.time, solution.time);
    }

    #[test]
    fn test_unsat_round_trip() {
        let solution = Solution::unsat(Duration::from_secs(2));
        let text = solution.to_text();
        assert!(text.starts_with("unsat\n"));

        let parsed = Solution::from_text(&text).unwrap();
        assert!(!parsed.is_sat());
        assert_eq!(parsed.time, Duration::from_secs(2));
    }

    #[test]
    fn test_bad_verdict_line() {
        let err = Solution::from_text("maybe\n0.5\n").unwrap_err();
        assert!(matches!(err, WspError::Format { line: 1, .. }));
    }

    #[test]
    fn test_bad_time_line() {
        let err = Solution::from_text("sat\nquick\n").unwrap_err();
        assert!(matches!(err, WspError::Format { line: 2, .. }));
    }

    #[test]
    fn test_unrepresentable_time_rejected() {
        // u64::MAX as f64 rounds up to 2^64, so a plain magnitude guard lets
        // this value through into a Duration panic.
        for text in [
            "unsat\n18446744073709551615\n",
            "unsat\ninf\n",
            "unsat\nnan\n",
            "sat\n-1\n",
        ] {
            let err = Solution::from_text(text).unwrap_err();
            assert!(matches!(err, WspError::Format { line: 2, .. }), "{text:?}");
        }
    }

    #[test]
    fn test_out_of_order_steps_rejected() {
        let err = Solution::from_text("sat\n0.1\nStep 2 -> User 1\n").unwrap_err();
        assert!(matches!(err, WspError::Format { line: 3, .. }));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solution.txt");
        let solution = Solution::sat(vec![0, 1], Duration::from_millis(10));
        solution.to_file(&path).unwrap();
        assert_eq!(Solution::from_file(&path).unwrap(), solution);
    }
}
