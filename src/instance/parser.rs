//! Reading and writing the instance text format.
//!
//! All indices in the text format are one-based; keywords match
//! case-insensitively. Translation to the model's zero-based indices happens
//! here and nowhere else. Each entity's feasibility is checked against the
//! partially built instance immediately after its line is read, so the first
//! invalid line aborts with a precise diagnostic and no partially valid
//! [`Instance`] is ever returned.

use super::model::{Authorisation, Constraint, Instance};
use crate::error::WspError;
use regex::Regex;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

macro_rules! static_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("static regex"))
        }
    };
}

static_regex!(steps_re, r"(?i)^#steps:\s*(\d+)\s*$");
static_regex!(users_re, r"(?i)^#users:\s*(\d+)\s*$");
static_regex!(count_re, r"(?i)^#constraints:\s*(\d+)\s*$");
static_regex!(auth_section_re, r"(?i)^authorizations:$");
static_regex!(constraint_section_re, r"(?i)^constraints:$");
static_regex!(auth_re, r"(?i)^user\s+(\d+)\s*:((?:\s+\d+)*)\s*$");
static_regex!(sod_re, r"(?i)^sod\s+scope\s+(\d+)\s+(\d+)\s*$");
static_regex!(at_most_re, r"(?i)^at-most\s+(\d+)\s+scope((?:\s+\d+)+)\s*$");
static_regex!(
    sual_re,
    r"(?i)^sual\s+scope((?:\s+\d+)+)\s+limit\s+(\d+)\s+users((?:\s+\d+)+)\s*$"
);
static_regex!(
    wang_li_re,
    r"(?i)^wang-li\s+scope((?:\s+\d+)+)\s+user\s+groups\s+((?:\(\s*\d+(?:\s+\d+)*\s*\)\s*)+)$"
);
static_regex!(group_re, r"\(([\d\s]+)\)");
static_regex!(
    assignment_dependent_re,
    r"(?i)^assignment-dependent\s+scope\s+(\d+)\s+(\d+)\s+users((?:\s+\d+)+)\s+and((?:\s+\d+)+)\s*$"
);

/// Line cursor over the input text, tracking one-based line numbers.
struct Cursor<'a> {
    lines: std::str::Lines<'a>,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            line: 0,
        }
    }

    fn next(&mut self) -> Result<(usize, &'a str), WspError> {
        self.line += 1;
        match self.lines.next() {
            Some(raw) => Ok((self.line, raw.trim())),
            None => Err(WspError::Format {
                line: self.line,
                content: "unexpected end of input".into(),
            }),
        }
    }
}

fn format_error(line: usize, content: &str) -> WspError {
    WspError::Format {
        line,
        content: content.to_string(),
    }
}

fn feasibility_error(line: usize, content: &str, reason: impl Into<String>) -> WspError {
    WspError::Feasibility {
        line,
        content: content.to_string(),
        reason: reason.into(),
    }
}

/// Parses a whitespace-separated list of numbers captured from a line.
fn numbers(text: &str, line: usize, content: &str) -> Result<Vec<usize>, WspError> {
    text.split_whitespace()
        .map(|t| t.parse::<usize>().map_err(|_| format_error(line, content)))
        .collect()
}

/// Translates a one-based index into the zero-based model index.
fn to_zero_based(
    raw: usize,
    max: usize,
    what: &str,
    line: usize,
    content: &str,
) -> Result<usize, WspError> {
    if raw == 0 || raw > max {
        return Err(feasibility_error(
            line,
            content,
            format!("{what} index {raw} out of range 1..={max}"),
        ));
    }
    Ok(raw - 1)
}

fn to_zero_based_all(
    raw: Vec<usize>,
    max: usize,
    what: &str,
    line: usize,
    content: &str,
) -> Result<Vec<usize>, WspError> {
    raw.into_iter()
        .map(|v| to_zero_based(v, max, what, line, content))
        .collect()
}

fn parse_header(cursor: &mut Cursor<'_>, re: &Regex) -> Result<(usize, usize, String), WspError> {
    let (line, content) = cursor.next()?;
    let caps = re.captures(content).ok_or_else(|| format_error(line, content))?;
    let value: usize = caps[1].parse().map_err(|_| format_error(line, content))?;
    Ok((value, line, content.to_string()))
}

fn parse_constraint_line(
    instance: &Instance,
    line: usize,
    content: &str,
) -> Result<Constraint, WspError> {
    let k = instance.k();
    let n = instance.n();
    let keyword = content
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    match keyword.as_str() {
        "sod" => {
            let caps = sod_re()
                .captures(content)
                .ok_or_else(|| format_error(line, content))?;
            let s1_raw: usize = caps[1].parse().map_err(|_| format_error(line, content))?;
            let s2_raw: usize = caps[2].parse().map_err(|_| format_error(line, content))?;
            Ok(Constraint::NotEquals {
                s1: to_zero_based(s1_raw, k, "step", line, content)?,
                s2: to_zero_based(s2_raw, k, "step", line, content)?,
            })
        }
        "at-most" => {
            let caps = at_most_re()
                .captures(content)
                .ok_or_else(|| format_error(line, content))?;
            let limit: usize = caps[1].parse().map_err(|_| format_error(line, content))?;
            let scope = numbers(&caps[2], line, content)?;
            Ok(Constraint::AtMost {
                limit,
                scope: to_zero_based_all(scope, k, "step", line, content)?,
            })
        }
        "sual" => {
            let caps = sual_re()
                .captures(content)
                .ok_or_else(|| format_error(line, content))?;
            let scope = numbers(&caps[1], line, content)?;
            let limit: usize = caps[2].parse().map_err(|_| format_error(line, content))?;
            let user_group = numbers(&caps[3], line, content)?;
            Ok(Constraint::Sual {
                scope: to_zero_based_all(scope, k, "step", line, content)?,
                limit,
                user_group: to_zero_based_all(user_group, n, "user", line, content)?,
            })
        }
        "wang-li" => {
            let caps = wang_li_re()
                .captures(content)
                .ok_or_else(|| format_error(line, content))?;
            let steps = numbers(&caps[1], line, content)?;
            let mut user_groups = Vec::new();
            for group in group_re().captures_iter(&caps[2]) {
                let users = numbers(&group[1], line, content)?;
                user_groups.push(to_zero_based_all(users, n, "user", line, content)?);
            }
            Ok(Constraint::WangLi {
                steps: to_zero_based_all(steps, k, "step", line, content)?,
                user_groups,
            })
        }
        "assignment-dependent" => {
            let caps = assignment_dependent_re()
                .captures(content)
                .ok_or_else(|| format_error(line, content))?;
            let s1_raw: usize = caps[1].parse().map_err(|_| format_error(line, content))?;
            let s2_raw: usize = caps[2].parse().map_err(|_| format_error(line, content))?;
            let u1 = numbers(&caps[3], line, content)?;
            let u2 = numbers(&caps[4], line, content)?;
            Ok(Constraint::AssignmentDependent {
                s1: to_zero_based(s1_raw, k, "step", line, content)?,
                s2: to_zero_based(s2_raw, k, "step", line, content)?,
                u1: to_zero_based_all(u1, n, "user", line, content)?,
                u2: to_zero_based_all(u2, n, "user", line, content)?,
            })
        }
        _ => Err(WspError::UnknownConstraintKind {
            line,
            content: content.to_string(),
        }),
    }
}

impl Instance {
    /// Parses the instance text format.
    pub fn parse(text: &str) -> Result<Self, WspError> {
        let mut cursor = Cursor::new(text);

        let (k, k_line, k_content) = parse_header(&mut cursor, steps_re())?;
        let (n, n_line, n_content) = parse_header(&mut cursor, users_re())?;
        let (constraint_count, _, _) = parse_header(&mut cursor, count_re())?;

        let mut instance = Instance::new(k, n).map_err(|reason| {
            // Whichever header declared the zero count is the offending line.
            if k == 0 {
                feasibility_error(k_line, &k_content, reason)
            } else {
                feasibility_error(n_line, &n_content, reason)
            }
        })?;

        let (line, content) = cursor.next()?;
        if !auth_section_re().is_match(content) {
            return Err(format_error(line, content));
        }

        for _ in 0..n {
            let (line, content) = cursor.next()?;
            let caps = auth_re()
                .captures(content)
                .ok_or_else(|| format_error(line, content))?;
            let user_raw: usize = caps[1].parse().map_err(|_| format_error(line, content))?;
            let user = to_zero_based(user_raw, n, "user", line, content)?;
            let steps = to_zero_based_all(numbers(&caps[2], line, content)?, k, "step", line, content)?;
            let authorisation = Authorisation::from_steps(user, &steps, k)
                .map_err(|reason| feasibility_error(line, content, reason))?;
            instance
                .push_authorisation(authorisation)
                .map_err(|reason| feasibility_error(line, content, reason))?;
        }

        let (line, content) = cursor.next()?;
        if !constraint_section_re().is_match(content) {
            return Err(format_error(line, content));
        }

        for _ in 0..constraint_count {
            let (line, content) = cursor.next()?;
            let constraint = parse_constraint_line(&instance, line, content)?;
            instance
                .push_constraint(constraint)
                .map_err(|reason| feasibility_error(line, content, reason))?;
        }

        debug!(
            k = instance.k(),
            n = instance.n(),
            constraints = instance.constraints().len(),
            "parsed instance"
        );
        Ok(instance)
    }

    /// Renders this instance in the text format; the exact inverse of
    /// [`Instance::parse`].
    pub fn to_text(&self) -> String {
        fn one_based(indices: &[usize]) -> String {
            indices
                .iter()
                .map(|i| (i + 1).to_string())
                .collect::<Vec<_>>()
                .join(" ")
        }

        let mut out = String::new();
        let _ = writeln!(out, "#Steps: {}", self.k());
        let _ = writeln!(out, "#Users: {}", self.n());
        let _ = writeln!(out, "#Constraints: {}", self.constraints().len());
        out.push_str("Authorizations:\n");
        for authorisation in self.authorisations() {
            let steps: Vec<usize> = authorisation.authorised_steps().collect();
            if steps.is_empty() {
                let _ = writeln!(out, "User {}:", authorisation.user() + 1);
            } else {
                let _ = writeln!(
                    out,
                    "User {}: {}",
                    authorisation.user() + 1,
                    one_based(&steps)
                );
            }
        }
        out.push_str("Constraints:\n");
        for constraint in self.constraints() {
            match constraint {
                Constraint::NotEquals { s1, s2 } => {
                    let _ = writeln!(out, "SoD scope {} {}", s1 + 1, s2 + 1);
                }
                Constraint::AtMost { limit, scope } => {
                    let _ = writeln!(out, "At-most {} scope {}", limit, one_based(scope));
                }
                Constraint::Sual {
                    scope,
                    limit,
                    user_group,
                } => {
                    let _ = writeln!(
                        out,
                        "SUAL scope {} limit {} users {}",
                        one_based(scope),
                        limit,
                        one_based(user_group)
                    );
                }
                Constraint::WangLi { steps, user_groups } => {
                    let groups = user_groups
                        .iter()
                        .map(|g| format!("({})", one_based(g)))
                        .collect::<Vec<_>>()
                        .join(" ");
                    let _ = writeln!(
                        out,
                        "Wang-Li scope {} user groups {}",
                        one_based(steps),
                        groups
                    );
                }
                Constraint::AssignmentDependent { s1, s2, u1, u2 } => {
                    let _ = writeln!(
                        out,
                        "Assignment-dependent scope {} {} users {} and {}",
                        s1 + 1,
                        s2 + 1,
                        one_based(u1),
                        one_based(u2)
                    );
                }
            }
        }
        out
    }

    /// Reads and parses an instance file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WspError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Writes this instance to a file in the text format.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), WspError> {
        std::fs::write(path, self.to_text())?;
        Ok(())
    }
}
