//! Command-line assembly for external AFNI tools.
//!
//! This module provides a builder pattern for constructing the ordered
//! token groups that make up one tool invocation. A group is either a
//! literal flag, a flag+value pair, or a repeated block (one entry per
//! stimulus or contrast); groups carry an optional ordering position.
//!
//! Ordering rules: groups with a positive position are emitted first in
//! ascending position order, groups without a position follow in the order
//! they were added, and groups with a negative position are anchored from
//! the end of the final line (-1 last, -2 second-to-last) once everything
//! else is in place.

use std::fmt;

/// One token group of a command line.
///
/// `tokens` is the flat argv form handed to a process launcher; `lines` is
/// the rendered script form (with quoting) used by the `Display` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgGroup {
    position: Option<i32>,
    tokens: Vec<String>,
    lines: Vec<String>,
}

impl ArgGroup {
    /// Creates a group appended in declaration order.
    #[must_use]
    pub fn new(tokens: Vec<String>, lines: Vec<String>) -> Self {
        Self {
            position: None,
            tokens,
            lines,
        }
    }

    /// Anchors the group at an explicit position (negative counts from the end).
    #[must_use]
    pub fn at(mut self, position: i32) -> Self {
        self.position = Some(position);
        self
    }
}

/// Single-quotes a token unconditionally for the rendered script form.
#[must_use]
pub fn quote(token: &str) -> String {
    format!("'{}'", token.replace('\'', r"'\''"))
}

/// Quotes a token for the rendered script form when it contains characters
/// the shell would split or interpret.
#[must_use]
pub fn shell_quote(token: &str) -> String {
    let needs_quoting = token.is_empty()
        || token
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || "_-./=%,+:".contains(c)));
    if needs_quoting {
        quote(token)
    } else {
        token.to_string()
    }
}

/// Builder for one external tool invocation.
pub struct CommandBuilder {
    program: String,
    groups: Vec<ArgGroup>,
}

impl CommandBuilder {
    /// Creates a builder for the given program name.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            groups: Vec::new(),
        }
    }

    /// Adds a literal flag with no value, appended in declaration order.
    #[must_use]
    pub fn flag(self, flag: &str) -> Self {
        self.group(ArgGroup::new(vec![flag.to_string()], vec![flag.to_string()]))
    }

    /// Adds a literal flag anchored at `position`.
    #[must_use]
    pub fn flag_at(self, position: i32, flag: &str) -> Self {
        self.group(ArgGroup::new(vec![flag.to_string()], vec![flag.to_string()]).at(position))
    }

    /// Adds a flag with a single value, appended in declaration order.
    #[must_use]
    pub fn arg(self, flag: &str, value: impl fmt::Display) -> Self {
        let value = value.to_string();
        let line = format!("{flag} {}", shell_quote(&value));
        self.group(ArgGroup::new(vec![flag.to_string(), value], vec![line]))
    }

    /// Adds a flag with a single value anchored at `position`.
    #[must_use]
    pub fn arg_at(self, position: i32, flag: &str, value: impl fmt::Display) -> Self {
        let value = value.to_string();
        let line = format!("{flag} {}", shell_quote(&value));
        self.group(ArgGroup::new(vec![flag.to_string(), value], vec![line]).at(position))
    }

    /// Adds a pre-assembled group (repeated blocks build their own tokens).
    #[must_use]
    pub fn group(mut self, group: ArgGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Resolves group ordering and produces the immutable command line.
    #[must_use]
    pub fn build(self) -> CommandLine {
        let mut front: Vec<ArgGroup> = Vec::new();
        let mut unpositioned: Vec<ArgGroup> = Vec::new();
        let mut tail: Vec<ArgGroup> = Vec::new();

        for group in self.groups {
            match group.position {
                Some(p) if p >= 0 => front.push(group),
                Some(_) => tail.push(group),
                None => unpositioned.push(group),
            }
        }

        // Stable sorts keep declaration order among equal positions.
        front.sort_by_key(|g| g.position);
        tail.sort_by_key(|g| g.position);

        let mut groups = front;
        groups.extend(unpositioned);

        // Negative positions index from the end of the finished list, so the
        // target length includes the anchored groups themselves.
        let final_len = groups.len() + tail.len();
        for group in tail {
            let pos = group.position.unwrap_or(-1);
            let index = (final_len as i32 + pos).clamp(0, groups.len() as i32) as usize;
            groups.insert(index, group);
        }

        let cmd = CommandLine {
            program: self.program,
            groups,
        };
        log::debug!("assembled command line: {}", cmd.to_single_line());
        cmd
    }
}

/// An assembled command line: program name plus position-resolved groups.
///
/// Immutable after construction; consumed by a `crate::runner::CommandRunner`
/// or rendered for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    groups: Vec<ArgGroup>,
}

impl CommandLine {
    /// The external program to invoke.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Flat argv token list (without the program name).
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        self.groups.iter().flat_map(|g| g.tokens.clone()).collect()
    }

    /// Single-line rendering, useful for logs.
    #[must_use]
    pub fn to_single_line(&self) -> String {
        let mut out = self.program.clone();
        for line in self.groups.iter().flat_map(|g| &g.lines) {
            out.push(' ');
            out.push_str(line);
        }
        out
    }
}

impl fmt::Display for CommandLine {
    /// Script rendering with ` \` line continuations, one group line each.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for line in self.groups.iter().flat_map(|g| &g.lines) {
            write!(f, " \\\n  {line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpositioned_groups_keep_declaration_order() {
        let cmd = CommandBuilder::new("tool")
            .flag("-a")
            .flag("-b")
            .arg("-c", 3)
            .build();
        assert_eq!(cmd.args(), vec!["-a", "-b", "-c", "3"]);
    }

    #[test]
    fn test_positive_positions_sort_ahead_of_unpositioned() {
        let cmd = CommandBuilder::new("tool")
            .flag("-late")
            .flag_at(2, "-second")
            .flag_at(1, "-first")
            .build();
        assert_eq!(cmd.args(), vec!["-first", "-second", "-late"]);
    }

    #[test]
    fn test_negative_positions_anchor_from_the_end() {
        let cmd = CommandBuilder::new("tool")
            .flag_at(-1, "-last")
            .flag("-x")
            .flag_at(-2, "-penultimate")
            .flag("-y")
            .build();
        assert_eq!(cmd.args(), vec!["-x", "-y", "-penultimate", "-last"]);
    }

    #[test]
    fn test_display_uses_line_continuations() {
        let cmd = CommandBuilder::new("tool").flag("-a").arg("-b", "v").build();
        assert_eq!(cmd.to_string(), "tool \\\n  -a \\\n  -b v");
    }

    #[test]
    fn test_values_with_spaces_are_quoted_in_rendering_only() {
        let cmd = CommandBuilder::new("tool").arg("-input", "a.nii b.nii").build();
        assert_eq!(cmd.args(), vec!["-input", "a.nii b.nii"]);
        assert_eq!(cmd.to_single_line(), "tool -input 'a.nii b.nii'");
    }

    #[test]
    fn test_build_is_deterministic() {
        let build = || {
            CommandBuilder::new("tool")
                .flag_at(1, "-a")
                .flag("-b")
                .flag_at(-1, "-z")
                .build()
                .to_string()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("plain.nii.gz"), "plain.nii.gz");
        assert_eq!(shell_quote("SYM: a-b"), "'SYM: a-b'");
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("don't"), r"'don'\''t'");
    }
}
