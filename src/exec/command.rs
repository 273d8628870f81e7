// ABOUTME: Structured command lines and their captured results.
// ABOUTME: Arguments stay a list until a remote runner quotes them into one shell line.

use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Arg {
    value: String,
    /// Shown instead of `value` in logs and dry-run output.
    redacted: Option<String>,
}

/// A program plus its argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<Arg>,
    stream: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stream: false,
        }
    }

    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(Arg {
            value: value.into(),
            redacted: None,
        });
        self
    }

    pub fn args<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self = self.arg(value);
        }
        self
    }

    /// Add an argument whose real value must never be printed.
    pub fn redacted_arg(mut self, value: impl Into<String>, shown: impl Into<String>) -> Self {
        self.args.push(Arg {
            value: value.into(),
            redacted: Some(shown.into()),
        });
        self
    }

    /// Let the command write straight to the terminal instead of capturing output.
    pub fn streaming(mut self) -> Self {
        self.stream = true;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arg_values(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|a| a.value.as_str())
    }

    pub fn is_streaming(&self) -> bool {
        self.stream
    }

    /// Full shell line with every word quoted, for transmission to a remote shell.
    pub fn render(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.arg_values())
            .map(quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Quoted line with redacted arguments masked.
impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            let shown = arg.redacted.as_deref().unwrap_or(&arg.value);
            write!(f, " {}", quote(shown))?;
        }
        Ok(())
    }
}

/// Quote one word for a POSIX shell.
///
/// Words made only of characters the shell never interprets are passed
/// through; everything else is wrapped in single quotes with embedded single
/// quotes closed, escaped and reopened.
pub fn quote(word: &str) -> Cow<'_, str> {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c));

    if safe {
        Cow::Borrowed(word)
    } else {
        Cow::Owned(format!("'{}'", word.replace('\'', "'\\''")))
    }
}

/// Output from a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `-1` when the process was killed by a signal.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Short reason for a failed command: its stderr, or the exit code when silent.
    pub fn failure_detail(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            format!("exited with code {}", self.exit_code)
        } else {
            stderr.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_words_are_not_quoted() {
        assert_eq!(quote("linux/amd64"), "linux/amd64");
        assert_eq!(quote("8080:8080"), "8080:8080");
    }

    #[test]
    fn metacharacters_are_single_quoted() {
        assert_eq!(quote("a b"), "'a b'");
        assert_eq!(quote("$(reboot)"), "'$(reboot)'");
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn embedded_single_quote_is_escaped() {
        assert_eq!(quote("it's"), "'it'\\''s'");
    }

    #[test]
    fn render_quotes_every_word() {
        let cmd = CommandSpec::new("docker")
            .arg("run")
            .arg("-e")
            .arg("KEY=va lue;rm -rf /");
        assert_eq!(cmd.render(), "docker run -e 'KEY=va lue;rm -rf /'");
    }

    #[test]
    fn display_masks_redacted_arguments() {
        let cmd = CommandSpec::new("docker")
            .arg("-e")
            .redacted_arg("JWT_SECRET_KEY=xyz789", "JWT_SECRET_KEY=***");
        assert_eq!(cmd.to_string(), "docker -e 'JWT_SECRET_KEY=***'");
        assert!(cmd.render().contains("xyz789"));
    }

    #[test]
    fn failure_detail_prefers_stderr() {
        let output = CommandOutput {
            exit_code: 1,
            stdout: String::new(),
            stderr: "no such container\n".to_string(),
        };
        assert_eq!(output.failure_detail(), "no such container");

        let silent = CommandOutput {
            exit_code: 125,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(silent.failure_detail(), "exited with code 125");
    }
}
