//! Line-based prompts for the interactive builder.

use std::io::{BufRead, Write};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

/// Reads answers from `input` and writes prompts to `output`.
pub(crate) struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<std::io::StdinLock<'static>, std::io::Stdout> {
    pub(crate) fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self) -> Result<String, CliError> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(CliError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    fn hint(&mut self, message: &str) -> Result<(), CliError> {
        writeln!(
            self.output,
            "    {}",
            message.if_supports_color(Stdout, |t| t.yellow())
        )?;
        Ok(())
    }

    /// Ask for free text.
    ///
    /// An empty answer takes `default`; with no default it is `None`, or is
    /// asked again when `required`. Non-empty answers must pass `validate`.
    pub(crate) fn text(
        &mut self,
        label: &str,
        default: Option<&str>,
        required: bool,
        validate: &dyn Fn(&str) -> bool,
    ) -> Result<Option<String>, CliError> {
        loop {
            match default {
                Some(def) => write!(self.output, "  {} [{}]: ", label, def)?,
                None => write!(self.output, "  {}: ", label)?,
            }
            let answer = self.read_answer()?;

            if answer.is_empty() {
                if let Some(def) = default {
                    return Ok(Some(def.to_string()));
                }
                if required {
                    self.hint("This field is required.")?;
                    continue;
                }
                return Ok(None);
            }
            if !validate(&answer) {
                self.hint("Invalid value.")?;
                continue;
            }
            return Ok(Some(answer));
        }
    }

    /// Ask for a required value with no validation beyond being non-empty.
    pub(crate) fn required(&mut self, label: &str, default: Option<&str>) -> Result<String, CliError> {
        loop {
            if let Some(answer) = self.text(label, default, true, &|_| true)? {
                return Ok(answer);
            }
        }
    }

    /// Pick one of `choices` by number. An empty answer takes `default`.
    pub(crate) fn choose<S: AsRef<str>>(
        &mut self,
        label: &str,
        choices: &[S],
        default: Option<usize>,
    ) -> Result<usize, CliError> {
        loop {
            match self.choose_inner(label, choices, default, false)? {
                Some(i) => return Ok(i),
                None => self.hint("Pick one of the listed numbers.")?,
            }
        }
    }

    /// Like [`choose`](Self::choose), with an extra `0) None` choice.
    pub(crate) fn choose_optional<S: AsRef<str>>(
        &mut self,
        label: &str,
        choices: &[S],
        default: Option<usize>,
    ) -> Result<Option<usize>, CliError> {
        self.choose_inner(label, choices, default, true)
    }

    fn choose_inner<S: AsRef<str>>(
        &mut self,
        label: &str,
        choices: &[S],
        default: Option<usize>,
        allow_none: bool,
    ) -> Result<Option<usize>, CliError> {
        writeln!(self.output, "  {}", label.if_supports_color(Stdout, |t| t.bold()))?;
        if allow_none {
            writeln!(self.output, "    0) None")?;
        }
        for (i, choice) in choices.iter().enumerate() {
            writeln!(self.output, "    {}) {}", i + 1, choice.as_ref())?;
        }

        loop {
            let shown = match default {
                Some(i) => (i + 1).to_string(),
                None if allow_none => "0".to_string(),
                None => String::new(),
            };
            if shown.is_empty() {
                write!(self.output, "  > ")?;
            } else {
                write!(self.output, "  [{}] > ", shown)?;
            }

            let answer = self.read_answer()?;
            if answer.is_empty() {
                if default.is_some() || allow_none {
                    return Ok(default);
                }
                if choices.is_empty() {
                    return Ok(None);
                }
                self.hint("Pick one of the listed numbers.")?;
                continue;
            }
            match answer.parse::<usize>() {
                Ok(0) if allow_none => return Ok(None),
                Ok(n) if n >= 1 && n <= choices.len() => return Ok(Some(n - 1)),
                _ => self.hint("Pick one of the listed numbers.")?,
            }
        }
    }

    /// Yes/no question.
    pub(crate) fn confirm(&mut self, label: &str, default: bool) -> Result<bool, CliError> {
        let options = if default { "Y/n" } else { "y/N" };
        loop {
            write!(self.output, "  {} [{}] ", label, options)?;
            let answer = self.read_answer()?.to_ascii_lowercase();
            match answer.as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.hint("Answer y or n.")?,
            }
        }
    }
}

/// Absolute URL with a scheme, a host and a path.
pub(crate) fn is_valid_url(s: &str) -> bool {
    let Some((scheme, rest)) = s.split_once("://") else {
        return false;
    };
    if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)) {
        return false;
    }
    match rest.split_once('/') {
        Some((host, _)) => !host.is_empty() && !host.contains(char::is_whitespace),
        None => false,
    }
}

#[cfg(test)]
#[path = "tests/prompt_tests.rs"]
mod tests;
