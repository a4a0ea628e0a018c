//! Interactive yes/no and free-text prompts.
//!
//! Answers come from a [`LineSource`] so the terminal can be swapped for a
//! scripted sequence of responses. A confirmation keeps asking until it gets
//! a recognizable answer; there is no attempt cap.

use crate::error::{Error, Result};
use console::Term;
use dialoguer::Input;
use std::collections::VecDeque;
use std::io::{BufRead, IsTerminal, Write};
use tracing::debug;

/// Source of answer lines
pub trait LineSource {
    /// Show `prompt` and read one line. `None` means input is closed.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Reads answers from the controlling terminal.
///
/// When stdin or stderr is not a terminal, answers are read line by line
/// from stdin instead, so piped answers work.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl LineSource for TerminalInput {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        if !std::io::stdin().is_terminal() || !Term::stderr().is_term() {
            debug!("Not attached to a terminal, reading answers from stdin");
            return StreamInput::new(std::io::stdin().lock(), std::io::stderr()).read_line(prompt);
        }

        let line: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(Some(line))
    }
}

/// Reads answers from any buffered reader, echoing prompts to `out`
#[derive(Debug)]
pub struct StreamInput<R, W> {
    reader: R,
    out: W,
}

impl<R: BufRead, W: Write> StreamInput<R, W> {
    pub fn new(reader: R, out: W) -> Self {
        Self { reader, out }
    }
}

impl<R: BufRead, W: Write> LineSource for StreamInput<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{}: ", prompt)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Pre-recorded answers, consumed in order
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }

    /// Every prompt shown so far
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}

/// Interpret a yes/no answer. Anything unrecognized is `None`.
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// State of a confirm-or-repeat exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmState {
    Asking { attempt: u32 },
    Answered(bool),
}

/// Asks questions over a line source
#[derive(Debug)]
pub struct Prompter<L> {
    source: L,
}

impl<L: LineSource> Prompter<L> {
    pub fn new(source: L) -> Self {
        Self { source }
    }

    /// The underlying line source
    pub fn source(&self) -> &L {
        &self.source
    }

    /// Ask a yes/no question until a valid answer arrives
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let prompt = format!("{} (y/n)", question);
        let mut state = ConfirmState::Asking { attempt: 1 };

        loop {
            state = match state {
                ConfirmState::Answered(answer) => return Ok(answer),
                ConfirmState::Asking { attempt } => {
                    let line = self
                        .source
                        .read_line(&prompt)?
                        .ok_or_else(|| Error::input_closed(question))?;

                    match parse_yes_no(&line) {
                        Some(answer) => ConfirmState::Answered(answer),
                        None => {
                            debug!("Unrecognized answer {:?} (attempt {})", line, attempt);
                            ConfirmState::Asking {
                                attempt: attempt + 1,
                            }
                        }
                    }
                }
            };
        }
    }

    /// Ask for a non-blank line, repeating on blank input
    pub fn ask_text(&mut self, prompt: &str) -> Result<String> {
        loop {
            let line = self
                .source
                .read_line(prompt)?
                .ok_or_else(|| Error::input_closed(prompt))?;

            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(trimmed.to_string());
            }
        }
    }
}
