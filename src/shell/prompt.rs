//! Line-oriented prompting
//!
//! Every `ask*` method returns `Ok(None)` once input is exhausted.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::error::Result;

/// Reads answers from `input` after writing prompts to `output`
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Write a full line
    pub fn say(&mut self, message: impl Display) -> Result<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    /// Prompt and return the answer without its line ending
    pub fn ask_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Prompt until the answer parses as `T`
    pub fn ask<T: FromStr>(&mut self, prompt: &str) -> Result<Option<T>> {
        loop {
            let Some(answer) = self.ask_line(prompt)? else {
                return Ok(None);
            };
            match answer.trim().parse() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => self.say("Invalid input, try again.")?,
            }
        }
    }

    /// Prompt until the answer is yes (`y`, `yes`, `1`) or no (`n`, `no`, `0`)
    pub fn confirm(&mut self, prompt: &str) -> Result<Option<bool>> {
        loop {
            let Some(answer) = self.ask_line(prompt)? else {
                return Ok(None);
            };
            match answer.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" | "1" => return Ok(Some(true)),
                "n" | "no" | "0" => return Ok(Some(false)),
                _ => self.say("Please answer y or n.")?,
            }
        }
    }

    /// Give back the output sink (for inspecting captured output)
    pub fn into_output(self) -> W {
        self.output
    }
}
