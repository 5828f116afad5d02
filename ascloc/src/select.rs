//! Numbered console menus and yes/no confirmation.

use std::io::{BufRead, Write};

use crate::error::Error;

/// User interaction needed by the pipeline.
pub trait Prompt {
    /// Shows `labels` as a 1-based list and returns the chosen number, or
    /// `None` when the user cancels.
    fn choose(&mut self, title: &str, labels: &[String]) -> Result<Option<usize>, Error>;

    /// Asks a yes/no question. `default` is used for an empty answer; `None`
    /// requires an explicit answer.
    fn confirm(&mut self, question: &str, default: Option<bool>) -> Result<bool, Error>;

    /// Shows a line of progress to the user.
    fn notify(&mut self, message: &str) -> Result<(), Error>;
}

/// [`Prompt`] over any line-based input and output, usually stdin/stdout.
///
/// Invalid choices re-prompt until a valid number is entered. `q` or end of
/// input cancels a menu; end of input answers "no" to a question.
pub struct Selector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Selector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Selector { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_answer(&mut self) -> Result<Option<String>, Error> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> Prompt for Selector<R, W> {
    fn choose(&mut self, title: &str, labels: &[String]) -> Result<Option<usize>, Error> {
        if labels.is_empty() {
            writeln!(self.output, "{}: nothing to choose from", title)?;
            return Ok(None);
        }

        writeln!(self.output, "{}", title)?;
        for (i, label) in labels.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, label)?;
        }

        loop {
            write!(self.output, "Select number (1-{}, q to cancel): ", labels.len())?;
            let Some(answer) = self.read_answer()? else {
                writeln!(self.output)?;
                return Ok(None);
            };
            if answer.eq_ignore_ascii_case("q") {
                return Ok(None);
            }
            match answer.parse::<usize>() {
                Ok(choice) if (1..=labels.len()).contains(&choice) => return Ok(Some(choice)),
                Ok(_) => writeln!(
                    self.output,
                    "Invalid choice. Choose a number from 1 to {}",
                    labels.len()
                )?,
                Err(_) => writeln!(self.output, "Invalid input. Please enter only digits.")?,
            }
        }
    }

    fn confirm(&mut self, question: &str, default: Option<bool>) -> Result<bool, Error> {
        let hint = match default {
            None => "[y/n]",
            Some(true) => "[Y/n]",
            Some(false) => "[y/N]",
        };
        loop {
            write!(self.output, "{} {} ", question, hint)?;
            let Some(answer) = self.read_answer()? else {
                writeln!(self.output)?;
                return Ok(false);
            };
            match answer.to_ascii_lowercase().as_str() {
                "" if default.is_some() => return Ok(default.unwrap_or(false)),
                "y" | "ye" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please respond with 'yes' or 'no' (or 'y' or 'n').")?,
            }
        }
    }

    fn notify(&mut self, message: &str) -> Result<(), Error> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }
}
