// src/select.rs
use anyhow::{Context, Result};
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

/// Chooses the log file to process. `None` means the user backed out,
/// which ends the run without doing any work.
pub trait FileSelector {
    fn select(&mut self) -> Result<Option<PathBuf>>;
}

/// A path already known up front, e.g. from the command line.
#[derive(Debug, Clone)]
pub struct FixedSelector(pub PathBuf);

impl FileSelector for FixedSelector {
    fn select(&mut self) -> Result<Option<PathBuf>> {
        Ok(Some(self.0.clone()))
    }
}

/// Asks for a path on a line-oriented terminal. An empty answer or end of
/// input cancels.
pub struct PromptSelector<R, W> {
    input: R,
    output: W,
}

impl PromptSelector<io::StdinLock<'static>, io::Stderr> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> FileSelector for PromptSelector<R, W> {
    fn select(&mut self) -> Result<Option<PathBuf>> {
        write!(self.output, "Select AWS log file (.csv, .txt or any file): ")
            .and_then(|_| self.output.flush())
            .context("writing prompt")?;

        let mut answer = String::new();
        if self
            .input
            .read_line(&mut answer)
            .context("reading file selection")?
            == 0
        {
            return Ok(None);
        }

        // terminals wrap dropped paths in quotes
        let path = answer.trim().trim_matches(|c| c == '"' || c == '\'');
        if path.is_empty() {
            return Ok(None);
        }
        Ok(Some(PathBuf::from(path)))
    }
}
