//! Final run report written to stderr.

use std::io;

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

use crate::error::{AggregateFailure, ScriptError};

pub struct FailureReport<'a> {
    pub failure: &'a AggregateFailure,
    pub color: bool,
}

impl<'a> FailureReport<'a> {
    pub fn for_stderr(failure: &'a AggregateFailure) -> Self {
        Self { failure, color: io::stderr().is_terminal() }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let header = format!("{} of the scripts failed:", self.failure.failures.len());
        if self.color {
            out.push_str(&format!("{}\n", header.red().bold()));
        } else {
            out.push_str(&format!("{}\n", header));
        }
        for f in &self.failure.failures {
            let locator = if self.color { f.locator.yellow().to_string() } else { f.locator.to_string() };
            out.push_str(&format!("- {}\n", locator));
            for line in f.to_string().lines() {
                out.push_str(&format!("    {}\n", line));
            }
            if let ScriptError::Exec(err) = &f.error {
                out.push_str(&format!("    statement: {}\n", err.statement));
            }
        }
        out
    }

    pub fn print(&self) {
        eprint!("{}", self.render());
    }
}
