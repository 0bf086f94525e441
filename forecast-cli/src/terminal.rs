use std::{
    cell::RefCell,
    io::{self, Write},
};

use forecast_core::{CityInput, ForecastDisplay};
use tracing::warn;

/// Writes each forecast to stdout as one block.
#[derive(Debug, Default)]
pub struct TerminalDisplay;

impl ForecastDisplay for TerminalDisplay {
    fn show(&self, text: &str) {
        if let Err(err) = write_block(&mut io::stdout().lock(), text) {
            warn!(error = %err, "failed to write forecast to stdout");
        }
    }
}

/// Writes `text` followed by a blank line. A closed pipe is not an error.
fn write_block<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    match writeln!(out, "{text}\n").and_then(|()| out.flush()) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// City text entered at the prompt; replaced before each trigger.
#[derive(Debug, Default)]
pub struct PromptInput {
    text: RefCell<String>,
}

impl PromptInput {
    pub fn set(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }
}

impl CityInput for PromptInput {
    fn city(&self) -> String {
        self.text.borrow().clone()
    }
}
