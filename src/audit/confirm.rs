use std::io::{BufRead, Write};
use tokio::runtime::{Handle, RuntimeFlavor};

/// Answers the yes/no question asked before removing directories
pub trait ConfirmationProvider {
    /// Returns `true` only on an affirmative answer
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Asks on stdout and reads the answer from stdin
///
/// The read blocks until the user answers. Called from a multi-threaded
/// runtime, the worker thread is handed over with `block_in_place` first so
/// other tasks keep running.
#[derive(Debug, Default)]
pub struct StdinConfirmation;

impl ConfirmationProvider for StdinConfirmation {
    fn confirm(&mut self, prompt: &str) -> bool {
        run_blocking(|| {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            ask(prompt, &mut stdin.lock(), &mut stdout.lock())
        })
    }
}

/// Runs blocking work from synchronous code that may sit inside a runtime
///
/// `block_in_place` panics on a current-thread runtime, so there and outside
/// any runtime `f` simply runs inline.
fn run_blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

/// Gives the same answer every time, for unattended runs and tests
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl ConfirmationProvider for FixedAnswer {
    fn confirm(&mut self, prompt: &str) -> bool {
        tracing::info!("{} -> {}", prompt, if self.0 { "y" } else { "n" });
        self.0
    }
}

/// Whether a typed answer counts as yes
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn ask(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> bool {
    if writeln!(output, "{} (y/n)", prompt).and_then(|_| output.flush()).is_err() {
        return false;
    }

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(_) => is_affirmative(&answer),
        Err(e) => {
            tracing::warn!("Failed to read confirmation: {}", e);
            false
        }
    }
}
