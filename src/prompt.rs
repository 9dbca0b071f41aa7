use std::fmt::Display;

use console::Term;
use tracing::debug;

/// Interactive yes/no confirmation before a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<C: Confirm + ?Sized> Confirm for Box<C> {
    fn confirm(&self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }
}

/// Confirms everything (`--yes`).
#[derive(Clone, Copy, Debug, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Asks on the stderr terminal, defaulting to "no".
#[derive(Clone, Copy, Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        answer_or_decline(
            dialoguer::Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact_on(&Term::stderr()),
        )
    }
}

/// A prompt that could not be shown (no terminal, interrupted) declines.
fn answer_or_decline<E: Display>(result: Result<bool, E>) -> bool {
    match result {
        Ok(answer) => answer,
        Err(e) => {
            debug!(error = %e, "confirmation prompt unavailable");
            false
        }
    }
}
