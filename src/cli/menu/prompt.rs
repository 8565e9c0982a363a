//! Thin wrappers around `dialoguer` prompts.

use std::{fmt, sync::LazyLock};

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use regex::Regex;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+").expect("email pattern is valid"));

/// Loose email check: something, an `@`, something, a dot, something.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Asks the user to pick one of `options`, returning its index.
pub fn choose<T: fmt::Display>(prompt: &str, options: &[T]) -> dialoguer::Result<usize> {
    Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(options)
        .default(0)
        .interact()
}

/// Asks for a non-empty line of text.
pub fn text(prompt: &str) -> dialoguer::Result<String> {
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact_text()
}

/// Asks for a non-empty line of text, pre-filled with the current value.
pub fn text_with_initial(prompt: &str, initial: &str) -> dialoguer::Result<String> {
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .with_initial_text(initial)
        .interact_text()
}

/// Asks for an email address until a plausible one is given.
pub fn email(prompt: &str) -> dialoguer::Result<String> {
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .validate_with(|input: &String| {
            if is_valid_email(input) {
                Ok(())
            } else {
                Err("Please enter a valid email.")
            }
        })
        .interact_text()
}

/// Asks a yes/no question, defaulting to no.
pub fn confirm(prompt: &str) -> dialoguer::Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_emails() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));
    }

    #[test]
    fn rejects_implausible_emails() {
        assert!(!is_valid_email("ada"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("@example.com"));
    }
}
