//! Interactive prompting
//!
//! Answers are checked with a plain validation predicate; a rejected answer
//! is reported and the question asked again.

use std::fmt::Display;

use dialoguer::{console::Term, theme::ColorfulTheme, Input, Password};

/// A question put to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub prompt: String,
    /// Suppress terminal echo while typing
    pub hidden: bool,
}

impl Question {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            hidden: false,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// Source of answers to questions
pub trait Prompter {
    /// Ask once and return the raw answer, which may be empty
    fn ask(&mut self, question: &Question) -> anyhow::Result<String>;

    /// Tell the operator why an answer was rejected
    fn reject(&mut self, message: &str) -> anyhow::Result<()>;
}

/// Ask `question` until `validate` accepts the answer
pub fn ask_until_valid<P, F, E>(
    prompter: &mut P,
    question: &Question,
    validate: F,
) -> anyhow::Result<String>
where
    P: Prompter + ?Sized,
    F: Fn(&str) -> Result<(), E>,
    E: Display,
{
    loop {
        let answer = prompter.ask(question)?;

        match validate(&answer) {
            Ok(()) => return Ok(answer),
            Err(e) => prompter.reject(&e.to_string())?,
        }
    }
}

/// Prompter reading from the controlling terminal
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&mut self, question: &Question) -> anyhow::Result<String> {
        let theme = ColorfulTheme::default();

        let answer = if question.hidden {
            Password::with_theme(&theme)
                .with_prompt(&question.prompt)
                .allow_empty_password(true)
                .interact()?
        } else {
            Input::<String>::with_theme(&theme)
                .with_prompt(&question.prompt)
                .allow_empty(true)
                .interact_text()?
        };

        Ok(answer)
    }

    fn reject(&mut self, message: &str) -> anyhow::Result<()> {
        Term::stderr().write_line(&format!("✘ {}", message))?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::scripted::ScriptedPrompter;
    use super::*;
    use crate::domain::user::{validate_password, UserValidationError};

    #[test]
    fn test_accepts_first_valid_answer() {
        let mut prompter = ScriptedPrompter::new(["secret"]);
        let question = Question::new("Please enter the new password:").hidden();

        let answer = ask_until_valid(&mut prompter, &question, validate_password).unwrap();

        assert_eq!(answer, "secret");
        assert_eq!(prompter.asked, vec![question]);
        assert!(prompter.rejections.is_empty());
    }

    #[test]
    fn test_reasks_until_non_empty() {
        let mut prompter = ScriptedPrompter::new(["", "", "secret"]);
        let question = Question::new("Please enter the new password:").hidden();

        let answer = ask_until_valid(&mut prompter, &question, validate_password).unwrap();

        assert_eq!(answer, "secret");
        assert_eq!(prompter.asked.len(), 3);
        assert_eq!(
            prompter.rejections,
            vec![UserValidationError::EmptyPassword.to_string(); 2]
        );
    }

    #[test]
    fn test_exhausted_input_is_an_error() {
        let mut prompter = ScriptedPrompter::new([""]);
        let question = Question::new("Please give the username:");

        let result = ask_until_valid(&mut prompter, &question, validate_password);
        assert!(result.is_err());
    }

    #[test]
    fn test_question_builder() {
        let question = Question::new("Name:");
        assert!(!question.hidden);
        assert!(question.hidden().hidden);
    }
}
