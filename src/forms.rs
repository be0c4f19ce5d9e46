//! Form Validation
//!
//! Client-side checks mirroring the service's minimums, run before submit.

use crate::api::FieldErrors;
use crate::models::{NewBoard, NewFeedback, Priority, RegisterForm};

pub const MIN_TITLE_LEN: usize = 5;
pub const MIN_CONTENT_LEN: usize = 10;
pub const MIN_BOARD_NAME_LEN: usize = 2;

/// Comma separated tags: trimmed, empties dropped, first occurrence kept
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|tag| !tag.is_empty()) {
        if !tags.iter().any(|seen| seen.eq_ignore_ascii_case(tag)) {
            tags.push(tag.to_string());
        }
    }
    tags
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackDraft {
    pub title: String,
    pub content: String,
    pub board: Option<u32>,
    pub priority: Priority,
    pub tags: String,
}

impl FeedbackDraft {
    pub fn validate(&self) -> Result<NewFeedback, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = self.title.trim();
        let content = self.content.trim();
        if title.chars().count() < MIN_TITLE_LEN {
            errors.push("title", format!("Ensure this field has at least {} characters.", MIN_TITLE_LEN));
        }
        if content.chars().count() < MIN_CONTENT_LEN {
            errors.push("content", format!("Ensure this field has at least {} characters.", MIN_CONTENT_LEN));
        }
        let Some(board) = self.board else {
            errors.push("board", "Select a board.");
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NewFeedback {
            title: title.to_string(),
            content: content.to_string(),
            board,
            priority: self.priority,
            tags: parse_tags(&self.tags),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardDraft {
    pub name: String,
    pub description: String,
    pub is_public: bool,
}

impl Default for BoardDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            is_public: true,
        }
    }
}

impl BoardDraft {
    pub fn validate(&self) -> Result<NewBoard, FieldErrors> {
        let name = self.name.trim();
        if name.chars().count() < MIN_BOARD_NAME_LEN {
            let mut errors = FieldErrors::default();
            errors.push("name", format!("Ensure this field has at least {} characters.", MIN_BOARD_NAME_LEN));
            return Err(errors);
        }
        Ok(NewBoard {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            is_public: self.is_public,
        })
    }
}

/// Checks the register form before it is sent
pub fn check_registration(form: &RegisterForm, confirm: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    if form.username.trim().is_empty() {
        errors.push("username", "This field is required.");
    }
    if !form.email.contains('@') {
        errors.push("email", "Enter a valid email address.");
    }
    if form.password.is_empty() {
        errors.push("password", "This field is required.");
    } else if form.password != confirm {
        errors.push("password", "Passwords do not match.");
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(" ui, bug,,UI , export "), vec!["ui", "bug", "export"]);
        assert!(parse_tags(" , ").is_empty());
    }

    #[test]
    fn test_feedback_draft_minimums() {
        let draft = FeedbackDraft {
            title: "Hey".to_string(),
            content: "short".to_string(),
            board: Some(1),
            ..Default::default()
        };
        let errors = draft.validate().unwrap_err();
        assert!(errors.get("title").is_some());
        assert!(errors.get("content").is_some());
        assert!(errors.get("board").is_none());
    }

    #[test]
    fn test_feedback_draft_requires_board() {
        let draft = FeedbackDraft {
            title: "Dark mode".to_string(),
            content: "Please add a dark theme".to_string(),
            ..Default::default()
        };
        assert_eq!(draft.validate().unwrap_err().lines(), vec!["board: Select a board."]);
    }

    #[test]
    fn test_valid_feedback_draft() {
        let draft = FeedbackDraft {
            title: "  Dark mode ".to_string(),
            content: "Please add a dark theme".to_string(),
            board: Some(3),
            priority: Priority::High,
            tags: "ui, theme".to_string(),
        };
        let feedback = draft.validate().unwrap();
        assert_eq!(feedback.title, "Dark mode");
        assert_eq!(feedback.board, 3);
        assert_eq!(feedback.tags, vec!["ui", "theme"]);
    }

    #[test]
    fn test_board_draft() {
        let short = BoardDraft { name: "x".to_string(), ..Default::default() };
        assert!(short.validate().is_err());

        let board = BoardDraft { name: " Mobile ".to_string(), ..Default::default() }.validate().unwrap();
        assert_eq!(board.name, "Mobile");
        assert!(board.is_public);
    }

    #[test]
    fn test_registration_checks() {
        let form = RegisterForm {
            username: "kim".to_string(),
            email: "kim@example.com".to_string(),
            password: "secret123".to_string(),
            ..Default::default()
        };
        assert!(check_registration(&form, "secret123").is_ok());

        let errors = check_registration(&form, "secret124").unwrap_err();
        assert_eq!(errors.lines(), vec!["password: Passwords do not match."]);

        let blank = RegisterForm::default();
        let errors = check_registration(&blank, "").unwrap_err();
        assert!(errors.get("username").is_some());
        assert!(errors.get("email").is_some());
    }
}
