use chrono::prelude::*;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::StoreError;

pub const NUMBER_MIN_LEN: usize = 8;

static NUMBER_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2,3}-\d+$").expect("phone number pattern compiles"));

#[derive(Debug, Deserialize, sqlx::FromRow, Serialize, Clone, PartialEq, Eq)]
pub struct Person {
    pub id: Uuid,
    pub name: String,
    pub number: String,
}

#[derive(Debug, Deserialize, sqlx::FromRow, Serialize, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: Uuid,
    pub content: String,
    pub important: bool,
    pub date: DateTime<Utc>,
}

/// A person about to be inserted.
#[derive(Debug, Clone)]
pub struct NewPerson {
    pub name: String,
    pub number: String,
}

/// Fields of a person to overwrite; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default)]
pub struct PersonPatch {
    pub name: Option<String>,
    pub number: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewNote {
    pub content: String,
    pub important: bool,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NotePatch {
    pub content: Option<String>,
    pub important: Option<bool>,
}

fn check_name(name: &str, problems: &mut Vec<String>) {
    if name.trim().is_empty() {
        problems.push("name: name is required".to_owned());
    }
}

fn check_number(number: &str, problems: &mut Vec<String>) {
    if number.trim().is_empty() {
        problems.push("number: number is required".to_owned());
    } else if number.len() < NUMBER_MIN_LEN {
        problems.push(format!(
            "number: `{number}` is shorter than the minimum allowed length ({NUMBER_MIN_LEN})"
        ));
    } else if !NUMBER_SHAPE.is_match(number) {
        problems.push(format!("number: `{number}` is not a valid phone number"));
    }
}

fn check_content(content: &str, problems: &mut Vec<String>) {
    if content.trim().is_empty() {
        problems.push("content: content is required".to_owned());
    }
}

fn into_result(entity: &str, problems: Vec<String>) -> Result<(), StoreError> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(StoreError::Validation(format!(
            "{entity} validation failed: {}",
            problems.join(", ")
        )))
    }
}

impl NewPerson {
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut problems = Vec::new();
        check_name(&self.name, &mut problems);
        check_number(&self.number, &mut problems);
        into_result("Person", problems)
    }
}

impl PersonPatch {
    /// Validates only the fields being written.
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut problems = Vec::new();
        if let Some(name) = &self.name {
            check_name(name, &mut problems);
        }
        if let Some(number) = &self.number {
            check_number(number, &mut problems);
        }
        into_result("Person", problems)
    }

    pub fn apply(self, person: &mut Person) {
        if let Some(name) = self.name {
            person.name = name;
        }
        if let Some(number) = self.number {
            person.number = number;
        }
    }
}

impl NewNote {
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut problems = Vec::new();
        check_content(&self.content, &mut problems);
        into_result("Note", problems)
    }
}

impl NotePatch {
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut problems = Vec::new();
        if let Some(content) = &self.content {
            check_content(content, &mut problems);
        }
        into_result("Note", problems)
    }

    pub fn apply(self, note: &mut Note) {
        if let Some(content) = self.content {
            note.content = content;
        }
        if let Some(important) = self.important {
            note.important = important;
        }
    }
}
