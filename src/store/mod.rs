//! Storage layer for the `persons` and `notes` collections.
//!
//! Handlers only see the [`Store`] trait; the process picks [`PgStore`] when a
//! database is configured and [`MemoryStore`] otherwise.

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{NewNote, NewPerson, Note, NotePatch, Person, PersonPatch};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("malformatted id `{0}`")]
    MalformedId(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Reference(String),
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let code = match &err {
            sqlx::Error::Database(db) => db.code().map(|code| code.into_owned()),
            _ => None,
        };
        // SQLSTATE classes: 22 data exception, 23 integrity constraint violation.
        match code.as_deref() {
            Some("22P02") => StoreError::MalformedId(database_message(&err)),
            Some("23502" | "23514" | "22001") => StoreError::Validation(database_message(&err)),
            Some("23503") => StoreError::Reference(database_message(&err)),
            _ => StoreError::Database(err),
        }
    }
}

fn database_message(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db) => db.message().to_owned(),
        other => other.to_string(),
    }
}

/// Parses a path identifier into the storage id shape.
pub fn parse_id(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw).map_err(|_| StoreError::MalformedId(raw.to_owned()))
}

/// Storage-client handle shared by all requests.
///
/// Every method performs exactly one read or write. Writes validate the
/// entity constraints first. Lookups of a missing id return `Ok(None)`.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_persons(&self) -> Result<Vec<Person>, StoreError>;
    async fn find_person(&self, id: &str) -> Result<Option<Person>, StoreError>;
    async fn insert_person(&self, person: NewPerson) -> Result<Person, StoreError>;
    async fn update_person(
        &self,
        id: &str,
        patch: PersonPatch,
    ) -> Result<Option<Person>, StoreError>;
    /// Succeeds whether or not the person existed.
    async fn delete_person(&self, id: &str) -> Result<(), StoreError>;

    async fn list_notes(&self) -> Result<Vec<Note>, StoreError>;
    async fn find_note(&self, id: &str) -> Result<Option<Note>, StoreError>;
    async fn insert_note(&self, note: NewNote) -> Result<Note, StoreError>;
    async fn update_note(&self, id: &str, patch: NotePatch) -> Result<Option<Note>, StoreError>;
    /// Succeeds whether or not the note existed.
    async fn delete_note(&self, id: &str) -> Result<(), StoreError>;

    /// Releases connections. Called once on shutdown.
    async fn close(&self);
}
