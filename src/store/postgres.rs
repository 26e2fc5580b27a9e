use async_trait::async_trait;
use sqlx::{migrate::MigrateError, postgres::PgPoolOptions, Pool, Postgres};

use super::{parse_id, Store, StoreError};
use crate::model::{NewNote, NewPerson, Note, NotePatch, Person, PersonPatch};

/// PostgreSQL-backed store. Ids are generated by the database.
#[derive(Debug, Clone)]
pub struct PgStore {
    db: Pool<Postgres>,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { db })
    }

    /// Applies the embedded migrations under `migrations/`.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./migrations").run(&self.db).await
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_persons(&self) -> Result<Vec<Person>, StoreError> {
        let persons = sqlx::query_as::<_, Person>("SELECT id, name, number FROM persons")
            .fetch_all(&self.db)
            .await?;
        Ok(persons)
    }

    async fn find_person(&self, id: &str) -> Result<Option<Person>, StoreError> {
        let id = parse_id(id)?;
        let person =
            sqlx::query_as::<_, Person>("SELECT id, name, number FROM persons WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.db)
                .await?;
        Ok(person)
    }

    async fn insert_person(&self, person: NewPerson) -> Result<Person, StoreError> {
        person.validate()?;
        let person = sqlx::query_as::<_, Person>(
            "INSERT INTO persons (name, number) VALUES ($1, $2) RETURNING id, name, number",
        )
        .bind(person.name)
        .bind(person.number)
        .fetch_one(&self.db)
        .await?;
        Ok(person)
    }

    async fn update_person(
        &self,
        id: &str,
        patch: PersonPatch,
    ) -> Result<Option<Person>, StoreError> {
        let id = parse_id(id)?;
        patch.validate()?;
        let person = sqlx::query_as::<_, Person>(
            "UPDATE persons SET name = COALESCE($2, name), number = COALESCE($3, number) \
             WHERE id = $1 RETURNING id, name, number",
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.number)
        .fetch_optional(&self.db)
        .await?;
        Ok(person)
    }

    async fn delete_person(&self, id: &str) -> Result<(), StoreError> {
        let id = parse_id(id)?;
        sqlx::query("DELETE FROM persons WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn list_notes(&self) -> Result<Vec<Note>, StoreError> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT id, content, important, date FROM notes ORDER BY date",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(notes)
    }

    async fn find_note(&self, id: &str) -> Result<Option<Note>, StoreError> {
        let id = parse_id(id)?;
        let note = sqlx::query_as::<_, Note>(
            "SELECT id, content, important, date FROM notes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(note)
    }

    async fn insert_note(&self, note: NewNote) -> Result<Note, StoreError> {
        note.validate()?;
        let note = sqlx::query_as::<_, Note>(
            "INSERT INTO notes (content, important, date) VALUES ($1, $2, $3) \
             RETURNING id, content, important, date",
        )
        .bind(note.content)
        .bind(note.important)
        .bind(note.date)
        .fetch_one(&self.db)
        .await?;
        Ok(note)
    }

    async fn update_note(&self, id: &str, patch: NotePatch) -> Result<Option<Note>, StoreError> {
        let id = parse_id(id)?;
        patch.validate()?;
        let note = sqlx::query_as::<_, Note>(
            "UPDATE notes SET content = COALESCE($2, content), important = COALESCE($3, important) \
             WHERE id = $1 RETURNING id, content, important, date",
        )
        .bind(id)
        .bind(patch.content)
        .bind(patch.important)
        .fetch_optional(&self.db)
        .await?;
        Ok(note)
    }

    async fn delete_note(&self, id: &str) -> Result<(), StoreError> {
        let id = parse_id(id)?;
        sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn close(&self) {
        self.db.close().await;
        tracing::info!("database pool closed");
    }
}
