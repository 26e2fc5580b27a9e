use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{parse_id, Store, StoreError};
use crate::model::{NewNote, NewPerson, Note, NotePatch, Person, PersonPatch};

/// In-process store keeping insertion order. Used for development without a
/// database and by the test suite.
#[derive(Debug, Default)]
pub struct MemoryStore {
    persons: RwLock<IndexMap<Uuid, Person>>,
    notes: RwLock<IndexMap<Uuid, Note>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_persons(&self) -> Result<Vec<Person>, StoreError> {
        Ok(self.persons.read().await.values().cloned().collect())
    }

    async fn find_person(&self, id: &str) -> Result<Option<Person>, StoreError> {
        let id = parse_id(id)?;
        Ok(self.persons.read().await.get(&id).cloned())
    }

    async fn insert_person(&self, person: NewPerson) -> Result<Person, StoreError> {
        person.validate()?;
        let stored = Person {
            id: Uuid::new_v4(),
            name: person.name,
            number: person.number,
        };
        self.persons.write().await.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_person(
        &self,
        id: &str,
        patch: PersonPatch,
    ) -> Result<Option<Person>, StoreError> {
        let id = parse_id(id)?;
        patch.validate()?;
        let mut persons = self.persons.write().await;
        Ok(persons.get_mut(&id).map(|person| {
            patch.apply(person);
            person.clone()
        }))
    }

    async fn delete_person(&self, id: &str) -> Result<(), StoreError> {
        let id = parse_id(id)?;
        self.persons.write().await.shift_remove(&id);
        Ok(())
    }

    async fn list_notes(&self) -> Result<Vec<Note>, StoreError> {
        Ok(self.notes.read().await.values().cloned().collect())
    }

    async fn find_note(&self, id: &str) -> Result<Option<Note>, StoreError> {
        let id = parse_id(id)?;
        Ok(self.notes.read().await.get(&id).cloned())
    }

    async fn insert_note(&self, note: NewNote) -> Result<Note, StoreError> {
        note.validate()?;
        let stored = Note {
            id: Uuid::new_v4(),
            content: note.content,
            important: note.important,
            date: note.date,
        };
        self.notes.write().await.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_note(&self, id: &str, patch: NotePatch) -> Result<Option<Note>, StoreError> {
        let id = parse_id(id)?;
        patch.validate()?;
        let mut notes = self.notes.write().await;
        Ok(notes.get_mut(&id).map(|note| {
            patch.apply(note);
            note.clone()
        }))
    }

    async fn delete_note(&self, id: &str) -> Result<(), StoreError> {
        let id = parse_id(id)?;
        self.notes.write().await.shift_remove(&id);
        Ok(())
    }

    async fn close(&self) {
        tracing::debug!("in-memory store closed");
    }
}
