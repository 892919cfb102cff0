use std::collections::HashMap;

use axum::async_trait;
use tokio::sync::RwLock;

use crate::model::person::{Person, PersonId};

use super::{PersonStore, StoreResult};

/// In-process store. Contents are lost on shutdown.
#[derive(Debug, Default)]
pub struct MemoryStore {
    people: RwLock<HashMap<PersonId, Person>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersonStore for MemoryStore {
    async fn find_all(&self) -> StoreResult<Vec<Person>> {
        let mut people: Vec<Person> = self.people.read().await.values().cloned().collect();
        people.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(people)
    }

    async fn find_by_id(&self, id: PersonId) -> StoreResult<Option<Person>> {
        Ok(self.people.read().await.get(&id).cloned())
    }

    async fn insert(&self, person: &Person) -> StoreResult<()> {
        self.people.write().await.insert(person.id, person.clone());

        Ok(())
    }

    async fn replace(&self, person: &Person) -> StoreResult<bool> {
        match self.people.write().await.get_mut(&person.id) {
            Some(stored) => {
                *stored = person.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: PersonId) -> StoreResult<bool> {
        Ok(self.people.write().await.remove(&id).is_some())
    }
}
