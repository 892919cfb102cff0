//! CRUD operations over the person collection.

use std::sync::Arc;

use chrono::Utc;
use validator::ValidationErrors;

use crate::{
    model::person::{Person, PersonId, PersonPayload},
    store::{PersonStore, StoreError},
};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("person not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Clone)]
pub struct PersonService {
    store: Arc<dyn PersonStore>,
}

impl PersonService {
    pub fn new(store: Arc<dyn PersonStore>) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip_all)]
    pub async fn list(&self) -> ServiceResult<Vec<Person>> {
        let people = self.store.find_all().await?;

        tracing::debug!(count = people.len(), "Listed people");

        Ok(people)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: &str) -> ServiceResult<Person> {
        let id = parse_id(id)?;

        self.store
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    #[tracing::instrument(skip_all)]
    pub async fn create(&self, payload: PersonPayload) -> ServiceResult<Person> {
        let draft = payload.into_draft().map_err(ServiceError::Validation)?;
        let person = Person::create(draft, Utc::now());

        self.store.insert(&person).await?;

        tracing::info!(id = %person.id, "Created person");

        Ok(person)
    }

    /// Applies only the supplied fields, then validates the merged record.
    #[tracing::instrument(skip(self, payload))]
    pub async fn update(&self, id: &str, payload: PersonPayload) -> ServiceResult<Person> {
        let id = parse_id(id)?;

        let mut person = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let draft = payload
            .merged_over(&person)
            .into_draft()
            .map_err(ServiceError::Validation)?;
        person.apply(draft, Utc::now());

        // Deleted since it was read.
        if !self.store.replace(&person).await? {
            return Err(ServiceError::NotFound);
        }

        tracing::info!(id = %person.id, "Updated person");

        Ok(person)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let id = parse_id(id)?;

        if !self.store.delete(id).await? {
            return Err(ServiceError::NotFound);
        }

        tracing::info!(%id, "Deleted person");

        Ok(())
    }
}

/// A malformed id can never match a record.
fn parse_id(id: &str) -> ServiceResult<PersonId> {
    PersonId::parse(id).ok_or(ServiceError::NotFound)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::async_trait;

    use crate::{
        model::person::Gender,
        store::{MemoryStore, StoreResult},
    };

    use super::*;

    fn service() -> PersonService {
        PersonService::new(Arc::new(MemoryStore::new()))
    }

    fn payload() -> PersonPayload {
        PersonPayload {
            name: Some(" Katherine Johnson ".to_string()),
            age: Some(101),
            gender: Some("Female".to_string()),
            mobile_number: Some("5550001111".to_string()),
        }
    }

    /// Counts writes and delegates to an in-memory store.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl PersonStore for CountingStore {
        async fn find_all(&self) -> StoreResult<Vec<Person>> {
            self.inner.find_all().await
        }

        async fn find_by_id(&self, id: PersonId) -> StoreResult<Option<Person>> {
            self.inner.find_by_id(id).await
        }

        async fn insert(&self, person: &Person) -> StoreResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.insert(person).await
        }

        async fn replace(&self, person: &Person) -> StoreResult<bool> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.replace(person).await
        }

        async fn delete(&self, id: PersonId) -> StoreResult<bool> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete(id).await
        }
    }

    struct UnavailableStore;

    #[async_trait]
    impl PersonStore for UnavailableStore {
        async fn find_all(&self) -> StoreResult<Vec<Person>> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn find_by_id(&self, _id: PersonId) -> StoreResult<Option<Person>> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn insert(&self, _person: &Person) -> StoreResult<()> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn replace(&self, _person: &Person) -> StoreResult<bool> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn delete(&self, _id: PersonId) -> StoreResult<bool> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    /// Deletes the record right after handing it out, as a concurrent delete would.
    #[derive(Default)]
    struct VanishingStore {
        inner: MemoryStore,
    }

    #[async_trait]
    impl PersonStore for VanishingStore {
        async fn find_all(&self) -> StoreResult<Vec<Person>> {
            self.inner.find_all().await
        }

        async fn find_by_id(&self, id: PersonId) -> StoreResult<Option<Person>> {
            let person = self.inner.find_by_id(id).await?;
            self.inner.delete(id).await?;

            Ok(person)
        }

        async fn insert(&self, person: &Person) -> StoreResult<()> {
            self.inner.insert(person).await
        }

        async fn replace(&self, person: &Person) -> StoreResult<bool> {
            self.inner.replace(person).await
        }

        async fn delete(&self, id: PersonId) -> StoreResult<bool> {
            self.inner.delete(id).await
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_equal_timestamps() {
        let service = service();

        let person = service.create(payload()).await.unwrap();

        assert_eq!(person.name, "Katherine Johnson");
        assert_eq!(person.age, 101);
        assert_eq!(person.gender, Gender::Female);
        assert_eq!(person.mobile_number, "5550001111");
        assert_eq!(person.created_at, person.updated_at);
        assert_eq!(service.get(&person.id.to_string()).await.unwrap(), person);
    }

    #[tokio::test]
    async fn invalid_create_persists_nothing() {
        let service = service();

        let result = service
            .create(PersonPayload {
                age: Some(-1),
                ..payload()
            })
            .await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_only_touches_supplied_fields() {
        let service = service();
        let created = service.create(payload()).await.unwrap();

        let updated = service
            .update(
                &created.id.to_string(),
                PersonPayload {
                    age: Some(30),
                    ..PersonPayload::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.age, 30);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.gender, created.gender);
        assert_eq!(updated.mobile_number, created.mobile_number);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > updated.created_at);
    }

    #[tokio::test]
    async fn update_honors_zero_age() {
        let service = service();
        let created = service.create(payload()).await.unwrap();

        let updated = service
            .update(
                &created.id.to_string(),
                PersonPayload {
                    age: Some(0),
                    ..PersonPayload::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.age, 0);
    }

    #[tokio::test]
    async fn invalid_update_leaves_record_untouched() {
        let service = service();
        let created = service.create(payload()).await.unwrap();
        let id = created.id.to_string();

        let result = service
            .update(
                &id,
                PersonPayload {
                    gender: Some("Alien".to_string()),
                    ..PersonPayload::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert_eq!(service.get(&id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn missing_and_malformed_ids_are_not_found() {
        let service = service();
        let missing = PersonId::new().to_string();

        for id in [missing.as_str(), "definitely-not-an-id"] {
            assert!(matches!(service.get(id).await, Err(ServiceError::NotFound)));
            assert!(matches!(
                service.update(id, payload()).await,
                Err(ServiceError::NotFound)
            ));
            assert!(matches!(service.delete(id).await, Err(ServiceError::NotFound)));
        }
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let service = service();
        let created = service.create(payload()).await.unwrap();
        let id = created.id.to_string();

        service.delete(&id).await.unwrap();

        assert!(matches!(service.get(&id).await, Err(ServiceError::NotFound)));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_racing_a_delete_does_not_restore_the_record() {
        let store = Arc::new(VanishingStore::default());
        let service = PersonService::new(store.clone());
        let created = service.create(payload()).await.unwrap();

        let result = service
            .update(
                &created.id.to_string(),
                PersonPayload {
                    age: Some(30),
                    ..PersonPayload::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ServiceError::NotFound)));
        assert_eq!(store.inner.find_by_id(created.id).await.unwrap(), None);
        assert!(store.inner.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn each_successful_write_hits_the_store_once() {
        let store = Arc::new(CountingStore::default());
        let service = PersonService::new(store.clone());

        let created = service.create(payload()).await.unwrap();
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);

        let id = created.id.to_string();
        service
            .update(
                &id,
                PersonPayload {
                    name: Some("Katherine".to_string()),
                    ..PersonPayload::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(store.writes.load(Ordering::SeqCst), 2);

        service.delete(&id).await.unwrap();
        assert_eq!(store.writes.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn store_failures_surface_as_store_errors() {
        let service = PersonService::new(Arc::new(UnavailableStore));

        assert!(matches!(service.list().await, Err(ServiceError::Store(_))));
        assert!(matches!(
            service.get(&PersonId::new().to_string()).await,
            Err(ServiceError::Store(_))
        ));
        assert!(matches!(
            service.create(payload()).await,
            Err(ServiceError::Store(_))
        ));
    }
}
