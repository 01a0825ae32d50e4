use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use super::{Outcome, PaymentError, PaymentRecord};

/// In-place change applied to a single record.
///
/// The closure runs while the record is locked and must not call back into
/// the store.
pub type Mutation<E> =
    Box<dyn FnOnce(&mut PaymentRecord<E>) -> Result<Outcome, PaymentError> + Send>;

/// Storage for payment records, keyed by payment id.
#[async_trait]
pub trait PaymentStore<E>: Send + Sync
where
    E: Clone + Send + Sync + 'static,
{
    /// Insert a new record under its id.
    async fn create(&self, record: PaymentRecord<E>) -> Result<Uuid, PaymentError>;

    async fn get(&self, id: Uuid) -> Result<Option<PaymentRecord<E>>, PaymentError>;

    /// Apply `mutation` atomically.
    ///
    /// The mutation sees a copy of the record; the copy is committed only
    /// when it returns `Outcome::Applied`. Returns the stored record after
    /// the call.
    async fn update(
        &self,
        id: Uuid,
        mutation: Mutation<E>,
    ) -> Result<(PaymentRecord<E>, Outcome), PaymentError>;

    async fn len(&self) -> usize;
}

/// Process-local store. Contents are lost on restart.
pub struct InMemoryPaymentStore<E> {
    records: DashMap<Uuid, PaymentRecord<E>>,
}

impl<E> InMemoryPaymentStore<E> {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }
}

impl<E> Default for InMemoryPaymentStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E> PaymentStore<E> for InMemoryPaymentStore<E>
where
    E: Clone + Send + Sync + 'static,
{
    async fn create(&self, record: PaymentRecord<E>) -> Result<Uuid, PaymentError> {
        let id = record.id;
        match self.records.entry(id) {
            Entry::Occupied(_) => Err(PaymentError::DuplicateId(id)),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(id)
            }
        }
    }

    async fn get(&self, id: Uuid) -> Result<Option<PaymentRecord<E>>, PaymentError> {
        Ok(self.records.get(&id).map(|entry| entry.value().clone()))
    }

    async fn update(
        &self,
        id: Uuid,
        mutation: Mutation<E>,
    ) -> Result<(PaymentRecord<E>, Outcome), PaymentError> {
        let mut entry = self
            .records
            .get_mut(&id)
            .ok_or(PaymentError::NotFound(id))?;

        let mut draft = entry.value().clone();
        let outcome = mutation(&mut draft)?;

        if outcome == Outcome::Applied {
            *entry.value_mut() = draft;
        }

        Ok((entry.value().clone(), outcome))
    }

    async fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::PaymentStatus;
    use std::sync::Arc;

    type Evidence = Vec<u32>;

    fn record() -> PaymentRecord<Evidence> {
        PaymentRecord::pending(100.0, "BDT".into(), "bank_transfer".into(), Vec::new())
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = InMemoryPaymentStore::new();
        let original = record();
        let id = store.create(original.clone()).await.unwrap();

        assert_eq!(id, original.id);
        assert_eq!(store.get(id).await.unwrap(), Some(original));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let store = InMemoryPaymentStore::new();
        let original = record();
        store.create(original.clone()).await.unwrap();

        let mut clash = record();
        clash.id = original.id;
        assert!(matches!(
            store.create(clash).await,
            Err(PaymentError::DuplicateId(_))
        ));
        assert_eq!(store.get(original.id).await.unwrap(), Some(original));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let store: InMemoryPaymentStore<Evidence> = InMemoryPaymentStore::new();
        let id = Uuid::new_v4();

        assert_eq!(store.get(id).await.unwrap(), None);
        let result = store
            .update(id, Box::new(|_: &mut PaymentRecord<Evidence>| Ok(Outcome::Applied)))
            .await;
        assert!(matches!(result, Err(PaymentError::NotFound(missing)) if missing == id));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn failed_mutation_commits_nothing() {
        let store = InMemoryPaymentStore::new();
        let id = store.create(record()).await.unwrap();

        let result = store
            .update(
                id,
                Box::new(|r: &mut PaymentRecord<Evidence>| {
                    r.details.push(7);
                    r.transition_to(PaymentStatus::Created)
                }),
            )
            .await;

        assert!(result.is_err());
        let stored = store.get(id).await.unwrap().unwrap();
        assert!(stored.details.is_empty());
        assert_eq!(stored.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn unchanged_mutation_is_discarded() {
        let store = InMemoryPaymentStore::new();
        let id = store.create(record()).await.unwrap();

        let (stored, outcome) = store
            .update(
                id,
                Box::new(|r: &mut PaymentRecord<Evidence>| {
                    r.details.push(1);
                    Ok(Outcome::Unchanged)
                }),
            )
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Unchanged);
        assert!(stored.details.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_are_not_lost() {
        let store = Arc::new(InMemoryPaymentStore::new());
        let id = store.create(record()).await.unwrap();

        let tasks: Vec<_> = (0..64u32)
            .map(|n| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .update(
                            id,
                            Box::new(move |r: &mut PaymentRecord<Evidence>| {
                                r.details.push(n);
                                Ok(Outcome::Applied)
                            }),
                        )
                        .await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = store.get(id).await.unwrap().unwrap();
        assert_eq!(stored.details.len(), 64);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_terminal_transitions_settle_once() {
        let store = Arc::new(InMemoryPaymentStore::new());
        let id = store.create(record()).await.unwrap();

        let tasks: Vec<_> = (0..32)
            .map(|n| {
                let store = store.clone();
                let next = if n % 2 == 0 {
                    PaymentStatus::Paid
                } else {
                    PaymentStatus::Failed
                };
                tokio::spawn(async move {
                    store
                        .update(id, Box::new(move |r: &mut PaymentRecord<Evidence>| {
                            r.transition_to(next)
                        }))
                        .await
                })
            })
            .collect();

        let mut applied = 0;
        for task in tasks {
            if let Ok((_, Outcome::Applied)) = task.await.unwrap() {
                applied += 1;
            }
        }

        assert_eq!(applied, 1);
        let stored = store.get(id).await.unwrap().unwrap();
        assert!(stored.status.is_terminal());
    }
}
