//! Repository doubles shared by the use-case service tests.

use std::fmt::Display;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::Identified;
use crate::domain::ports::{Find, Persist, PersistenceError};

#[derive(Clone, Copy, Debug)]
pub(crate) enum StubFailure {
    Io,
    DataConsistency,
    Unexpected,
}

impl StubFailure {
    pub(crate) fn to_error(self) -> PersistenceError {
        match self {
            Self::Io => PersistenceError::io("database unavailable"),
            Self::DataConsistency => PersistenceError::data_consistency("profile row missing"),
            Self::Unexpected => PersistenceError::unexpected("adapter returned a non-error"),
        }
    }
}

struct FindState<T> {
    found: Option<T>,
    failure: Option<StubFailure>,
    keys: Vec<String>,
}

/// `Find` double returning a fixed answer and recording the keys it saw.
pub(crate) struct StubFind<T> {
    state: Mutex<FindState<T>>,
    calls: AtomicUsize,
}

impl<T> StubFind<T> {
    pub(crate) fn returning(found: Option<T>) -> Self {
        Self {
            state: Mutex::new(FindState {
                found,
                failure: None,
                keys: Vec::new(),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn empty() -> Self {
        Self::returning(None)
    }

    pub(crate) fn failing(failure: StubFailure) -> Self {
        let stub = Self::empty();
        stub.state.lock().expect("find state lock").failure = Some(failure);
        stub
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn keys(&self) -> Vec<String> {
        self.state.lock().expect("find state lock").keys.clone()
    }
}

#[async_trait]
impl<K, T, C> Find<K, T, C> for StubFind<T>
where
    K: Display + Sync,
    T: Clone + Send,
    C: Sync,
{
    async fn find(&self, key: &K, _ctx: &C) -> Result<Option<T>, PersistenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().expect("find state lock");
        state.keys.push(key.to_string());
        if let Some(failure) = state.failure {
            return Err(failure.to_error());
        }
        Ok(state.found.clone())
    }
}

/// `Persist` double recording every entity it was asked to store.
pub(crate) struct StubPersist<T> {
    persisted: Mutex<Vec<T>>,
    failure: Option<StubFailure>,
}

impl<T> StubPersist<T> {
    pub(crate) fn succeeding() -> Self {
        Self {
            persisted: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    pub(crate) fn failing(failure: StubFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::succeeding()
        }
    }

    pub(crate) fn persisted(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.persisted.lock().expect("persist lock").clone()
    }
}

#[async_trait]
impl<T, C> Persist<T, C> for StubPersist<T>
where
    T: Identified + Clone + Send + Sync,
    C: Sync,
{
    async fn persist(&self, entity: &T, _ctx: &C) -> Result<T::Id, PersistenceError> {
        self.persisted
            .lock()
            .expect("persist lock")
            .push(entity.clone());
        match self.failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(entity.id().clone()),
        }
    }
}
