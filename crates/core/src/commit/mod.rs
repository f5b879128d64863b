//! Hand-off list between loader threads and the render thread.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{Result, RhythmusError};

/// Items pushed from any thread and drained once per frame by the thread
/// that owns the scene graph.
#[derive(Debug)]
pub struct CommitQueue<T> {
    shared: Arc<Mutex<Vec<T>>>,
}

impl<T> Default for CommitQueue<T> {
    fn default() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T> CommitQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a producer handle that can be moved to another thread.
    pub fn sender(&self) -> CommitSender<T> {
        CommitSender {
            shared: self.shared.clone(),
        }
    }

    /// Takes every queued item, leaving the list empty, under one lock.
    pub fn drain(&self) -> Result<Vec<T>> {
        let mut list = lock(&self.shared)?;
        Ok(std::mem::take(&mut *list))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(lock(&self.shared)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(lock(&self.shared)?.is_empty())
    }
}

/// Producer side of a [`CommitQueue`].
#[derive(Debug)]
pub struct CommitSender<T> {
    shared: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for CommitSender<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> CommitSender<T> {
    pub fn push(&self, item: T) -> Result<()> {
        lock(&self.shared)?.push(item);
        Ok(())
    }
}

fn lock<T>(shared: &Mutex<Vec<T>>) -> Result<MutexGuard<'_, Vec<T>>> {
    shared
        .lock()
        .map_err(|_| RhythmusError::Poisoned("commit queue"))
}
