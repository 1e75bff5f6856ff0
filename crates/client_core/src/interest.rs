//! Per-activation interest tokens.
//!
//! A controller calls [`ActivationTracker::activate`] whenever it is (re)activated and
//! carries the returned token into each async call it starts. Results that settle after
//! a newer activation are turned into [`TransportError::Cancelled`] so that they are
//! never applied to view state. The underlying call always runs to completion.

use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use crate::error::TransportError;

#[derive(Debug, Clone, Default)]
pub struct ActivationTracker {
    generation: Arc<AtomicU64>,
}

impl ActivationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&self) -> InterestToken {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        InterestToken {
            tracker: Arc::clone(&self.generation),
            generation,
        }
    }

    /// Withdraws interest from every outstanding token, e.g. when the view is torn down.
    pub fn deactivate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
pub struct InterestToken {
    tracker: Arc<AtomicU64>,
    generation: u64,
}

impl InterestToken {
    pub fn is_current(&self) -> bool {
        self.tracker.load(Ordering::SeqCst) == self.generation
    }

    pub async fn guard<T, F>(&self, call: F) -> Result<T, TransportError>
    where
        F: Future<Output = Result<T, TransportError>>,
    {
        let result = call.await;
        if !self.is_current() {
            return Err(TransportError::Cancelled);
        }
        result
    }
}
