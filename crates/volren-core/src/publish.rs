//! Single-writer publication of prepared buffers.
//!
//! A [`Published`] slot holds the current version of a value behind an
//! `Arc`. The writer builds a complete replacement off to the side and swaps
//! it in; readers take a snapshot and keep using it for as long as they like.
//! A reader therefore sees either the fully-old or the fully-new value, never
//! one that is mid-write.

use std::sync::{Arc, PoisonError, RwLock};

/// A swap cell for an immutable, shared value.
#[derive(Debug)]
pub struct Published<T> {
    slot: RwLock<Slot<T>>,
}

#[derive(Debug)]
struct Slot<T> {
    value: Arc<T>,
    generation: u64,
}

impl<T> Published<T> {
    /// Creates a slot holding `value` as generation 0.
    pub fn new(value: T) -> Self {
        Self {
            slot: RwLock::new(Slot {
                value: Arc::new(value),
                generation: 0,
            }),
        }
    }

    /// Returns a snapshot of the current value.
    pub fn load(&self) -> Arc<T> {
        Arc::clone(&self.slot.read().unwrap_or_else(PoisonError::into_inner).value)
    }

    /// Returns how many times a value has been published.
    pub fn generation(&self) -> u64 {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).generation
    }

    /// Replaces the current value and returns the previous one.
    pub fn publish(&self, value: T) -> Arc<T> {
        let value = Arc::new(value);
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        slot.generation += 1;
        std::mem::replace(&mut slot.value, value)
    }
}
