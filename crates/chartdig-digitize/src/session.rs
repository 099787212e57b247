//! Latest-wins re-invocation
//!
//! A [`Session`] owns the published result of repeated digitizations for
//! one caller. Each run takes a [`Ticket`] from [`Session::begin`]; a run
//! that finishes after a newer one was started is superseded and its
//! result is discarded, so a slow stale run can never overwrite a newer
//! result.

use std::sync::{Mutex, MutexGuard};

/// Proof that a run was started, carrying its generation.
#[derive(Debug, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Outcome of [`Session::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// The result is now the session's latest
    Published,
    /// A newer run was started; the result was dropped
    Superseded { latest: u64 },
}

struct State<T> {
    generation: u64,
    published: Option<(u64, T)>,
}

/// Holder of the most recent result.
pub struct Session<T> {
    state: Mutex<State<T>>,
}

impl<T> Default for Session<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Session<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                generation: 0,
                published: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a run, superseding every earlier ticket.
    pub fn begin(&self) -> Ticket {
        let mut state = self.lock();
        state.generation += 1;
        Ticket {
            generation: state.generation,
        }
    }

    /// Generation of the most recently started run.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.lock().generation == ticket.generation
    }

    /// Publish a run's result if no newer run was started.
    pub fn complete(&self, ticket: Ticket, result: T) -> Commit {
        let mut state = self.lock();
        if ticket.generation != state.generation {
            log::debug!(
                "session: run {} superseded by {}",
                ticket.generation,
                state.generation
            );
            return Commit::Superseded {
                latest: state.generation,
            };
        }
        state.published = Some((ticket.generation, result));
        Commit::Published
    }

    /// Begin, run and complete in one call.
    pub fn run<F: FnOnce() -> T>(&self, f: F) -> Commit {
        let ticket = self.begin();
        let result = f();
        self.complete(ticket, result)
    }

    /// Generation of the published result, if any.
    pub fn published_generation(&self) -> Option<u64> {
        self.lock().published.as_ref().map(|(g, _)| *g)
    }

    /// Apply `f` to the published result.
    pub fn with_latest<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.lock().published.as_ref().map(|(_, r)| f(r))
    }

    /// Clone of the published result.
    pub fn latest(&self) -> Option<T>
    where
        T: Clone,
    {
        self.with_latest(T::clone)
    }
}
