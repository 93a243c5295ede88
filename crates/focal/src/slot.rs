//! Generation-guarded result slots.
//!
//! In-flight work is never cancelled. Each request takes a generation from its slot, and a result
//! is only stored if no newer request was issued meanwhile; older results are dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Request id issued by a [`ResultSlot`]; increases by one per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Idle,
    Running,
    Done,
    Superseded,
    /// The newest request ended with an error; the previous value, if any, is still stored.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied,
    Superseded,
}

#[derive(Debug)]
struct Inner<T> {
    issued: u64,
    applied: u64,
    failed: u64,
    value: Option<Arc<T>>,
}

#[derive(Debug)]
pub struct ResultSlot<T> {
    name: &'static str,
    inner: Mutex<Inner<T>>,
}

impl<T> ResultSlot<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Mutex::new(Inner {
                issued: 0,
                applied: 0,
                failed: 0,
                value: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a request; any earlier generation still running becomes stale.
    pub fn begin(&self) -> Generation {
        let mut inner = self.lock();
        inner.issued += 1;
        Generation(inner.issued)
    }

    /// Stores `value` if `generation` is still the newest request.
    pub fn commit(&self, generation: Generation, value: T) -> CommitOutcome {
        let mut inner = self.lock();
        if generation.0 < inner.issued {
            tracing::warn!(
                slot = self.name,
                stale = generation.0,
                latest = inner.issued,
                "dropping superseded result"
            );
            return CommitOutcome::Superseded;
        }
        inner.applied = generation.0;
        inner.value = Some(Arc::new(value));
        CommitOutcome::Applied
    }

    /// Replaces the stored value with `f(current)` if it still belongs to `generation` and no
    /// newer request has started.
    pub fn update(&self, generation: Generation, f: impl FnOnce(&T) -> T) -> CommitOutcome {
        let mut inner = self.lock();
        let current = match &inner.value {
            Some(v) if inner.applied == generation.0 && inner.issued == generation.0 => v.clone(),
            _ => {
                tracing::warn!(slot = self.name, stale = generation.0, "dropping superseded update");
                return CommitOutcome::Superseded;
            }
        };
        inner.value = Some(Arc::new(f(&current)));
        CommitOutcome::Applied
    }

    /// Records that `generation` ended with an error instead of a value.
    pub fn fail(&self, generation: Generation) {
        let mut inner = self.lock();
        inner.failed = inner.failed.max(generation.0);
        tracing::debug!(slot = self.name, failed = generation.0, "request failed");
    }

    pub fn latest(&self) -> Option<Arc<T>> {
        self.lock().value.clone()
    }

    /// The stored value with the generation that produced it.
    pub fn current(&self) -> Option<(Generation, Arc<T>)> {
        let inner = self.lock();
        inner.value.clone().map(|v| (Generation(inner.applied), v))
    }

    pub fn status(&self) -> SlotStatus {
        let inner = self.lock();
        match (inner.issued, inner.applied) {
            (0, _) => SlotStatus::Idle,
            (i, a) if i == a => SlotStatus::Done,
            (i, _) if i == inner.failed => SlotStatus::Failed,
            _ => SlotStatus::Running,
        }
    }

    pub fn status_of(&self, generation: Generation) -> SlotStatus {
        let inner = self.lock();
        if generation.0 == 0 || generation.0 > inner.issued {
            SlotStatus::Idle
        } else if generation.0 < inner.issued {
            SlotStatus::Superseded
        } else if inner.applied == generation.0 {
            SlotStatus::Done
        } else if inner.failed == generation.0 {
            SlotStatus::Failed
        } else {
            SlotStatus::Running
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn late_result_of_older_request_is_dropped() {
        let slot = ResultSlot::new("test");
        let first = slot.begin();
        let second = slot.begin();
        assert_eq!(slot.status(), SlotStatus::Running);

        assert_eq!(slot.commit(second, "second"), CommitOutcome::Applied);
        assert_eq!(slot.commit(first, "first"), CommitOutcome::Superseded);
        assert_eq!(*slot.latest().unwrap(), "second");
        assert_eq!(slot.status(), SlotStatus::Done);
        assert_eq!(slot.status_of(first), SlotStatus::Superseded);
        assert_eq!(slot.status_of(second), SlotStatus::Done);
    }

    #[test]
    fn older_result_is_dropped_even_when_newer_is_still_running() {
        let slot = ResultSlot::new("test");
        let first = slot.begin();
        let _second = slot.begin();
        assert_eq!(slot.commit(first, 1), CommitOutcome::Superseded);
        assert!(slot.latest().is_none());
    }

    #[test]
    fn update_requires_matching_generation() {
        let slot = ResultSlot::new("test");
        assert_eq!(slot.status(), SlotStatus::Idle);
        let g = slot.begin();
        slot.commit(g, 1);
        assert_eq!(slot.update(g, |v| v + 1), CommitOutcome::Applied);
        assert_eq!(*slot.latest().unwrap(), 2);

        let _newer = slot.begin();
        assert_eq!(slot.update(g, |v| v + 1), CommitOutcome::Superseded);
        assert_eq!(*slot.latest().unwrap(), 2);
    }

    #[test]
    fn failed_request_keeps_previous_value() {
        let slot = ResultSlot::new("test");
        let g = slot.begin();
        slot.commit(g, 1);
        let failed = slot.begin();
        assert_eq!(slot.status(), SlotStatus::Running);
        slot.fail(failed);
        assert_eq!(slot.status(), SlotStatus::Failed);
        assert_eq!(slot.status_of(failed), SlotStatus::Failed);
        assert_eq!(slot.current().map(|(r#gen, v)| (r#gen, *v)), Some((g, 1)));

        let next = slot.begin();
        assert_eq!(slot.status(), SlotStatus::Running);
        assert_eq!(slot.commit(next, 2), CommitOutcome::Applied);
        assert_eq!(slot.status(), SlotStatus::Done);
    }

    #[test]
    fn failure_of_a_stale_request_keeps_the_newer_one_running() {
        let slot = ResultSlot::<u32>::new("test");
        let first = slot.begin();
        let second = slot.begin();
        slot.fail(first);
        assert_eq!(slot.status(), SlotStatus::Running);
        assert_eq!(slot.status_of(first), SlotStatus::Superseded);
        slot.fail(second);
        assert_eq!(slot.status(), SlotStatus::Failed);
    }
}
