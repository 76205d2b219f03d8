//! Reusable element fixtures.
//!
//! - [`InstanceLedger`]: tracks every specimen it has issued. Leaks show up
//!   in [`InstanceLedger::live`]; double drops panic.
//! - [`Specimen`]: ledger-tracked element whose copies fail once the
//!   ledger's copy budget runs out.
//! - [`FailingFactory`]: builds specimens, failing deterministically after N
//!   successful calls.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use slotvec_core::{ElementError, TryClone};

/// Registry of every [`Specimen`] built against it.
///
/// Each specimen gets an id and a liveness flag. Dropping a specimen clears
/// its flag; dropping one whose flag is already clear panics, so a double
/// drop anywhere in the code under test fails the test immediately.
pub struct InstanceLedger {
    alive: Mutex<Vec<bool>>,
    dropped: AtomicUsize,
    copies: AtomicUsize,
    copy_budget: AtomicUsize,
}

impl InstanceLedger {
    /// A ledger with unlimited copies.
    pub fn new() -> Arc<Self> {
        Self::with_copy_budget(usize::MAX)
    }

    /// A ledger whose specimens may be copied `budget` times in total;
    /// every copy after that fails.
    pub fn with_copy_budget(budget: usize) -> Arc<Self> {
        Arc::new(Self {
            alive: Mutex::new(Vec::new()),
            dropped: AtomicUsize::new(0),
            copies: AtomicUsize::new(0),
            copy_budget: AtomicUsize::new(budget),
        })
    }

    /// Build a new tracked specimen holding `value`.
    pub fn specimen(self: &Arc<Self>, value: i64) -> Specimen {
        let id = {
            let mut alive = self.flags();
            alive.push(true);
            alive.len() - 1
        };
        Specimen {
            id,
            value,
            ledger: Arc::clone(self),
        }
    }

    /// Replace the remaining copy budget.
    pub fn set_copy_budget(&self, budget: usize) {
        self.copy_budget.store(budget, Ordering::Relaxed);
    }

    /// Number of specimens currently alive.
    pub fn live(&self) -> usize {
        self.flags().iter().filter(|&&alive| alive).count()
    }

    /// Total specimens ever built (originals and copies).
    pub fn constructed(&self) -> usize {
        self.flags().len()
    }

    /// Total specimens dropped.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Total successful copies.
    pub fn copies(&self) -> usize {
        self.copies.load(Ordering::Relaxed)
    }

    fn try_spend_copy(&self) -> bool {
        self.copy_budget
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |left| left.checked_sub(1))
            .is_ok()
    }

    fn retire(&self, id: usize) {
        let mut alive = self.flags();
        assert!(alive[id], "specimen #{id} dropped twice");
        alive[id] = false;
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    fn flags(&self) -> MutexGuard<'_, Vec<bool>> {
        self.alive.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A tracked element holding an `i64`.
///
/// Equality and `Debug` look at the value only, so arrays of specimens can
/// be compared against expected value sequences.
pub struct Specimen {
    id: usize,
    value: i64,
    ledger: Arc<InstanceLedger>,
}

impl Specimen {
    /// The payload.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Ledger-assigned identity; copies get fresh ids.
    pub fn id(&self) -> usize {
        self.id
    }
}

impl TryClone for Specimen {
    fn try_clone(&self) -> Result<Self, ElementError> {
        if !self.ledger.try_spend_copy() {
            return Err(ElementError::copy(format!(
                "copy budget exhausted copying specimen #{}",
                self.id
            )));
        }
        self.ledger.copies.fetch_add(1, Ordering::Relaxed);
        Ok(self.ledger.specimen(self.value))
    }
}

impl Drop for Specimen {
    fn drop(&mut self) {
        self.ledger.retire(self.id);
    }
}

impl PartialEq for Specimen {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialEq<i64> for Specimen {
    fn eq(&self, other: &i64) -> bool {
        self.value == *other
    }
}

impl fmt::Debug for Specimen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Builds specimens, succeeding `succeed_count` times and failing on every
/// call after that.
///
/// `FailingFactory::new(&ledger, k - 1)` therefore fails for the first time
/// on its k-th call.
pub struct FailingFactory {
    ledger: Arc<InstanceLedger>,
    succeed_count: usize,
    call_count: AtomicUsize,
}

impl FailingFactory {
    /// Create a factory that succeeds `succeed_count` times then fails.
    pub fn new(ledger: &Arc<InstanceLedger>, succeed_count: usize) -> Self {
        Self {
            ledger: Arc::clone(ledger),
            succeed_count,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Build a specimen holding `value`, or fail if the quota is used up.
    pub fn build(&self, value: i64) -> Result<Specimen, ElementError> {
        let n = self.call_count.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            return Err(ElementError::construction(format!(
                "deliberate failure after {} successful constructions",
                self.succeed_count
            )));
        }
        Ok(self.ledger.specimen(value))
    }

    /// How many times `build()` has been called.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Reset the call counter.
    pub fn reset(&self) {
        self.call_count.store(0, Ordering::Relaxed);
    }
}
