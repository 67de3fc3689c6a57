//! Re-entrancy guard for long-running dashboard operations.
//!
//! Everything runs on the UI thread, so a shared `Cell` is enough. The guard
//! clears the flag on drop, which covers success, error, and a future that is
//! dropped mid-flight.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Rc<Cell<bool>>);

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.0.get()
    }

    /// `None` while another operation holds the flag.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        if self.0.replace(true) {
            return None;
        }
        Some(BusyGuard(self.0.clone()))
    }
}

#[derive(Debug)]
pub struct BusyGuard(Rc<Cell<bool>>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_rejected_until_release() {
        let flag = BusyFlag::new();
        let guard = flag.try_acquire().expect("first acquire");
        assert!(flag.is_busy());
        assert!(flag.try_acquire().is_none());
        drop(guard);
        assert!(!flag.is_busy());
        assert!(flag.try_acquire().is_some());
    }

    #[test]
    fn clones_share_state() {
        let flag = BusyFlag::new();
        let other = flag.clone();
        let _guard = flag.try_acquire().unwrap();
        assert!(other.is_busy());
    }
}
