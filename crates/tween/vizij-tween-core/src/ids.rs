//! Identifiers and simple allocators for core entities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Slot index of a tween inside its [`TweenEngine`](crate::engine::TweenEngine).
///
/// Slots are append-only: a removed tween leaves a tombstone and its index is
/// never handed out again, so ids held by callers stay unambiguous.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TweenId(pub u32);

impl TweenId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TweenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tween#{}", self.0)
    }
}

/// Opaque identity of a host object (actor, component, widget, spline, callback receiver).
/// The host decides the encoding; the core only compares and forwards it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u64);

/// Monotonic allocator for TweenId. Once `u32::MAX` has been issued it
/// refuses further ids rather than wrapping back to 0.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_tween: u32,
    exhausted: bool,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn starting_at(next_tween: u32) -> Self {
        Self {
            next_tween,
            exhausted: false,
        }
    }

    #[inline]
    pub fn alloc_tween(&mut self) -> Option<TweenId> {
        if self.exhausted {
            return None;
        }
        let id = TweenId(self.next_tween);
        match self.next_tween.checked_add(1) {
            Some(next) => self.next_tween = next,
            None => self.exhausted = true,
        }
        Some(id)
    }

    /// Number of ids handed out so far.
    #[inline]
    pub fn issued(&self) -> u64 {
        u64::from(self.next_tween) + u64::from(self.exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_tween(), Some(TweenId(0)));
        assert_eq!(alloc.alloc_tween(), Some(TweenId(1)));
        assert_eq!(alloc.issued(), 2);
        assert_eq!(TweenId(7).to_string(), "tween#7");
    }

    #[test]
    fn alloc_never_wraps() {
        let mut alloc = IdAllocator::starting_at(u32::MAX - 1);
        assert_eq!(alloc.alloc_tween(), Some(TweenId(u32::MAX - 1)));
        assert_eq!(alloc.alloc_tween(), Some(TweenId(u32::MAX)));
        assert_eq!(alloc.alloc_tween(), None);
        assert_eq!(alloc.alloc_tween(), None);
        assert_eq!(alloc.issued(), u64::from(u32::MAX) + 1);
    }
}
