//! Debug-only reentrancy guard.
//!
//! The table calls back into caller code through [`Digest`](crate::Digest).
//! A digest that reaches back into the same table while an operation is in
//! flight would observe an operation half done, so every digest call runs
//! under a guard. In debug builds a nested entry panics; in release builds
//! the guard compiles away.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

/// Per-table entry counter. Hold `let _g = self.reentrancy.enter();` for
/// the span that runs caller code.
#[derive(Debug)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    depth: Cell<u32>,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            depth: Cell::new(0),
        }
    }

    /// Enter a guarded section. Panics in debug builds if one is already open.
    #[inline]
    pub(crate) fn enter(&self) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            let d = self.depth.get();
            assert!(d == 0, "reentrancy detected: digest re-entered the table");
            self.depth.set(d + 1);
            ReentrancyGuard {
                owner: self,
                _pd: PhantomData,
            }
        }

        #[cfg(not(debug_assertions))]
        {
            ReentrancyGuard { _pd: PhantomData }
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII token returned by [`DebugReentrancy::enter`].
pub(crate) struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    _pd: PhantomData<&'a ()>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let d = self.owner.depth.get();
            debug_assert!(d > 0);
            self.owner.depth.set(d - 1);
        }
    }
}
