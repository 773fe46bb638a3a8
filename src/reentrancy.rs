//! Debug-only probe guard.
//!
//! `SlotHashMap` calls into user code (`K: Hash`, `K: Eq`) while it walks its
//! index. A key whose `Eq` reaches back into the same map would observe the
//! index mid-probe. `ProbeGuard` marks the map busy for the duration of each
//! such section; entering while busy panics in debug builds. Release builds
//! keep only the `!Send`/`!Sync` marker.

use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug)]
pub struct ProbeGuard {
    #[cfg(debug_assertions)]
    busy: Cell<Option<&'static str>>,
    // The map is single-threaded; keep it !Send + !Sync.
    _single_thread: PhantomData<*mut ()>,
}

impl ProbeGuard {
    pub const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            busy: Cell::new(None),
            _single_thread: PhantomData,
        }
    }

    /// Mark the map busy with `op` until the returned scope is dropped.
    ///
    /// Panics in debug builds if another operation is still in progress.
    #[inline]
    pub fn enter(&self, op: &'static str) -> ProbeScope<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.busy.get() {
                panic!("reentrant `{op}` on a map while `{outer}` is probing it");
            }
            self.busy.set(Some(op));
            return ProbeScope { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            return ProbeScope { _owner: PhantomData };
        }
    }

    /// Whether a guarded section is currently open. Always `false` in
    /// release builds.
    pub fn is_busy(&self) -> bool {
        #[cfg(debug_assertions)]
        return self.busy.get().is_some();
        #[cfg(not(debug_assertions))]
        return false;
    }
}

impl Default for ProbeGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Open guarded section; closes on drop.
pub struct ProbeScope<'a> {
    #[cfg(debug_assertions)]
    owner: &'a ProbeGuard,
    #[cfg(not(debug_assertions))]
    _owner: PhantomData<&'a ()>,
}

impl Drop for ProbeScope<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.busy.get().is_some());
            self.owner.busy.set(None);
        }
    }
}
