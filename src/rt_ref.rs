//! Wait-free, lock-free shared reference primitive for passing owned data
//! between the real-time audio thread and control threads.
//!
//! This is a from-scratch reference-counted pointer, not a wrapper around
//! [`std::sync::Arc`], because it mirrors a specific invariant the rest of
//! this crate relies on: the thread that drives the retain count to zero
//! races exactly one other thread doing the same through a dedicated
//! "zombi" compare-and-swap, and only the CAS winner frees the control
//! block. `Arc` gives the same net effect internally, but does not expose
//! the race as a primitive other code in this crate (the scheduler's
//! cross-thread note/callback handles) can reuse directly.
//!
//! Constructing two [`RtRef`]s from the same raw pointer is undefined
//! behavior — there is no way to recover the original owner. Don't do it.

use std::any::Any;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, AtomicIsize, Ordering};

#[cfg(any(test, feature = "rt-ref-debug"))]
mod leak_tracker {
    use std::collections::HashSet;
    use std::sync::Mutex;

    static LIVE_CELLS: Mutex<Option<HashSet<usize>>> = Mutex::new(None);

    pub(super) fn track(addr: usize) {
        let mut guard = LIVE_CELLS.lock().unwrap();
        let set = guard.get_or_insert_with(HashSet::new);
        assert!(set.insert(addr), "RtRef: double-initialized from the same address {addr:#x}");
    }

    pub(super) fn untrack(addr: usize) {
        let mut guard = LIVE_CELLS.lock().unwrap();
        if let Some(set) = guard.as_mut() {
            set.remove(&addr);
        }
    }
}

struct RtRefCounter<T: ?Sized> {
    references: AtomicIsize,
    /// `false` until the retain count first reaches zero; the CAS that
    /// flips this to `true` is the sole deleter.
    zombi: AtomicBool,
    ptr: *mut T,
}

impl<T: ?Sized> RtRefCounter<T> {
    fn retain(&self) {
        self.references.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns `true` if this call was the one that must delete the payload.
    fn release(&self) -> bool {
        let prev = self.references.fetch_sub(1, Ordering::AcqRel);
        if prev != 1 {
            return false;
        }
        self.zombi
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// A wait-free shared pointer to a `T`, real-time safe to clone and drop.
///
/// Allocation only happens in [`RtRef::new`]; [`Clone`] and [`Drop`] never
/// allocate and never block, making them safe to call from the audio
/// rendering thread.
pub struct RtRef<T: ?Sized> {
    counter: *mut RtRefCounter<T>,
}

// SAFETY: the only mutable state reachable through `counter` is the atomic
// refcount and zombi flag; access to `T` through `Deref` is shared (`&T`).
unsafe impl<T: ?Sized + Sync + Send> Send for RtRef<T> {}
unsafe impl<T: ?Sized + Sync + Send> Sync for RtRef<T> {}

impl<T> RtRef<T> {
    /// Takes ownership of `value`, initializing the retain count to 1.
    pub fn new(value: T) -> Self {
        Self::from_box(Box::new(value))
    }
}

impl<T: ?Sized> RtRef<T> {
    /// Takes ownership of an already-boxed value, e.g. a `Box<dyn Any>`
    /// produced by an upstream trait-object conversion.
    pub fn from_box(value: Box<T>) -> Self {
        let ptr = Box::into_raw(value);
        let counter = Box::into_raw(Box::new(RtRefCounter {
            references: AtomicIsize::new(1),
            zombi: AtomicBool::new(false),
            ptr,
        }));
        #[cfg(any(test, feature = "rt-ref-debug"))]
        leak_tracker::track(counter as usize);
        Self { counter }
    }

    fn counter(&self) -> &RtRefCounter<T> {
        // SAFETY: `counter` is only freed by the release() CAS winner, and
        // that only happens after the last RtRef referencing it is gone.
        unsafe { &*self.counter }
    }
}

impl<T: ?Sized> Deref for RtRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the payload outlives every RtRef that can observe it,
        // by the same argument as counter().
        unsafe { &*self.counter().ptr }
    }
}

impl<T: ?Sized> Clone for RtRef<T> {
    fn clone(&self) -> Self {
        self.counter().retain();
        Self { counter: self.counter }
    }
}

impl<T: ?Sized> Drop for RtRef<T> {
    fn drop(&mut self) {
        if self.counter().release() {
            let addr = self.counter as usize;
            // SAFETY: we won the zombi CAS: no other RtRef can still be
            // dereferencing this payload or control block.
            unsafe {
                let counter = Box::from_raw(self.counter);
                drop(Box::from_raw(counter.ptr));
            }
            #[cfg(any(test, feature = "rt-ref-debug"))]
            leak_tracker::untrack(addr);
            let _ = addr;
        }
    }
}

/// A shared reference restricted to a dynamically downcast view of a common
/// base type `TBase`, mirroring the two-template-parameter form of the
/// original `Ref<T, T_BASE>`.
///
/// Dereferencing performs a runtime downcast from `TBase` to `T` and is
/// `None` if the held object is not actually a `T`.
pub struct RtRefView<T, TBase: ?Sized> {
    base: RtRef<TBase>,
    _marker: std::marker::PhantomData<T>,
}

impl<T: 'static, TBase: Any + ?Sized> RtRefView<T, TBase> {
    pub fn new(base: RtRef<TBase>) -> Self {
        Self { base, _marker: std::marker::PhantomData }
    }

    /// Downcasts the held object to `T`, or `None` if it isn't one.
    pub fn get(&self) -> Option<&T>
    where
        TBase: 'static,
    {
        (&*self.base as &dyn Any).downcast_ref::<T>()
    }

    pub fn is_present(&self) -> bool
    where
        TBase: 'static,
    {
        self.get().is_some()
    }
}

impl<T, TBase: ?Sized> Clone for RtRefView<T, TBase> {
    fn clone(&self) -> Self {
        Self { base: self.base.clone(), _marker: std::marker::PhantomData }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct DropCounter(Arc<AtomicUsize>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn retain_release_deletes_exactly_once() {
        let drops = Arc::new(AtomicUsize::new(0));
        let r1 = RtRef::new(DropCounter(Arc::clone(&drops)));
        let r2 = r1.clone();
        let r3 = r2.clone();

        assert_eq!(drops.load(Ordering::SeqCst), 0);
        drop(r1);
        assert_eq!(drops.load(Ordering::SeqCst), 0);
        drop(r2);
        assert_eq!(drops.load(Ordering::SeqCst), 0);
        drop(r3);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_release_deletes_exactly_once() {
        let drops = Arc::new(AtomicUsize::new(0));
        let r = RtRef::new(DropCounter(Arc::clone(&drops)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let clone = r.clone();
                std::thread::spawn(move || drop(clone))
            })
            .collect();
        drop(r);

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn deref_reads_payload() {
        let r = RtRef::new(42_i32);
        assert_eq!(*r, 42);
    }

    struct Circle(f64);
    struct Square(f64);

    #[test]
    fn derived_view_downcasts() {
        let boxed: Box<dyn Any> = Box::new(Circle(2.0));
        let base: RtRef<dyn Any> = RtRef::from_box(boxed);
        let circle_view: RtRefView<Circle, dyn Any> = RtRefView::new(base.clone());
        let square_view: RtRefView<Square, dyn Any> = RtRefView::new(base);

        assert!(circle_view.is_present());
        assert!(!square_view.is_present());
    }
}
