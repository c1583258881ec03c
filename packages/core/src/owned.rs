//! Ownership of native handles.
//!
//! A handle issued by the runtime is just an identifier; something has to
//! decide who releases the object behind it. [`HandleOwner`] records that
//! decision as a `freeable` flag next to the handle: owners created by
//! this process free on drop, adopted views of foreign handles never do.

/// A native resource reachable through a copyable handle.
pub trait NativeResource: Copy + Eq {
    /// The null sentinel for this handle type.
    const NULL: Self;

    /// Deep-duplicate the object behind the handle.
    ///
    /// Precondition: the handle is valid and non-null.
    fn duplicate(self) -> Self;

    /// Release the object behind the handle. Best-effort; never panics.
    fn release(self);
}

/// A handle plus the obligation (or not) to release it.
#[derive(Debug)]
pub struct HandleOwner<H: NativeResource> {
    handle: H,
    freeable: bool,
}

impl<H: NativeResource> HandleOwner<H> {
    /// Adopt an existing handle.
    ///
    /// The null sentinel can only be adopted non-freeable - there is
    /// nothing behind it to release.
    #[track_caller]
    pub fn adopt(handle: H, freeable: bool) -> Self {
        if handle == H::NULL && freeable {
            panic!("the null handle cannot be adopted as freeable");
        }
        HandleOwner { handle, freeable }
    }

    pub fn handle(&self) -> H {
        self.handle
    }

    pub fn freeable(&self) -> bool {
        self.freeable
    }

    pub fn is_null(&self) -> bool {
        self.handle == H::NULL
    }
}

impl<H: NativeResource> Clone for HandleOwner<H> {
    /// Deep duplication. The copy is always freeable, regardless of the
    /// source; a null owner clones to a null, non-freeable owner.
    fn clone(&self) -> Self {
        if self.is_null() {
            HandleOwner {
                handle: H::NULL,
                freeable: false,
            }
        } else {
            HandleOwner {
                handle: self.handle.duplicate(),
                freeable: true,
            }
        }
    }
}

impl<H: NativeResource> Drop for HandleOwner<H> {
    fn drop(&mut self) {
        if self.freeable && !self.is_null() {
            self.handle.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    thread_local! {
        static RELEASED: Cell<u32> = const { Cell::new(0) };
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct FakeHandle(u32);

    impl NativeResource for FakeHandle {
        const NULL: Self = FakeHandle(0);

        fn duplicate(self) -> Self {
            FakeHandle(self.0 + 100)
        }

        fn release(self) {
            RELEASED.with(|r| r.set(r.get() + 1));
        }
    }

    #[test]
    fn drop_releases_only_freeable() {
        RELEASED.with(|r| r.set(0));
        drop(HandleOwner::adopt(FakeHandle(1), true));
        drop(HandleOwner::adopt(FakeHandle(2), false));
        assert_eq!(RELEASED.with(|r| r.get()), 1);
    }

    #[test]
    fn null_is_never_released() {
        RELEASED.with(|r| r.set(0));
        drop(HandleOwner::adopt(FakeHandle::NULL, false));
        assert_eq!(RELEASED.with(|r| r.get()), 0);
    }

    #[test]
    fn clone_duplicates_and_is_freeable() {
        let owner = HandleOwner::adopt(FakeHandle(1), false);
        let copy = owner.clone();
        assert_ne!(copy.handle(), owner.handle());
        assert!(copy.freeable());
    }

    #[test]
    fn clone_of_null_stays_null() {
        let owner = HandleOwner::adopt(FakeHandle::NULL, false);
        let copy = owner.clone();
        assert!(copy.is_null());
        assert!(!copy.freeable());
    }

    #[test]
    #[should_panic(expected = "null handle")]
    fn adopting_null_as_freeable_is_fatal() {
        let _ = HandleOwner::adopt(FakeHandle::NULL, true);
    }
}
