//! Process-wide named locks for collaborators that touch shared font
//! machinery. The object model itself takes no locks.
//!
//! Global ordering: the render-resource lock is always taken before the
//! factory-cache lock. Taking them in the other order on one thread is a
//! bug in the caller; it is reported loudly rather than silently
//! reordered.

use lazy_static::lazy_static;
use std::cell::Cell;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockKind {
    /// Guards the system font-render resource.
    FontRender,
    /// Guards the font-factory cache.
    FontFactory,
}

impl LockKind {
    fn bit(self) -> u8 {
        match self {
            LockKind::FontRender => 0b01,
            LockKind::FontFactory => 0b10,
        }
    }
}

pub struct NamedLock {
    kind: LockKind,
    mutex: Mutex<()>,
}

lazy_static! {
    pub static ref FONT_RENDER_LOCK: NamedLock = NamedLock::new(LockKind::FontRender);
    pub static ref FONT_FACTORY_LOCK: NamedLock = NamedLock::new(LockKind::FontFactory);
}

thread_local! {
    static HELD: Cell<u8> = const { Cell::new(0) };
}

impl NamedLock {
    fn new(kind: LockKind) -> Self {
        Self {
            kind,
            mutex: Mutex::new(()),
        }
    }

    pub fn kind(&self) -> LockKind {
        self.kind
    }

    pub fn lock(&self) -> LockGuard<'_> {
        if self.kind == LockKind::FontRender {
            let held = HELD.with(Cell::get);
            if held & LockKind::FontFactory.bit() != 0 {
                tracing::error!(
                    "lock order violation: font render lock requested while \
                     font factory lock is held"
                );
            }
        }
        let guard = self.mutex.lock().unwrap_or_else(PoisonError::into_inner);
        HELD.with(|held| held.set(held.get() | self.kind.bit()));
        LockGuard {
            kind: self.kind,
            _guard: guard,
        }
    }
}

pub struct LockGuard<'a> {
    kind: LockKind,
    _guard: MutexGuard<'a, ()>,
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        HELD.with(|held| held.set(held.get() & !self.kind.bit()));
    }
}
