// Process-shared mutex over a lock word stored in shared memory
use crate::error::{MazeError, MazeResult};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

const UNLOCKED: u32 = 0;
const LOCKED: u32 = 1;

// Busy-spin this many times before yielding the CPU
const SPIN_LIMIT: u32 = 64;

/// Mutual exclusion between processes that map the same lock word.
///
/// The word must live in shared memory and start zeroed. Holding the lock
/// is represented by a [`ShmMutexGuard`]; dropping the guard unlocks.
#[derive(Debug, Clone, Copy)]
pub struct ShmMutex<'a> {
    word: &'a AtomicU32,
}

/// RAII guard returned by [`ShmMutex::lock`] and [`ShmMutex::try_lock`]
#[derive(Debug)]
pub struct ShmMutexGuard<'a> {
    word: &'a AtomicU32,
}

impl<'a> ShmMutex<'a> {
    pub fn new(word: &'a AtomicU32) -> Self {
        Self { word }
    }

    /// Try to lock without blocking
    pub fn try_lock(&self) -> Option<ShmMutexGuard<'a>> {
        self.word
            .compare_exchange(UNLOCKED, LOCKED, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| ShmMutexGuard { word: self.word })
    }

    /// Lock the mutex, giving up after `timeout` (None waits forever)
    pub fn lock(&self, timeout: Option<Duration>) -> MazeResult<ShmMutexGuard<'a>> {
        let deadline = timeout.map(|t| (Instant::now() + t, t));
        let mut spins = 0u32;

        loop {
            if self.word.load(Ordering::Relaxed) == UNLOCKED {
                if let Some(guard) = self.try_lock() {
                    return Ok(guard);
                }
            }

            if let Some((deadline, timeout)) = deadline {
                if Instant::now() >= deadline {
                    return Err(MazeError::LockTimeout(timeout));
                }
            }

            if spins < SPIN_LIMIT {
                spins += 1;
                std::hint::spin_loop();
            } else {
                std::thread::yield_now();
            }
        }
    }

    /// Check if mutex is locked
    pub fn is_locked(&self) -> bool {
        self.word.load(Ordering::Relaxed) == LOCKED
    }
}

impl ShmMutexGuard<'_> {
    /// Unlock explicitly (same as dropping the guard)
    pub fn unlock(self) {}
}

impl Drop for ShmMutexGuard<'_> {
    fn drop(&mut self) {
        self.word.store(UNLOCKED, Ordering::Release);
    }
}
