//! Symlink cycle detection via (dev, ino) fingerprints recorded at
//! power-of-two descent depths, ported from gnulib's `cycle-check.c`.
//!
//! Recording only at powers of two bounds the extra storage to
//! `O(log depth)` while still catching any cycle within one
//! power-of-two's worth of extra descents (Brent's tortoise-and-hare
//! idea applied to directory traversal instead of sequence iteration).

/// A (device, inode) pair identifying a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DevIno {
    /// Device number, as returned by `lstat`.
    pub dev: u64,
    /// Inode number, as returned by `lstat`.
    pub ino: u64,
}

/// Running state for one traversal. Create with [`CycleCheck::new`] and
/// call [`CycleCheck::check`] once per descended component.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleCheck {
    magic: DevIno,
    chdir_counter: u64,
}

impl CycleCheck {
    /// Start a fresh traversal with the counter zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more descent to `current` and report whether it closes
    /// a cycle with a previously recorded ancestor.
    ///
    /// Every time `chdir_counter` reaches a new power of two, `current`
    /// is latched as the new watchpoint; a later call whose `current`
    /// equals the watchpoint indicates a cycle.
    pub fn check(&mut self, current: DevIno) -> bool {
        if self.chdir_counter == 0 {
            self.magic = current;
        } else if self.magic == current {
            return true;
        }

        self.chdir_counter += 1;
        if self.chdir_counter.is_power_of_two() {
            self.magic = current;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_cycle_on_distinct_entries() {
        let mut cc = CycleCheck::new();
        for i in 0..32 {
            assert!(!cc.check(DevIno { dev: 1, ino: i }));
        }
    }

    #[test]
    fn watchpoint_tracks_the_latest_power_of_two() {
        let mut cc = CycleCheck::new();
        let a = DevIno { dev: 2, ino: 100 };
        assert!(!cc.check(a));
        let b = DevIno { dev: 2, ino: 101 };
        assert!(!cc.check(b));
        // chdir_counter is now 2 (a power of two): b became the watchpoint.
        assert!(cc.check(b));
    }
}
