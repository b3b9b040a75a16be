use std::{collections::HashMap, time::Duration};

use parking_lot::Mutex;
use tokio::time::Instant;
use warden_model::{marker::UserMarker, Id};
use warden_util::IntHasher;

struct CooldownEntry {
    timestamp: Instant,
    notified: bool,
}

/// An active cooldown of a user.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CooldownHit {
    pub remaining: Duration,
    /// Only `true` the first time the entry was hit
    pub notify: bool,
}

/// Per-user rate limit of a single command.
pub struct CooldownTracker {
    window: Duration,
    entries: Mutex<HashMap<u64, CooldownEntry, IntHasher>>,
}

impl CooldownTracker {
    /// A window of 0 disables the tracker.
    pub fn new(window_ms: u64) -> Self {
        Self {
            window: Duration::from_millis(window_ms),
            entries: Mutex::new(HashMap::default()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn is_disabled(&self) -> bool {
        self.window.is_zero()
    }

    pub fn should_cooldown(&self, user: Id<UserMarker>) -> Option<CooldownHit> {
        if self.is_disabled() {
            return None;
        }

        let mut entries = self.entries.lock();

        Self::check(&mut entries, self.window, user.get(), Instant::now())
    }

    /// Starts a fresh cooldown window for the user.
    pub fn set_cooldown(&self, user: Id<UserMarker>) {
        if self.is_disabled() {
            return;
        }

        let entry = CooldownEntry {
            timestamp: Instant::now(),
            notified: false,
        };

        self.entries.lock().insert(user.get(), entry);
    }

    /// Checks for a cooldown and, if there is none, reserves a window in the same step.
    ///
    /// The reservation must be followed up by either [`set_cooldown`] or [`release`].
    ///
    /// [`set_cooldown`]: CooldownTracker::set_cooldown
    /// [`release`]: CooldownTracker::release
    pub fn acquire(&self, user: Id<UserMarker>) -> Result<(), CooldownHit> {
        if self.is_disabled() {
            return Ok(());
        }

        let now = Instant::now();
        let mut entries = self.entries.lock();

        if let Some(hit) = Self::check(&mut entries, self.window, user.get(), now) {
            return Err(hit);
        }

        let entry = CooldownEntry {
            timestamp: now,
            notified: false,
        };

        entries.insert(user.get(), entry);

        Ok(())
    }

    /// Drops the user's entry so the next attempt is not limited.
    pub fn release(&self, user: Id<UserMarker>) {
        self.entries.lock().remove(&user.get());
    }

    fn check(
        entries: &mut HashMap<u64, CooldownEntry, IntHasher>,
        window: Duration,
        user: u64,
        now: Instant,
    ) -> Option<CooldownHit> {
        let timestamp = entries.get(&user)?.timestamp;
        let elapsed = now.saturating_duration_since(timestamp);

        if elapsed > window {
            entries.remove(&user);

            return None;
        }

        let entry = entries.get_mut(&user)?;
        let notify = !entry.notified;
        entry.notified = true;

        Some(CooldownHit {
            remaining: window - elapsed,
            notify,
        })
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use tokio::time;

    use super::*;

    const USER: Id<UserMarker> = Id::new(1);

    #[tokio::test(start_paused = true)]
    async fn window_progression() {
        let tracker = CooldownTracker::new(3000);
        assert_eq!(tracker.should_cooldown(USER), None);

        tracker.set_cooldown(USER);

        time::advance(Duration::from_millis(1000)).await;
        let hit = tracker.should_cooldown(USER).unwrap();
        assert_eq!(hit.remaining, Duration::from_millis(2000));
        assert!(hit.notify);

        time::advance(Duration::from_millis(500)).await;
        let hit = tracker.should_cooldown(USER).unwrap();
        assert_eq!(hit.remaining, Duration::from_millis(1500));
        assert!(!hit.notify);

        time::advance(Duration::from_millis(1600)).await;
        assert_eq!(tracker.should_cooldown(USER), None);
        assert_eq!(tracker.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn boundary_is_inclusive() {
        let tracker = CooldownTracker::new(1000);
        tracker.set_cooldown(USER);

        time::advance(Duration::from_millis(1000)).await;
        assert!(tracker.should_cooldown(USER).is_some());

        time::advance(Duration::from_millis(1)).await;
        assert!(tracker.should_cooldown(USER).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn set_resets_notification() {
        let tracker = CooldownTracker::new(1000);
        tracker.set_cooldown(USER);

        assert!(tracker.should_cooldown(USER).unwrap().notify);
        assert!(!tracker.should_cooldown(USER).unwrap().notify);

        tracker.set_cooldown(USER);
        assert!(tracker.should_cooldown(USER).unwrap().notify);
    }

    #[tokio::test(start_paused = true)]
    async fn acquire_reserves() {
        let tracker = CooldownTracker::new(5000);

        assert_eq!(tracker.acquire(USER), Ok(()));
        assert!(tracker.acquire(USER).unwrap_err().notify);
        assert!(!tracker.acquire(USER).unwrap_err().notify);

        tracker.release(USER);
        assert_eq!(tracker.acquire(USER), Ok(()));

        // other users are unaffected
        assert_eq!(tracker.acquire(Id::new(2)), Ok(()));
    }

    #[test]
    fn disabled() {
        let tracker = CooldownTracker::new(0);
        tracker.set_cooldown(USER);

        assert!(tracker.is_disabled());
        assert_eq!(tracker.should_cooldown(USER), None);
        assert_eq!(tracker.acquire(USER), Ok(()));
        assert_eq!(tracker.len(), 0);
    }
}
