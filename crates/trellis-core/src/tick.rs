//! Shared periodic tick notifier.
//!
//! Backs the facade's timer-callback API: one notifier delivers a periodic
//! tick to every registered callback. The notifier holds no thread of its
//! own; the host's event pump calls [`TickNotifier::pump`] and the notifier
//! decides from its deadline bookkeeping whether a tick is due.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Callback object receiving periodic ticks.
///
/// `elapsed` is the wall-clock time since the previous tick delivered to the
/// notifier's callbacks (or since the notifier started, for the first tick).
pub trait TickCallback: Send + Sync {
    /// Called once per elapsed tick interval.
    fn on_tick(&self, elapsed: Duration);
}

struct Running {
    next_fire: Instant,
    last_tick: Instant,
}

struct NotifierState {
    callbacks: Vec<Arc<dyn TickCallback>>,
    running: Option<Running>,
}

/// Delivers a fixed-cadence tick to a set of callbacks.
///
/// The cadence is chosen at construction and never changes while the notifier
/// runs; adding or removing callbacks does not reschedule the next tick.
pub struct TickNotifier {
    interval: Duration,
    state: Mutex<NotifierState>,
}

impl TickNotifier {
    /// The default cadence: 60 ticks per second.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / 60);

    /// Create a notifier with the default cadence.
    pub fn new() -> Self {
        Self::with_interval(Self::DEFAULT_INTERVAL)
    }

    /// Create a notifier with a custom cadence.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    pub fn with_interval(interval: Duration) -> Self {
        assert!(!interval.is_zero(), "tick interval must be non-zero");
        Self {
            interval,
            state: Mutex::new(NotifierState {
                callbacks: Vec::new(),
                running: None,
            }),
        }
    }

    /// The configured cadence.
    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Register a callback. The same callback object may be registered once;
    /// re-adding an already-registered callback is a no-op.
    pub fn add_callback(&self, callback: Arc<dyn TickCallback>) {
        let mut state = self.state.lock();
        if state
            .callbacks
            .iter()
            .any(|c| Arc::ptr_eq(c, &callback))
        {
            return;
        }
        state.callbacks.push(callback);
    }

    /// Remove a previously registered callback.
    ///
    /// Removing a callback that was never registered is a no-op. Removal
    /// takes effect for the next tick; a tick already being delivered
    /// completes with the old callback list.
    pub fn remove_callback(&self, callback: &Arc<dyn TickCallback>) {
        let mut state = self.state.lock();
        state.callbacks.retain(|c| !Arc::ptr_eq(c, callback));
    }

    /// Whether no callbacks are registered.
    pub fn is_empty(&self) -> bool {
        self.state.lock().callbacks.is_empty()
    }

    /// Number of registered callbacks.
    pub fn callback_count(&self) -> usize {
        self.state.lock().callbacks.len()
    }

    /// Start delivering ticks. No-op if already running.
    pub fn start(&self) {
        let mut state = self.state.lock();
        if state.running.is_none() {
            let now = Instant::now();
            state.running = Some(Running {
                next_fire: now + self.interval,
                last_tick: now,
            });
            tracing::debug!(target: "trellis_core::tick", interval = ?self.interval, "tick notifier started");
        }
    }

    /// Stop delivering ticks. No-op if not running.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        if state.running.take().is_some() {
            tracing::debug!(target: "trellis_core::tick", "tick notifier stopped");
        }
    }

    /// Whether the notifier is currently delivering ticks.
    pub fn is_running(&self) -> bool {
        self.state.lock().running.is_some()
    }

    /// Duration until the next tick is due, or `None` when stopped.
    pub fn time_until_next(&self) -> Option<Duration> {
        let state = self.state.lock();
        let running = state.running.as_ref()?;
        Some(running.next_fire.saturating_duration_since(Instant::now()))
    }

    /// Deliver a tick if one is due at `now`. Returns whether a tick fired.
    ///
    /// Late pumps coalesce: however far past the deadline `now` is, at most
    /// one tick fires, carrying the full elapsed time, and the next deadline
    /// is rescheduled relative to `now`.
    pub fn pump(&self, now: Instant) -> bool {
        let (callbacks, elapsed) = {
            let mut state = self.state.lock();
            let Some(running) = state.running.as_mut() else {
                return false;
            };
            if now < running.next_fire {
                return false;
            }
            let elapsed = now - running.last_tick;
            running.last_tick = now;
            running.next_fire = now + self.interval;
            (state.callbacks.clone(), elapsed)
        };

        tracing::trace!(target: "trellis_core::tick", ?elapsed, callbacks = callbacks.len(), "tick");
        for callback in callbacks {
            callback.on_tick(elapsed);
        }
        true
    }
}

impl Default for TickNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter(AtomicUsize);

    impl TickCallback for Counter {
        fn on_tick(&self, _elapsed: Duration) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn no_tick_before_deadline() {
        let notifier = TickNotifier::with_interval(Duration::from_millis(10));
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        notifier.add_callback(counter.clone());
        notifier.start();

        assert!(!notifier.pump(Instant::now()));
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn late_pump_coalesces_to_one_tick() {
        let notifier = TickNotifier::with_interval(Duration::from_millis(10));
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        notifier.add_callback(counter.clone());
        notifier.start();

        // Ten intervals late still delivers exactly one tick.
        assert!(notifier.pump(Instant::now() + Duration::from_millis(100)));
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stopped_notifier_never_ticks() {
        let notifier = TickNotifier::with_interval(Duration::from_millis(1));
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        notifier.add_callback(counter.clone());
        assert!(!notifier.pump(Instant::now() + Duration::from_secs(1)));
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn duplicate_add_registers_once() {
        let notifier = TickNotifier::new();
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let cb: Arc<dyn TickCallback> = counter.clone();
        notifier.add_callback(cb.clone());
        notifier.add_callback(cb.clone());
        assert_eq!(notifier.callback_count(), 1);

        notifier.remove_callback(&cb);
        assert!(notifier.is_empty());
        // Removing again is a no-op.
        notifier.remove_callback(&cb);
    }

    #[test]
    fn cadence_unchanged_by_membership() {
        let notifier = TickNotifier::with_interval(Duration::from_millis(10));
        let a = Arc::new(Counter(AtomicUsize::new(0)));
        let b = Arc::new(Counter(AtomicUsize::new(0)));
        notifier.add_callback(a.clone());
        notifier.start();

        let t0 = Instant::now();
        assert!(notifier.pump(t0 + Duration::from_millis(10)));

        // Membership churn between ticks must not move the next deadline.
        notifier.add_callback(b.clone());
        let a_dyn: Arc<dyn TickCallback> = a.clone();
        notifier.remove_callback(&a_dyn);

        assert!(!notifier.pump(t0 + Duration::from_millis(15)));
        assert!(notifier.pump(t0 + Duration::from_millis(20)));
        assert_eq!(b.0.load(Ordering::SeqCst), 1);
        assert_eq!(a.0.load(Ordering::SeqCst), 1);
    }
}
