use tokio::sync::broadcast::{self, error::TryRecvError, Receiver, Sender};
use tracing::debug;

/// Events buffered per subscriber before the oldest are dropped and the
/// receiver sees `Lagged`.
const EVENT_BUFFER: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    FoodEntriesChanged,
    WaterEntriesChanged,
    SettingsChanged,
}

pub type ChangeReceiver = Receiver<ChangeEvent>;

/// Fan-out of store changes to whoever needs to recompute derived stats.
///
/// Clones share one channel. Receivers are polled with `try_recv`, so no
/// runtime is needed.
#[derive(Clone)]
pub struct ChangeNotifier {
    tx: Sender<ChangeEvent>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        let (tx, _) = broadcast::channel(EVENT_BUFFER);
        Self { tx }
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> ChangeReceiver {
        self.tx.subscribe()
    }

    pub fn notify(&self, event: ChangeEvent) {
        // Err only means nobody is listening right now.
        let delivered = self.tx.send(event).unwrap_or(0);
        debug!(?event, delivered, "broadcast change");
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Empties the receiver without blocking; true when anything changed since
/// the last call. Missed events count as a change.
pub fn drain_changes(events: &mut ChangeReceiver) -> bool {
    let mut changed = false;
    loop {
        match events.try_recv() {
            Ok(_) | Err(TryRecvError::Lagged(_)) => changed = true,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subscriber_receives_events() {
        let notifier = ChangeNotifier::new();
        let mut a = notifier.subscribe();
        let mut b = notifier.clone().subscribe();

        notifier.notify(ChangeEvent::SettingsChanged);

        assert_eq!(a.try_recv().unwrap(), ChangeEvent::SettingsChanged);
        assert_eq!(b.try_recv().unwrap(), ChangeEvent::SettingsChanged);
        assert_eq!(a.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_notify_without_subscribers() {
        let notifier = ChangeNotifier::new();
        notifier.notify(ChangeEvent::FoodEntriesChanged);

        let kept = notifier.subscribe();
        drop(notifier.subscribe());
        assert_eq!(notifier.subscriber_count(), 1);
        drop(kept);
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn test_slow_subscriber_lags() {
        let notifier = ChangeNotifier::new();
        let mut rx = notifier.subscribe();
        for _ in 0..EVENT_BUFFER + 3 {
            notifier.notify(ChangeEvent::WaterEntriesChanged);
        }

        assert_eq!(rx.try_recv(), Err(TryRecvError::Lagged(3)));
        assert_eq!(rx.try_recv().unwrap(), ChangeEvent::WaterEntriesChanged);
    }

    #[test]
    fn test_drain_changes() {
        let notifier = ChangeNotifier::new();
        let mut rx = notifier.subscribe();
        assert!(!drain_changes(&mut rx));

        notifier.notify(ChangeEvent::FoodEntriesChanged);
        notifier.notify(ChangeEvent::SettingsChanged);
        assert!(drain_changes(&mut rx));
        assert!(!drain_changes(&mut rx));

        for _ in 0..EVENT_BUFFER * 2 {
            notifier.notify(ChangeEvent::WaterEntriesChanged);
        }
        assert!(drain_changes(&mut rx));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }
}
