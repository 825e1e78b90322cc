//! Playback signals reported by a media surface and the registry that fans them out.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// A playback notification from the media surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaSignal {
    /// The play head moved; carries the current position in seconds.
    TimeUpdated(f64),
    /// Media metadata became available; carries the total length in seconds.
    MetadataLoaded { duration: f64 },
    /// Playback reached the end of the media.
    Ended,
}

impl MediaSignal {
    /// The kind a listener subscribes to in order to receive this signal.
    pub fn kind(&self) -> SignalKind {
        match self {
            MediaSignal::TimeUpdated(_) => SignalKind::TimeUpdate,
            MediaSignal::MetadataLoaded { .. } => SignalKind::MetadataLoaded,
            MediaSignal::Ended => SignalKind::Ended,
        }
    }
}

/// Signal categories a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    TimeUpdate,
    MetadataLoaded,
    Ended,
}

impl SignalKind {
    pub const ALL: [SignalKind; 3] = [
        SignalKind::TimeUpdate,
        SignalKind::MetadataLoaded,
        SignalKind::Ended,
    ];
}

/// Callback invoked for every signal of the subscribed kind.
///
/// Listeners may run on a decoder thread and are called with the hub locked, so they must not
/// subscribe or drop subscriptions themselves.
pub type Listener = Box<dyn FnMut(&MediaSignal) + Send>;

struct Entry {
    id: u64,
    kind: SignalKind,
    listener: Listener,
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    entries: Vec<Entry>,
    duration: Option<f64>,
}

/// Registry of signal listeners owned by a media surface.
#[derive(Default)]
pub struct SignalHub {
    inner: Mutex<HubInner>,
}

impl std::fmt::Debug for SignalHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("SignalHub")
            .field("listeners", &inner.entries.len())
            .field("duration", &inner.duration)
            .finish()
    }
}

impl SignalHub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register `listener` for signals of `kind`.
    ///
    /// Metadata is sticky: once a duration has been emitted, a new `MetadataLoaded` listener
    /// receives it immediately.
    pub fn subscribe(self: &Arc<Self>, kind: SignalKind, mut listener: Listener) -> Subscription {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;

        if kind == SignalKind::MetadataLoaded {
            if let Some(duration) = inner.duration {
                listener(&MediaSignal::MetadataLoaded { duration });
            }
        }

        inner.entries.push(Entry { id, kind, listener });
        log::trace!("subscribed listener {id} to {kind:?}");

        Subscription {
            hub: Arc::downgrade(self),
            id,
        }
    }

    /// Deliver `signal` to every listener of its kind.
    pub fn emit(&self, signal: MediaSignal) {
        let kind = signal.kind();
        let mut inner = self.inner.lock();
        if let MediaSignal::MetadataLoaded { duration } = signal {
            inner.duration = Some(duration);
        }
        for entry in inner.entries.iter_mut().filter(|e| e.kind == kind) {
            (entry.listener)(&signal);
        }
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.inner.lock().entries.len()
    }

    fn unsubscribe(&self, id: u64) {
        self.inner.lock().entries.retain(|e| e.id != id);
        log::trace!("released listener {id}");
    }
}

/// Guard for a registered listener. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes its listener"]
#[derive(Debug)]
pub struct Subscription {
    hub: Weak<SignalHub>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.unsubscribe(self.id);
        }
    }
}
