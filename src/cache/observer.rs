//! Reporting hook for cache outcomes
//!
//! Cache I/O failures never reach the caller as errors. They are reported
//! here instead, so the application can log them and tests can assert on
//! them.

use std::sync::Mutex;

/// Which cache produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Record,
    Image,
}

impl CacheKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKind::Record => "recipe",
            CacheKind::Image => "image",
        }
    }
}

/// One cache read or write outcome, reported to a [`CacheObserver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// Artifact was read and is usable
    Hit { kind: CacheKind, id: String },
    /// No artifact stored for the id
    Miss { kind: CacheKind, id: String },
    /// Artifact exists but could not be parsed or decoded
    Corrupt { kind: CacheKind, id: String, reason: String },
    /// Artifact was written, replacing any previous one
    Stored { kind: CacheKind, id: String },
    /// Write was attempted and failed; any previous artifact is kept
    WriteFailed { kind: CacheKind, id: String, reason: String },
    /// Identifier was refused as a storage key
    InvalidKey { kind: CacheKind, id: String },
}

impl CacheEvent {
    pub fn kind(&self) -> CacheKind {
        match self {
            CacheEvent::Hit { kind, .. }
            | CacheEvent::Miss { kind, .. }
            | CacheEvent::Corrupt { kind, .. }
            | CacheEvent::Stored { kind, .. }
            | CacheEvent::WriteFailed { kind, .. }
            | CacheEvent::InvalidKey { kind, .. } => *kind,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            CacheEvent::Hit { id, .. }
            | CacheEvent::Miss { id, .. }
            | CacheEvent::Corrupt { id, .. }
            | CacheEvent::Stored { id, .. }
            | CacheEvent::WriteFailed { id, .. }
            | CacheEvent::InvalidKey { id, .. } => id,
        }
    }
}

pub trait CacheObserver: Send + Sync {
    fn on_event(&self, event: &CacheEvent);
}

/// Forwards cache events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl CacheObserver for LogObserver {
    fn on_event(&self, event: &CacheEvent) {
        match event {
            CacheEvent::Hit { kind, id } => log::debug!("{} cache hit for {}", kind.as_str(), id),
            CacheEvent::Miss { kind, id } => log::info!("{} cache miss for {}", kind.as_str(), id),
            CacheEvent::Corrupt { kind, id, reason } => log::warn!(
                "Ignoring unreadable {} cache entry for {}: {}",
                kind.as_str(),
                id,
                reason
            ),
            CacheEvent::Stored { kind, id } => log::debug!("Cached {} for {}", kind.as_str(), id),
            CacheEvent::WriteFailed { kind, id, reason } => {
                log::warn!("Failed to cache {} for {}: {}", kind.as_str(), id, reason)
            }
            CacheEvent::InvalidKey { kind, id } => {
                log::warn!("Refusing to use {:?} as a {} cache key", id, kind.as_str())
            }
        }
    }
}

/// Keeps every event in memory, for inspection in tests and diagnostics
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<CacheEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CacheEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Count events matching a predicate
    pub fn count(&self, pred: impl Fn(&CacheEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

impl CacheObserver for RecordingObserver {
    fn on_event(&self, event: &CacheEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
