//! Render triggering and re-entrancy guard.
//!
//! Edits, settings changes and timer ticks only ever mark the output stale
//! through a [`RenderTrigger`]. A render pass holds a [`RenderTicket`] from
//! the [`RenderGate`] for its whole duration, so a trigger that arrives while
//! a pass is running is folded into one follow-up pass instead of starting a
//! second one.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared "output is stale" flag.
#[derive(Debug, Clone)]
pub struct RenderTrigger {
    dirty: Arc<AtomicBool>,
}

impl Default for RenderTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderTrigger {
    /// A trigger that starts out dirty, so the first pass always runs.
    pub fn new() -> Self {
        Self {
            dirty: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Clear the flag, returning whether it was set.
    pub fn take(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }
}

/// Admits at most one render pass at a time.
#[derive(Debug, Clone, Default)]
pub struct RenderGate {
    in_flight: Arc<AtomicBool>,
}

impl RenderGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a pass, or `None` while another one holds the gate.
    pub fn try_begin(&self) -> Option<RenderTicket> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RenderTicket {
                in_flight: self.in_flight.clone(),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Proof of a running pass. The gate reopens when this is dropped, including
/// when a pass future is dropped before completion.
#[derive(Debug)]
pub struct RenderTicket {
    in_flight: Arc<AtomicBool>,
}

impl Drop for RenderTicket {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}
