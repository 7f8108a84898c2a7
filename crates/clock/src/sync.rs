use crate::source::{LocalClock, ReferenceSource};

/// Estimates the offset between the local clock and a reference clock.
///
/// One probe measures `offset = reference + rtt / 2 - local_at_receive`.
/// Clients that all add their own offset to their local clock read roughly the
/// same shared time, which fixes the phase of their fixed-step loops.
#[derive(Debug, Clone)]
pub struct ClockSync<L> {
    local: L,
    offset: f64,
}

impl<L: LocalClock> ClockSync<L> {
    /// Start unsynchronized: offset 0, i.e. local time.
    pub fn new(local: L) -> Self {
        Self { local, offset: 0.0 }
    }

    pub fn with_offset(local: L, offset: f64) -> Self {
        Self { local, offset }
    }

    /// Run one round-trip probe and return the resulting offset.
    ///
    /// On failure the previous offset is kept and returned; the caller carries
    /// on with reduced precision.
    pub fn measure_offset<S: ReferenceSource + ?Sized>(&mut self, source: &mut S) -> f64 {
        let start = self.local.now_secs();
        match source.probe() {
            Ok(reference) => {
                let end = self.local.now_secs();
                let rtt = end - start;
                self.offset = (reference + rtt / 2.0) - end;
                tracing::info!(offset = self.offset, rtt, "clock offset measured");
            }
            Err(err) => {
                tracing::warn!(%err, offset = self.offset, "clock probe failed, keeping offset");
            }
        }
        self.offset
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Shared time in seconds.
    pub fn now(&self) -> f64 {
        self.local.now_secs() + self.offset
    }

    pub fn local(&self) -> &L {
        &self.local
    }
}
