use std::time::{Duration, Instant};

/// Vertical-blank emulation settings.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VBlankConfig {
    /// Display refresh rate in Hz.
    pub refresh_hz: f64,
}

impl VBlankConfig {
    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.refresh_hz.max(1.0))
    }
}

impl Default for VBlankConfig {
    fn default() -> Self {
        Self { refresh_hz: 60.0 }
    }
}

/// Blocks the caller until the next emulated vertical blank.
///
/// Blanks sit on a fixed grid anchored at the first wait. A frame that runs
/// past one or more blanks waits for the next blank on the grid, like the
/// hardware does; the skipped blanks are counted as missed.
#[derive(Debug, Clone)]
pub struct VBlankPacer {
    period: Duration,
    last: Option<Instant>,
    count: u64,
    missed: u64,
}

impl VBlankPacer {
    pub fn new(config: VBlankConfig) -> Self {
        Self {
            period: config.period(),
            last: None,
            count: 0,
            missed: 0,
        }
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Blanks waited for so far.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Blanks that passed while a frame was still being produced.
    #[inline]
    pub fn missed(&self) -> u64 {
        self.missed
    }

    /// Re-anchors the grid at the next wait.
    ///
    /// Call after the display was suspended so the pause is not counted as
    /// missed blanks.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Sleeps until the next blank and returns its instant.
    pub fn wait(&mut self) -> Instant {
        let now = Instant::now();

        let blank = match self.last {
            None => now,
            Some(last) => {
                let (blank, skipped) = next_blank(last, now, self.period);
                if skipped > 0 {
                    self.missed += skipped;
                    log::warn!("vblank: frame overran by {skipped} blank(s)");
                }
                if blank > now {
                    std::thread::sleep(blank - now);
                }
                blank
            }
        };

        self.last = Some(blank);
        self.count += 1;
        blank
    }
}

impl Default for VBlankPacer {
    fn default() -> Self {
        Self::new(VBlankConfig::default())
    }
}

/// First blank strictly after `now` on the grid `last + k * period`, and the
/// number of grid points skipped on the way.
fn next_blank(last: Instant, now: Instant, period: Duration) -> (Instant, u64) {
    let elapsed = now.saturating_duration_since(last);
    let period_ns = period.as_nanos().max(1);
    let k = elapsed.as_nanos() / period_ns + 1;
    let blank = last + Duration::from_nanos((k * period_ns).min(u64::MAX as u128) as u64);
    (blank, (k - 1) as u64)
}
