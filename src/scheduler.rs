use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::constants::MIN_IMAGES;
use crate::error::{SwitcherError, SwitcherResult};
use crate::sequence::ImageSequence;
use crate::state::{Phase, RotationState};

/// Outcome of picking the next image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    /// Rotation stops once this image is shown.
    pub halt: bool,
}

/// Chooses which image comes next.
pub trait IndexStrategy {
    /// The image shown before any tick.
    fn first(&mut self, len: usize) -> usize;

    fn next(&mut self, current: usize, len: usize) -> Selection;
}

/// Walks the sequence front to back, wrapping around when looping.
#[derive(Debug, Clone, Copy)]
pub struct InOrder {
    looping: bool,
}

impl InOrder {
    pub fn new(looping: bool) -> Self {
        Self { looping }
    }
}

impl IndexStrategy for InOrder {
    fn first(&mut self, _len: usize) -> usize {
        0
    }

    fn next(&mut self, current: usize, len: usize) -> Selection {
        let index = (current + 1).checked_rem(len).unwrap_or(0);
        Selection {
            index,
            halt: !self.looping && index + 1 >= len,
        }
    }
}

/// Picks uniformly among every image but the current one.
#[derive(Debug)]
pub struct RandomOrder<R> {
    rng: R,
}

impl<R: Rng> RandomOrder<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> IndexStrategy for RandomOrder<R> {
    fn first(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }

    fn next(&mut self, current: usize, len: usize) -> Selection {
        // No other image to pick.
        if len < MIN_IMAGES {
            return Selection { index: 0, halt: false };
        }
        let mut index = current;
        while index == current {
            index = self.rng.random_range(0..len);
        }
        Selection { index, halt: false }
    }
}

/// Repeating timer advanced by the host loop. Dropping it cancels it.
#[derive(Debug, Clone, Copy)]
pub struct IntervalTimer {
    interval: Duration,
    elapsed: Duration,
}

impl IntervalTimer {
    pub fn new(interval: Duration) -> SwitcherResult<Self> {
        if interval.is_zero() {
            return Err(SwitcherError::configuration("interval must be positive"));
        }
        Ok(Self::armed(interval))
    }

    fn armed(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// Number of periods completed during `dt`.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.elapsed = self.elapsed.saturating_add(dt);
        let due = (self.elapsed.as_nanos() / self.interval.as_nanos()).min(u32::MAX.into()) as u32;
        self.elapsed = self.elapsed.saturating_sub(self.interval.saturating_mul(due));
        due
    }
}

/// Owns the rotation state and the timer that drives it.
pub struct RotationScheduler {
    state: RotationState,
    interval: Duration,
    timer: Option<IntervalTimer>,
    strategy: Box<dyn IndexStrategy>,
    len: usize,
}

impl std::fmt::Debug for RotationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotationScheduler")
            .field("state", &self.state)
            .field("interval", &self.interval)
            .field("timer", &self.timer)
            .field("len", &self.len)
            .finish()
    }
}

impl RotationScheduler {
    /// Fails on a zero interval. The sequence guarantees at least two images.
    pub fn new(
        interval: Duration,
        images: &ImageSequence,
        mut strategy: Box<dyn IndexStrategy>,
    ) -> SwitcherResult<Self> {
        IntervalTimer::new(interval)?;
        let len = images.len();
        let first = strategy.first(len);
        Ok(Self {
            state: RotationState::new(first),
            interval,
            timer: None,
            strategy,
            len,
        })
    }

    pub fn state(&self) -> RotationState {
        self.state
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn start(&mut self) {
        if self.timer.is_some() {
            return;
        }
        self.timer = Some(IntervalTimer::armed(self.interval));
        self.state.phase = Phase::Running;
        debug!(interval_ms = self.interval.as_millis() as u64, "rotation started");
    }

    pub fn stop(&mut self) {
        if self.timer.take().is_none() {
            return;
        }
        self.state.phase = Phase::Stopped;
        debug!(index = self.state.current_index, "rotation stopped");
    }

    pub fn toggle(&mut self) {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Goes back to the first image and stops. The caller shows that image, then restarts.
    pub fn rewind(&mut self) -> usize {
        self.state.current_index = 0;
        self.stop();
        0
    }

    /// Ticks that fell due during `dt`. Zero while stopped.
    pub fn poll(&mut self, dt: Duration) -> u32 {
        self.timer.as_mut().map_or(0, |timer| timer.advance(dt))
    }

    /// Moves to the next image and returns its index. Stops the rotation when the strategy says so.
    pub fn tick(&mut self) -> usize {
        let Selection { index, halt } = self.strategy.next(self.state.current_index, self.len);
        self.state.current_index = index;
        debug!(index, "tick");
        if halt {
            self.stop();
        }
        index
    }
}
