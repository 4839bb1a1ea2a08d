#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Phase {
    Stopped, // No timer armed, ticks are never observed
    Running, // Interval timer armed
}

/// Position in the image sequence plus whether rotation is live.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct RotationState {
    pub current_index: usize,
    pub phase: Phase,
}

impl RotationState {
    pub fn new(current_index: usize) -> Self {
        Self {
            current_index,
            phase: Phase::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}
