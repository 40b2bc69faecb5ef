/// Fixed-timestep frame clock.
///
/// The simulation advances in whole frames of `1 / frame_rate` seconds.
/// Real time is accumulated between polls; each poll hands out as many
/// frames as fit in the budget, capped so a stall (terminal resize,
/// suspended process) does not fast-forward the game.

use std::time::{Duration, Instant};

/// Most frames handed out by a single poll.
const MAX_CATCH_UP: u32 = 4;

pub struct FrameClock {
    frame: Duration,
    budget: Duration,
    last: Instant,
}

impl FrameClock {
    pub fn new(frame_rate: u32) -> Self {
        FrameClock {
            frame: Duration::from_secs(1) / frame_rate.max(1),
            budget: Duration::ZERO,
            last: Instant::now(),
        }
    }

    /// Frames due since the previous poll.
    pub fn due(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        self.accumulate(elapsed)
    }

    fn accumulate(&mut self, elapsed: Duration) -> u32 {
        self.budget += elapsed;
        let mut frames = 0;
        while self.budget >= self.frame && frames < MAX_CATCH_UP {
            self.budget -= self.frame;
            frames += 1;
        }
        if frames == MAX_CATCH_UP {
            // Drop the backlog instead of replaying it later.
            self.budget = self.budget.min(self.frame);
        }
        frames
    }

    pub fn frame(&self) -> Duration {
        self.frame
    }
}
