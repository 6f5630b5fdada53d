//! Simulated thinking time before a bot response

use rand::Rng;
use std::time::Duration;

pub const DEFAULT_MIN: Duration = Duration::from_millis(800);
pub const DEFAULT_MAX: Duration = Duration::from_millis(1300);

/// How long a turn waits before it is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThinkingDelay {
    /// Uniform in `[min, max)`
    Random { min: Duration, max: Duration },
    Fixed(Duration),
}

impl Default for ThinkingDelay {
    fn default() -> Self {
        ThinkingDelay::Random {
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
        }
    }
}

impl ThinkingDelay {
    /// Random delay in `[min, max)`; collapses to `min` when the range is empty
    pub fn between(min: Duration, max: Duration) -> Self {
        if max > min {
            ThinkingDelay::Random { min, max }
        } else {
            ThinkingDelay::Fixed(min)
        }
    }

    pub fn next_delay(&self) -> Duration {
        match *self {
            ThinkingDelay::Random { min, max } if max > min => {
                rand::thread_rng().gen_range(min..max)
            }
            ThinkingDelay::Random { min, .. } | ThinkingDelay::Fixed(min) => min,
        }
    }
}
