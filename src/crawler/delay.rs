//! Request pacing and rate-limit backoff
//!
//! This module handles:
//! - Computing the wait before each request (fixed or humanized jitter)
//! - Escalating the wait after rate-limit responses
//! - Resetting the escalation after a successful fetch

use crate::config::ScraperConfig;
use rand::Rng;
use std::f64::consts::PI;
use std::time::Duration;

/// Lower bound for any randomized delay (milliseconds)
pub const MIN_DELAY_MS: u64 = 200;

/// Maximum jitter as a fraction of the base delay
const JITTER_FRACTION: f64 = 0.4;

/// Cap on the backoff multiplier
pub const MAX_BACKOFF_MULTIPLIER: u32 = 8;

/// Computes the pacing delay for one request using the thread-local RNG
///
/// See [`compute_delay_with`] for the exact rules.
pub fn compute_delay(base_ms: u64, randomize: bool) -> u64 {
    compute_delay_with(&mut rand::rng(), base_ms, randomize)
}

/// Computes the pacing delay for one request
///
/// # Rules
///
/// - `randomize == false`: the base delay, unchanged
/// - `randomize == true`: a normal sample (Box-Muller) with standard
///   deviation `0.4 * base / 2`, clamped to `±0.4 * base`, added to the base,
///   and floored at [`MIN_DELAY_MS`]
///
/// # Arguments
///
/// * `rng` - Source of uniform samples
/// * `base_ms` - Configured base delay in milliseconds
/// * `randomize` - Whether to apply jitter
pub fn compute_delay_with<R: Rng>(rng: &mut R, base_ms: u64, randomize: bool) -> u64 {
    if !randomize {
        return base_ms;
    }

    let variance = (base_ms as f64 * JITTER_FRACTION) as i128;

    // u1 in (0, 1] keeps ln() finite
    let u1 = 1.0 - rng.random::<f64>();
    let u2 = rng.random::<f64>();
    let gaussian = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();

    let offset = ((gaussian * variance as f64) / 2.0) as i128;
    let offset = offset.clamp(-variance, variance);

    let delay = (i128::from(base_ms) + offset).max(i128::from(MIN_DELAY_MS));
    u64::try_from(delay).unwrap_or(u64::MAX)
}

/// Consecutive rate-limit tracking
///
/// Each rate-limit response bumps the error count and sets the multiplier to
/// `min(errors * 2, 8)`. A successful fetch resets both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    consecutive_errors: u32,
    multiplier: u32,
}

impl Backoff {
    /// Creates a backoff tracker at baseline
    pub fn new() -> Self {
        Self {
            consecutive_errors: 0,
            multiplier: 1,
        }
    }

    /// Records a rate-limit response and returns the new multiplier
    pub fn record_rate_limit(&mut self) -> u32 {
        self.consecutive_errors = self.consecutive_errors.saturating_add(1);
        self.multiplier = self
            .consecutive_errors
            .saturating_mul(2)
            .min(MAX_BACKOFF_MULTIPLIER);
        self.multiplier
    }

    /// Returns to baseline after a successful request
    pub fn reset(&mut self) {
        self.consecutive_errors = 0;
        self.multiplier = 1;
    }

    /// Number of rate-limit responses since the last success
    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    /// Current multiplier applied to the base delay
    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}

/// Pacing policy for a run
///
/// Combines the configured base delay, whether stealth pacing is on, whether
/// delays are jittered, and the current backoff state.
#[derive(Debug, Clone)]
pub struct DelayPolicy {
    base_ms: u64,
    randomize: bool,
    stealth: bool,
    backoff: Backoff,
}

impl DelayPolicy {
    /// Creates a policy from explicit settings
    pub fn new(base_ms: u64, randomize: bool, stealth: bool) -> Self {
        Self {
            base_ms,
            randomize,
            stealth,
            backoff: Backoff::new(),
        }
    }

    /// Creates a policy from the scraper configuration
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(config.delay_ms, config.randomize_delays, config.stealth)
    }

    /// Wait before a page request, if stealth pacing is enabled
    pub fn page_delay(&self) -> Option<Duration> {
        self.stealth
            .then(|| Duration::from_millis(compute_delay(self.base_ms, self.randomize)))
    }

    /// Wait before an image request (half the base delay), if stealth pacing is enabled
    pub fn image_delay(&self) -> Option<Duration> {
        self.stealth
            .then(|| Duration::from_millis(compute_delay(self.base_ms / 2, self.randomize)))
    }

    /// Escalates the backoff after a rate-limit response
    ///
    /// Returns how long to wait before retrying: the base delay times the
    /// new multiplier.
    pub fn on_rate_limited(&mut self) -> Duration {
        let multiplier = self.backoff.record_rate_limit();
        Duration::from_millis(self.base_ms.saturating_mul(u64::from(multiplier)))
    }

    /// Resets the backoff after a successful request
    pub fn on_success(&mut self) {
        self.backoff.reset();
    }

    /// Current backoff state
    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }
}
