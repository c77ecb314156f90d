//! Drops where every success yields a uniformly random stack size
//!
//! The observed total is T = R_1 + ... + R_K with K the success count and
//! each R_i uniform over `min_roll..=max_roll`. Small expected success
//! counts are enumerated exactly; large ones use a normal approximation.

use crate::attempts::Attempts;
use crate::stats::{normal_cdf, uniform_mean, uniform_variance, Tails, UniformSumLadder};

/// Expected successes at which the exact enumeration gives way to the
/// normal approximation
pub const EXACT_REGIME_MAX_EXPECTED_SUCCESSES: f64 = 100.0;

/// Largest exact convolution (in probability cells touched) evaluated
/// before falling back to the normal approximation
pub const EXACT_REGIME_MAX_CELLS: f64 = 5.0e7;

/// How a uniform-sum drop is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    Exact,
    Normal,
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Normal => write!(f, "normal approximation"),
        }
    }
}

/// Pick the regime from the expected number of successes and the size of
/// the exact convolution
pub fn uniform_sum_regime(attempts: &Attempts, min_roll: u64, max_roll: u64) -> Regime {
    if attempts.expected_successes() >= EXACT_REGIME_MAX_EXPECTED_SUCCESSES {
        return Regime::Normal;
    }

    let cells = exact_convolution_cells(attempts, min_roll, max_roll);
    if cells > EXACT_REGIME_MAX_CELLS {
        tracing::debug!(
            cells,
            budget = EXACT_REGIME_MAX_CELLS,
            "exact convolution over budget, using normal approximation"
        );
        return Regime::Normal;
    }

    Regime::Exact
}

/// Work of the exact regime: the ladder reaches `k_max` rolls and the
/// sum after k rolls spans about `k * width` values
fn exact_convolution_cells(attempts: &Attempts, min_roll: u64, max_roll: u64) -> f64 {
    let (_, k_max) = attempts.success_bounds();
    let rolls = (k_max as f64).max(1.0);
    let width = (max_roll - min_roll) as f64 + 1.0;
    rolls * rolls * width / 2.0
}

/// Total quantity split around `observed`
pub fn uniform_sum_tails(attempts: &Attempts, min_roll: u64, max_roll: u64, observed: u64) -> Tails {
    let (k_min, k_max) = attempts.success_bounds();

    if observed < k_min.saturating_mul(min_roll) {
        return Tails {
            below: 0.0,
            at: 0.0,
            above: 1.0,
        };
    }
    if observed > k_max.saturating_mul(max_roll) {
        return Tails {
            below: 1.0,
            at: 0.0,
            above: 0.0,
        };
    }

    let regime = uniform_sum_regime(attempts, min_roll, max_roll);
    tracing::debug!(
        attempts = attempts.total(),
        expected_successes = attempts.expected_successes(),
        %regime,
        "evaluating uniform-sum drop"
    );

    match regime {
        Regime::Exact => exact_uniform_sum_tails(attempts, min_roll, max_roll, observed),
        Regime::Normal => normal_uniform_sum_tails(attempts, min_roll, max_roll, observed),
    }
}

/// Enumerate every plausible success count k and weigh the exact
/// distribution of a k-roll sum by P(K = k)
pub fn exact_uniform_sum_tails(
    attempts: &Attempts,
    min_roll: u64,
    max_roll: u64,
    observed: u64,
) -> Tails {
    let successes = attempts.success_distribution();
    let mut ladder = UniformSumLadder::new(min_roll, max_roll);
    let mut tails = Tails::default();

    for (k, p_k) in successes.iter() {
        let sum = ladder.advance_to(k);
        tails.add_weighted(sum.tails(observed), p_k);
    }

    tails
}

/// Normal approximation using the law of total variance:
/// Var(T) = E[K] Var(R) + Var(K) E[R]^2
pub fn normal_uniform_sum_tails(
    attempts: &Attempts,
    min_roll: u64,
    max_roll: u64,
    observed: u64,
) -> Tails {
    let roll_mean = uniform_mean(min_roll, max_roll);
    let roll_variance = uniform_variance(min_roll, max_roll);
    let expected = attempts.expected_successes();

    let mean = expected * roll_mean;
    let variance = expected * roll_variance + attempts.success_variance() * roll_mean * roll_mean;
    let observed = observed as f64;

    if variance <= 0.0 {
        return point_tails(observed, mean);
    }

    let z = (observed - mean) / variance.sqrt();
    Tails {
        below: normal_cdf(z),
        at: 0.0,
        above: normal_cdf(-z),
    }
}

fn point_tails(observed: f64, value: f64) -> Tails {
    if observed < value {
        Tails {
            below: 0.0,
            at: 0.0,
            above: 1.0,
        }
    } else if observed > value {
        Tails {
            below: 1.0,
            at: 0.0,
            above: 0.0,
        }
    } else {
        Tails {
            below: 0.0,
            at: 1.0,
            above: 0.0,
        }
    }
}
