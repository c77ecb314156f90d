//! Numeric kernels for drop distributions
//!
//! Binomial terms are computed in log space so that kill counts in the
//! millions never overflow a factorial. Distributions are stored as a dense
//! probability vector starting at an offset, truncated to the window where
//! the probabilities are representable at all.

use std::f64::consts::{PI, SQRT_2};

/// Half-width of a binomial window in standard deviations
const WINDOW_SIGMAS: f64 = 12.0;

/// Extra values kept on each side of a binomial window.
/// Covers skewed low-mean cases where the standard deviation is tiny.
const WINDOW_MARGIN: u64 = 32;

/// Below this an erf series is used, above it a continued fraction.
/// Past 2 the `1 - erf` subtraction cancels too many digits.
const ERFC_SERIES_LIMIT: f64 = 2.0;

const ERFC_FRACTION_DEPTH: u32 = 120;

const LANCZOS_G: f64 = 7.0;

const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of the gamma function (Lanczos approximation)
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection formula
        return (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let t = x + LANCZOS_G + 0.5;
    let mut series = LANCZOS_COEFFICIENTS[0];
    for (i, c) in LANCZOS_COEFFICIENTS.iter().enumerate().skip(1) {
        series += c / (x + i as f64);
    }

    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}

/// Natural log of the binomial coefficient `n choose k`
///
/// Returns negative infinity when `k > n`.
pub fn ln_choose(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    if k == 0 || k == n {
        return 0.0;
    }
    let n = n as f64;
    let k = k as f64;
    ln_gamma(n + 1.0) - ln_gamma(k + 1.0) - ln_gamma(n - k + 1.0)
}

/// Natural log of P(X = k) for X ~ Binomial(n, p)
pub fn ln_binomial_pmf(n: u64, p: f64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return if k == n { 0.0 } else { f64::NEG_INFINITY };
    }
    if p <= 0.0 {
        return if k == 0 { 0.0 } else { f64::NEG_INFINITY };
    }

    let successes = k as f64;
    let failures = (n - k) as f64;
    ln_choose(n, k) + successes * p.ln() + failures * (-p).ln_1p()
}

/// P(X = k) for X ~ Binomial(n, p)
pub fn binomial_pmf(n: u64, p: f64, k: u64) -> f64 {
    ln_binomial_pmf(n, p, k).exp()
}

/// Complementary error function
pub fn erfc(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x < 0.0 {
        return 2.0 - erfc(-x);
    }
    if x < ERFC_SERIES_LIMIT {
        return 1.0 - erf_series(x);
    }

    // erfc(x) = exp(-x^2) / sqrt(pi) / (x + 1/2 / (x + 1 / (x + 3/2 / (x + ...))))
    let mut fraction = x;
    for n in (1..=ERFC_FRACTION_DEPTH).rev() {
        fraction = x + (f64::from(n) / 2.0) / fraction;
    }
    (-x * x).exp() / PI.sqrt() / fraction
}

/// erf(x) for x >= 0 via the all-positive series
/// `2/sqrt(pi) * exp(-x^2) * sum(2^n x^(2n+1) / (2n+1)!!)`
fn erf_series(x: f64) -> f64 {
    let x2 = x * x;
    let mut term = x;
    let mut sum = 0.0;
    let mut n = 0.0;
    while term > sum * f64::EPSILON * 0.25 || sum == 0.0 {
        sum += term;
        term *= 2.0 * x2 / (2.0 * n + 3.0);
        n += 1.0;
        if term == 0.0 {
            break;
        }
    }
    2.0 / PI.sqrt() * (-x2).exp() * sum
}

/// Standard normal cumulative distribution function
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / SQRT_2)
}

/// Mean of a discrete uniform variable over `min..=max`
pub fn uniform_mean(min: u64, max: u64) -> f64 {
    (min as f64 + max as f64) / 2.0
}

/// Number of values in `min..=max`, as an f64 so the full u64 range fits
pub fn uniform_width(min: u64, max: u64) -> f64 {
    (max - min) as f64 + 1.0
}

/// Variance of a discrete uniform variable over `min..=max`: (m^2 - 1) / 12
pub fn uniform_variance(min: u64, max: u64) -> f64 {
    let m = uniform_width(min, max);
    (m * m - 1.0) / 12.0
}

/// Range of success counts of Binomial(trials, chance) carrying mass
/// representable in an f64
pub fn binomial_window(trials: u64, chance: f64) -> (u64, u64) {
    if trials == 0 || chance <= 0.0 {
        return (0, 0);
    }
    if chance >= 1.0 {
        return (trials, trials);
    }

    let mean = trials as f64 * chance;
    let sd = (mean * (1.0 - chance)).sqrt();
    let reach = WINDOW_SIGMAS * sd;

    let lo = ((mean - reach).floor().max(0.0) as u64).saturating_sub(WINDOW_MARGIN);
    let hi = ((mean + reach).ceil() as u64)
        .saturating_add(WINDOW_MARGIN)
        .min(trials);
    (lo, hi)
}

/// Probability mass split around an observed value
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tails {
    /// P(X < value)
    pub below: f64,
    /// P(X = value)
    pub at: f64,
    /// P(X > value)
    pub above: f64,
}

impl Tails {
    /// Accumulate `other` scaled by `weight`
    pub fn add_weighted(&mut self, other: Tails, weight: f64) {
        self.below += other.below * weight;
        self.at += other.at * weight;
        self.above += other.above * weight;
    }
}

/// Probability mass function over the contiguous integers
/// `offset..offset + probs.len()`
#[derive(Debug, Clone, PartialEq)]
pub struct DiscretePmf {
    offset: u64,
    probs: Vec<f64>,
}

impl DiscretePmf {
    /// All mass on a single value
    pub fn point(value: u64) -> Self {
        Self {
            offset: value,
            probs: vec![1.0],
        }
    }

    /// Binomial(trials, chance), truncated to the window of representable mass
    pub fn binomial(trials: u64, chance: f64) -> Self {
        if trials == 0 || chance <= 0.0 {
            return Self::point(0);
        }
        if chance >= 1.0 {
            return Self::point(trials);
        }

        let (lo, hi) = binomial_window(trials, chance);
        let probs = (lo..=hi).map(|k| binomial_pmf(trials, chance, k)).collect();
        Self { offset: lo, probs }.trimmed()
    }

    /// Discrete uniform over `min..=max`
    pub fn uniform(min: u64, max: u64) -> Self {
        let width = ((max - min) as usize).saturating_add(1);
        Self {
            offset: min,
            probs: vec![1.0 / width as f64; width],
        }
    }

    /// Smallest value carrying non-zero mass
    pub fn min_value(&self) -> u64 {
        self.offset
    }

    /// Largest value carrying non-zero mass
    pub fn max_value(&self) -> u64 {
        self.offset + self.probs.len() as u64 - 1
    }

    /// P(X = value)
    pub fn probability(&self, value: u64) -> f64 {
        value
            .checked_sub(self.offset)
            .and_then(|i| self.probs.get(i as usize))
            .copied()
            .unwrap_or(0.0)
    }

    /// (value, probability) pairs in ascending value order
    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.probs
            .iter()
            .enumerate()
            .map(move |(i, &p)| (self.offset + i as u64, p))
    }

    pub fn mean(&self) -> f64 {
        self.iter().map(|(v, p)| v as f64 * p).sum()
    }

    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        self.iter()
            .map(|(v, p)| {
                let d = v as f64 - mean;
                d * d * p
            })
            .sum()
    }

    /// Distribution of the sum of two independent variables
    pub fn convolve(&self, other: &DiscretePmf) -> DiscretePmf {
        let mut probs = vec![0.0; self.probs.len() + other.probs.len() - 1];
        for (i, &a) in self.probs.iter().enumerate() {
            if a == 0.0 {
                continue;
            }
            for (j, &b) in other.probs.iter().enumerate() {
                probs[i + j] += a * b;
            }
        }
        DiscretePmf {
            offset: self.offset + other.offset,
            probs,
        }
        .trimmed()
    }

    /// Split the mass around `value`
    pub fn tails(&self, value: u64) -> Tails {
        if value < self.min_value() {
            return Tails {
                below: 0.0,
                at: 0.0,
                above: self.probs.iter().sum(),
            };
        }
        if value > self.max_value() {
            return Tails {
                below: self.probs.iter().sum(),
                at: 0.0,
                above: 0.0,
            };
        }

        let split = (value - self.offset) as usize;
        Tails {
            below: self.probs[..split].iter().sum(),
            at: self.probs[split],
            above: self.probs[split + 1..].iter().sum(),
        }
    }

    /// Drop zero-mass values from both ends
    fn trimmed(mut self) -> Self {
        let Some(first) = self.probs.iter().position(|&p| p > 0.0) else {
            return Self::point(self.offset);
        };
        let last = self.probs.iter().rposition(|&p| p > 0.0).unwrap_or(first);
        self.probs.truncate(last + 1);
        self.probs.drain(..first);
        self.offset += first as u64;
        self
    }
}

/// Distribution of the sum of `k` iid discrete-uniform rolls, built one
/// roll at a time so that every `k` reuses the previous convolution.
#[derive(Debug, Clone)]
pub struct UniformSumLadder {
    min_roll: u64,
    width: usize,
    rolls: u64,
    sum: DiscretePmf,
}

impl UniformSumLadder {
    /// Start at zero rolls (sum is always 0)
    pub fn new(min_roll: u64, max_roll: u64) -> Self {
        Self {
            min_roll,
            width: ((max_roll - min_roll) as usize).saturating_add(1),
            rolls: 0,
            sum: DiscretePmf::point(0),
        }
    }

    /// Number of rolls in the current sum
    pub fn rolls(&self) -> u64 {
        self.rolls
    }

    /// Distribution of the current sum
    pub fn current(&self) -> &DiscretePmf {
        &self.sum
    }

    /// Add one more roll
    ///
    /// Convolving with a uniform is a moving average, so this is linear in
    /// the length of the current distribution.
    pub fn add_roll(&mut self) {
        let old = &self.sum.probs;
        let width = self.width;
        let scale = 1.0 / width as f64;
        let len = old.len() + width - 1;

        let mut next = Vec::with_capacity(len);
        let mut window = 0.0;
        for j in 0..len {
            if j < old.len() {
                window += old[j];
            }
            if j >= width {
                window -= old[j - width];
            }
            next.push((window * scale).max(0.0));
        }

        self.sum = DiscretePmf {
            offset: self.sum.offset + self.min_roll,
            probs: next,
        };
        self.rolls += 1;
    }

    /// Advance until the sum covers `rolls` rolls
    pub fn advance_to(&mut self, rolls: u64) -> &DiscretePmf {
        while self.rolls < rolls {
            self.add_roll();
        }
        &self.sum
    }
}
