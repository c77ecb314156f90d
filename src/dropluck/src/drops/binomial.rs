//! Binomial and guaranteed-once drops

use crate::attempts::Attempts;
use crate::stats::Tails;

/// Success count of the attempts split around `observed`
pub fn binomial_tails(attempts: &Attempts, observed: u64) -> Tails {
    attempts.success_distribution().tails(observed)
}

/// Like [`binomial_tails`], except that reaching `guaranteed_on_attempts`
/// hands out one certain success. That success and the attempt it used
/// are taken out before the random part is modelled.
pub fn guaranteed_once_tails(
    attempts: &Attempts,
    guaranteed_on_attempts: u64,
    observed: u64,
) -> Tails {
    if attempts.total() < guaranteed_on_attempts {
        return binomial_tails(attempts, observed);
    }

    let random_part = attempts.clone().subtract(1);
    binomial_tails(&random_part, observed.saturating_sub(1))
}
