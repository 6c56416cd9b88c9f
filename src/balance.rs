//! Weight-balanced longitude cuts in the canonical frame.
//!
//! Given canonical-frame longitudes and weights, find the split longitude
//! `d` such that `ratio * W(φ <= d)` matches `W(φ > d)`. The search is a
//! coarse grid over the occupied longitude range followed by a fine grid
//! around the coarse winner.

use crate::PartitionError;

/// Grid resolution of the two-stage split search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceSearch {
    /// Candidates spanning [min φ, max φ].
    pub coarse_steps: usize,
    /// Candidates in the refinement window.
    pub fine_steps: usize,
    /// Half-width of the refinement window, in coarse steps.
    pub refine_span: f64,
}

impl Default for BalanceSearch {
    fn default() -> Self {
        Self {
            coarse_steps: 100,
            fine_steps: 100,
            refine_span: 2.0,
        }
    }
}

/// `|ratio * W(φ <= split) - W(φ > split)|`.
pub fn weight_imbalance(split: f64, phi: &[f64], weights: &[f64], ratio: f64) -> f64 {
    let (below, above) = phi
        .iter()
        .zip(weights)
        .fold((0.0, 0.0), |(below, above), (&p, &w)| {
            if p <= split {
                (below + w, above)
            } else {
                (below, above + w)
            }
        });
    (ratio * below - above).abs()
}

/// Find the balanced split with the default search grid.
pub fn find_balanced_split(phi: &[f64], weights: &[f64], ratio: f64) -> Result<f64, PartitionError> {
    BalanceSearch::default().find_split(phi, weights, ratio)
}

/// Sorted longitudes with cumulative weights, for O(log n) imbalance queries.
#[derive(Debug, Clone)]
pub(crate) struct LongitudeProfile {
    phi: Vec<f64>,
    /// cumulative[k] = total weight of the k smallest longitudes.
    cumulative: Vec<f64>,
}

impl LongitudeProfile {
    pub(crate) fn new(phi: &[f64], weights: &[f64]) -> Self {
        let mut order: Vec<usize> = (0..phi.len()).collect();
        order.sort_unstable_by(|&a, &b| phi[a].total_cmp(&phi[b]));

        let mut sorted = Vec::with_capacity(phi.len());
        let mut cumulative = Vec::with_capacity(phi.len() + 1);
        cumulative.push(0.0);
        let mut sum = 0.0;
        for i in order {
            sorted.push(phi[i]);
            sum += weights[i];
            cumulative.push(sum);
        }
        Self {
            phi: sorted,
            cumulative,
        }
    }

    #[inline]
    fn min(&self) -> f64 {
        self.phi[0]
    }

    #[inline]
    fn max(&self) -> f64 {
        self.phi[self.phi.len() - 1]
    }

    #[inline]
    fn total(&self) -> f64 {
        self.cumulative[self.phi.len()]
    }

    #[inline]
    pub(crate) fn imbalance(&self, split: f64, ratio: f64) -> f64 {
        let k = self.phi.partition_point(|&p| p <= split);
        let below = self.cumulative[k];
        (ratio * below - (self.total() - below)).abs()
    }
}

/// `n` evenly spaced values over [lo, hi], inclusive.
fn linspace(lo: f64, hi: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 { (hi - lo) / (n - 1) as f64 } else { 0.0 };
    (0..n).map(move |i| lo + step * i as f64)
}

/// First minimizer of `f` over `candidates`.
fn argmin(candidates: impl Iterator<Item = f64>, f: impl Fn(f64) -> f64) -> Option<f64> {
    let mut best: Option<(f64, f64)> = None;
    for d in candidates {
        let value = f(d);
        match best {
            Some((_, best_value)) if value >= best_value => {}
            _ => best = Some((d, value)),
        }
    }
    best.map(|(d, _)| d)
}

impl BalanceSearch {
    /// Split longitude for canonical-frame longitudes `phi` with `weights`.
    ///
    /// `ratio` is the target W(φ > d) : W(φ <= d); 1 bisects the weight.
    pub fn find_split(&self, phi: &[f64], weights: &[f64], ratio: f64) -> Result<f64, PartitionError> {
        if phi.len() != weights.len() {
            return Err(PartitionError::LengthMismatch {
                weights: weights.len(),
                positions: phi.len(),
            });
        }
        if phi.is_empty() {
            return Err(PartitionError::EmptyField);
        }
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(PartitionError::InvalidRatio(ratio));
        }
        Ok(self.search(&LongitudeProfile::new(phi, weights), ratio))
    }

    pub(crate) fn search(&self, profile: &LongitudeProfile, ratio: f64) -> f64 {
        let (lo, hi) = (profile.min(), profile.max());
        let coarse_steps = self.coarse_steps.max(1);
        let step = if coarse_steps > 1 {
            (hi - lo) / (coarse_steps - 1) as f64
        } else {
            0.0
        };

        let imbalance = |d: f64| profile.imbalance(d, ratio);
        let coarse = argmin(linspace(lo, hi, coarse_steps), imbalance).unwrap_or(lo);

        // Stay inside the occupied range so neither side is empty by construction.
        let fine_lo = (coarse - self.refine_span * step).max(lo);
        let fine_hi = (coarse + self.refine_span * step).min(hi);
        let fine = argmin(linspace(fine_lo, fine_hi, self.fine_steps.max(1)), imbalance)
            .unwrap_or(coarse);

        // The coarse winner is a valid fallback if refinement did not improve on it.
        if imbalance(fine) <= imbalance(coarse) {
            fine
        } else {
            coarse
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn fine_step(search: &BalanceSearch, lo: f64, hi: f64) -> f64 {
        let coarse = (hi - lo) / (search.coarse_steps - 1) as f64;
        2.0 * search.refine_span * coarse / (search.fine_steps - 1) as f64
    }

    #[test]
    fn test_weight_imbalance() {
        let phi = [0.0, 1.0, 2.0, 3.0];
        let w = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(weight_imbalance(1.0, &phi, &w, 1.0), 4.0);
        assert_eq!(weight_imbalance(1.0, &phi, &w, 2.0), 1.0);
        assert_eq!(weight_imbalance(-1.0, &phi, &w, 1.0), 10.0);
        assert_eq!(weight_imbalance(3.0, &phi, &w, 1.0), 10.0);
    }

    #[test]
    fn test_profile_matches_direct_sum() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let phi: Vec<f64> = (0..500).map(|_| rng.gen_range(0.0..6.0)).collect();
        let w: Vec<f64> = (0..500).map(|_| rng.gen_range(0.0..3.0)).collect();
        let profile = LongitudeProfile::new(&phi, &w);
        for _ in 0..100 {
            let d = rng.gen_range(-0.5..6.5);
            let ratio = rng.gen_range(0.5..3.0);
            let direct = weight_imbalance(d, &phi, &w, ratio);
            let fast = profile.imbalance(d, ratio);
            assert!((direct - fast).abs() < 1e-9, "{} vs {}", direct, fast);
        }
    }

    #[test]
    fn test_uniform_median() {
        let n = 10_001;
        let (lo, hi) = (1.0, 3.0);
        let phi: Vec<f64> = linspace(lo, hi, n).collect();
        let w = vec![1.0; n];
        let search = BalanceSearch::default();
        let d = search.find_split(&phi, &w, 1.0).unwrap();
        assert!(
            (d - 2.0).abs() <= fine_step(&search, lo, hi),
            "split {} not within one fine step of median",
            d
        );
    }

    #[test]
    fn test_random_sample_median() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut phi: Vec<f64> = (0..20_000).map(|_| rng.gen_range(0.5..2.5)).collect();
        let w = vec![1.0; phi.len()];
        let search = BalanceSearch::default();
        let d = search.find_split(&phi, &w, 1.0).unwrap();

        phi.sort_by(f64::total_cmp);
        let median = 0.5 * (phi[9_999] + phi[10_000]);
        let step = fine_step(&search, phi[0], phi[phi.len() - 1]);
        assert!(
            (d - median).abs() <= step,
            "split {} vs median {} (step {})",
            d,
            median,
            step
        );
        assert!(weight_imbalance(d, &phi, &w, 1.0) <= 20.0);
    }

    #[test]
    fn test_ratio_moves_split() {
        let n = 3_001;
        let phi: Vec<f64> = linspace(0.0, 3.0, n).collect();
        let w = vec![1.0; n];
        // Twice as much weight above the cut as below it.
        let d = find_balanced_split(&phi, &w, 2.0).unwrap();
        assert!((d - 1.0).abs() < 0.01, "split = {}", d);
    }

    #[test]
    fn test_split_stays_in_range() {
        // One heavy entry at the low end pulls the unclamped minimizer below min φ.
        let phi = [1.0, 1.5, 2.0];
        let w = [7.0, 2.0, 1.0];
        let d = find_balanced_split(&phi, &w, 2.0).unwrap();
        assert!((1.0..2.0).contains(&d), "split = {}", d);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            find_balanced_split(&[], &[], 1.0),
            Err(PartitionError::EmptyField)
        );
        assert!(matches!(
            find_balanced_split(&[1.0], &[1.0, 2.0], 1.0),
            Err(PartitionError::LengthMismatch { .. })
        ));
        assert_eq!(
            find_balanced_split(&[1.0], &[1.0], 0.0),
            Err(PartitionError::InvalidRatio(0.0))
        );
    }

    #[test]
    fn test_single_longitude() {
        let d = find_balanced_split(&[2.0, 2.0], &[1.0, 1.0], 1.0).unwrap();
        assert_eq!(d, 2.0);
    }
}
