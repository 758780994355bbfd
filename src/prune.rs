//! Structural pruning of the readout layer (`spec.md` §4.7).
//!
//! Net-new relative to the teacher (no counterpart in `reservoir.rs`);
//! grounded on `original_source/phase2-core/libAeon/libAeon.c::aeon_prune`.

#![forbid(unsafe_code)]

use crate::core::AeonCore;
use crate::numeric::weight_to_f32;

impl<const N: usize, const I: usize, const O: usize, const S: usize, const CAP: usize>
    AeonCore<N, I, O, S, CAP>
{
    /// Zero every readout weight with `|w| < threshold`, returning the
    /// number of weights zeroed. The recurrent mask and `W_in` are
    /// untouched (`spec.md` §4.7). `threshold` is in the same units as the
    /// readout (Q8.8 in fixed-point mode, natural units in float mode).
    pub fn prune(&mut self, threshold: f32) -> usize {
        let mut pruned = 0usize;
        for row in self.w_out.iter_mut() {
            for w in row.iter_mut() {
                if weight_to_f32(*w).abs() < threshold {
                    *w = Default::default();
                    pruned += 1;
                }
            }
        }

        #[cfg(feature = "logging")]
        tracing::debug!(threshold, pruned, "aeon core pruned");

        pruned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::from_f32;
    use proptest::prelude::*;

    type SineCore = AeonCore<16, 1, 1, 4, 64>;

    fn sine_samples(n: usize) -> (Vec<[crate::numeric::Scalar; 1]>, Vec<[crate::numeric::Scalar; 1]>) {
        let raw: Vec<f32> = (0..n + 1).map(|i| (0.1 * i as f32).sin()).collect();
        let inputs = raw[..n].iter().map(|&v| [from_f32(v)]).collect();
        let targets = raw[1..=n].iter().map(|&v| [from_f32(v)]).collect();
        (inputs, targets)
    }

    #[test]
    fn prune_zeroes_only_below_threshold() {
        let mut core = SineCore::birth(3);
        let (inputs, targets) = sine_samples(300);
        let mse_before = crate::training::train(&mut core, &inputs, &targets, 50).unwrap();

        let before: Vec<f32> = core
            .w_out
            .iter()
            .flat_map(|row| row.iter().map(|w| weight_to_f32(*w)))
            .collect();

        let threshold = 0.1;
        let pruned = core.prune(threshold);
        assert!(pruned <= 16); // O * N

        let after: Vec<f32> = core
            .w_out
            .iter()
            .flat_map(|row| row.iter().map(|w| weight_to_f32(*w)))
            .collect();

        for (b, a) in before.iter().zip(after.iter()) {
            if b.abs() < threshold {
                assert_eq!(*a, 0.0);
            } else {
                assert!((b - a).abs() < 1e-3);
            }
        }

        // Graceful degradation: pruning at a modest threshold should not
        // catastrophically diverge the MSE (`spec.md` §8 scenario 4).
        let mse_after = crate::training::evaluate_after_prune(&mut core, &inputs, &targets, 50);
        assert!(mse_after <= 2.0 * mse_before + 1e-6);
    }

    proptest! {
        // `spec.md` §8 pruning monotonicity: after prune(c, tau), every
        // |W_out[i]| < tau is exactly zero; entries with |W_out[i]| >= tau
        // are unchanged.
        #[test]
        fn prune_monotonicity(
            raw_weights in prop::collection::vec(-3.0f32..3.0f32, 16),
            threshold in 0.0f32..2.0f32,
        ) {
            let mut core = SineCore::birth(1);
            for (row, chunk) in core.w_out.iter_mut().zip(raw_weights.chunks(16)) {
                for (w, &v) in row.iter_mut().zip(chunk.iter()) {
                    *w = crate::numeric::weight_from_f32(v);
                }
            }

            let before: Vec<f32> = core
                .w_out
                .iter()
                .flat_map(|row| row.iter().map(|w| weight_to_f32(*w)))
                .collect();

            core.prune(threshold);

            let after: Vec<f32> = core
                .w_out
                .iter()
                .flat_map(|row| row.iter().map(|w| weight_to_f32(*w)))
                .collect();

            for (b, a) in before.iter().zip(after.iter()) {
                if b.abs() < threshold {
                    prop_assert_eq!(*a, 0.0);
                } else {
                    prop_assert!((b - a).abs() < 1e-2);
                }
            }
        }
    }
}
