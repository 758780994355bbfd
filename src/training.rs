//! Ridge-regression trainer: washout, normal-equation accumulation, an
//! in-place Gauss-Jordan solve with partial pivoting, and MSE evaluation
//! (`spec.md` §4.6).
//!
//! Grounded on `original_source/phase2-core/libAeon/libAeon.c::aeon_train` —
//! the teacher's own `ReservoirTrainer::train` does a simplified averaging
//! rather than a real ridge solve, so the original C is followed for the
//! numerics (see `SPEC_FULL.md` §9); the teacher's `Result<f32, _>`-returning
//! shape and "reset, replay, collect" control flow are kept.

#![forbid(unsafe_code)]

use crate::core::AeonCore;
use crate::error::AeonError;
use crate::numeric::{to_f32, weight_from_f32, Scalar};

/// Tikhonov regularizer added to the diagonal of the normal-equation
/// accumulator before any samples are folded in (`spec.md` §4.6 step 2).
const RIDGE_REGULARIZER: f32 = 1e-4;

/// Substituted for an exactly-zero Gauss-Jordan pivot (`spec.md` §4.6 step 4,
/// §7: "handled locally ... not reported upward").
const PIVOT_EPSILON: f32 = 1e-10;

/// Readout weight clamp applied before write-back (`spec.md` §4.6 step 5).
const WEIGHT_CLAMP: f32 = 2.0;

/// Train the readout layer by ridge regression on a fixed window of
/// samples, replaying them through `update` after a washout period
/// (`spec.md` §4.6). Returns the mean squared error over the post-washout
/// replay.
///
/// # Errors
///
/// Returns [`AeonError::InsufficientSamples`] if `inputs.len() <= washout`,
/// leaving `core` unmodified.
pub fn train<const N: usize, const I: usize, const O: usize, const S: usize, const CAP: usize>(
    core: &mut AeonCore<N, I, O, S, CAP>,
    inputs: &[[Scalar; I]],
    targets: &[[Scalar; O]],
    washout: usize,
) -> Result<f32, AeonError> {
    let samples = inputs.len();
    if samples <= washout {
        return Err(AeonError::InsufficientSamples { samples, washout });
    }

    core.reset();

    // S^T S (with Tikhonov diagonal) and S^T y normal-equation accumulators.
    let mut sts: Box<[[f32; N]; N]> = Box::new([[0.0; N]; N]);
    for (i, row) in sts.iter_mut().enumerate() {
        row[i] = RIDGE_REGULARIZER;
    }
    let mut sty: Box<[[f32; O]; N]> = Box::new([[0.0; O]; N]);

    for t in 0..samples {
        core.update(&inputs[t]);

        if t >= washout {
            let mut s = [0f32; N];
            for (dst, src) in s.iter_mut().zip(core.state.iter()) {
                *dst = to_f32(*src);
            }
            let mut y = [0f32; O];
            for (dst, src) in y.iter_mut().zip(targets[t].iter()) {
                *dst = to_f32(*src);
            }

            for i in 0..N {
                for j in i..N {
                    let prod = s[i] * s[j];
                    sts[i][j] += prod;
                    if i != j {
                        sts[j][i] += prod;
                    }
                }
                for o in 0..O {
                    sty[i][o] += s[i] * y[o];
                }
            }
        }
    }

    let inv = gauss_jordan_invert::<N>(&mut sts);

    for o in 0..O {
        for i in 0..N {
            let mut sum = 0f32;
            for (inv_row, sty_row) in inv.iter().zip(sty.iter()) {
                sum += inv_row[i] * sty_row[o];
            }
            let clamped = sum.clamp(-WEIGHT_CLAMP, WEIGHT_CLAMP);
            core.w_out[o][i] = weight_from_f32(clamped);
        }
    }

    core.is_trained = true;
    core.learning_sessions += 1;

    #[cfg(feature = "logging")]
    tracing::debug!(
        samples,
        washout,
        sessions = core.learning_sessions,
        "aeon core trained"
    );

    let mse = evaluate_mse(core, inputs, targets, washout);
    Ok(mse)
}

/// Invert `a` in place via Gauss-Jordan elimination with partial pivoting,
/// returning the accumulated inverse (`spec.md` §4.6 step 4). `a` itself is
/// left row-reduced to the identity on success.
fn gauss_jordan_invert<const N: usize>(a: &mut Box<[[f32; N]; N]>) -> Box<[[f32; N]; N]> {
    let mut inv: Box<[[f32; N]; N]> = Box::new([[0.0; N]; N]);
    for (i, row) in inv.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    for col in 0..N {
        let mut max_row = col;
        let mut max_val = a[col][col].abs();
        for row in (col + 1)..N {
            let val = a[row][col].abs();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }

        if max_row != col {
            a.swap(col, max_row);
            inv.swap(col, max_row);
        }

        let mut pivot = a[col][col];
        if pivot == 0.0 {
            pivot = PIVOT_EPSILON;
        }
        for k in 0..N {
            a[col][k] /= pivot;
            inv[col][k] /= pivot;
        }

        for row in 0..N {
            if row != col {
                let factor = a[row][col];
                if factor == 0.0 {
                    continue;
                }
                for k in 0..N {
                    a[row][k] -= factor * a[col][k];
                    inv[row][k] -= factor * inv[col][k];
                }
            }
        }
    }

    inv
}

/// Replay `inputs[washout..]` through a freshly reset core and compute the
/// mean squared error against `targets`, without touching the readout
/// weights. Useful for re-evaluating a core after `prune` (`spec.md` §8
/// scenario 4).
pub fn evaluate_after_prune<
    const N: usize,
    const I: usize,
    const O: usize,
    const S: usize,
    const CAP: usize,
>(
    core: &mut AeonCore<N, I, O, S, CAP>,
    inputs: &[[Scalar; I]],
    targets: &[[Scalar; O]],
    washout: usize,
) -> f32 {
    evaluate_mse(core, inputs, targets, washout)
}

/// Replay `inputs[washout..]` through a freshly reset core and compute the
/// mean squared error against `targets` (`spec.md` §4.6 step 7).
fn evaluate_mse<const N: usize, const I: usize, const O: usize, const S: usize, const CAP: usize>(
    core: &mut AeonCore<N, I, O, S, CAP>,
    inputs: &[[Scalar; I]],
    targets: &[[Scalar; O]],
    washout: usize,
) -> f32 {
    core.reset();
    let mut mse = 0f32;

    for t in washout..inputs.len() {
        core.update(&inputs[t]);
        let pred = core.predict();
        for (p, y) in pred.iter().zip(targets[t].iter()) {
            let diff = to_f32(*p) - to_f32(*y);
            mse += diff * diff;
        }
    }

    let count = (inputs.len() - washout) * O;
    mse / count as f32
}
