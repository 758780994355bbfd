//! Numeric kernel: fixed-point / float duality and the saturating tanh
//! approximation shared by every `update`/`predict`/`train` call.
//!
//! Exactly one of the `fixed-point` / `float` Cargo features is active at a
//! time (`fixed-point` is the default, matching `USE_FIXED_POINT=1` in the
//! original firmware). Both paths expose the same `Weight`/`Scalar` type
//! aliases and the same `tanh_approx`/`mul_scaled` functions, so the rest of
//! the crate never branches on the representation itself.

#![forbid(unsafe_code)]

#[cfg(all(feature = "fixed-point", feature = "float"))]
compile_error!("features `fixed-point` and `float` are mutually exclusive");

#[cfg(not(any(feature = "fixed-point", feature = "float")))]
compile_error!("one of `fixed-point` or `float` must be enabled");

#[cfg(feature = "fixed-point")]
mod repr {
    /// Signed Q8.8 fixed-point weight (input/recurrent/readout matrices).
    pub type Weight = i16;
    /// Signed 32-bit accumulator sharing the 8 fractional bits of `Weight`.
    ///
    /// `spec.md` §4.1 calls this "Q16.16"; the original firmware
    /// (`libAeon.c`) actually keeps the 8-bit fractional base and only
    /// widens the integer part to 32 bits for headroom during accumulation.
    /// We follow the original exactly rather than the prose label.
    pub type Scalar = i32;

    /// Fixed-point scale factor (2^SCALE_BITS).
    pub const SCALE: Scalar = 256;
    /// Fractional bits shared by `Weight` and `Scalar`.
    pub const SCALE_BITS: u32 = 8;

    /// Multiply a weight by a scalar, right-shifting by `SCALE_BITS` to stay
    /// in range (`spec.md` §4.1/§4.4).
    #[inline]
    pub fn mul_scaled(w: Weight, x: Scalar) -> Scalar {
        ((w as Scalar) * x) >> SCALE_BITS
    }

    /// Saturating odd-polynomial approximation of `tanh` (`spec.md` §4.1).
    #[inline]
    pub fn tanh_approx(x: Scalar) -> Scalar {
        if x >= SCALE {
            return SCALE;
        }
        if x <= -SCALE {
            return -SCALE;
        }
        let x2 = (x * x) >> SCALE_BITS;
        let x3 = (x2 * x) >> SCALE_BITS;
        x - x3 / 3
    }

    /// Convert a raw scalar to natural `f32` units (for training/MSE).
    #[inline]
    pub fn to_f32(x: Scalar) -> f32 {
        x as f32 / SCALE as f32
    }

    /// Convert a natural `f32` value back into a raw scalar.
    #[inline]
    pub fn from_f32(x: f32) -> Scalar {
        (x * SCALE as f32) as Scalar
    }

    /// Convert a raw weight to natural `f32` units.
    #[inline]
    pub fn weight_to_f32(w: Weight) -> f32 {
        w as f32 / SCALE as f32
    }

    /// Convert a natural `f32` weight back into raw Q8.8, clamping to the
    /// representable `i16` range.
    #[inline]
    pub fn weight_from_f32(w: f32) -> Weight {
        let scaled = w * SCALE as f32;
        scaled.clamp(i16::MIN as f32, i16::MAX as f32) as Weight
    }
}

#[cfg(feature = "float")]
mod repr {
    /// IEEE-754 single-precision weight.
    pub type Weight = f32;
    /// IEEE-754 single-precision accumulator.
    pub type Scalar = f32;

    /// Unit scale: float mode has no fixed-point rescaling.
    pub const SCALE: Scalar = 1.0;

    /// Multiply a weight by a scalar (no rescaling needed in float mode).
    #[inline]
    pub fn mul_scaled(w: Weight, x: Scalar) -> Scalar {
        w * x
    }

    /// Saturating odd-polynomial approximation of `tanh` (`spec.md` §4.1).
    ///
    /// The degree-4 Taylor term overshoots `tanh`'s own `±1.0` bound for `x`
    /// approaching the `±2.0` magnitude gate (e.g. `x = 1.9` evaluates to
    /// roughly `1.26`), so the result is clamped to `±1.0` the way `spec.md`
    /// §4.1 says saturation is "applied by the activation" -- the magnitude
    /// gate alone doesn't enforce the bound `spec.md` §8 requires of every
    /// `update`.
    #[inline]
    pub fn tanh_approx(x: Scalar) -> Scalar {
        if x >= 2.0 {
            return 1.0;
        }
        if x <= -2.0 {
            return -1.0;
        }
        let x2 = x * x;
        (x * (1.0 - x2 / 3.0 + x2 * x2 / 15.0)).clamp(-1.0, 1.0)
    }

    /// Convert a raw scalar to natural `f32` units (identity in float mode).
    #[inline]
    pub fn to_f32(x: Scalar) -> f32 {
        x
    }

    /// Convert a natural `f32` value back into a raw scalar (identity in
    /// float mode).
    #[inline]
    pub fn from_f32(x: f32) -> Scalar {
        x
    }

    /// Convert a raw weight to natural `f32` units (identity in float mode).
    #[inline]
    pub fn weight_to_f32(w: Weight) -> f32 {
        w
    }

    /// Convert a natural `f32` weight back into a raw weight (identity in
    /// float mode).
    #[inline]
    pub fn weight_from_f32(w: f32) -> Weight {
        w
    }
}

pub use repr::*;

/// Map a raw PRNG draw to a `Weight` the way `spec.md` §4.3 step 5
/// specifies, identically for `W_in` and `W_res` draws.
#[cfg(feature = "fixed-point")]
#[inline]
pub fn weight_from_draw(raw: u32) -> Weight {
    ((raw % 256) as i32 - 128) as Weight
}

/// Map a raw PRNG draw to a `Weight` the way `spec.md` §4.3 step 5
/// specifies, identically for `W_in` and `W_res` draws.
#[cfg(feature = "float")]
#[inline]
pub fn weight_from_draw(raw: u32) -> Weight {
    ((raw % 1000) as f32 / 500.0) - 1.0
}
