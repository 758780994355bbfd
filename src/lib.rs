//! Aeon - an ultra-light Echo State Network reservoir engine
//!
//! A fixed-topology, const-generic reservoir computer sized for
//! microcontroller-class hardware: a sparse random recurrent reservoir with
//! only the linear readout trained, by ridge regression, after the fact.
//!
//! # Architecture
//!
//! - **`core`**: the owned `AeonCore` aggregate and its non-training
//!   operations (`birth`, `update`, `predict`, `reset`).
//! - **`training`**: ridge-regression fitting of the readout layer.
//! - **`prune`**: magnitude pruning of the trained readout.
//! - **`persistence`**: a fixed, little-endian binary snapshot format.
//! - **`codec`**: 1-bit weight quantization and the `EON` wire packet used
//!   to exchange a trained readout between cores.
//! - **`numeric`**: the fixed-point/float duality selected by Cargo feature.
//! - **`rng`**: the deterministic linear congruential generator shared by
//!   weight initialization and certificate hashing.
//!
//! # Safety
//!
//! - Zero `unsafe` blocks
//! - Full type safety via Rust's ownership system and const generics
//!
//! # Features
//!
//! - `fixed-point` (default): Q8.8 weights, 8-fractional-bit accumulators,
//!   no floating point at runtime.
//! - `float`: `f32` throughout, for hardware with an FPU.
//! - `logging`: structured logging with `tracing`.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod codec;
pub mod core;
pub mod error;
pub mod numeric;
pub mod persistence;
pub mod prune;
pub mod rng;
pub mod training;

pub use core::{AeonCore, Certificate, DefaultCore};
pub use error::AeonError;

/// Library version following semantic versioning.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
