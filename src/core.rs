//! The Aeon core: certificate, reservoir state, and the non-training
//! operations (`birth`, `update`, `predict`, `reset`).
//!
//! `spec.md` §3/§4.3–§4.5/§9. The core is an owned, const-generic-sized
//! value type — `AeonCore<N, I, O, S, CAP>` — generalizing the teacher's
//! `EchoStateNetwork` (which carries its dimensions as runtime `usize`
//! fields and `Vec`-backed dense weights) into the compile-time-sized shape
//! `spec.md` §9 calls for ("dimensions ... are NOT runtime configuration").

#![forbid(unsafe_code)]

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::numeric::{mul_scaled, tanh_approx, weight_from_draw, Scalar, Weight};
use crate::rng::{birth_hash, hash_to_string, Lcg};

/// Major component of the packed engine version (`spec.md` §6).
pub const VERSION_MAJOR: u16 = 1;
/// Minor component of the packed engine version (`spec.md` §6).
pub const VERSION_MINOR: u16 = 0;
/// Engine version, packed as `(major << 8) | minor` (`spec.md` §6).
pub const VERSION: u16 = (VERSION_MAJOR << 8) | VERSION_MINOR;

/// Immutable identity record produced at birth (`spec.md` §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Wall-clock seconds at birth.
    pub birth_time: u64,
    /// 16-byte LCG-derived identity hash.
    pub birth_hash: [u8; 16],
    /// Effective seed used to construct the reservoir.
    pub reservoir_seed: u32,
    /// Reservoir size (`N`) at birth.
    pub reservoir_size: u16,
    /// Packed library version.
    pub version: u16,
}

impl Certificate {
    /// Render `birth_hash` as 32 lowercase hex characters.
    pub fn hash_string(&self) -> String {
        hash_to_string(&self.birth_hash)
    }
}

/// The Aeon core.
///
/// - `N`: reservoir size.
/// - `I`: input size.
/// - `O`: output size.
/// - `S`: sparsity factor (one of every `S` reservoir connections is live).
/// - `CAP`: sparse-slot capacity; must equal `floor(N*N / S)`, checked at
///   monomorphization time by [`AeonCore::ASSERT_CAPACITY`].
#[derive(Debug, Clone)]
pub struct AeonCore<const N: usize, const I: usize, const O: usize, const S: usize, const CAP: usize>
{
    pub(crate) certificate: Certificate,
    pub(crate) state: [Scalar; N],
    pub(crate) w_in: [[Weight; I]; N],
    pub(crate) w_res: [Weight; CAP],
    pub(crate) sparse_indices: [u16; CAP],
    pub(crate) sparse_count: u16,
    pub(crate) w_out: [[Weight; N]; O],
    pub(crate) samples_processed: u32,
    pub(crate) learning_sessions: u32,
    pub(crate) is_trained: bool,
}

/// A core shaped to `spec.md` §6's enumerated build-time defaults:
/// `RESERVOIR_SIZE=32, INPUT_SIZE=1, OUTPUT_SIZE=1, SPARSITY_FACTOR=4`
/// (`32*32/4 = 256` sparse slots).
pub type DefaultCore = AeonCore<32, 1, 1, 4, 256>;

impl<const N: usize, const I: usize, const O: usize, const S: usize, const CAP: usize>
    AeonCore<N, I, O, S, CAP>
{
    /// Compile-time check that `CAP == floor(N*N/S)`. Referenced from every
    /// constructor so it is evaluated (and, on mismatch, rejected) the first
    /// time a given `AeonCore<N, I, O, S, CAP>` instantiation is actually used
    /// — the stable-Rust substitute for `generic_const_exprs` array lengths
    /// (`spec.md` §9: "a build-time assertion that the bound fits").
    const ASSERT_CAPACITY: () = assert!(
        CAP == (N * N) / S,
        "AeonCore's CAP const generic must equal floor(N*N/S)"
    );

    /// Momento Cero: the one-shot, seed-driven construction of a core
    /// (`spec.md` §4.3). `seed == 0` uses the birth timestamp as the
    /// effective seed.
    pub fn birth(seed: u32) -> Self {
        #[allow(clippy::let_unit_value)]
        let _ = Self::ASSERT_CAPACITY;

        let birth_time = current_unix_time();
        let effective_seed = if seed == 0 { birth_time as u32 } else { seed };
        let hash = birth_hash(effective_seed, birth_time as u32);

        let certificate = Certificate {
            birth_time,
            birth_hash: hash,
            reservoir_seed: effective_seed,
            reservoir_size: N as u16,
            version: VERSION,
        };

        let mut rng = Lcg::new(effective_seed);

        let mut w_in = [[Weight::default(); I]; N];
        for row in w_in.iter_mut() {
            for w in row.iter_mut() {
                *w = weight_from_draw(rng.next_u32());
            }
        }

        let mut w_res = [Weight::default(); CAP];
        let mut sparse_indices = [0u16; CAP];
        let mut sparse_count: u16 = 0;
        let total_connections = N * N;
        let target = CAP;

        for _ in 0..target {
            let r = rng.next_u32();
            let idx = (r as usize % total_connections) as u16;

            let exists = sparse_indices[..sparse_count as usize].contains(&idx);

            if !exists {
                sparse_indices[sparse_count as usize] = idx;
                let wr = rng.next_u32();
                w_res[sparse_count as usize] = weight_from_draw(wr);
                sparse_count += 1;
            }
        }

        #[cfg(feature = "logging")]
        tracing::debug!(
            seed = effective_seed,
            sparse_count,
            target,
            "aeon core born"
        );

        Self {
            certificate,
            state: [Scalar::default(); N],
            w_in,
            w_res,
            sparse_indices,
            sparse_count,
            w_out: [[Weight::default(); N]; O],
            samples_processed: 0,
            learning_sessions: 0,
            is_trained: false,
        }
    }

    /// Immutable identity record (`spec.md` §3).
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// Current reservoir state.
    pub fn state(&self) -> &[Scalar; N] {
        &self.state
    }

    /// Number of populated sparse recurrent connections (`<= CAP`).
    pub fn sparse_count(&self) -> u16 {
        self.sparse_count
    }

    /// `true` once at least one `train` call has completed successfully.
    pub fn is_trained(&self) -> bool {
        self.is_trained
    }

    /// Number of samples ever passed to `update` (including during `train`).
    pub fn samples_processed(&self) -> u32 {
        self.samples_processed
    }

    /// Number of completed training sessions.
    pub fn learning_sessions(&self) -> u32 {
        self.learning_sessions
    }

    /// Sparse recurrent state update given a new input vector
    /// (`spec.md` §4.4). Mutates only `state` and `samples_processed`;
    /// never allocates.
    pub fn update(&mut self, input: &[Scalar; I]) {
        let mut pre = [Scalar::default(); N];

        for (i, row) in self.w_in.iter().enumerate() {
            let mut sum = Scalar::default();
            for (w, x) in row.iter().zip(input.iter()) {
                sum += mul_scaled(*w, *x);
            }
            pre[i] = sum;
        }

        for k in 0..self.sparse_count as usize {
            let idx = self.sparse_indices[k] as usize;
            let row = idx / N;
            let col = idx % N;
            pre[row] += mul_scaled(self.w_res[k], self.state[col]);
        }

        for (s, p) in self.state.iter_mut().zip(pre.iter()) {
            *s = tanh_approx(*p);
        }

        self.samples_processed += 1;
    }

    /// Dense readout of the current state (`spec.md` §4.5). Pure: does not
    /// mutate `state`, and repeated calls without an intervening `update`
    /// or `train` yield identical output.
    pub fn predict(&self) -> [Scalar; O] {
        let mut out = [Scalar::default(); O];
        for (o, slot) in out.iter_mut().enumerate() {
            let mut sum = Scalar::default();
            for (w, s) in self.w_out[o].iter().zip(self.state.iter()) {
                sum += mul_scaled(*w, *s);
            }
            *slot = sum;
        }
        out
    }

    /// Zero the reservoir state. Counters and certificate are untouched
    /// (`spec.md` §3 invariant 4).
    pub fn reset(&mut self) {
        self.state = [Scalar::default(); N];
    }

    /// Size in bytes of the core's in-memory representation
    /// (`spec.md` §6 `memory_usage`).
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>()
    }

    /// Seconds elapsed since birth (`spec.md` §6 `age_seconds`).
    pub fn age_seconds(&self) -> u64 {
        current_unix_time().saturating_sub(self.certificate.birth_time)
    }
}

pub(crate) fn current_unix_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
