//! Flat binary snapshot: `save`/`load` a core to/from a fixed,
//! little-endian byte layout (`spec.md` §4.8/§6; see `SPEC_FULL.md` §9 for
//! the `W_out` field-order resolution).
//!
//! Grounded on `original_source/.../libAeon.c::aeon_save`/`aeon_load`
//! (whole-struct `fwrite`/`fread`) for field order, generalized to an
//! explicit field-by-field codec rather than a raw memcpy, per `spec.md`
//! §9's own instruction to fix endianness and padding explicitly. Uses
//! `byteorder`, grounded in `prospectorengine-prospector-btc`'s Cargo.toml.

#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::core::{AeonCore, Certificate};
use crate::error::AeonError;
use crate::numeric::{Scalar, Weight};

#[cfg(feature = "fixed-point")]
fn write_weight<W: Write>(w: &mut W, v: Weight) -> io::Result<()> {
    w.write_i16::<LittleEndian>(v)
}
#[cfg(feature = "fixed-point")]
fn read_weight<R: Read>(r: &mut R) -> io::Result<Weight> {
    r.read_i16::<LittleEndian>()
}
#[cfg(feature = "fixed-point")]
fn write_scalar<W: Write>(w: &mut W, v: Scalar) -> io::Result<()> {
    w.write_i32::<LittleEndian>(v)
}
#[cfg(feature = "fixed-point")]
fn read_scalar<R: Read>(r: &mut R) -> io::Result<Scalar> {
    r.read_i32::<LittleEndian>()
}

#[cfg(feature = "float")]
fn write_weight<W: Write>(w: &mut W, v: Weight) -> io::Result<()> {
    w.write_f32::<LittleEndian>(v)
}
#[cfg(feature = "float")]
fn read_weight<R: Read>(r: &mut R) -> io::Result<Weight> {
    r.read_f32::<LittleEndian>()
}
#[cfg(feature = "float")]
fn write_scalar<W: Write>(w: &mut W, v: Scalar) -> io::Result<()> {
    w.write_f32::<LittleEndian>(v)
}
#[cfg(feature = "float")]
fn read_scalar<R: Read>(r: &mut R) -> io::Result<Scalar> {
    r.read_f32::<LittleEndian>()
}

impl<const N: usize, const I: usize, const O: usize, const S: usize, const CAP: usize>
    AeonCore<N, I, O, S, CAP>
{
    /// Byte length of the fixed snapshot layout for this core's dimensions.
    pub const SNAPSHOT_LEN: usize = 8   // birth_time
        + 16                            // birth_hash
        + 4                             // reservoir_seed
        + 2                             // reservoir_size
        + 2                             // version
        + N * std::mem::size_of::<Scalar>()   // state
        + N * I * std::mem::size_of::<Weight>() // w_in
        + CAP * std::mem::size_of::<Weight>()   // w_res
        + O * N * std::mem::size_of::<Weight>() // w_out
        + CAP * 2                       // sparse_indices
        + 2                             // sparse_count
        + 4                             // samples_processed
        + 4                             // learning_sessions
        + 1; // is_trained

    /// Write the core's fixed-layout byte image to `path`
    /// (`spec.md` §4.8/§6). No versioning or checksum is applied at this
    /// layer.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AeonError> {
        let mut buf = Vec::with_capacity(Self::SNAPSHOT_LEN);
        self.encode(&mut buf)?;

        let mut file = File::create(path)?;
        file.write_all(&buf)?;

        #[cfg(feature = "logging")]
        tracing::debug!(bytes = buf.len(), "aeon core saved");

        Ok(())
    }

    /// Read a snapshot written by [`AeonCore::save`] back into a fresh
    /// core. The full `Self::SNAPSHOT_LEN` bytes must be present.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AeonError> {
        let mut file = File::open(path)?;
        let mut buf = Vec::with_capacity(Self::SNAPSHOT_LEN);
        file.read_to_end(&mut buf)?;

        let core = Self::from_bytes(&buf)?;

        #[cfg(feature = "logging")]
        tracing::debug!(bytes = buf.len(), "aeon core loaded");

        Ok(core)
    }

    /// Decode a snapshot from an in-memory byte slice, as produced by
    /// [`AeonCore::to_bytes`]. Exposed separately from [`AeonCore::load`]
    /// so callers (and fuzz targets) can feed it arbitrary buffers without
    /// touching the filesystem.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, AeonError> {
        if buf.len() < Self::SNAPSHOT_LEN {
            return Err(AeonError::ShortRead {
                expected: Self::SNAPSHOT_LEN,
                actual: buf.len(),
            });
        }
        Self::decode(buf)
    }

    /// Encode the core to the fixed snapshot byte layout, without touching
    /// the filesystem (see [`AeonCore::save`]).
    pub fn to_bytes(&self) -> Result<Vec<u8>, AeonError> {
        let mut buf = Vec::with_capacity(Self::SNAPSHOT_LEN);
        self.encode(&mut buf)?;
        Ok(buf)
    }

    fn encode(&self, buf: &mut Vec<u8>) -> Result<(), AeonError> {
        buf.write_u64::<LittleEndian>(self.certificate.birth_time)?;
        buf.extend_from_slice(&self.certificate.birth_hash);
        buf.write_u32::<LittleEndian>(self.certificate.reservoir_seed)?;
        buf.write_u16::<LittleEndian>(self.certificate.reservoir_size)?;
        buf.write_u16::<LittleEndian>(self.certificate.version)?;

        for s in self.state.iter() {
            write_scalar(buf, *s)?;
        }
        for row in self.w_in.iter() {
            for w in row.iter() {
                write_weight(buf, *w)?;
            }
        }
        for w in self.w_res.iter() {
            write_weight(buf, *w)?;
        }
        for row in self.w_out.iter() {
            for w in row.iter() {
                write_weight(buf, *w)?;
            }
        }
        for idx in self.sparse_indices.iter() {
            buf.write_u16::<LittleEndian>(*idx)?;
        }
        buf.write_u16::<LittleEndian>(self.sparse_count)?;
        buf.write_u32::<LittleEndian>(self.samples_processed)?;
        buf.write_u32::<LittleEndian>(self.learning_sessions)?;
        buf.push(self.is_trained as u8);

        Ok(())
    }

    fn decode(buf: &[u8]) -> Result<Self, AeonError> {
        let mut cursor = buf;

        let birth_time = cursor.read_u64::<LittleEndian>()?;
        let mut birth_hash = [0u8; 16];
        cursor.read_exact(&mut birth_hash)?;
        let reservoir_seed = cursor.read_u32::<LittleEndian>()?;
        let reservoir_size = cursor.read_u16::<LittleEndian>()?;
        let version = cursor.read_u16::<LittleEndian>()?;

        let certificate = Certificate {
            birth_time,
            birth_hash,
            reservoir_seed,
            reservoir_size,
            version,
        };

        let mut state = [Scalar::default(); N];
        for s in state.iter_mut() {
            *s = read_scalar(&mut cursor)?;
        }

        let mut w_in = [[Weight::default(); I]; N];
        for row in w_in.iter_mut() {
            for w in row.iter_mut() {
                *w = read_weight(&mut cursor)?;
            }
        }

        let mut w_res = [Weight::default(); CAP];
        for w in w_res.iter_mut() {
            *w = read_weight(&mut cursor)?;
        }

        let mut w_out = [[Weight::default(); N]; O];
        for row in w_out.iter_mut() {
            for w in row.iter_mut() {
                *w = read_weight(&mut cursor)?;
            }
        }

        let mut sparse_indices = [0u16; CAP];
        for idx in sparse_indices.iter_mut() {
            *idx = cursor.read_u16::<LittleEndian>()?;
        }

        let sparse_count = cursor.read_u16::<LittleEndian>()?;
        let samples_processed = cursor.read_u32::<LittleEndian>()?;
        let learning_sessions = cursor.read_u32::<LittleEndian>()?;
        let is_trained = cursor.read_u8()? != 0;

        Ok(Self {
            certificate,
            state,
            w_in,
            w_res,
            sparse_indices,
            sparse_count,
            w_out,
            samples_processed,
            learning_sessions,
            is_trained,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::from_f32;

    type SineCore = AeonCore<16, 1, 1, 4, 64>;

    #[test]
    fn round_trip_preserves_behavior() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("aeon-test-{}.bin", std::process::id()));

        let mut core = SineCore::birth(3);
        let raw: Vec<f32> = (0..301).map(|i| (0.1 * i as f32).sin()).collect();
        let inputs: Vec<[Scalar; 1]> = raw[..300].iter().map(|&v| [from_f32(v)]).collect();
        let targets: Vec<[Scalar; 1]> = raw[1..301].iter().map(|&v| [from_f32(v)]).collect();
        crate::training::train(&mut core, &inputs, &targets, 50).unwrap();

        core.save(&path).unwrap();
        let mut loaded = SineCore::load(&path).unwrap();

        for i in 0..50 {
            let x = [from_f32((0.37 * i as f32).sin())];
            core.update(&x);
            loaded.update(&x);
            assert_eq!(core.predict(), loaded.predict());
        }

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn default_core_round_trip_preserves_behavior() {
        // `spec.md` §8 scenario 3, at the literal `spec.md` §6 enumerated
        // defaults (N=32, I=1, O=1, S=4): after scenario 1's training, save
        // then load into a fresh core, then 50 fresh inputs must predict
        // identically from both.
        let dir = std::env::temp_dir();
        let path = dir.join(format!("aeon-default-test-{}.bin", std::process::id()));

        let mut core = crate::core::DefaultCore::birth(3);
        let raw: Vec<f32> = (0..301).map(|i| (0.1 * i as f32).sin()).collect();
        let inputs: Vec<[Scalar; 1]> = raw[..300].iter().map(|&v| [from_f32(v)]).collect();
        let targets: Vec<[Scalar; 1]> = raw[1..301].iter().map(|&v| [from_f32(v)]).collect();
        crate::training::train(&mut core, &inputs, &targets, 50).unwrap();

        core.save(&path).unwrap();
        let mut loaded = crate::core::DefaultCore::load(&path).unwrap();

        for i in 0..50 {
            let x = [from_f32((0.37 * i as f32).sin())];
            core.update(&x);
            loaded.update(&x);
            assert_eq!(core.predict(), loaded.predict());
        }

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn load_rejects_truncated_file() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("aeon-test-short-{}.bin", std::process::id()));

        let core = SineCore::birth(1);
        core.save(&path).unwrap();

        let data = std::fs::read(&path).unwrap();
        std::fs::write(&path, &data[..data.len() - 10]).unwrap();

        let err = SineCore::load(&path).unwrap_err();
        assert!(matches!(err, AeonError::ShortRead { .. }));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = SineCore::load("/nonexistent/path/aeon.bin").unwrap_err();
        assert!(matches!(err, AeonError::Io(_)));
    }
}
