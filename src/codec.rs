//! 1-bit weight quantization and the `EON` wire packet used to exchange a
//! trained readout between cores over a narrow link (`spec.md` §4.8).
//!
//! Grounded on `original_source/phase6-collective/src/quantization.c`
//! (`quantize_1bit`/`dequantize_1bit`, sign-bit packing, LSB-first) for the
//! bit codec, and `mock_mqtt.c`'s `eon_packet_header_t` for the frame
//! layout.

#![forbid(unsafe_code)]

use byteorder::{ByteOrder, LittleEndian};

const MAGIC: [u8; 3] = *b"EON";
const PACKET_TYPE_UPDATE: u8 = 0x01;
const HEADER_LEN: usize = 3 + 1 + 4 + 2;

/// Pack `weights` one sign bit per element, LSB-first within each byte
/// (`original_source`'s `quantize_1bit`). A weight of exactly zero encodes
/// as positive (bit set), matching the original's `>= 0` comparison.
pub fn encode_1bit(weights: &[f32]) -> Vec<u8> {
    let bytes = weights.len().div_ceil(8);
    let mut out = vec![0u8; bytes];
    for (i, &w) in weights.iter().enumerate() {
        if w >= 0.0 {
            out[i / 8] |= 1 << (i % 8);
        }
    }
    out
}

/// Unpack `count` sign bits from `packed` into `±scale` floats
/// (`original_source`'s `dequantize_1bit`). Returns `None` if `packed` is
/// shorter than `count.div_ceil(8)` bytes, matching `spec.md` §5's "returns 0
/// if the buffer is smaller than ⌈N/8⌉" contract — no operation panics
/// (`spec.md` §7).
pub fn decode_1bit(packed: &[u8], count: usize, scale: f32) -> Option<Vec<f32>> {
    if packed.len() < count.div_ceil(8) {
        return None;
    }
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let byte = packed[i / 8];
        let bit = (byte >> (i % 8)) & 1;
        out.push(if bit != 0 { scale } else { -scale });
    }
    Some(out)
}

/// A framed `W_out` update packet: `"EON"` magic, a type byte, the
/// originating reservoir seed, and the 1-bit-quantized readout weights
/// (`mock_mqtt.c`'s `eon_packet_header_t`).
#[derive(Debug, Clone, PartialEq)]
pub struct WeightUpdatePacket {
    /// The reservoir seed this readout update came from.
    pub seed: u32,
    /// Number of readout weights packed into `payload`.
    pub num_weights: u16,
    /// Sign-bit-packed readout weights, LSB-first.
    pub payload: Vec<u8>,
}

impl WeightUpdatePacket {
    /// Quantize `weights` and frame them behind an `EON` header carrying
    /// `seed`.
    pub fn new(seed: u32, weights: &[f32]) -> Self {
        Self {
            seed,
            num_weights: weights.len() as u16,
            payload: encode_1bit(weights),
        }
    }

    /// Serialize to the exact on-wire byte layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + self.payload.len());
        buf.extend_from_slice(&MAGIC);
        buf.push(PACKET_TYPE_UPDATE);

        let mut seed_bytes = [0u8; 4];
        LittleEndian::write_u32(&mut seed_bytes, self.seed);
        buf.extend_from_slice(&seed_bytes);

        let mut count_bytes = [0u8; 2];
        LittleEndian::write_u16(&mut count_bytes, self.num_weights);
        buf.extend_from_slice(&count_bytes);

        buf.extend_from_slice(&self.payload);
        buf
    }

    /// Parse a packet previously produced by [`WeightUpdatePacket::to_bytes`].
    /// Returns `None` on a bad magic/type or a truncated payload.
    pub fn from_bytes(buf: &[u8]) -> Option<Self> {
        if buf.len() < HEADER_LEN {
            return None;
        }
        if buf[0..3] != MAGIC || buf[3] != PACKET_TYPE_UPDATE {
            return None;
        }

        let seed = LittleEndian::read_u32(&buf[4..8]);
        let num_weights = LittleEndian::read_u16(&buf[8..10]);
        let payload_len = (num_weights as usize).div_ceil(8);

        let payload = buf.get(HEADER_LEN..HEADER_LEN + payload_len)?;
        Some(Self {
            seed,
            num_weights,
            payload: payload.to_vec(),
        })
    }

    /// Recover the quantized weights as `±scale` floats. Returns `None` if
    /// `payload` is shorter than `num_weights` bits require — a mismatched
    /// pair is reachable since both fields are public.
    pub fn decode(&self, scale: f32) -> Option<Vec<f32>> {
        decode_1bit(&self.payload, self.num_weights as usize, scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_alternating_weights_as_spec_example() {
        // N=16 alternating +/- weights pack to 0x55, 0x55 (`spec.md` §8
        // scenario 5): bit i set when weights[i] >= 0, LSB-first.
        let weights: Vec<f32> = (0..16)
            .map(|i| if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let packed = encode_1bit(&weights);
        assert_eq!(packed, vec![0x55, 0x55]);
    }

    #[test]
    fn zero_weight_encodes_as_positive() {
        let packed = encode_1bit(&[0.0]);
        assert_eq!(packed, vec![0x01]);
    }

    #[test]
    fn round_trip_preserves_sign() {
        let weights = [0.3, -0.1, 0.0, -5.0, 2.0, -0.0001, 0.0001, -2.0];
        let packed = encode_1bit(&weights);
        let recovered = decode_1bit(&packed, weights.len(), 0.25).unwrap();
        for (w, r) in weights.iter().zip(recovered.iter()) {
            assert_eq!(*w >= 0.0, *r > 0.0);
            assert_eq!(r.abs(), 0.25);
        }
    }

    #[test]
    fn decode_rejects_undersized_buffer() {
        // `spec.md` §5: "returns 0 if the buffer is smaller than ⌈N/8⌉".
        assert_eq!(decode_1bit(&[0u8], 100, 1.0), None);
        assert_eq!(decode_1bit(&[], 1, 1.0), None);
    }

    #[test]
    fn packet_decode_rejects_mismatched_payload() {
        // `WeightUpdatePacket`'s fields are public, so a caller can build a
        // `num_weights`/`payload` pair that doesn't agree; `decode` must
        // report that rather than panic.
        let packet = WeightUpdatePacket {
            seed: 1,
            num_weights: 100,
            payload: vec![0u8; 1],
        };
        assert_eq!(packet.decode(1.0), None);
    }

    proptest! {
        #[test]
        fn codec_round_trip_preserves_sign(
            weights in prop::collection::vec(-10.0f32..10.0f32, 1..128),
            scale in 0.01f32..100.0f32,
        ) {
            let packed = encode_1bit(&weights);
            let recovered = decode_1bit(&packed, weights.len(), scale).unwrap();
            for (w, r) in weights.iter().zip(recovered.iter()) {
                prop_assert_eq!(*w >= 0.0, *r > 0.0);
                prop_assert_eq!(r.abs(), scale);
            }
        }
    }

    #[test]
    fn packet_round_trips_through_bytes() {
        let weights = [0.3, -0.1, 0.0, -5.0, 2.0];
        let packet = WeightUpdatePacket::new(0xDEAD_BEEF, &weights);
        let bytes = packet.to_bytes();

        assert_eq!(&bytes[0..3], b"EON");
        assert_eq!(bytes[3], 0x01);

        let parsed = WeightUpdatePacket::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, packet);
        assert_eq!(parsed.seed, 0xDEAD_BEEF);
        assert_eq!(parsed.num_weights, 5);
    }

    #[test]
    fn from_bytes_rejects_bad_magic() {
        let mut bytes = WeightUpdatePacket::new(1, &[0.1, 0.2]).to_bytes();
        bytes[0] = b'X';
        assert!(WeightUpdatePacket::from_bytes(&bytes).is_none());
    }

    #[test]
    fn from_bytes_rejects_truncated_payload() {
        let mut bytes = WeightUpdatePacket::new(1, &[0.1; 20]).to_bytes();
        bytes.truncate(bytes.len() - 1);
        assert!(WeightUpdatePacket::from_bytes(&bytes).is_none());
    }
}
