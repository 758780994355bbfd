#![no_main]

use aeon_core::codec::WeightUpdatePacket;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Some(packet) = WeightUpdatePacket::from_bytes(data) {
        let _ = packet.decode(0.25);
    }
});
