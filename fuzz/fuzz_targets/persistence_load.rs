#![no_main]

use aeon_core::core::DefaultCore;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = DefaultCore::from_bytes(data);
});
