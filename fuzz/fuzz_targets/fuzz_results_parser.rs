#![no_main]

use libfuzzer_sys::fuzz_target;
use apexsum_adapters_results::{parse_coverage, parse_results};

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string, lossy is fine for fuzzing
    if let Ok(text) = std::str::from_utf8(data) {
        // The decoders should never panic, regardless of input
        // Errors are expected and acceptable; panics are not
        let _ = parse_results(text);
        let _ = parse_coverage(text);
    }
});
