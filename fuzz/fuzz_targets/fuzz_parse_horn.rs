#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // The Horn-constraint parser must never panic on any input.
        let _ = loris_io::corpus_files::parse_horn(s, std::path::Path::new("fuzz.horn"));
    }
});
