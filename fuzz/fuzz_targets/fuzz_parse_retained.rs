#![no_main]
use libfuzzer_sys::fuzz_target;

use std::path::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Parsing must never panic, and anything it accepts must survive a
        // render/parse round trip unchanged.
        if let Ok(retained) = loris_io::parse_retained(s, Path::new("fuzz.R")) {
            let rendered = loris_io::retained::render_retained(&retained);
            let reparsed =
                loris_io::parse_retained(&rendered, Path::new("fuzz.R")).expect("rendered output");
            assert_eq!(retained, reparsed);
        }
    }
});
