#![no_main]

use std::sync::LazyLock;

use libfuzzer_sys::fuzz_target;

use striptags::{Sanitizer, SanitizerConfig};

static ESCAPING: LazyLock<Sanitizer> = LazyLock::new(|| {
    Sanitizer::with_config(
        SanitizerConfig::builder()
            .escape_invalid_tags(true)
            .trim_whitespace(true)
            .build(),
    )
});

fuzz_target!(|data: &[u8]| {
    // Byte path covers charset sniffing and decoding.
    let _ = Sanitizer::default().sanitize_bytes(data, None);

    let Ok(html) = std::str::from_utf8(data) else {
        return;
    };

    // Neither mode may ever emit a live script element.
    for sanitizer in [&Sanitizer::default(), &*ESCAPING] {
        if let Ok(out) = sanitizer.sanitize(html) {
            assert!(!out.to_ascii_lowercase().contains("<script"));
        }
    }
});
