#![no_main]

use libfuzzer_sys::fuzz_target;

use striptags::Sanitizer;
use striptags::policy::Policy;

fuzz_target!(|data: &str| {
    // Policy parsing and regex compilation must reject bad input without panicking.
    let Ok(config) = Policy::from_json(data).and_then(Policy::into_config) else {
        return;
    };
    let _ = Sanitizer::with_config(config).sanitize(r#"<a href="javascript:x" title="t">x</a>"#);
});
