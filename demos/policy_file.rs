//! Load a JSON policy and sanitize stdin or a sample document
//!
//! ```text
//! cargo run --example policy_file -- policy.json < page.html
//! ```

use std::io::{IsTerminal, Read};

use striptags::Sanitizer;
use striptags::policy::Policy;

const SAMPLE_POLICY: &str = r#"{
    "escape_invalid_tags": true,
    "valid_tags": {
        "p": true,
        "em": true,
        "a": { "href": { "deny_prefix": ["javascript:", "data:"], "ignore_case": true } }
    },
    "valid_attrs": ["title"],
    "disabled_attrs": ["onclick", "onerror", "onload"]
}"#;

const SAMPLE_HTML: &str =
    r#"<p>Hi <em>there</em> <a href="DATA:text/html,x" title="t">link</a> <u>u</u></p>"#;

fn main() {
    let policy = match std::env::args().nth(1) {
        Some(path) => Policy::from_path(&path),
        None => Policy::from_json(SAMPLE_POLICY),
    };
    let config = match policy.and_then(Policy::into_config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Policy error: {e}");
            std::process::exit(2);
        }
    };

    let mut input = String::new();
    if std::io::stdin().is_terminal() {
        input.push_str(SAMPLE_HTML);
    } else if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("Failed to read stdin: {e}");
        std::process::exit(1);
    }

    match Sanitizer::with_config(config).sanitize(&input) {
        Ok(clean) => println!("{clean}"),
        Err(e) => {
            eprintln!("Sanitize error: {e} (code {})", e.code());
            std::process::exit(1);
        }
    }
}
