//! Policy file integration tests

use std::io::Write;

use striptags::policy::Policy;
use striptags::{SanitizeError, Sanitizer};

fn sanitizer_from(json: &str) -> Sanitizer {
    let config = Policy::from_json(json)
        .and_then(Policy::into_config)
        .expect("policy should compile");
    Sanitizer::with_config(config)
}

#[test]
fn test_comment_policy() {
    let sanitizer = sanitizer_from(
        r#"{
            "trim_whitespace": true,
            "valid_tags": {
                "p": true,
                "b": true,
                "a": { "href": { "deny_prefix": ["javascript:", "data:"], "ignore_case": true } }
            },
            "valid_attrs": ["title"]
        }"#,
    );

    let out = sanitizer
        .sanitize(
            r#"<p class="x"> Hi <b>there</b> </p>
               <a href="JavaScript:alert(1)" title="bad">one</a>
               <a href="https://example.com" title="good">two</a>
               <img src="x.png">"#,
        )
        .expect("sanitize");

    assert_eq!(
        out,
        r#"<p>Hi<b>there</b></p><a title="bad">one</a><a href="https://example.com" title="good">two</a>"#
    );
}

#[test]
fn test_deny_pattern_policy() {
    let sanitizer = sanitizer_from(
        r#"{ "valid_tags": { "img": { "src": { "deny_pattern": "^(?i)\\s*(javascript|vbscript):" } } } }"#,
    );

    let out = sanitizer
        .sanitize(r#"<img src=" vbscript:x"><img src="/a.png">"#)
        .expect("sanitize");
    assert_eq!(out, r#"<img><img src="/a.png">"#);
}

#[test]
fn test_policy_keeps_default_attribute_lists() {
    // Only tags overridden; global attrs and disabled attrs stay default
    let sanitizer = sanitizer_from(r#"{ "valid_tags": { "span": true } }"#);
    let out = sanitizer
        .sanitize(r#"<span id="a" style="color:red" onclick="x()">t</span><div>gone</div>"#)
        .expect("sanitize");
    assert_eq!(out, r#"<span id="a">t</span>gone"#);
}

#[test]
fn test_escape_and_keep_raw_text() {
    let sanitizer = sanitizer_from(
        r#"{ "escape_invalid_tags": true, "drop_raw_text_content": false, "valid_tags": { "p": true } }"#,
    );
    let out = sanitizer
        .sanitize("<p>hello</p><script>alert(1)</script>")
        .expect("sanitize");
    assert_eq!(out, "<p>hello</p>&lt;script&gt;alert(1)&lt;/script&gt;");
}

#[test]
fn test_policy_size_limit() {
    let sanitizer = sanitizer_from(r#"{ "max_input_size": 4 }"#);
    let err = sanitizer.sanitize("<p>toolong</p>").unwrap_err();
    assert!(matches!(
        err,
        SanitizeError::InputTooLarge { size: 14, limit: 4 }
    ));
}

#[test]
fn test_policy_from_path() {
    let path = std::env::temp_dir().join(format!("striptags-policy-{}.json", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).expect("create policy file");
        file.write_all(br#"{ "valid_tags": { "em": true } }"#)
            .expect("write policy file");
    }

    let config = Policy::from_path(&path)
        .and_then(Policy::into_config)
        .expect("policy should load");
    std::fs::remove_file(&path).ok();

    let out = Sanitizer::with_config(config)
        .sanitize("<em>a</em><strong>b</strong>")
        .expect("sanitize");
    assert_eq!(out, "<em>a</em>b");
}

#[test]
fn test_wrong_value_types_rejected() {
    for json in [
        r#"{ "valid_tags": { "p": "yes" } }"#,
        r#"{ "valid_tags": { "a": { "href": { "deny_prefixes": ["x"] } } } }"#,
        r#"{ "valid_attrs": "id" }"#,
        r#"{ "max_input_size": -1 }"#,
    ] {
        let err = Policy::from_json(json).unwrap_err();
        assert!(matches!(err, SanitizeError::Config(_)), "accepted {json}");
    }
}
