//! Unit tests for content classification.

use qrkit::services::content_classifier::{classify, is_email, is_phone, is_url, is_wifi};
use qrkit::types::content::ContentType;
use rstest::rstest;

#[rstest]
#[case("https://example.com", ContentType::Url)]
#[case("http://example.com/path?q=1#frag", ContentType::Url)]
#[case("ftp://files.example.org", ContentType::Url)]
#[case("https://user@example.com", ContentType::Url)]
#[case("example.com", ContentType::Url)]
#[case("www.rust-lang.org/learn", ContentType::Url)]
#[case("user@example.com", ContentType::Email)]
#[case("mailto:user@example.com", ContentType::Email)]
#[case("MAILTO:user@example.com", ContentType::Email)]
#[case("+34600111222", ContentType::Phone)]
#[case("600111222", ContentType::Phone)]
#[case("tel:+34600111222", ContentType::Phone)]
#[case("WIFI:T:WPA;S:home;P:secret;;", ContentType::WiFi)]
#[case("wifi:S:lowercase;;", ContentType::WiFi)]
#[case("hello world", ContentType::Text)]
#[case("12.5", ContentType::Text)]
#[case("+34 600 111 222", ContentType::Text)]
#[case("not an @email", ContentType::Text)]
#[case("", ContentType::Text)]
fn test_classify(#[case] input: &str, #[case] expected: ContentType) {
    assert_eq!(classify(input), expected, "classify({:?})", input);
}

#[test]
fn test_classify_trims_surrounding_whitespace() {
    assert_eq!(classify("  https://example.com \n"), ContentType::Url);
    assert_eq!(classify("\tuser@example.com "), ContentType::Email);
    assert_eq!(classify("   "), ContentType::Text);
}

#[test]
fn test_wifi_wins_over_other_patterns() {
    // A Wi-Fi payload containing an email-like SSID is still Wi-Fi.
    assert_eq!(classify("WIFI:S:me@home.net;;"), ContentType::WiFi);
}

#[test]
fn test_predicates_are_independent() {
    assert!(is_wifi("WIFI:S:x;;"));
    assert!(!is_wifi("my WIFI:"));

    assert!(is_email("a@b.co"));
    assert!(!is_email("a@b"));

    assert!(is_phone("+1234"));
    assert!(!is_phone("12-34"));

    assert!(is_url("https://x.io"));
    assert!(is_url("docs.rs"));
    assert!(!is_url("plain"));
}

#[test]
fn test_classification_is_deterministic() {
    let input = "https://example.com";
    assert_eq!(classify(input), classify(input));
}
