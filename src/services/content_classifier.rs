//! Content sniffing for QR input text.
//!
//! Classification is a single pure function so it can be shown next to a
//! generated code and stored with history records without touching
//! rendering or storage.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::content::ContentType;

static WIFI: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^WIFI:").unwrap());
static MAILTO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^mailto:[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static TEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^tel:\+?\d+$").unwrap());
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?\d+$").unwrap());
static SCHEME_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z][a-z0-9+.\-]*://\S+$").unwrap());
static HOST_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(https?://)?([^\s./]+\.)+[a-z]{2,}(/\S*)?$").unwrap());

/// Detects what kind of content `text` carries.
///
/// Checks run on the trimmed text in a fixed order and the first match
/// wins: Wi-Fi, `scheme://` URL, email, phone, then bare host URL.
/// `mailto:` and `tel:` carry no `//`, so they never read as URLs, and a
/// URL with credentials (`https://user@host`) never reads as an email.
pub fn classify(text: &str) -> ContentType {
    let text = text.trim();
    if is_wifi(text) {
        ContentType::WiFi
    } else if SCHEME_URL.is_match(text) {
        ContentType::Url
    } else if is_email(text) {
        ContentType::Email
    } else if is_phone(text) {
        ContentType::Phone
    } else if is_url(text) {
        ContentType::Url
    } else {
        ContentType::Text
    }
}

pub fn is_wifi(text: &str) -> bool {
    WIFI.is_match(text)
}

pub fn is_email(text: &str) -> bool {
    MAILTO.is_match(text) || EMAIL.is_match(text)
}

pub fn is_phone(text: &str) -> bool {
    TEL.is_match(text) || PHONE.is_match(text)
}

pub fn is_url(text: &str) -> bool {
    SCHEME_URL.is_match(text) || HOST_URL.is_match(text)
}
