use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Kind of content carried by a QR code, detected from the input text.
///
/// Purely informational: it is shown next to a generated code and stored
/// with history records, but never changes how the code is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Url,
    Email,
    Phone,
    WiFi,
    Text,
}

impl ContentType {
    /// Canonical label used in persisted records and RPC responses.
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Url => "URL",
            ContentType::Email => "Email",
            ContentType::Phone => "Phone",
            ContentType::WiFi => "WiFi",
            ContentType::Text => "Text",
        }
    }

    /// Parses a stored label.
    ///
    /// Accepts the canonical labels case-insensitively, and also the
    /// decorated labels older records carry (an emoji prefix such as
    /// `"🔗 URL"`, or the Spanish `"Teléfono"` / `"Texto"`).
    pub fn from_label(label: &str) -> Option<ContentType> {
        let word = label
            .trim()
            .rsplit(char::is_whitespace)
            .next()
            .unwrap_or("")
            .to_lowercase();
        match word.as_str() {
            "url" => Some(ContentType::Url),
            "email" | "e-mail" => Some(ContentType::Email),
            "phone" | "teléfono" | "telefono" => Some(ContentType::Phone),
            "wifi" | "wi-fi" => Some(ContentType::WiFi),
            "text" | "texto" => Some(ContentType::Text),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ContentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ContentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        ContentType::from_label(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown content type: {}", label)))
    }
}
