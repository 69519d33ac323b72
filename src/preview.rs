use std::fmt;

/// Maximum number of characters kept from a non-JSON body.
pub const PREVIEW_LIMIT: usize = 200;

/// Renderable view of a successful response body.
#[derive(Clone, Debug, PartialEq)]
pub enum BodyPreview {
    /// Body parsed as JSON.
    Structured(serde_json::Value),
    /// Raw text, truncated to [`PREVIEW_LIMIT`] characters.
    Text { text: String, truncated: bool },
}

impl BodyPreview {
    /// Builds a preview, returning `None` for an empty body.
    pub fn from_body(body: &str) -> Option<Self> {
        if body.is_empty() {
            return None;
        }
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
            return Some(Self::Structured(value));
        }

        // Limit counts chars, not bytes.
        let text: String = body.chars().take(PREVIEW_LIMIT).collect();
        let truncated = text.len() < body.len();
        Some(Self::Text { text, truncated })
    }
}

impl fmt::Display for BodyPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured(value) => write!(f, "{value}"),
            Self::Text { text, truncated } => {
                f.write_str(text)?;
                if *truncated {
                    f.write_str("...")?;
                }
                Ok(())
            }
        }
    }
}
