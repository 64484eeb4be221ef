use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse weight/density bucket for a material item. Stored as a lowercase
/// string in every table that carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Light,
    Medium,
    Heavy,
}

impl Classification {
    pub const ALL: [Classification; 3] = [
        Classification::Light,
        Classification::Medium,
        Classification::Heavy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Light => "light",
            Classification::Medium => "medium",
            Classification::Heavy => "heavy",
        }
    }

    /// Parses a classification label. Anything outside the three buckets is
    /// rejected here; input validation never falls back silently.
    pub fn parse(value: &str) -> Option<Classification> {
        match value {
            "light" => Some(Classification::Light),
            "medium" => Some(Classification::Medium),
            "heavy" => Some(Classification::Heavy),
            _ => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_buckets() {
        assert_eq!(Classification::parse("light"), Some(Classification::Light));
        assert_eq!(Classification::parse("medium"), Some(Classification::Medium));
        assert_eq!(Classification::parse("heavy"), Some(Classification::Heavy));
    }

    #[test]
    fn rejects_unknown_labels() {
        assert_eq!(Classification::parse("extra-heavy"), None);
        assert_eq!(Classification::parse("LIGHT"), None);
        assert_eq!(Classification::parse(""), None);
    }
}
