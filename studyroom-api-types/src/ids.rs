use serde::{Deserialize, Serialize};

/// Unified ID type that works consistently across the API surface
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApiId(pub String);

impl ApiId {
    /// Create from database integer ID
    pub fn from_i32(id: i32) -> Self {
        Self(id.to_string())
    }

    /// Create from string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get as string (always available)
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Try to parse as integer (for database IDs)
    pub fn as_i32(&self) -> Option<i32> {
        self.0.parse().ok()
    }
}

impl std::fmt::Display for ApiId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ApiId {
    fn from(id: i32) -> Self {
        Self::from_i32(id)
    }
}

impl From<String> for ApiId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ApiId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_i32() {
        let id = ApiId::from_i32(42);
        assert_eq!(id.as_str(), "42");
        assert_eq!(id.as_i32(), Some(42));
    }

    #[test]
    fn test_non_numeric_id() {
        let id = ApiId::from_string("s-2024-001");
        assert_eq!(id.as_i32(), None);
    }
}
