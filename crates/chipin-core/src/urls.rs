//! # Route URLs
//!
//! Absolute URLs of the success, failed and callback routes, used as
//! redirect and callback targets on new purchases.

/// Public URLs of the CHIP routes mounted by the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipInUrls {
    /// Base URL of the application (e.g., "https://shop.example.com")
    pub base_url: String,
    /// Route prefix the CHIP routes are mounted under (e.g., "/chipin")
    pub prefix: String,
}

impl ChipInUrls {
    pub fn new(base_url: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            prefix: normalize_prefix(&prefix.into()),
        }
    }

    pub fn success_url(&self) -> String {
        format!("{}{}/success", self.base_url, self.prefix)
    }

    pub fn failed_url(&self) -> String {
        format!("{}{}/failed", self.base_url, self.prefix)
    }

    pub fn callback_url(&self) -> String {
        format!("{}{}/callback", self.base_url, self.prefix)
    }
}

impl Default for ChipInUrls {
    fn default() -> Self {
        Self::new("http://localhost:8080", "/chipin")
    }
}

/// Leading slash, no trailing slash; empty stays empty.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
