//! Persisted records for the quick-link, todo, and app-grid widgets.
//!
//! Widget rendering lives outside this workspace; these are the typed
//! shapes the configuration store holds for it.

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A user-configured shortcut shown on the dashboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickLink {
    pub name: String,
    pub url: String,
}

impl QuickLink {
    /// Build a link, normalizing the URL the way the options page does:
    /// prepend `https://` when no scheme is given and reject strings that
    /// cannot be a hostname (no dot anywhere).
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        let mut url = url.into();
        if !url.starts_with("http") {
            url = format!("https://{url}");
        }
        if !url.contains('.') {
            return Err(TypeError::InvalidUrl {
                url,
                reason: "expected a hostname like example.com".to_string(),
            });
        }
        Ok(Self { name, url })
    }
}

/// The quick links seeded on first run.
pub fn default_quick_links() -> Vec<QuickLink> {
    vec![
        QuickLink {
            name: "Google".to_string(),
            url: "https://www.google.com".to_string(),
        },
        QuickLink {
            name: "GitHub".to_string(),
            url: "https://github.com".to_string(),
        },
        QuickLink {
            name: "YouTube".to_string(),
            url: "https://youtube.com".to_string(),
        },
    ]
}

/// A single todo-list entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Creation timestamp in milliseconds, doubling as a stable id.
    pub id: u64,
    pub text: String,
    pub completed: bool,
}

/// An entry in the app grid (name, target, emoji icon).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebApp {
    pub name: String,
    pub url: String,
    pub icon: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_link_keeps_explicit_scheme() {
        let link = QuickLink::new("Example", "http://example.com").unwrap();
        assert_eq!(link.url, "http://example.com");
    }

    #[test]
    fn quick_link_prepends_https() {
        let link = QuickLink::new("Example", "example.com").unwrap();
        assert_eq!(link.url, "https://example.com");
    }

    #[test]
    fn quick_link_rejects_dotless_urls() {
        assert!(QuickLink::new("Bad", "localhost").is_err());
    }

    #[test]
    fn default_links_are_seeded() {
        let links = default_quick_links();
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].name, "Google");
    }
}
