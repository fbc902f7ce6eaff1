//! Recognized keys of the configuration namespace.
//!
//! Keys are independent: any subset may be missing and each loads its own
//! default. The constants exist so store consumers and watchers agree on
//! spelling; the store itself accepts arbitrary keys.

/// The dashboard settings record.
pub const SETTINGS: &str = "settings";

/// Ordered list of uploaded-image index entries.
pub const IMAGE_INDEX: &str = "uploadedImageIDs";

/// Quick-link list.
pub const QUICK_LINKS: &str = "quickLinks";

/// Todo list.
pub const TODOS: &str = "todos";

/// App-grid list.
pub const APPS: &str = "apps";

/// Every key the dashboard reads at startup.
pub const RECOGNIZED: &[&str] = &[SETTINGS, IMAGE_INDEX, QUICK_LINKS, TODOS, APPS];
