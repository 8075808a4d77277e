//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn url() -> Option<String> {
        None
    }

    pub fn author() -> String {
        "<YOUR_NAME>".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn posts() -> PathBuf {
        "_posts".into()
    }

    pub fn drafts() -> PathBuf {
        "_drafts".into()
    }

    pub fn layouts() -> PathBuf {
        "_layouts".into()
    }

    pub fn output() -> PathBuf {
        "_site".into()
    }

    pub fn extensions() -> Vec<String> {
        vec!["md".into(), "markdown".into(), "html".into()]
    }
}
