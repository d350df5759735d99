//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn src() -> PathBuf {
        "src".into()
    }

    pub fn app() -> PathBuf {
        "app".into()
    }

    pub fn public() -> PathBuf {
        "public".into()
    }

    pub fn output() -> PathBuf {
        "dist".into()
    }

    pub fn assets() -> PathBuf {
        "assets".into()
    }

    pub fn layout() -> String {
        "layout.html".into()
    }

    pub fn extension() -> String {
        "vue".into()
    }

    pub fn style() -> PathBuf {
        "style.css".into()
    }

    pub fn script() -> PathBuf {
        "main.js".into()
    }

    pub fn root_index() -> PathBuf {
        "index.html".into()
    }

    pub mod bundler {
        pub fn command() -> Vec<String> {
            vec!["esbuild".into()]
        }

        pub fn format() -> String {
            "iife".into()
        }

        pub fn platform() -> String {
            "browser".into()
        }
    }
}

// ============================================================================
// [watch] Section Defaults
// ============================================================================

pub mod watch {
    pub fn settle_ms() -> u64 {
        50
    }
}
