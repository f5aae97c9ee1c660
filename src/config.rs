//! Engine configuration.
//!
//! Directories are injected explicitly; nothing in the library reads paths
//! from process state after construction. `from_env` exists for the binary
//! and mirrors the deployment layout.

use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Holds the four template PNGs (`{orientation}-{side}.png`).
    pub template_dir: PathBuf,
    /// Single-card files land here under fresh unique names.
    pub output_dir: PathBuf,
    /// TTF files, one per supported weight.
    pub fonts_dir: PathBuf,
}

impl EngineConfig {
    pub fn new(
        template_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        fonts_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            template_dir: template_dir.into(),
            output_dir: output_dir.into(),
            fonts_dir: fonts_dir.into(),
        }
    }

    pub fn from_env() -> Self {
        let template_dir = std::env::var("CARDGEN_TEMPLATE_DIR")
            .unwrap_or_else(|_| "assets/templates".to_string());
        let output_dir =
            std::env::var("CARDGEN_OUTPUT_DIR").unwrap_or_else(|_| "generated".to_string());
        let fonts_dir =
            std::env::var("CARDGEN_FONTS_DIR").unwrap_or_else(|_| "assets/fonts".to_string());
        Self::new(template_dir, output_dir, fonts_dir)
    }
}
