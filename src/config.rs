//! Configuration types for an extraction run.
//!
//! All behaviour is controlled through [`ExtractionConfig`], built via
//! its [`ExtractionConfigBuilder`]. Keeping every knob in one struct
//! makes it trivial to share configs, serialise them for logging, and
//! diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! well-documented defaults for the rest; `build()` validates the knobs.

use crate::error::ExtractError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::sync::Arc;

/// Configuration for a PDF image-extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdfsieve::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .fallback_scale(1.5)
///     .max_fallback_pages(3)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Scale factor for whole-page renders on the embedded-image path.
    /// Default: 1.0.
    ///
    /// Embedded hits are rendered at native page size: the point of these
    /// results is to show where an image sits, not to maximise resolution.
    pub embedded_scale: f32,

    /// Scale factor for the page-snapshot fallback path. Default: 1.2.
    ///
    /// Deliberately higher than the embedded scale — when no embedded
    /// image exists, the page snapshot *is* the deliverable, so a little
    /// extra resolution pays for itself.
    pub fallback_scale: f32,

    /// Maximum number of pages rendered by the fallback path. Default: 5.
    ///
    /// A bound on how much work a zero-image document can cost. Long
    /// documents with no embedded images would otherwise produce hundreds
    /// of snapshots nobody asked for.
    pub max_fallback_pages: usize,

    /// Maximum rendered dimension (width or height) in pixels. Default: 4000.
    ///
    /// A safety cap independent of the scale factor. A scaled render of an
    /// A0 poster could produce a 13 000 px surface and exhaust memory;
    /// this caps either dimension, scaling the other proportionally.
    pub max_rendered_pixels: u32,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Optional per-page progress events, e.g. for a terminal progress bar.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            embedded_scale: 1.0,
            fallback_scale: 1.2,
            max_fallback_pages: 5,
            max_rendered_pixels: 4000,
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("embedded_scale", &self.embedded_scale)
            .field("fallback_scale", &self.fallback_scale)
            .field("max_fallback_pages", &self.max_fallback_pages)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn embedded_scale(mut self, scale: f32) -> Self {
        self.config.embedded_scale = scale;
        self
    }

    pub fn fallback_scale(mut self, scale: f32) -> Self {
        self.config.fallback_scale = scale;
        self
    }

    pub fn max_fallback_pages(mut self, n: usize) -> Self {
        self.config.max_fallback_pages = n.max(1);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(Arc::clone(&cb));
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        for (name, scale) in [
            ("embedded_scale", c.embedded_scale),
            ("fallback_scale", c.fallback_scale),
        ] {
            if !scale.is_finite() || scale <= 0.0 || scale > 8.0 {
                return Err(ExtractError::InvalidConfig(format!(
                    "{name} must be in (0, 8], got {scale}"
                )));
            }
        }
        if c.max_fallback_pages == 0 {
            return Err(ExtractError::InvalidConfig(
                "max_fallback_pages must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
