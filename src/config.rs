use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{AnchorSpec, LineWidth};
use crate::foundation::error::{KymoError, KymoResult};
use crate::keyframe::interpolate::InterpMode;
use crate::kymo::assemble::{AssembleOpts, RowThreading};

/// Kymograph options, usually read from JSON.
///
/// Every field is optional in the document; missing fields take their defaults and
/// unknown fields are rejected.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KymoConfig {
    /// Number of parallel paths averaged per sample. Should be odd.
    pub line_width: u32,
    /// Vertex the rows are aligned on, or `None` for the first vertex.
    pub anchor_vertex: Option<usize>,
    /// How frames between key frames are filled.
    pub interp_mode: InterpMode,
    /// Compute rows on a rayon pool.
    pub parallel: bool,
    /// Worker thread count for the parallel row pass.
    pub threads: Option<usize>,
}

impl Default for KymoConfig {
    fn default() -> Self {
        Self {
            line_width: 1,
            anchor_vertex: None,
            interp_mode: InterpMode::Linear,
            parallel: false,
            threads: None,
        }
    }
}

impl KymoConfig {
    /// Parse a JSON document.
    pub fn from_json_str(json: &str) -> KymoResult<Self> {
        let cfg: Self = serde_json::from_str(json).context("parse kymograph config JSON")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON file.
    pub fn from_json_file(path: &Path) -> KymoResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
            .map_err(|e| match e {
                KymoError::Other(err) => {
                    KymoError::Other(err.context(format!("config '{}'", path.display())))
                }
                other => other,
            })
    }

    /// Check field ranges.
    pub fn validate(&self) -> KymoResult<()> {
        if self.line_width == 0 {
            return Err(KymoError::validation("line_width must be >= 1"));
        }
        if self.threads == Some(0) {
            return Err(KymoError::validation("threads must be >= 1 when set"));
        }
        Ok(())
    }

    /// Validated line width. Even widths are accepted with a warning.
    pub fn line_width(&self) -> KymoResult<LineWidth> {
        let width = LineWidth::new(self.line_width)?;
        if !width.is_odd() {
            tracing::warn!(line_width = self.line_width, "line width should be odd");
        }
        Ok(width)
    }

    /// Anchor described by `anchor_vertex`.
    pub fn anchor(&self) -> AnchorSpec {
        self.anchor_vertex.map(AnchorSpec::at).unwrap_or_default()
    }

    /// Assembly options without a cancel flag.
    pub fn assemble_opts(&self) -> AssembleOpts {
        AssembleOpts {
            threading: RowThreading {
                parallel: self.parallel,
                threads: self.threads,
            },
            cancel: None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
