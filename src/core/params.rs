use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Certification parameters suitable for config files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationParams {
    /// Re-parse and re-validate every emitted document before it is written
    pub self_check: bool,
    /// Write `<stem>.violations.json` for rejected products in batch mode
    pub write_report: bool,
    /// Write a `<stem>.stac.json` item next to every certified document
    pub write_stac: bool,
}

impl Default for CertificationParams {
    fn default() -> Self {
        Self {
            self_check: true,
            write_report: false,
            write_stac: false,
        }
    }
}

impl CertificationParams {
    /// Load parameters from a JSON file; absent keys keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
