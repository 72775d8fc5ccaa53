//! Loading of per-product measurement facts from JSON files.
use std::path::Path;

use tracing::debug;

use crate::core::builder::FactSet;
use crate::error::Result;

/// Read a JSON object of fact key -> value from `path`
pub fn load_facts(path: &Path) -> Result<FactSet> {
    let text = std::fs::read_to_string(path)?;
    let facts: FactSet = serde_json::from_str(&text)?;
    debug!("loaded {} facts from {:?}", facts.len(), path);
    Ok(facts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::FactValue;
    use crate::error::Error;

    #[test]
    fn loads_mixed_fact_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facts.json");
        std::fs::write(
            &path,
            r#"{
                "dataTakeID": 308133,
                "ionosphereIndicator": 0.12,
                "dataGeometry": "slant range",
                "peakSideLobeRatio": {"value": -21.5, "unit": "dB"},
                "rangeResolution": [{"beamId": "IW1", "value": 2.7}]
            }"#,
        )
        .unwrap();

        let facts = load_facts(&path).unwrap();
        assert_eq!(facts.len(), 5);
        assert_eq!(facts.facts["dataTakeID"], FactValue::Integer(308_133));
        assert_eq!(facts.facts["ionosphereIndicator"], FactValue::Number(0.12));
        assert_eq!(facts.facts["peakSideLobeRatio"], FactValue::measure(-21.5, "dB"));
        assert_eq!(facts.facts["rangeResolution"], FactValue::beams([("IW1", 2.7)]));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facts.json");
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(load_facts(&path), Err(Error::Json(_))));
    }
}
