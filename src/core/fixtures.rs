//! Reference product used by unit tests: an IW SLC with precise orbits,
//! VV+VH noise estimates and single-look ENL.
use crate::core::builder::{FactSet, FactValue, RecordBuilder};
use crate::core::catalog::ConstraintCatalog;
use crate::core::model::EarthObservationRecord;

pub(crate) const ORBIT_FILE: &str =
    "S1A_OPER_AUX_POEORB_OPOD_20210121T121545_V20201231T225942_20210102T005942.EOF";

pub(crate) fn reference_facts() -> FactSet {
    let mut facts = FactSet::new();
    facts
        .insert(
            "platform",
            FactValue::reference(
                "Sentinel-1A",
                "https://sentinel.esa.int/web/sentinel/missions/sentinel-1",
            ),
        )
        .insert(
            "sensorCalibration",
            FactValue::reference(
                "S1A_IW_CAL_1SDV_20210101",
                "https://sentinel.esa.int/documents/247904/685163/S1-Radiometric-Calibration",
            ),
        )
        .insert("dataTakeID", 308_133_i64)
        .insert("majorCycleID", 215_i64)
        .insert("orbitDataSource", "PRECISE")
        .insert("orbitStateVector", ORBIT_FILE)
        .insert("lutApplied", "sigma0")
        .insert(
            "azimuthLookBandwidth",
            FactValue::beams([("IW1", 327.0), ("IW2", 313.0), ("IW3", 314.0)]),
        )
        .insert(
            "rangeLookBandwidth",
            FactValue::beams([("IW1", 56.5e6), ("IW2", 48.3e6), ("IW3", 42.8e6)]),
        )
        .insert(
            "noiseEquivalentIntensity",
            FactValue::estimates([
                ("VV", "minimum", -25.1),
                ("VV", "maximum", -19.8),
                ("VV", "mean", -22.4),
                ("VH", "minimum", -26.0),
                ("VH", "maximum", -20.3),
                ("VH", "mean", -23.1),
            ]),
        )
        .insert("equivalentNumberOfLooks", 1_i64)
        .insert("peakSideLobeRatio", FactValue::measure(-21.5, "dB"))
        .insert("integratedSideLobeRatio", FactValue::measure(-18.2, "dB"))
        .insert("azimuthNumberOfLooks", 1_i64)
        .insert("rangeNumberOfLooks", 1_i64)
        .insert("dataGeometry", "slant range")
        .insert("azimuthPixelSpacing", FactValue::measure(13.9, "m"))
        .insert("rangePixelSpacing", FactValue::measure(2.3, "m"))
        .insert(
            "azimuthResolution",
            FactValue::beams([("IW1", 22.5), ("IW2", 22.7), ("IW3", 22.6)]),
        )
        .insert(
            "rangeResolution",
            FactValue::beams([("IW1", 2.7), ("IW2", 3.1), ("IW3", 3.5)]),
        )
        .insert("meanFaradayRotationAngle", FactValue::measure(0.42, "deg"))
        .insert(
            "faradayRotationReference",
            FactValue::reference(
                "Meyer & Nicoll (2008)",
                "https://doi.org/10.1109/TGRS.2008.2000804",
            ),
        )
        .insert("ionosphereIndicator", 0.12);
    facts
}

pub(crate) fn reference_record() -> EarthObservationRecord {
    let mut builder = RecordBuilder::new(ConstraintCatalog::standard());
    builder.extend(reference_facts());
    match builder.finish() {
        Ok(output) => output.record,
        Err(report) => panic!("reference facts must build:\n{}", report),
    }
}
