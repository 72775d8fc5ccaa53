//! Typed record hierarchy of an NRB source metadata document.
//!
//! Containers enforce shape only (a beam measurement always has a value and a
//! beam id, a reference always has an identifier and a link). Whether values
//! are acceptable is decided by the validator, so enumerated fields are kept
//! as the text the facts carried.
use serde::{Deserialize, Serialize};

/// A numeric value with its unit of measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub value: f64,
    pub uom: String,
}

impl Measure {
    pub fn new(value: f64, uom: impl Into<String>) -> Self {
        Self {
            value,
            uom: uom.into(),
        }
    }
}

/// An identifier with an external link (`xlink:href`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub identifier: String,
    pub href: String,
}

impl Reference {
    pub fn new(identifier: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            href: href.into(),
        }
    }
}

/// One per-beam value, e.g. the azimuth resolution of sub-swath IW2
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamMeasurement {
    pub beam_id: String,
    pub value: f64,
}

impl BeamMeasurement {
    pub fn new(beam_id: impl Into<String>, value: f64) -> Self {
        Self {
            beam_id: beam_id.into(),
            value,
        }
    }
}

/// Repeated per-beam measurements sharing one unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamSeries {
    pub uom: String,
    pub entries: Vec<BeamMeasurement>,
}

impl BeamSeries {
    pub fn new(uom: impl Into<String>) -> Self {
        Self {
            uom: uom.into(),
            entries: Vec::new(),
        }
    }

    pub fn with_entries(
        uom: impl Into<String>,
        entries: impl IntoIterator<Item = BeamMeasurement>,
    ) -> Self {
        Self {
            uom: uom.into(),
            entries: entries.into_iter().collect(),
        }
    }

    pub fn push(&mut self, beam_id: impl Into<String>, value: f64) {
        self.entries.push(BeamMeasurement::new(beam_id, value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn beam_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.beam_id.as_str())
    }
}

/// Noise-equivalent intensity of one polarization channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarizationEstimate {
    pub polarization: String,
    pub statistic: String,
    pub value: f64,
}

impl PolarizationEstimate {
    pub fn new(polarization: impl Into<String>, statistic: impl Into<String>, value: f64) -> Self {
        Self {
            polarization: polarization.into(),
            statistic: statistic.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Mission short name with a link to its description
    pub satellite: Reference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub radar_band: String,
    pub center_frequency: Measure,
    pub calibration: Reference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acquisition {
    pub mean_orbit_altitude: Measure,
    pub data_take_id: i64,
    pub major_cycle_id: i64,
}

/// Orbit state vector file; `access` is where the file can be retrieved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbitStateVector {
    pub file_name: String,
    pub access: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingInformation {
    pub processing_level: String,
    pub orbit_data_source: String,
    pub orbit_state_vector: OrbitStateVector,
    pub lut_applied: String,
    pub azimuth_look_bandwidth: BeamSeries,
    pub range_look_bandwidth: BeamSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceIndicators {
    pub noise_equivalent_intensity_type: String,
    /// Unit of the noise-equivalent intensity estimates
    pub noise_equivalent_intensity_uom: String,
    pub estimates: Vec<PolarizationEstimate>,
    pub equivalent_number_of_looks: i64,
    pub peak_side_lobe_ratio: Measure,
    pub integrated_side_lobe_ratio: Measure,
}

/// Root of the metadata tree; owns every sub-entity exactly once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthObservationRecord {
    pub platform: Platform,
    pub sensor: Sensor,
    pub acquisition: Acquisition,
    pub processing: ProcessingInformation,
    pub performance: PerformanceIndicators,
    pub product_type: String,
    pub azimuth_number_of_looks: i64,
    pub range_number_of_looks: i64,
    pub data_geometry: String,
    pub azimuth_pixel_spacing: Measure,
    pub range_pixel_spacing: Measure,
    pub azimuth_resolution: BeamSeries,
    pub range_resolution: BeamSeries,
    pub mean_faraday_rotation_angle: Measure,
    pub faraday_rotation_reference: Reference,
    pub ionosphere_indicator: f64,
}

impl EarthObservationRecord {
    /// Per-beam collections paired with their catalog paths, in document order
    pub fn beam_collections(&self) -> [(&'static str, &BeamSeries); 4] {
        use crate::core::catalog::fields;
        [
            (fields::AZIMUTH_LOOK_BANDWIDTH, &self.processing.azimuth_look_bandwidth),
            (fields::RANGE_LOOK_BANDWIDTH, &self.processing.range_look_bandwidth),
            (fields::AZIMUTH_RESOLUTION, &self.azimuth_resolution),
            (fields::RANGE_RESOLUTION, &self.range_resolution),
        ]
    }
}
