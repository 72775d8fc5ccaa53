//! Record builder: maps incoming measurement facts onto an
//! [`EarthObservationRecord`].
//!
//! The builder is permissive. Over-long collections and out-of-contract
//! values are kept for the validator to judge; only facts that cannot be
//! placed at all (unknown key, wrong shape, mixed units) are dropped, each
//! with a warning. Missing required facts are reported together when
//! [`RecordBuilder::finish`] is called.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::catalog::{fields, ConstraintCatalog, ConstraintSpec, FixedValue};
use crate::core::model::{
    Acquisition, BeamSeries, EarthObservationRecord, Measure, OrbitStateVector,
    PerformanceIndicators, Platform, PolarizationEstimate, ProcessingInformation, Reference,
    Sensor,
};
use crate::core::report::{ValidationReport, Violation};

/// Known fact keys; the key text is the element name in the output document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    Platform,
    RadarBand,
    RadarCenterFrequency,
    SensorCalibration,
    MeanOrbitAltitude,
    DataTakeId,
    MajorCycleId,
    ProcessingLevel,
    OrbitDataSource,
    OrbitStateVector,
    LutApplied,
    AzimuthLookBandwidth,
    RangeLookBandwidth,
    NoiseEquivalentIntensityType,
    NoiseEquivalentIntensity,
    EquivalentNumberOfLooks,
    PeakSideLobeRatio,
    IntegratedSideLobeRatio,
    ProductType,
    AzimuthNumberOfLooks,
    RangeNumberOfLooks,
    DataGeometry,
    AzimuthPixelSpacing,
    RangePixelSpacing,
    AzimuthResolution,
    RangeResolution,
    MeanFaradayRotationAngle,
    FaradayRotationReference,
    IonosphereIndicator,
}

/// Value shape a field accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Text,
    Integer,
    Number,
    Measure,
    Reference,
    Beams,
    Estimates,
}

impl FieldId {
    pub const ALL: [FieldId; 29] = [
        FieldId::Platform,
        FieldId::RadarBand,
        FieldId::RadarCenterFrequency,
        FieldId::SensorCalibration,
        FieldId::MeanOrbitAltitude,
        FieldId::DataTakeId,
        FieldId::MajorCycleId,
        FieldId::ProcessingLevel,
        FieldId::OrbitDataSource,
        FieldId::OrbitStateVector,
        FieldId::LutApplied,
        FieldId::AzimuthLookBandwidth,
        FieldId::RangeLookBandwidth,
        FieldId::NoiseEquivalentIntensityType,
        FieldId::NoiseEquivalentIntensity,
        FieldId::EquivalentNumberOfLooks,
        FieldId::PeakSideLobeRatio,
        FieldId::IntegratedSideLobeRatio,
        FieldId::ProductType,
        FieldId::AzimuthNumberOfLooks,
        FieldId::RangeNumberOfLooks,
        FieldId::DataGeometry,
        FieldId::AzimuthPixelSpacing,
        FieldId::RangePixelSpacing,
        FieldId::AzimuthResolution,
        FieldId::RangeResolution,
        FieldId::MeanFaradayRotationAngle,
        FieldId::FaradayRotationReference,
        FieldId::IonosphereIndicator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::Platform => "platform",
            FieldId::RadarBand => "radarBand",
            FieldId::RadarCenterFrequency => "radarCenterFrequency",
            FieldId::SensorCalibration => "sensorCalibration",
            FieldId::MeanOrbitAltitude => "meanOrbitAltitude",
            FieldId::DataTakeId => "dataTakeID",
            FieldId::MajorCycleId => "majorCycleID",
            FieldId::ProcessingLevel => "processingLevel",
            FieldId::OrbitDataSource => "orbitDataSource",
            FieldId::OrbitStateVector => "orbitStateVector",
            FieldId::LutApplied => "lutApplied",
            FieldId::AzimuthLookBandwidth => "azimuthLookBandwidth",
            FieldId::RangeLookBandwidth => "rangeLookBandwidth",
            FieldId::NoiseEquivalentIntensityType => "noiseEquivalentIntensityType",
            FieldId::NoiseEquivalentIntensity => "noiseEquivalentIntensity",
            FieldId::EquivalentNumberOfLooks => "equivalentNumberOfLooks",
            FieldId::PeakSideLobeRatio => "peakSideLobeRatio",
            FieldId::IntegratedSideLobeRatio => "integratedSideLobeRatio",
            FieldId::ProductType => "productType",
            FieldId::AzimuthNumberOfLooks => "azimuthNumberOfLooks",
            FieldId::RangeNumberOfLooks => "rangeNumberOfLooks",
            FieldId::DataGeometry => "dataGeometry",
            FieldId::AzimuthPixelSpacing => "azimuthPixelSpacing",
            FieldId::RangePixelSpacing => "rangePixelSpacing",
            FieldId::AzimuthResolution => "azimuthResolution",
            FieldId::RangeResolution => "rangeResolution",
            FieldId::MeanFaradayRotationAngle => "meanFaradayRotationAngle",
            FieldId::FaradayRotationReference => "faradayRotationReference",
            FieldId::IonosphereIndicator => "ionosphereIndicator",
        }
    }

    /// Catalog path of the field
    pub fn path(&self) -> &'static str {
        match self {
            FieldId::Platform => fields::PLATFORM,
            FieldId::RadarBand => fields::RADAR_BAND,
            FieldId::RadarCenterFrequency => fields::CENTER_FREQUENCY,
            FieldId::SensorCalibration => fields::CALIBRATION,
            FieldId::MeanOrbitAltitude => fields::MEAN_ORBIT_ALTITUDE,
            FieldId::DataTakeId => fields::DATA_TAKE_ID,
            FieldId::MajorCycleId => fields::MAJOR_CYCLE_ID,
            FieldId::ProcessingLevel => fields::PROCESSING_LEVEL,
            FieldId::OrbitDataSource => fields::ORBIT_DATA_SOURCE,
            FieldId::OrbitStateVector => fields::ORBIT_STATE_VECTOR,
            FieldId::LutApplied => fields::LUT_APPLIED,
            FieldId::AzimuthLookBandwidth => fields::AZIMUTH_LOOK_BANDWIDTH,
            FieldId::RangeLookBandwidth => fields::RANGE_LOOK_BANDWIDTH,
            FieldId::NoiseEquivalentIntensityType => fields::NOISE_TYPE,
            FieldId::NoiseEquivalentIntensity => fields::NOISE_ESTIMATES,
            FieldId::EquivalentNumberOfLooks => fields::ENL,
            FieldId::PeakSideLobeRatio => fields::PSLR,
            FieldId::IntegratedSideLobeRatio => fields::ISLR,
            FieldId::ProductType => fields::PRODUCT_TYPE,
            FieldId::AzimuthNumberOfLooks => fields::AZIMUTH_LOOKS,
            FieldId::RangeNumberOfLooks => fields::RANGE_LOOKS,
            FieldId::DataGeometry => fields::DATA_GEOMETRY,
            FieldId::AzimuthPixelSpacing => fields::AZIMUTH_PIXEL_SPACING,
            FieldId::RangePixelSpacing => fields::RANGE_PIXEL_SPACING,
            FieldId::AzimuthResolution => fields::AZIMUTH_RESOLUTION,
            FieldId::RangeResolution => fields::RANGE_RESOLUTION,
            FieldId::MeanFaradayRotationAngle => fields::FARADAY_ROTATION,
            FieldId::FaradayRotationReference => fields::FARADAY_REFERENCE,
            FieldId::IonosphereIndicator => fields::IONOSPHERE_INDICATOR,
        }
    }

    fn shape(&self) -> Shape {
        match self {
            FieldId::RadarBand
            | FieldId::ProcessingLevel
            | FieldId::OrbitDataSource
            | FieldId::LutApplied
            | FieldId::NoiseEquivalentIntensityType
            | FieldId::ProductType
            | FieldId::DataGeometry => Shape::Text,
            FieldId::DataTakeId
            | FieldId::MajorCycleId
            | FieldId::EquivalentNumberOfLooks
            | FieldId::AzimuthNumberOfLooks
            | FieldId::RangeNumberOfLooks => Shape::Integer,
            FieldId::IonosphereIndicator => Shape::Number,
            FieldId::RadarCenterFrequency
            | FieldId::MeanOrbitAltitude
            | FieldId::PeakSideLobeRatio
            | FieldId::IntegratedSideLobeRatio
            | FieldId::AzimuthPixelSpacing
            | FieldId::RangePixelSpacing
            | FieldId::MeanFaradayRotationAngle => Shape::Measure,
            FieldId::Platform
            | FieldId::SensorCalibration
            | FieldId::OrbitStateVector
            | FieldId::FaradayRotationReference => Shape::Reference,
            FieldId::AzimuthLookBandwidth
            | FieldId::RangeLookBandwidth
            | FieldId::AzimuthResolution
            | FieldId::RangeResolution => Shape::Beams,
            FieldId::NoiseEquivalentIntensity => Shape::Estimates,
        }
    }

    /// Fields pinned by the contract; the builder fills them from the catalog
    fn is_contract_constant(&self) -> bool {
        matches!(
            self,
            FieldId::RadarBand
                | FieldId::RadarCenterFrequency
                | FieldId::MeanOrbitAltitude
                | FieldId::ProcessingLevel
                | FieldId::NoiseEquivalentIntensityType
                | FieldId::ProductType
        )
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldId::ALL
            .iter()
            .find(|f| f.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown fact key: {}", s))
    }
}

/// One entry of a repeated fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactEntry {
    Beam {
        #[serde(rename = "beamId")]
        beam_id: String,
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
    Polarization {
        polarization: String,
        statistic: String,
        value: f64,
    },
}

/// A measurement fact as handed over by the processing chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Integer(i64),
    Number(f64),
    Text(String),
    Measure {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
    Reference {
        identifier: String,
        href: String,
    },
    Label {
        label: String,
        unit: String,
    },
    Entries(Vec<FactEntry>),
}

impl FactValue {
    pub fn measure(value: f64, unit: impl Into<String>) -> Self {
        FactValue::Measure {
            value,
            unit: Some(unit.into()),
        }
    }

    pub fn reference(identifier: impl Into<String>, href: impl Into<String>) -> Self {
        FactValue::Reference {
            identifier: identifier.into(),
            href: href.into(),
        }
    }

    pub fn label(label: impl Into<String>, unit: impl Into<String>) -> Self {
        FactValue::Label {
            label: label.into(),
            unit: unit.into(),
        }
    }

    /// Per-beam entries without explicit unit
    pub fn beams<'a>(entries: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        FactValue::Entries(
            entries
                .into_iter()
                .map(|(beam_id, value)| FactEntry::Beam {
                    beam_id: beam_id.to_string(),
                    value,
                    unit: None,
                })
                .collect(),
        )
    }

    /// Per-polarization (polarization, statistic, value) entries
    pub fn estimates<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str, f64)>) -> Self {
        FactValue::Entries(
            entries
                .into_iter()
                .map(|(polarization, statistic, value)| FactEntry::Polarization {
                    polarization: polarization.to_string(),
                    statistic: statistic.to_string(),
                    value,
                })
                .collect(),
        )
    }

    fn shape_name(&self) -> &'static str {
        match self {
            FactValue::Integer(_) => "integer",
            FactValue::Number(_) => "number",
            FactValue::Text(_) => "text",
            FactValue::Measure { .. } => "measure",
            FactValue::Reference { .. } => "reference",
            FactValue::Label { .. } => "label",
            FactValue::Entries(_) => "entry list",
        }
    }
}

impl From<i64> for FactValue {
    fn from(v: i64) -> Self {
        FactValue::Integer(v)
    }
}

impl From<f64> for FactValue {
    fn from(v: f64) -> Self {
        FactValue::Number(v)
    }
}

impl From<&str> for FactValue {
    fn from(v: &str) -> Self {
        FactValue::Text(v.to_string())
    }
}

impl From<String> for FactValue {
    fn from(v: String) -> Self {
        FactValue::Text(v)
    }
}

/// Facts of one product keyed by field name, as loaded from JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactSet {
    pub facts: BTreeMap<String, FactValue>,
}

impl FactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FactValue>) -> &mut Self {
        self.facts.insert(key.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

/// Successfully assembled, not yet validated record
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub record: EarthObservationRecord,
    /// Facts that could not be mapped, one message each
    pub warnings: Vec<String>,
}

/// Assembles one record from facts
pub struct RecordBuilder<'c> {
    catalog: &'c ConstraintCatalog,
    record: EarthObservationRecord,
    supplied: BTreeSet<FieldId>,
    defaulted: BTreeSet<FieldId>,
    warnings: Vec<String>,
}

impl<'c> RecordBuilder<'c> {
    /// Builder with contract constants (band, frequency, altitude, level,
    /// product type, units, orbit access URL) pre-filled from `catalog`
    pub fn new(catalog: &'c ConstraintCatalog) -> Self {
        let mut builder = Self::strict(catalog);
        builder.apply_contract_defaults();
        builder
    }

    /// Builder that takes nothing for granted; every field must arrive as a fact
    pub fn strict(catalog: &'c ConstraintCatalog) -> Self {
        Self {
            catalog,
            record: blank_record(),
            supplied: BTreeSet::new(),
            defaulted: BTreeSet::new(),
            warnings: Vec::new(),
        }
    }

    fn apply_contract_defaults(&mut self) {
        for field in FieldId::ALL {
            if !field.is_contract_constant() {
                continue;
            }
            let value = match self.catalog.get(field.path()) {
                Some(ConstraintSpec::FixedValue(FixedValue::Text(t))) => {
                    FactValue::Text(t.to_string())
                }
                Some(ConstraintSpec::FixedValue(FixedValue::Number(v))) => FactValue::Number(*v),
                Some(ConstraintSpec::FixedValue(FixedValue::Integer(v))) => FactValue::Integer(*v),
                Some(ConstraintSpec::Enumeration([single])) => FactValue::Text(single.to_string()),
                _ => continue,
            };
            if self.apply(field, value) {
                self.defaulted.insert(field);
            }
        }
        self.record.processing.orbit_state_vector.access = self
            .fixed_text(fields::ORBIT_STATE_VECTOR_ACCESS)
            .unwrap_or_default()
            .to_string();
        self.record.performance.noise_equivalent_intensity_uom = self
            .catalog
            .fixed_unit(fields::NOISE_TYPE)
            .unwrap_or_default()
            .to_string();
    }

    fn fixed_text(&self, path: &str) -> Option<&'static str> {
        match self.catalog.fixed_value(path) {
            Some(FixedValue::Text(t)) => Some(t),
            _ => None,
        }
    }

    /// Add one fact by key; unknown keys become warnings
    pub fn insert(&mut self, key: &str, value: impl Into<FactValue>) -> &mut Self {
        match key.parse::<FieldId>() {
            Ok(field) => self.insert_field(field, value),
            Err(_) => {
                self.warn(format!("fact '{}' does not map to a known field; ignored", key));
                self
            }
        }
    }

    /// Add one fact for a known field
    pub fn insert_field(&mut self, field: FieldId, value: impl Into<FactValue>) -> &mut Self {
        let value = value.into();
        let is_collection = matches!(field.shape(), Shape::Beams | Shape::Estimates);
        if !is_collection && self.supplied.contains(&field) {
            self.warn(format!("fact '{}' supplied more than once; last value wins", field));
        }
        if self.apply(field, value) {
            self.supplied.insert(field);
            self.defaulted.remove(&field);
        }
        self
    }

    /// Add every fact of `facts`
    pub fn extend(&mut self, facts: FactSet) -> &mut Self {
        for (key, value) in facts.facts {
            self.insert(&key, value);
        }
        self
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }

    fn wrong_shape(&mut self, field: FieldId, value: &FactValue) -> bool {
        self.warn(format!(
            "fact '{}' has unexpected shape {}; ignored",
            field,
            value.shape_name()
        ));
        false
    }

    /// Place `value` into the record; false when nothing could be placed
    fn apply(&mut self, field: FieldId, value: FactValue) -> bool {
        match field.shape() {
            Shape::Text => match value {
                FactValue::Text(text) => {
                    self.set_text(field, text, None);
                    true
                }
                FactValue::Label { label, unit }
                    if field == FieldId::NoiseEquivalentIntensityType =>
                {
                    self.set_text(field, label, Some(unit));
                    true
                }
                other => self.wrong_shape(field, &other),
            },
            Shape::Integer => match value {
                FactValue::Integer(v) => {
                    self.set_integer(field, v);
                    true
                }
                FactValue::Number(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 => {
                    self.set_integer(field, v as i64);
                    true
                }
                FactValue::Number(v) => {
                    self.warn(format!("fact '{}' value {} is not an integer; ignored", field, v));
                    false
                }
                other => self.wrong_shape(field, &other),
            },
            Shape::Number => match value {
                FactValue::Integer(v) => {
                    self.record.ionosphere_indicator = v as f64;
                    true
                }
                FactValue::Number(v) => {
                    self.record.ionosphere_indicator = v;
                    true
                }
                other => self.wrong_shape(field, &other),
            },
            Shape::Measure => {
                let (value, unit) = match value {
                    FactValue::Integer(v) => (v as f64, None),
                    FactValue::Number(v) => (v, None),
                    FactValue::Measure { value, unit } => (value, unit),
                    other => return self.wrong_shape(field, &other),
                };
                let uom = match unit {
                    Some(u) => u,
                    None => self.catalog.fixed_unit(field.path()).unwrap_or_default().to_string(),
                };
                self.set_measure(field, Measure::new(value, uom));
                true
            }
            Shape::Reference => match value {
                FactValue::Reference { identifier, href } => {
                    self.set_reference(field, Reference::new(identifier, href));
                    true
                }
                FactValue::Text(file_name) if field == FieldId::OrbitStateVector => {
                    self.record.processing.orbit_state_vector.file_name = file_name;
                    if self.record.processing.orbit_state_vector.access.is_empty() {
                        self.record.processing.orbit_state_vector.access = self
                            .fixed_text(fields::ORBIT_STATE_VECTOR_ACCESS)
                            .unwrap_or_default()
                            .to_string();
                    }
                    true
                }
                other => self.wrong_shape(field, &other),
            },
            Shape::Beams => match value {
                FactValue::Entries(entries) => self.push_beams(field, entries),
                other => self.wrong_shape(field, &other),
            },
            Shape::Estimates => match value {
                FactValue::Entries(entries) => self.push_estimates(entries),
                other => self.wrong_shape(field, &other),
            },
        }
    }

    fn set_text(&mut self, field: FieldId, text: String, unit: Option<String>) {
        let r = &mut self.record;
        match field {
            FieldId::RadarBand => r.sensor.radar_band = text,
            FieldId::ProcessingLevel => r.processing.processing_level = text,
            FieldId::OrbitDataSource => r.processing.orbit_data_source = text,
            FieldId::LutApplied => r.processing.lut_applied = text,
            FieldId::NoiseEquivalentIntensityType => {
                r.performance.noise_equivalent_intensity_type = text;
                if let Some(unit) = unit {
                    r.performance.noise_equivalent_intensity_uom = unit;
                }
            }
            FieldId::ProductType => r.product_type = text,
            FieldId::DataGeometry => r.data_geometry = text,
            _ => {}
        }
    }

    fn set_integer(&mut self, field: FieldId, v: i64) {
        let r = &mut self.record;
        match field {
            FieldId::DataTakeId => r.acquisition.data_take_id = v,
            FieldId::MajorCycleId => r.acquisition.major_cycle_id = v,
            FieldId::EquivalentNumberOfLooks => r.performance.equivalent_number_of_looks = v,
            FieldId::AzimuthNumberOfLooks => r.azimuth_number_of_looks = v,
            FieldId::RangeNumberOfLooks => r.range_number_of_looks = v,
            _ => {}
        }
    }

    fn set_measure(&mut self, field: FieldId, m: Measure) {
        let r = &mut self.record;
        match field {
            FieldId::RadarCenterFrequency => r.sensor.center_frequency = m,
            FieldId::MeanOrbitAltitude => r.acquisition.mean_orbit_altitude = m,
            FieldId::PeakSideLobeRatio => r.performance.peak_side_lobe_ratio = m,
            FieldId::IntegratedSideLobeRatio => r.performance.integrated_side_lobe_ratio = m,
            FieldId::AzimuthPixelSpacing => r.azimuth_pixel_spacing = m,
            FieldId::RangePixelSpacing => r.range_pixel_spacing = m,
            FieldId::MeanFaradayRotationAngle => r.mean_faraday_rotation_angle = m,
            _ => {}
        }
    }

    fn set_reference(&mut self, field: FieldId, reference: Reference) {
        let r = &mut self.record;
        match field {
            FieldId::Platform => r.platform.satellite = reference,
            FieldId::SensorCalibration => r.sensor.calibration = reference,
            FieldId::FaradayRotationReference => r.faraday_rotation_reference = reference,
            FieldId::OrbitStateVector => {
                r.processing.orbit_state_vector = OrbitStateVector {
                    file_name: reference.identifier,
                    access: reference.href,
                }
            }
            _ => {}
        }
    }

    fn series_mut(&mut self, field: FieldId) -> Option<&mut BeamSeries> {
        let r = &mut self.record;
        match field {
            FieldId::AzimuthLookBandwidth => Some(&mut r.processing.azimuth_look_bandwidth),
            FieldId::RangeLookBandwidth => Some(&mut r.processing.range_look_bandwidth),
            FieldId::AzimuthResolution => Some(&mut r.azimuth_resolution),
            FieldId::RangeResolution => Some(&mut r.range_resolution),
            _ => None,
        }
    }

    fn push_beams(&mut self, field: FieldId, entries: Vec<FactEntry>) -> bool {
        let default_unit = self.catalog.fixed_unit(field.path()).unwrap_or_default();
        // an explicit empty list is supplied; the count rule reports it
        let mut placed = entries.is_empty();
        let mut dropped = Vec::new();

        if let Some(series) = self.series_mut(field) {
            for entry in entries {
                match entry {
                    FactEntry::Beam { beam_id, value, unit } => {
                        let unit = unit.unwrap_or_else(|| default_unit.to_string());
                        if series.is_empty() {
                            series.uom = unit;
                        } else if series.uom != unit {
                            dropped.push(format!(
                                "fact '{}' entry {} has unit '{}' but the series uses '{}'; ignored",
                                field, beam_id, unit, series.uom
                            ));
                            continue;
                        }
                        series.push(beam_id, value);
                        placed = true;
                    }
                    FactEntry::Polarization { polarization, .. } => dropped.push(format!(
                        "fact '{}' holds a polarization entry ({}) where beam entries are expected; ignored",
                        field, polarization
                    )),
                }
            }
        }

        for message in dropped {
            self.warn(message);
        }
        placed
    }

    fn push_estimates(&mut self, entries: Vec<FactEntry>) -> bool {
        let mut placed = entries.is_empty();
        for entry in entries {
            match entry {
                FactEntry::Polarization { polarization, statistic, value } => {
                    self.record
                        .performance
                        .estimates
                        .push(PolarizationEstimate::new(polarization, statistic, value));
                    placed = true;
                }
                FactEntry::Beam { beam_id, .. } => self.warn(format!(
                    "fact '{}' holds a beam entry ({}) where polarization entries are expected; ignored",
                    FieldId::NoiseEquivalentIntensity,
                    beam_id
                )),
            }
        }
        placed
    }

    /// Finish assembly. Every required field that never received a fact is
    /// reported as `MissingRequiredField`; warnings travel with either outcome.
    pub fn finish(self) -> Result<BuildOutput, ValidationReport> {
        let mut report = ValidationReport::new();
        for field in FieldId::ALL {
            if !self.supplied.contains(&field) && !self.defaulted.contains(&field) {
                report.push(Violation::missing(field.path()));
            }
        }

        if report.has_failures() {
            report.warnings = self.warnings;
            return Err(report);
        }

        debug!(
            "assembled record from {} facts ({} contract defaults, {} warnings)",
            self.supplied.len(),
            self.defaulted.len(),
            self.warnings.len()
        );
        Ok(BuildOutput {
            record: self.record,
            warnings: self.warnings,
        })
    }
}

fn blank_record() -> EarthObservationRecord {
    let blank_reference = || Reference::new("", "");
    let blank_measure = || Measure::new(0.0, "");
    EarthObservationRecord {
        platform: Platform {
            satellite: blank_reference(),
        },
        sensor: Sensor {
            radar_band: String::new(),
            center_frequency: blank_measure(),
            calibration: blank_reference(),
        },
        acquisition: Acquisition {
            mean_orbit_altitude: blank_measure(),
            data_take_id: 0,
            major_cycle_id: 0,
        },
        processing: ProcessingInformation {
            processing_level: String::new(),
            orbit_data_source: String::new(),
            orbit_state_vector: OrbitStateVector {
                file_name: String::new(),
                access: String::new(),
            },
            lut_applied: String::new(),
            azimuth_look_bandwidth: BeamSeries::new(""),
            range_look_bandwidth: BeamSeries::new(""),
        },
        performance: PerformanceIndicators {
            noise_equivalent_intensity_type: String::new(),
            noise_equivalent_intensity_uom: String::new(),
            estimates: Vec::new(),
            equivalent_number_of_looks: 0,
            peak_side_lobe_ratio: blank_measure(),
            integrated_side_lobe_ratio: blank_measure(),
        },
        product_type: String::new(),
        azimuth_number_of_looks: 0,
        range_number_of_looks: 0,
        data_geometry: String::new(),
        azimuth_pixel_spacing: blank_measure(),
        range_pixel_spacing: blank_measure(),
        azimuth_resolution: BeamSeries::new(""),
        range_resolution: BeamSeries::new(""),
        mean_faraday_rotation_angle: blank_measure(),
        faraday_rotation_reference: blank_reference(),
        ionosphere_indicator: 0.0,
    }
}
