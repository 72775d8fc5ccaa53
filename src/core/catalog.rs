//! The constraint catalog: one field-local rule per field path of the NRB
//! source metadata contract.
//!
//! Paths are `/`-separated element names below the root element; attributes
//! are written `@name`, and rules applying to every entry of a repeated
//! element use `<collection>/value` or `<collection>/@attr`. The catalog is
//! built once ([`ConstraintCatalog::standard`]) and shared read-only.
use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::report::ViolationKind;

/// Field paths known to the catalog
pub mod fields {
    pub const PRODUCT_TYPE: &str = "productType";
    pub const AZIMUTH_LOOKS: &str = "azimuthNumberOfLooks";
    pub const RANGE_LOOKS: &str = "rangeNumberOfLooks";
    pub const DATA_GEOMETRY: &str = "dataGeometry";
    pub const AZIMUTH_PIXEL_SPACING: &str = "azimuthPixelSpacing";
    pub const RANGE_PIXEL_SPACING: &str = "rangePixelSpacing";
    pub const AZIMUTH_RESOLUTION: &str = "azimuthResolution";
    pub const RANGE_RESOLUTION: &str = "rangeResolution";
    pub const FARADAY_ROTATION: &str = "meanFaradayRotationAngle";
    pub const FARADAY_REFERENCE: &str = "faradayRotationReference";
    pub const IONOSPHERE_INDICATOR: &str = "ionosphereIndicator";

    pub const PLATFORM: &str = "platform";
    pub const PLATFORM_SHORT_NAME: &str = "platform/shortName";

    pub const RADAR_BAND: &str = "sensor/radarBand";
    pub const CENTER_FREQUENCY: &str = "sensor/radarCenterFrequency";
    pub const CALIBRATION: &str = "sensor/sensorCalibration";

    pub const MEAN_ORBIT_ALTITUDE: &str = "acquisition/meanOrbitAltitude";
    pub const DATA_TAKE_ID: &str = "acquisition/dataTakeID";
    pub const MAJOR_CYCLE_ID: &str = "acquisition/majorCycleID";

    pub const PROCESSING_LEVEL: &str = "processingInformation/processingLevel";
    pub const ORBIT_DATA_SOURCE: &str = "processingInformation/orbitDataSource";
    pub const ORBIT_STATE_VECTOR: &str = "processingInformation/orbitStateVector";
    pub const ORBIT_STATE_VECTOR_ACCESS: &str = "processingInformation/orbitStateVector/@access";
    pub const LUT_APPLIED: &str = "processingInformation/lutApplied";
    pub const AZIMUTH_LOOK_BANDWIDTH: &str = "processingInformation/azimuthLookBandwidth";
    pub const RANGE_LOOK_BANDWIDTH: &str = "processingInformation/rangeLookBandwidth";

    pub const NOISE_TYPE: &str = "performanceIndicators/noiseEquivalentIntensityType";
    pub const NOISE_ESTIMATES: &str = "performanceIndicators/noiseEquivalentIntensity";
    pub const ENL: &str = "performanceIndicators/equivalentNumberOfLooks";
    pub const PSLR: &str = "performanceIndicators/peakSideLobeRatio";
    pub const ISLR: &str = "performanceIndicators/integratedSideLobeRatio";

    /// The four per-beam collections, in document order
    pub const BEAM_COLLECTIONS: [&str; 4] = [
        AZIMUTH_LOOK_BANDWIDTH,
        RANGE_LOOK_BANDWIDTH,
        AZIMUTH_RESOLUTION,
        RANGE_RESOLUTION,
    ];

    /// Path of a leaf (`value`, `@uom`, `@beamID`, ...) below `base`
    pub fn member(base: &str, leaf: &str) -> String {
        format!("{}/{}", base, leaf)
    }

    /// Path of the unit attribute of a measure
    pub fn uom(base: &str) -> String {
        member(base, "@uom")
    }

    /// Concrete path of entry `index` of a collection, e.g. `azimuthResolution[2]/@beamID`
    pub fn indexed(base: &str, index: usize, leaf: &str) -> String {
        format!("{}[{}]/{}", base, index, leaf)
    }
}

/// Maximum number of entries in any per-beam or per-polarization collection
pub const MAX_COLLECTION_ENTRIES: usize = 6;

pub const BEAM_ID_PATTERN: &str = r"^(IW[1-3]|EW[1-5]|S[1-6])$";
pub const ORBIT_FILE_PATTERN: &str = r"^S1.*\.EOF$";
pub const ORBIT_ACCESS_URL: &str = "https://scihub.copernicus.eu/gnss";
pub const XLINK_HREF: &str = "xlink:href";

/// Whether `c` matches the XML 1.0 `Char` production
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}'
            | '\u{A}'
            | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// A constant the contract pins a field to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixedValue {
    Text(&'static str),
    Number(f64),
    Integer(i64),
}

impl fmt::Display for FixedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixedValue::Text(s) => write!(f, "{}", s),
            FixedValue::Number(v) => write!(f, "{}", v),
            FixedValue::Integer(v) => write!(f, "{}", v),
        }
    }
}

/// Field-local rule
#[derive(Debug, Clone)]
pub enum ConstraintSpec {
    Enumeration(&'static [&'static str]),
    NumericRange { min: f64, max: f64, inclusive: bool },
    Pattern(Regex),
    FixedValue(FixedValue),
    Multiplicity { min: usize, max: usize },
    RequiredAttribute(&'static str),
}

/// A populated field value handed to [`ConstraintSpec::check`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Integer(i64),
    /// Number of entries of a repeated element
    Count(usize),
}

impl FieldValue<'_> {
    fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Number(v) => Some(*v),
            FieldValue::Integer(v) => Some(*v as f64),
            FieldValue::Count(n) => Some(*n as f64),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Number(v) => write!(f, "{}", v),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Count(n) => write!(f, "{}", n),
        }
    }
}

/// Why a value failed its rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub kind: ViolationKind,
    pub expected: String,
}

impl ConstraintSpec {
    /// Statement of the rule as it appears in violation reports
    pub fn describe(&self) -> String {
        match self {
            ConstraintSpec::Enumeration(allowed) => format!("one of {{{}}}", allowed.join(", ")),
            ConstraintSpec::NumericRange { min, max, inclusive: true } => {
                format!("a value in [{}, {}]", min, max)
            }
            ConstraintSpec::NumericRange { min, max, inclusive: false } => {
                format!("a value in ({}, {})", min, max)
            }
            ConstraintSpec::Pattern(re) => format!("a match of /{}/", re.as_str()),
            ConstraintSpec::FixedValue(v) => format!("exactly '{}'", v),
            ConstraintSpec::Multiplicity { min, max } => {
                format!("between {} and {} entries", min, max)
            }
            ConstraintSpec::RequiredAttribute(name) => format!("a non-empty {} attribute", name),
        }
    }

    fn kind(&self) -> ViolationKind {
        match self {
            ConstraintSpec::Enumeration(_) => ViolationKind::EnumerationViolation,
            ConstraintSpec::NumericRange { .. } => ViolationKind::NumericRangeViolation,
            ConstraintSpec::Pattern(_) => ViolationKind::PatternMismatch,
            ConstraintSpec::FixedValue(_) => ViolationKind::FixedValueViolation,
            ConstraintSpec::Multiplicity { .. } => ViolationKind::MultiplicityViolation,
            ConstraintSpec::RequiredAttribute(_) => ViolationKind::MissingRequiredField,
        }
    }

    /// Check one value against this rule.
    ///
    /// NaN never satisfies a range or a numeric fixed value.
    pub fn check(&self, value: FieldValue<'_>) -> Result<(), Mismatch> {
        let ok = match self {
            ConstraintSpec::Enumeration(allowed) => {
                let text = value.to_string();
                allowed.iter().any(|a| *a == text)
            }
            ConstraintSpec::NumericRange { min, max, inclusive } => match value.as_f64() {
                Some(v) if *inclusive => v >= *min && v <= *max,
                Some(v) => v > *min && v < *max,
                None => false,
            },
            ConstraintSpec::Pattern(re) => re.is_match(&value.to_string()),
            ConstraintSpec::FixedValue(FixedValue::Text(expected)) => {
                value.to_string() == *expected
            }
            ConstraintSpec::FixedValue(FixedValue::Number(expected)) => {
                value.as_f64().is_some_and(|v| v == *expected)
            }
            ConstraintSpec::FixedValue(FixedValue::Integer(expected)) => match value {
                FieldValue::Integer(v) => v == *expected,
                other => other.as_f64().is_some_and(|v| v == *expected as f64),
            },
            ConstraintSpec::Multiplicity { min, max } => {
                let count = match value {
                    FieldValue::Count(n) => n,
                    _ => 1,
                };
                count >= *min && count <= *max
            }
            ConstraintSpec::RequiredAttribute(_) => !value.is_blank(),
        };

        if ok {
            Ok(())
        } else {
            Err(Mismatch {
                kind: self.kind(),
                expected: self.describe(),
            })
        }
    }
}

static STANDARD: Lazy<ConstraintCatalog> = Lazy::new(|| {
    ConstraintCatalog::build().expect("built-in constraint patterns are valid regular expressions")
});

/// Immutable table of field-local rules
#[derive(Debug, Clone)]
pub struct ConstraintCatalog {
    rules: BTreeMap<String, ConstraintSpec>,
}

impl ConstraintCatalog {
    /// Process-wide catalog of the NRB source contract, built on first use
    pub fn standard() -> &'static ConstraintCatalog {
        &STANDARD
    }

    /// Build a fresh copy of the NRB source contract
    pub fn build() -> Result<Self, regex::Error> {
        use fields::*;

        const POLARIZATIONS: &[&str] = &["VH", "VV", "HH", "HV"];
        const STATISTICS: &[&str] = &["minimum", "maximum", "mean"];

        let beam_id = Regex::new(BEAM_ID_PATTERN)?;
        let orbit_file = Regex::new(ORBIT_FILE_PATTERN)?;

        let looks = ConstraintSpec::NumericRange { min: 0.0, max: 100.0, inclusive: true };
        let spacing = ConstraintSpec::NumericRange { min: 0.0, max: 1000.0, inclusive: false };
        let bandwidth = ConstraintSpec::NumericRange { min: 0.0, max: 1e9, inclusive: false };
        let side_lobe = ConstraintSpec::NumericRange { min: -100.0, max: 0.0, inclusive: true };
        let entries = ConstraintSpec::Multiplicity { min: 1, max: MAX_COLLECTION_ENTRIES };
        let unit = |u: &'static str| ConstraintSpec::FixedValue(FixedValue::Text(u));

        let mut rules: Vec<(String, ConstraintSpec)> = vec![
            (PRODUCT_TYPE.into(), ConstraintSpec::Enumeration(&["SLC"])),
            (AZIMUTH_LOOKS.into(), looks.clone()),
            (RANGE_LOOKS.into(), looks),
            (
                DATA_GEOMETRY.into(),
                ConstraintSpec::Enumeration(&["slant range", "ground range"]),
            ),
            (AZIMUTH_PIXEL_SPACING.into(), spacing.clone()),
            (uom(AZIMUTH_PIXEL_SPACING), unit("m")),
            (RANGE_PIXEL_SPACING.into(), spacing.clone()),
            (uom(RANGE_PIXEL_SPACING), unit("m")),
            (
                FARADAY_ROTATION.into(),
                ConstraintSpec::NumericRange { min: -180.0, max: 180.0, inclusive: true },
            ),
            (uom(FARADAY_ROTATION), unit("deg")),
            (FARADAY_REFERENCE.into(), ConstraintSpec::RequiredAttribute(XLINK_HREF)),
            (
                IONOSPHERE_INDICATOR.into(),
                ConstraintSpec::NumericRange { min: 0.0, max: f64::MAX, inclusive: true },
            ),
            (PLATFORM.into(), ConstraintSpec::RequiredAttribute(XLINK_HREF)),
            (
                PLATFORM_SHORT_NAME.into(),
                ConstraintSpec::Enumeration(&[
                    "Sentinel-1A",
                    "Sentinel-1B",
                    "Sentinel-1C",
                    "Sentinel-1D",
                ]),
            ),
            (RADAR_BAND.into(), ConstraintSpec::Enumeration(&["C"])),
            (
                CENTER_FREQUENCY.into(),
                ConstraintSpec::FixedValue(FixedValue::Number(5.405e9)),
            ),
            (uom(CENTER_FREQUENCY), unit("Hz")),
            (CALIBRATION.into(), ConstraintSpec::RequiredAttribute(XLINK_HREF)),
            (
                MEAN_ORBIT_ALTITUDE.into(),
                ConstraintSpec::FixedValue(FixedValue::Number(693_000.0)),
            ),
            (uom(MEAN_ORBIT_ALTITUDE), unit("m")),
            (
                DATA_TAKE_ID.into(),
                ConstraintSpec::NumericRange { min: 0.0, max: 16_777_215.0, inclusive: true },
            ),
            (
                MAJOR_CYCLE_ID.into(),
                ConstraintSpec::NumericRange { min: 1.0, max: 9999.0, inclusive: true },
            ),
            (PROCESSING_LEVEL.into(), ConstraintSpec::Enumeration(&["L1"])),
            (
                ORBIT_DATA_SOURCE.into(),
                ConstraintSpec::Enumeration(&["PRECISE", "RESTITUTED", "PREDICTED"]),
            ),
            (ORBIT_STATE_VECTOR.into(), ConstraintSpec::Pattern(orbit_file)),
            (
                ORBIT_STATE_VECTOR_ACCESS.into(),
                ConstraintSpec::FixedValue(FixedValue::Text(ORBIT_ACCESS_URL)),
            ),
            (
                LUT_APPLIED.into(),
                ConstraintSpec::Enumeration(&["beta0", "sigma0", "gamma0"]),
            ),
            (NOISE_TYPE.into(), ConstraintSpec::FixedValue(FixedValue::Text("sigma0"))),
            (uom(NOISE_TYPE), unit("dB")),
            (NOISE_ESTIMATES.into(), entries.clone()),
            (
                member(NOISE_ESTIMATES, "value"),
                ConstraintSpec::NumericRange { min: -100.0, max: 100.0, inclusive: true },
            ),
            (
                member(NOISE_ESTIMATES, "@polarization"),
                ConstraintSpec::Enumeration(POLARIZATIONS),
            ),
            (
                member(NOISE_ESTIMATES, "@statistic"),
                ConstraintSpec::Enumeration(STATISTICS),
            ),
            (ENL.into(), ConstraintSpec::FixedValue(FixedValue::Integer(1))),
            (PSLR.into(), side_lobe.clone()),
            (uom(PSLR), unit("dB")),
            (ISLR.into(), side_lobe),
            (uom(ISLR), unit("dB")),
        ];

        for (collection, value_rule, unit_name) in [
            (AZIMUTH_LOOK_BANDWIDTH, bandwidth.clone(), "Hz"),
            (RANGE_LOOK_BANDWIDTH, bandwidth, "Hz"),
            (AZIMUTH_RESOLUTION, spacing.clone(), "m"),
            (RANGE_RESOLUTION, spacing, "m"),
        ] {
            rules.push((collection.into(), entries.clone()));
            rules.push((member(collection, "value"), value_rule));
            rules.push((member(collection, "@beamID"), ConstraintSpec::Pattern(beam_id.clone())));
            rules.push((uom(collection), unit(unit_name)));
        }

        Ok(Self {
            rules: rules.into_iter().collect(),
        })
    }

    /// Rule for `path`.
    ///
    /// # Panics
    /// On a path the catalog does not know: every field the model carries
    /// has a rule, so an unknown path is a defect in the caller.
    pub fn lookup(&self, path: &str) -> &ConstraintSpec {
        match self.rules.get(path) {
            Some(spec) => spec,
            None => panic!("no constraint registered for field path '{}'", path),
        }
    }

    pub fn get(&self, path: &str) -> Option<&ConstraintSpec> {
        self.rules.get(path)
    }

    /// Pinned value of `path`, if its rule is a fixed value
    pub fn fixed_value(&self, path: &str) -> Option<FixedValue> {
        match self.rules.get(path) {
            Some(ConstraintSpec::FixedValue(v)) => Some(*v),
            _ => None,
        }
    }

    /// Pinned unit of a measure at `path`
    pub fn fixed_unit(&self, path: &str) -> Option<&'static str> {
        match self.fixed_value(&fields::uom(path)) {
            Some(FixedValue::Text(u)) => Some(u),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConstraintSpec)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }
}
