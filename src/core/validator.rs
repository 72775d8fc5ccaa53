//! Validator: catalog checks over every populated field followed by the
//! cross-field rules, merged into one report.
//!
//! Validation never stops at the first defect. A record that passes is
//! frozen into a [`ValidatedRecord`], the only input the serializer accepts.
use std::ops::Deref;

use tracing::debug;

use crate::core::catalog::{fields, is_xml_char, ConstraintCatalog, ConstraintSpec, FieldValue};
use crate::core::consistency;
use crate::core::model::{BeamSeries, EarthObservationRecord, Measure, Reference};
use crate::core::report::{ValidationReport, Violation, ViolationKind};
use crate::types::{OrbitDataSource, Polarization};

/// A record that passed validation; immutable from here on
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    record: EarthObservationRecord,
    orbit_data_source: OrbitDataSource,
    polarizations: Vec<Polarization>,
}

impl ValidatedRecord {
    pub fn record(&self) -> &EarthObservationRecord {
        &self.record
    }

    pub fn into_inner(self) -> EarthObservationRecord {
        self.record
    }

    pub fn orbit_data_source(&self) -> OrbitDataSource {
        self.orbit_data_source
    }

    /// Polarization channels with noise estimates, in first-seen order
    pub fn polarizations(&self) -> &[Polarization] {
        &self.polarizations
    }
}

impl Deref for ValidatedRecord {
    type Target = EarthObservationRecord;

    fn deref(&self) -> &Self::Target {
        &self.record
    }
}

/// Outcome of [`Validator::validate`]
#[derive(Debug, Clone)]
pub enum Validation {
    Valid(ValidatedRecord),
    Invalid(ValidationReport),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    pub fn into_result(self) -> Result<ValidatedRecord, ValidationReport> {
        match self {
            Validation::Valid(record) => Ok(record),
            Validation::Invalid(report) => Err(report),
        }
    }
}

/// Validates records against a catalog
#[derive(Debug, Clone, Copy)]
pub struct Validator<'c> {
    catalog: &'c ConstraintCatalog,
}

impl<'c> Validator<'c> {
    pub fn new(catalog: &'c ConstraintCatalog) -> Self {
        Self { catalog }
    }

    /// All violations of `record`: field-local ones in document order, then
    /// cross-field ones not already reported for the same field and value
    pub fn check(&self, record: &EarthObservationRecord) -> ValidationReport {
        let mut pass = FieldPass {
            catalog: self.catalog,
            report: ValidationReport::new(),
        };
        pass.run(record);

        let mut report = pass.report;
        report.merge_deduplicated(consistency::check(record, self.catalog));
        report
    }

    /// Check `record` and freeze it when nothing is wrong
    pub fn validate(&self, record: EarthObservationRecord) -> Validation {
        let mut report = self.check(&record);
        if report.has_failures() {
            debug!("record rejected with {} violations", report.failure_count());
            return Validation::Invalid(report);
        }

        let source = record.processing.orbit_data_source.parse::<OrbitDataSource>();
        let mut polarizations = Vec::new();
        for estimate in &record.performance.estimates {
            match estimate.polarization.parse::<Polarization>() {
                Ok(pol) if !polarizations.contains(&pol) => polarizations.push(pol),
                Ok(_) => {}
                Err(e) => report.push(Violation::new(
                    fields::member(fields::NOISE_ESTIMATES, "@polarization"),
                    ViolationKind::EnumerationViolation,
                    estimate.polarization.clone(),
                    e,
                )),
            }
        }

        match source {
            Ok(orbit_data_source) if !report.has_failures() => {
                Validation::Valid(ValidatedRecord {
                    record,
                    orbit_data_source,
                    polarizations,
                })
            }
            Ok(_) => Validation::Invalid(report),
            Err(e) => {
                report.push(Violation::new(
                    fields::ORBIT_DATA_SOURCE,
                    ViolationKind::EnumerationViolation,
                    record.processing.orbit_data_source.clone(),
                    e,
                ));
                Validation::Invalid(report)
            }
        }
    }
}

/// Validate `record` against `catalog`
pub fn validate(record: EarthObservationRecord, catalog: &ConstraintCatalog) -> Validation {
    Validator::new(catalog).validate(record)
}

struct FieldPass<'c> {
    catalog: &'c ConstraintCatalog,
    report: ValidationReport,
}

impl FieldPass<'_> {
    fn run(&mut self, r: &EarthObservationRecord) {
        use fields::*;

        self.text(PLATFORM_SHORT_NAME, &r.platform.satellite.identifier);
        self.attribute(PLATFORM, &r.platform.satellite.href);

        self.text(RADAR_BAND, &r.sensor.radar_band);
        self.measure(CENTER_FREQUENCY, &r.sensor.center_frequency);
        self.reference(CALIBRATION, &r.sensor.calibration);

        self.measure(MEAN_ORBIT_ALTITUDE, &r.acquisition.mean_orbit_altitude);
        self.value(DATA_TAKE_ID, FieldValue::Integer(r.acquisition.data_take_id));
        self.value(MAJOR_CYCLE_ID, FieldValue::Integer(r.acquisition.major_cycle_id));

        let p = &r.processing;
        self.text(PROCESSING_LEVEL, &p.processing_level);
        self.text(ORBIT_DATA_SOURCE, &p.orbit_data_source);
        self.text(ORBIT_STATE_VECTOR, &p.orbit_state_vector.file_name);
        self.text(ORBIT_STATE_VECTOR_ACCESS, &p.orbit_state_vector.access);
        self.text(LUT_APPLIED, &p.lut_applied);
        self.series(AZIMUTH_LOOK_BANDWIDTH, &p.azimuth_look_bandwidth);
        self.series(RANGE_LOOK_BANDWIDTH, &p.range_look_bandwidth);

        let q = &r.performance;
        self.text(NOISE_TYPE, &q.noise_equivalent_intensity_type);
        self.text(&uom(NOISE_TYPE), &q.noise_equivalent_intensity_uom);
        self.value(NOISE_ESTIMATES, FieldValue::Count(q.estimates.len()));
        for (i, e) in q.estimates.iter().enumerate() {
            let at = |leaf: &str| indexed(NOISE_ESTIMATES, i + 1, leaf);
            self.text_at(
                &member(NOISE_ESTIMATES, "@polarization"),
                at("@polarization"),
                &e.polarization,
            );
            self.text_at(&member(NOISE_ESTIMATES, "@statistic"), at("@statistic"), &e.statistic);
            self.value_at(
                &member(NOISE_ESTIMATES, "value"),
                at("value"),
                FieldValue::Number(e.value),
            );
        }
        self.value(ENL, FieldValue::Integer(q.equivalent_number_of_looks));
        self.measure(PSLR, &q.peak_side_lobe_ratio);
        self.measure(ISLR, &q.integrated_side_lobe_ratio);

        self.text(PRODUCT_TYPE, &r.product_type);
        self.value(AZIMUTH_LOOKS, FieldValue::Integer(r.azimuth_number_of_looks));
        self.value(RANGE_LOOKS, FieldValue::Integer(r.range_number_of_looks));
        self.text(DATA_GEOMETRY, &r.data_geometry);
        self.measure(AZIMUTH_PIXEL_SPACING, &r.azimuth_pixel_spacing);
        self.measure(RANGE_PIXEL_SPACING, &r.range_pixel_spacing);
        self.series(AZIMUTH_RESOLUTION, &r.azimuth_resolution);
        self.series(RANGE_RESOLUTION, &r.range_resolution);
        self.measure(FARADAY_ROTATION, &r.mean_faraday_rotation_angle);
        self.reference(FARADAY_REFERENCE, &r.faraday_rotation_reference);
        self.value(IONOSPHERE_INDICATOR, FieldValue::Number(r.ionosphere_indicator));
    }

    fn value(&mut self, path: &str, value: FieldValue<'_>) {
        self.value_at(path, path.to_string(), value);
    }

    fn value_at(&mut self, rule_path: &str, concrete: String, value: FieldValue<'_>) {
        if let Err(mismatch) = self.catalog.lookup(rule_path).check(value) {
            self.report.push(Violation::new(
                concrete,
                mismatch.kind,
                value.to_string(),
                mismatch.expected,
            ));
        }
    }

    /// Required text: blank is reported as missing, anything else goes to the catalog
    fn text(&mut self, path: &str, text: &str) {
        self.text_at(path, path.to_string(), text);
    }

    fn text_at(&mut self, rule_path: &str, concrete: String, text: &str) {
        if text.trim().is_empty() {
            self.report.push(Violation::missing(concrete));
        } else if self.xml_text(&concrete, text) {
            self.value_at(rule_path, concrete, FieldValue::Text(text));
        }
    }

    fn attribute(&mut self, path: &str, value: &str) {
        let name = match self.catalog.lookup(path) {
            ConstraintSpec::RequiredAttribute(name) => *name,
            _ => "",
        };
        let concrete = format!("{}/@{}", path, name);
        if self.xml_text(&concrete, value) {
            self.value_at(path, concrete, FieldValue::Text(value));
        }
    }

    /// Free text must stay within the XML 1.0 character set; false after a report
    fn xml_text(&mut self, concrete: &str, text: &str) -> bool {
        match text.chars().find(|c| !is_xml_char(*c)) {
            None => true,
            Some(c) => {
                self.report.push(Violation::new(
                    concrete,
                    ViolationKind::PatternMismatch,
                    text.escape_default().to_string(),
                    format!(
                        "characters allowed in XML 1.0 text (found U+{:04X})",
                        u32::from(c)
                    ),
                ));
                false
            }
        }
    }

    fn measure(&mut self, path: &str, m: &Measure) {
        self.value(path, FieldValue::Number(m.value));
        self.text(&fields::uom(path), &m.uom);
    }

    fn reference(&mut self, path: &str, r: &Reference) {
        if r.identifier.trim().is_empty() {
            self.report.push(Violation::missing(path));
        } else {
            self.xml_text(path, &r.identifier);
        }
        self.attribute(path, &r.href);
    }

    fn series(&mut self, path: &str, series: &BeamSeries) {
        use fields::{indexed, member};

        self.value(path, FieldValue::Count(series.len()));
        if series.is_empty() {
            return;
        }
        self.text(&fields::uom(path), &series.uom);
        let beam_rule = member(path, "@beamID");
        let value_rule = member(path, "value");
        for (i, e) in series.entries.iter().enumerate() {
            self.text_at(&beam_rule, indexed(path, i + 1, "@beamID"), &e.beam_id);
            self.value_at(&value_rule, indexed(path, i + 1, "value"), FieldValue::Number(e.value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixtures::reference_record;
    use crate::core::model::PolarizationEstimate;

    fn report_for(record: &EarthObservationRecord) -> ValidationReport {
        Validator::new(ConstraintCatalog::standard()).check(record)
    }

    #[test]
    fn reference_record_freezes() {
        let frozen = match validate(reference_record(), ConstraintCatalog::standard()) {
            Validation::Valid(frozen) => frozen,
            Validation::Invalid(report) => panic!("unexpected violations:\n{}", report),
        };
        assert_eq!(frozen.orbit_data_source(), OrbitDataSource::Precise);
        assert_eq!(frozen.polarizations(), &[Polarization::Vv, Polarization::Vh]);
        assert_eq!(frozen.sensor.radar_band, "C");
    }

    #[test]
    fn number_of_looks_bounds_are_inclusive() {
        for (looks, ok) in [(0, true), (100, true), (-1, false), (101, false)] {
            let mut record = reference_record();
            record.azimuth_number_of_looks = looks;
            let report = report_for(&record);
            if ok {
                assert!(!report.has_failures(), "{looks}: {report}");
            } else {
                assert_eq!(report.failure_count(), 1, "{looks}");
                let v = &report.violations[0];
                assert_eq!(v.kind, ViolationKind::NumericRangeViolation);
                assert_eq!(v.field, fields::AZIMUTH_LOOKS);
                assert_eq!(v.value, looks.to_string());
            }
        }
    }

    #[test]
    fn radar_band_is_an_enumeration() {
        for band in ["X", "L", "c", "CC"] {
            let mut record = reference_record();
            record.sensor.radar_band = band.into();
            let report = report_for(&record);
            assert_eq!(report.failure_count(), 1);
            assert_eq!(report.violations[0].kind, ViolationKind::EnumerationViolation);
        }
    }

    #[test]
    fn multi_look_enl_reported_once() {
        let mut record = reference_record();
        record.performance.equivalent_number_of_looks = 3;
        let report = report_for(&record);
        assert_eq!(report.failure_count(), 1, "{report}");
        assert_eq!(report.violations[0].field, fields::ENL);
        assert_eq!(report.violations[0].kind, ViolationKind::FixedValueViolation);
    }

    #[test]
    fn blank_text_is_missing_not_mismatched() {
        let mut record = reference_record();
        record.data_geometry = "  ".into();
        record.sensor.calibration.href.clear();
        let report = report_for(&record);
        assert_eq!(report.failure_count(), 2, "{report}");
        assert_eq!(report.count_of(ViolationKind::MissingRequiredField), 2);
        assert_eq!(report.violations[0].field, "sensor/sensorCalibration/@xlink:href");
        assert_eq!(report.violations[1].field, fields::DATA_GEOMETRY);
    }

    #[test]
    fn control_characters_in_free_text_are_rejected() {
        let mut record = reference_record();
        record.sensor.calibration.identifier = "S1A\u{1}CAL".into();
        record.faraday_rotation_reference.href = "https://doi.org/\u{1b}x".into();
        record.azimuth_resolution.entries[0].beam_id = "IW1\u{0}".into();
        let report = report_for(&record);

        assert_eq!(report.failure_count(), 3, "{report}");
        assert_eq!(report.count_of(ViolationKind::PatternMismatch), 3);
        let paths: Vec<&str> = report.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(
            paths,
            [
                fields::CALIBRATION,
                "azimuthResolution[1]/@beamID",
                "faradayRotationReference/@xlink:href",
            ]
        );
        assert_eq!(report.violations[0].value, "S1A\\u{1}CAL");
    }

    #[test]
    fn xml_character_set_boundaries() {
        for c in ['\t', '\n', '\r', ' ', 'é', '\u{D7FF}', '\u{E000}', '\u{10FFFF}'] {
            assert!(is_xml_char(c), "{:?}", c);
        }
        for c in ['\u{0}', '\u{8}', '\u{B}', '\u{1F}', '\u{FFFE}', '\u{FFFF}'] {
            assert!(!is_xml_char(c), "{:?}", c);
        }
    }

    #[test]
    fn entry_violations_carry_their_index() {
        let mut record = reference_record();
        record.azimuth_resolution.entries[1].beam_id = "IW7".into();
        record.performance.estimates[4] = PolarizationEstimate::new("VH", "median", -20.3);
        let report = report_for(&record);

        let beam = report.for_field(fields::AZIMUTH_RESOLUTION).next().unwrap();
        assert_eq!(beam.field, "azimuthResolution[2]/@beamID");
        assert_eq!(beam.kind, ViolationKind::PatternMismatch);

        let stat = report
            .violations
            .iter()
            .find(|v| v.kind == ViolationKind::EnumerationViolation)
            .unwrap();
        assert_eq!(stat.field, "performanceIndicators/noiseEquivalentIntensity[5]/@statistic");
        // median does not count towards VH coverage
        assert!(report
            .violations
            .iter()
            .any(|v| v.kind == ViolationKind::CrossFieldInconsistency && v.value == "VH"));
    }

    #[test]
    fn five_independent_defects_give_five_violations() {
        let mut record = reference_record();
        record.product_type = "GRD".into();
        record.sensor.center_frequency.value = 5.3e9;
        record.acquisition.mean_orbit_altitude.uom = "km".into();
        record.processing.lut_applied = "dn".into();
        record.mean_faraday_rotation_angle.value = 190.0;

        let report = report_for(&record);
        assert_eq!(report.failure_count(), 5, "{report}");
        assert_eq!(report.count_of(ViolationKind::EnumerationViolation), 2);
        assert_eq!(report.count_of(ViolationKind::FixedValueViolation), 2);
        assert_eq!(report.count_of(ViolationKind::NumericRangeViolation), 1);
    }

    #[test]
    fn seven_range_resolutions_exceed_multiplicity() {
        let mut record = reference_record();
        for (id, v) in [("EW1", 20.0), ("EW2", 20.5), ("EW3", 21.0), ("EW4", 22.0)] {
            record.range_resolution.push(id, v);
        }
        let report = report_for(&record);
        assert_eq!(report.failure_count(), 1, "{report}");
        assert_eq!(report.violations[0].kind, ViolationKind::MultiplicityViolation);
        assert_eq!(report.violations[0].field, fields::RANGE_RESOLUTION);
        assert_eq!(report.violations[0].value, "7");
    }

    #[test]
    fn empty_series_reports_count_only() {
        let mut record = reference_record();
        record.processing.range_look_bandwidth = BeamSeries::new("");
        let report = report_for(&record);
        assert_eq!(report.failure_count(), 1, "{report}");
        assert_eq!(report.violations[0].kind, ViolationKind::MultiplicityViolation);
    }
}
