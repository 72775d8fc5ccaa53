//! End-to-end certification scenarios
//!
//! Covers the reference product, the single-defect scenarios and batch
//! processing through the public API.

mod common;

use std::fs;

use common::{check, reference_facts, reference_record};
use nrbmeta::{
    BatchReport, CertificationParams, ConstraintCatalog, Error, FactValue, Polarization,
    Validation, ValidationReport, ViolationKind, certify, certify_to_path, parse_document,
    process_directory_to_path, to_document, validate,
};

// ============================================================================
// Reference scenario
// ============================================================================

#[test]
fn test_reference_product_certifies_and_round_trips() {
    let catalog = ConstraintCatalog::standard();
    let certified = certify(reference_facts(), catalog, &CertificationParams::default()).unwrap();

    assert!(certified.warnings.is_empty());
    assert_eq!(
        certified.record.polarizations(),
        &[Polarization::Vv, Polarization::Vh]
    );

    let parsed = parse_document(&certified.document, catalog).unwrap();
    assert_eq!(&parsed, certified.record.record());

    let revalidated = match validate(parsed, catalog) {
        Validation::Valid(v) => v,
        Validation::Invalid(report) => panic!("{}", report),
    };
    assert_eq!(to_document(&revalidated).unwrap(), certified.document);
}

#[test]
fn test_certify_to_path_writes_document() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("S1A_IW_SLC.xml");

    let certified = certify_to_path(
        &common::data_path("reference_facts.json"),
        &output,
        ConstraintCatalog::standard(),
        &CertificationParams::default(),
    )
    .unwrap();

    let on_disk = fs::read_to_string(&output).unwrap();
    assert_eq!(on_disk, certified.document);
    assert!(on_disk.contains("AUX_POEORB"));
}

// ============================================================================
// Single-defect scenarios
// ============================================================================

fn rejection(facts: nrbmeta::FactSet) -> ValidationReport {
    match certify(facts, ConstraintCatalog::standard(), &CertificationParams::default()) {
        Err(Error::Rejected(report)) => report,
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("defective facts were certified"),
    }
}

#[test]
fn test_multi_look_enl_gives_one_violation() {
    let mut facts = reference_facts();
    facts.insert("equivalentNumberOfLooks", 3_i64);

    let report = rejection(facts);
    assert_eq!(report.failure_count(), 1, "{report}");
    assert_eq!(
        report.violations[0].field,
        "performanceIndicators/equivalentNumberOfLooks"
    );
}

#[test]
fn test_duplicate_beam_gives_one_multiplicity_violation() {
    let mut facts = reference_facts();
    facts.insert(
        "azimuthResolution",
        FactValue::beams([("IW1", 22.5), ("IW2", 22.7), ("IW2", 22.6)]),
    );

    let report = rejection(facts);
    assert_eq!(report.failure_count(), 1, "{report}");
    let v = &report.violations[0];
    assert_eq!(v.kind, ViolationKind::MultiplicityViolation);
    assert_eq!(v.field, "azimuthResolution");
    assert_eq!(v.value, "IW2");
}

#[test]
fn test_incomplete_channel_is_inconsistent() {
    let mut facts = reference_facts();
    facts.insert(
        "noiseEquivalentIntensity",
        FactValue::estimates([
            ("VV", "minimum", -25.1),
            ("VV", "maximum", -19.8),
            ("VV", "mean", -22.4),
            ("VH", "minimum", -26.0),
            ("VH", "mean", -23.1),
        ]),
    );

    let report = rejection(facts);
    assert_eq!(report.failure_count(), 1, "{report}");
    assert_eq!(report.violations[0].kind, ViolationKind::CrossFieldInconsistency);
    assert_eq!(report.violations[0].value, "VH");
}

#[test]
fn test_seven_range_resolutions_give_one_violation() {
    let mut facts = reference_facts();
    facts.insert(
        "rangeResolution",
        FactValue::beams([
            ("IW1", 2.7),
            ("IW2", 3.1),
            ("IW3", 3.5),
            ("EW1", 20.0),
            ("EW2", 20.5),
            ("EW3", 21.0),
            ("EW4", 22.0),
        ]),
    );

    let report = rejection(facts);
    assert_eq!(report.failure_count(), 1, "{report}");
    assert_eq!(report.violations[0].kind, ViolationKind::MultiplicityViolation);
    assert_eq!(report.violations[0].value, "7");
}

#[test]
fn test_seven_resolutions_with_repeated_beam_give_one_violation() {
    let mut facts = reference_facts();
    facts.insert(
        "rangeResolution",
        FactValue::beams([
            ("IW1", 2.7),
            ("IW2", 3.1),
            ("IW3", 3.5),
            ("IW1", 2.8),
            ("EW1", 20.0),
            ("EW2", 20.5),
            ("EW3", 21.0),
        ]),
    );

    let report = rejection(facts);
    assert_eq!(report.failure_count(), 1, "{report}");
    assert_eq!(report.violations[0].kind, ViolationKind::MultiplicityViolation);
    assert_eq!(report.violations[0].value, "7");
}

#[test]
fn test_control_character_in_identifier_is_rejected() {
    let mut facts = reference_facts();
    facts.insert(
        "sensorCalibration",
        FactValue::reference("x\u{1}y", "https://sentinel.esa.int/cal"),
    );

    let report = rejection(facts);
    assert_eq!(report.failure_count(), 1, "{report}");
    assert_eq!(report.violations[0].kind, ViolationKind::PatternMismatch);
    assert_eq!(report.violations[0].field, "sensor/sensorCalibration");
}

#[test]
fn test_empty_entry_list_is_a_multiplicity_violation() {
    let mut facts = reference_facts();
    facts.insert("azimuthResolution", FactValue::Entries(Vec::new()));

    let report = rejection(facts);
    assert_eq!(report.failure_count(), 1, "{report}");
    assert_eq!(report.violations[0].kind, ViolationKind::MultiplicityViolation);
    assert_eq!(report.violations[0].field, "azimuthResolution");
    assert_eq!(report.count_of(ViolationKind::MissingRequiredField), 0);
}

#[test]
fn test_number_of_looks_boundaries() {
    for (looks, accepted) in [(0_i64, true), (100, true), (-1, false), (101, false)] {
        let mut record = reference_record();
        record.azimuth_number_of_looks = looks;
        let report = check(&record);
        assert_eq!(!report.has_failures(), accepted, "looks={looks}: {report}");
        if !accepted {
            assert_eq!(
                report.count_of(ViolationKind::NumericRangeViolation),
                1,
                "looks={looks}"
            );
        }
    }
}

#[test]
fn test_radar_band_only_c() {
    let mut record = reference_record();
    assert!(!check(&record).has_failures());

    record.sensor.radar_band = "X".to_string();
    let report = check(&record);
    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.violations[0].kind, ViolationKind::EnumerationViolation);
}

#[test]
fn test_unknown_facts_warn_but_do_not_reject() {
    let mut facts = reference_facts();
    facts.insert("swathWidth", 250.0).insert("polarisationMode", "DV");

    let certified =
        certify(facts, ConstraintCatalog::standard(), &CertificationParams::default()).unwrap();
    assert_eq!(certified.warnings.len(), 2);
}

// ============================================================================
// Batch processing
// ============================================================================

fn write_facts(dir: &std::path::Path, name: &str, facts: &nrbmeta::FactSet) {
    fs::write(dir.join(name), serde_json::to_string_pretty(facts).unwrap()).unwrap();
}

#[test]
fn test_batch_counts_each_outcome() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    write_facts(input.path(), "good.json", &reference_facts());
    let mut bad = reference_facts();
    bad.insert("radarBand", "L");
    write_facts(input.path(), "bad.json", &bad);
    fs::write(input.path().join("broken.json"), "{ not json").unwrap();

    let params = CertificationParams {
        self_check: true,
        write_report: true,
        write_stac: true,
    };
    let catalog = ConstraintCatalog::standard();
    let report =
        process_directory_to_path(input.path(), output.path(), catalog, &params, true).unwrap();

    assert_eq!(
        report,
        BatchReport {
            processed: 1,
            rejected: 1,
            errors: 1
        }
    );
    assert!(output.path().join("good.xml").exists());
    assert!(output.path().join("good.stac.json").exists());
    assert!(!output.path().join("bad.xml").exists());
    assert!(!output.path().join("bad.stac.json").exists());

    let violations: ValidationReport = serde_json::from_str(
        &fs::read_to_string(output.path().join("bad.violations.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(violations.failure_count(), 1);
    assert_eq!(violations.violations[0].field, "sensor/radarBand");
}

#[test]
fn test_batch_stops_on_error_unless_continuing() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    write_facts(input.path(), "good.json", &reference_facts());
    fs::write(input.path().join("broken.json"), "[").unwrap();

    let params = CertificationParams::default();
    let catalog = ConstraintCatalog::standard();
    let err = process_directory_to_path(input.path(), output.path(), catalog, &params, false)
        .unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}
