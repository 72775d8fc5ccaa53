//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::path::PathBuf;

use nrbmeta::{
    ConstraintCatalog, EarthObservationRecord, FactSet, RecordBuilder, ValidationReport,
    Validator, load_facts,
};

pub fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("data").join(name)
}

/// Facts of an IW SLC with precise orbits, VV+VH noise estimates and ENL 1
pub fn reference_facts() -> FactSet {
    load_facts(&data_path("reference_facts.json")).expect("reference facts load")
}

pub fn build(facts: FactSet) -> EarthObservationRecord {
    let mut builder = RecordBuilder::new(ConstraintCatalog::standard());
    builder.extend(facts);
    match builder.finish() {
        Ok(output) => output.record,
        Err(report) => panic!("facts must build:\n{}", report),
    }
}

pub fn reference_record() -> EarthObservationRecord {
    build(reference_facts())
}

pub fn check(record: &EarthObservationRecord) -> ValidationReport {
    Validator::new(ConstraintCatalog::standard()).check(record)
}
