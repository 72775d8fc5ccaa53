//! Cross-field rules the catalog cannot express field by field.
//!
//! Every rule runs on every call and appends what it finds; nothing here
//! stops early. Values the catalog already rejects (unknown polarization,
//! unknown orbit source) are skipped by the rules that depend on them.
use std::collections::{BTreeMap, BTreeSet};

use crate::core::catalog::{fields, ConstraintCatalog, FieldValue, FixedValue};
use crate::core::model::{BeamSeries, EarthObservationRecord};
use crate::core::report::{Violation, ViolationKind};
use crate::types::{OrbitDataSource, Polarization, Statistic};

/// Run all cross-field rules over `record`
pub fn check(record: &EarthObservationRecord, catalog: &ConstraintCatalog) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_unique_beams(record, catalog, &mut violations);
    check_polarization_coverage(record, &mut violations);
    check_equivalent_number_of_looks(record, catalog, &mut violations);
    check_orbit_source(record, &mut violations);
    check_beam_sets(record, catalog, &mut violations);
    violations
}

fn duplicated_beams(series: &BeamSeries) -> Vec<&str> {
    let mut seen = BTreeSet::new();
    let mut duplicated = Vec::new();
    for id in series.beam_ids() {
        if !seen.insert(id) && !duplicated.contains(&id) {
            duplicated.push(id);
        }
    }
    duplicated
}

fn within_count(catalog: &ConstraintCatalog, path: &str, series: &BeamSeries) -> bool {
    catalog.lookup(path).check(FieldValue::Count(series.len())).is_ok()
}

fn valid_beam_ids(catalog: &ConstraintCatalog, path: &str, series: &BeamSeries) -> bool {
    let rule = catalog.lookup(&fields::member(path, "@beamID"));
    series.beam_ids().all(|id| rule.check(FieldValue::Text(id)).is_ok())
}

fn check_unique_beams(
    record: &EarthObservationRecord,
    catalog: &ConstraintCatalog,
    out: &mut Vec<Violation>,
) {
    // an oversized collection already carries its one multiplicity violation
    for (path, series) in record.beam_collections() {
        if !within_count(catalog, path, series) {
            continue;
        }
        for id in duplicated_beams(series) {
            out.push(Violation::new(
                path,
                ViolationKind::MultiplicityViolation,
                id,
                "a beamID unique within the collection",
            ));
        }
    }
}

fn check_polarization_coverage(record: &EarthObservationRecord, out: &mut Vec<Violation>) {
    // channel -> statistic counts, channels in first-seen order
    let mut order: Vec<Polarization> = Vec::new();
    let mut counts: BTreeMap<Polarization, BTreeMap<Statistic, usize>> = BTreeMap::new();

    for estimate in &record.performance.estimates {
        let Ok(pol) = estimate.polarization.parse::<Polarization>() else {
            continue;
        };
        if !order.contains(&pol) {
            order.push(pol);
        }
        let per_channel = counts.entry(pol).or_default();
        if let Ok(stat) = estimate.statistic.parse::<Statistic>() {
            *per_channel.entry(stat).or_default() += 1;
        }
    }

    for pol in order {
        let per_channel = counts.get(&pol);
        let found: Vec<(Statistic, usize)> = Statistic::ALL
            .iter()
            .map(|s| (*s, per_channel.and_then(|c| c.get(s)).copied().unwrap_or(0)))
            .collect();
        if found.iter().all(|(_, n)| *n == 1) {
            continue;
        }
        let summary = found
            .iter()
            .map(|(s, n)| format!("{}×{}", s, n))
            .collect::<Vec<_>>()
            .join(", ");
        out.push(Violation::new(
            fields::NOISE_ESTIMATES,
            ViolationKind::CrossFieldInconsistency,
            pol.as_str(),
            format!(
                "exactly one minimum, maximum and mean entry per channel (found {})",
                summary
            ),
        ));
    }
}

fn check_equivalent_number_of_looks(
    record: &EarthObservationRecord,
    catalog: &ConstraintCatalog,
    out: &mut Vec<Violation>,
) {
    let Some(FixedValue::Integer(supported)) = catalog.fixed_value(fields::ENL) else {
        return;
    };
    let enl = record.performance.equivalent_number_of_looks;
    if enl != supported {
        out.push(Violation::new(
            fields::ENL,
            ViolationKind::CrossFieldInconsistency,
            enl.to_string(),
            format!("the supported single-look value {}", supported),
        ));
    }
}

fn check_orbit_source(record: &EarthObservationRecord, out: &mut Vec<Violation>) {
    let processing = &record.processing;
    let file_name = processing.orbit_state_vector.file_name.trim();
    let source_text = processing.orbit_data_source.trim();

    if source_text.is_empty() {
        if !file_name.is_empty() {
            out.push(Violation::new(
                fields::ORBIT_DATA_SOURCE,
                ViolationKind::CrossFieldInconsistency,
                "",
                format!("an orbit data source for state vector file '{}'", file_name),
            ));
        }
        return;
    }

    let Ok(source) = source_text.parse::<OrbitDataSource>() else {
        return;
    };

    if file_name.is_empty() {
        out.push(Violation::new(
            fields::ORBIT_DATA_SOURCE,
            ViolationKind::CrossFieldInconsistency,
            source.as_str(),
            format!("an {} orbit state vector file", source.orbit_file_type()),
        ));
    } else if !file_name.contains(source.orbit_file_type()) {
        out.push(Violation::new(
            fields::ORBIT_DATA_SOURCE,
            ViolationKind::CrossFieldInconsistency,
            source.as_str(),
            format!(
                "an {} orbit state vector file, got '{}'",
                source.orbit_file_type(),
                file_name
            ),
        ));
    }
}

fn check_beam_sets(
    record: &EarthObservationRecord,
    catalog: &ConstraintCatalog,
    out: &mut Vec<Violation>,
) {
    // Collections already rejected for count, identifiers or duplicates are left out
    let eligible: Vec<(&str, BTreeSet<&str>)> = record
        .beam_collections()
        .into_iter()
        .filter(|(path, series)| {
            within_count(catalog, path, series)
                && valid_beam_ids(catalog, path, series)
                && duplicated_beams(series).is_empty()
        })
        .map(|(path, series)| (path, series.beam_ids().collect()))
        .collect();

    let Some((reference_path, reference_set)) = eligible.first() else {
        return;
    };

    for (path, set) in eligible.iter().skip(1) {
        if set != reference_set {
            out.push(Violation::new(
                *path,
                ViolationKind::CrossFieldInconsistency,
                join(set),
                format!("the beam set {{{}}} of {}", join(reference_set), reference_path),
            ));
        }
    }
}

fn join(set: &BTreeSet<&str>) -> String {
    set.iter().copied().collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixtures::reference_record;
    use crate::core::model::PolarizationEstimate;

    fn run(record: &EarthObservationRecord) -> Vec<Violation> {
        check(record, ConstraintCatalog::standard())
    }

    #[test]
    fn reference_record_is_consistent() {
        assert!(run(&reference_record()).is_empty());
    }

    #[test]
    fn duplicate_beam_reported_once_per_identifier() {
        let mut record = reference_record();
        record.processing.azimuth_look_bandwidth.push("IW2", 313.0);
        record.processing.azimuth_look_bandwidth.push("IW2", 313.5);

        let violations = run(&record);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::MultiplicityViolation);
        assert_eq!(violations[0].field, fields::AZIMUTH_LOOK_BANDWIDTH);
        assert_eq!(violations[0].value, "IW2");
    }

    #[test]
    fn partial_statistic_coverage_flags_channel() {
        let mut record = reference_record();
        record
            .performance
            .estimates
            .retain(|e| !(e.polarization == "VH" && e.statistic == "maximum"));

        let violations = run(&record);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::CrossFieldInconsistency);
        assert_eq!(violations[0].value, "VH");
        assert!(violations[0].expected.contains("maximum×0"));
    }

    #[test]
    fn repeated_statistic_is_also_a_coverage_gap() {
        let mut record = reference_record();
        record.performance.estimates[0] = PolarizationEstimate::new("VV", "mean", -22.0);
        let violations = run(&record);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].value, "VV");
    }

    #[test]
    fn multi_look_enl_is_inconsistent() {
        let mut record = reference_record();
        record.performance.equivalent_number_of_looks = 3;
        let violations = run(&record);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, fields::ENL);
        assert_eq!(violations[0].value, "3");
    }

    #[test]
    fn orbit_source_must_match_file_type() {
        let mut record = reference_record();
        record.processing.orbit_data_source = "RESTITUTED".into();
        let violations = run(&record);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, fields::ORBIT_DATA_SOURCE);
        assert!(violations[0].expected.contains("AUX_RESORB"));

        record.processing.orbit_state_vector.file_name.clear();
        let violations = run(&record);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].value, "RESTITUTED");
    }

    #[test]
    fn beam_sets_must_agree_across_collections() {
        let mut record = reference_record();
        record.range_resolution.entries.pop();
        let violations = run(&record);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, fields::RANGE_RESOLUTION);
        assert_eq!(violations[0].value, "IW1,IW2");
    }

    #[test]
    fn oversized_collection_is_left_to_the_catalog() {
        let mut record = reference_record();
        for (id, v) in [("EW1", 20.0), ("EW2", 20.5), ("EW3", 21.0), ("EW4", 22.0)] {
            record.range_resolution.push(id, v);
        }
        assert!(run(&record).is_empty());
    }

    #[test]
    fn oversized_collection_skips_duplicate_check() {
        let mut record = reference_record();
        for (id, v) in [("IW1", 2.8), ("EW1", 20.0), ("EW2", 20.5), ("EW3", 21.0)] {
            record.range_resolution.push(id, v);
        }
        assert!(run(&record).is_empty());
    }

    #[test]
    fn malformed_beam_ids_stay_out_of_set_comparison() {
        let mut record = reference_record();
        record.azimuth_resolution.entries[2].beam_id = "iw3".into();
        assert!(run(&record).is_empty());
    }

    #[test]
    fn independent_defects_accumulate() {
        let mut record = reference_record();
        record.performance.equivalent_number_of_looks = 2;
        record.processing.orbit_data_source = "PREDICTED".into();
        record.range_resolution.push("IW1", 2.8);
        record.performance.estimates.pop();
        assert_eq!(run(&record).len(), 4);
    }
}
