//! Property-based tests: every valid record survives serialize -> parse
//! unchanged, and serialization is byte-stable.

mod common;

use proptest::prelude::*;

use nrbmeta::{
    ConstraintCatalog, FactSet, FactValue, Validation, parse_document, to_checked_document,
    to_document, validate,
};

const BEAMS: [&str; 3] = ["IW1", "IW2", "IW3"];

#[derive(Debug, Clone)]
struct Variation {
    beam_count: usize,
    resolutions: Vec<(f64, f64)>,
    bandwidths: Vec<(f64, f64)>,
    looks: (i64, i64),
    data_take_id: i64,
    major_cycle_id: i64,
    faraday: f64,
    ionosphere: f64,
    side_lobes: (f64, f64),
    noise: Vec<f64>,
    calibration_id: String,
    geometry: &'static str,
}

fn variation() -> impl Strategy<Value = Variation> {
    (1usize..=3).prop_flat_map(|beam_count| {
        (
            (
                Just(beam_count),
                prop::collection::vec((0.001f64..999.0, 0.001f64..999.0), beam_count),
                prop::collection::vec((1.0f64..1e8, 1.0f64..1e8), beam_count),
                (0i64..=100, 0i64..=100),
                0i64..=16_777_215,
                1i64..=9999,
            ),
            (
                -180.0f64..=180.0,
                0.0f64..1e6,
                (-100.0f64..=0.0, -100.0f64..=0.0),
                prop::collection::vec(-100.0f64..=100.0, 6),
                "[A-Za-z0-9&<>'\"_][A-Za-z0-9 &<>'\"_.-]{0,24}",
                prop::sample::select(vec!["slant range", "ground range"]),
            ),
        )
            .prop_map(
                |(
                    (beam_count, resolutions, bandwidths, looks, data_take_id, major_cycle_id),
                    (faraday, ionosphere, side_lobes, noise, calibration_id, geometry),
                )| Variation {
                    beam_count,
                    resolutions,
                    bandwidths,
                    looks,
                    data_take_id,
                    major_cycle_id,
                    faraday,
                    ionosphere,
                    side_lobes,
                    noise,
                    calibration_id,
                    geometry,
                },
            )
    })
}

fn facts_for(v: &Variation) -> FactSet {
    let beams = &BEAMS[..v.beam_count];
    let series = |values: Vec<f64>| FactValue::beams(beams.iter().copied().zip(values));

    let mut facts = common::reference_facts();
    facts
        .insert("azimuthResolution", series(v.resolutions.iter().map(|r| r.0).collect()))
        .insert("rangeResolution", series(v.resolutions.iter().map(|r| r.1).collect()))
        .insert("azimuthLookBandwidth", series(v.bandwidths.iter().map(|b| b.0).collect()))
        .insert("rangeLookBandwidth", series(v.bandwidths.iter().map(|b| b.1).collect()))
        .insert("azimuthNumberOfLooks", v.looks.0)
        .insert("rangeNumberOfLooks", v.looks.1)
        .insert("dataTakeID", v.data_take_id)
        .insert("majorCycleID", v.major_cycle_id)
        .insert("meanFaradayRotationAngle", FactValue::measure(v.faraday, "deg"))
        .insert("ionosphereIndicator", v.ionosphere)
        .insert("peakSideLobeRatio", FactValue::measure(v.side_lobes.0, "dB"))
        .insert("integratedSideLobeRatio", FactValue::measure(v.side_lobes.1, "dB"))
        .insert(
            "noiseEquivalentIntensity",
            FactValue::estimates([
                ("VV", "minimum", v.noise[0]),
                ("VV", "maximum", v.noise[1]),
                ("VV", "mean", v.noise[2]),
                ("VH", "minimum", v.noise[3]),
                ("VH", "maximum", v.noise[4]),
                ("VH", "mean", v.noise[5]),
            ]),
        )
        .insert(
            "sensorCalibration",
            FactValue::reference(v.calibration_id.clone(), "https://sentinel.esa.int/cal"),
        )
        .insert("dataGeometry", v.geometry);
    facts
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// parse(serialize(R)) validates and equals R
    #[test]
    fn test_valid_records_round_trip(v in variation()) {
        let catalog = ConstraintCatalog::standard();
        let record = common::build(facts_for(&v));

        let frozen = match validate(record, catalog) {
            Validation::Valid(frozen) => frozen,
            Validation::Invalid(report) => {
                return Err(TestCaseError::fail(format!("generated record invalid:\n{}", report)));
            }
        };

        let document = to_document(&frozen).unwrap();
        let parsed = parse_document(&document, catalog).unwrap();
        prop_assert_eq!(&parsed, frozen.record());

        let again = match validate(parsed, catalog) {
            Validation::Valid(again) => again,
            Validation::Invalid(report) => {
                return Err(TestCaseError::fail(format!("re-parsed record invalid:\n{}", report)));
            }
        };
        prop_assert_eq!(to_document(&again).unwrap(), document.clone());
        prop_assert_eq!(to_checked_document(&frozen, catalog).unwrap(), document);
    }
}
