#![doc = r#"
NRBMETA: construction, validation and serialization of Sentinel-1 NRB
source metadata.

This crate turns the measurement facts derived while producing a Normalised
Radar Backscatter product (resolutions, look bandwidths, noise levels, orbit
source, acquisition parameters) into a certified metadata document. Every
record is checked against the fixed constraint set of the product contract
before it is written, and every violation is reported, not just the first.

Stability
---------
The public library API is experimental in initial releases and may evolve as
the crate stabilizes.

Quick start: certify a fact file
--------------------------------
```rust,no_run
use std::path::Path;
use nrbmeta::{certify_to_path, CertificationParams, ConstraintCatalog};

fn main() -> nrbmeta::Result<()> {
    let certified = certify_to_path(
        Path::new("/data/S1A_IW_SLC__1SDV_facts.json"),
        Path::new("/out/S1A_IW_SLC__1SDV.xml"),
        ConstraintCatalog::standard(),
        &CertificationParams::default(),
    )?;
    for w in &certified.warnings {
        eprintln!("warning: {w}");
    }
    Ok(())
}
```

Build and validate in memory
----------------------------
```rust
use nrbmeta::{ConstraintCatalog, RecordBuilder, ViolationKind};

let catalog = ConstraintCatalog::standard();
let mut builder = RecordBuilder::new(catalog);
builder.insert("azimuthNumberOfLooks", 101_i64);

// Most required facts are missing, so assembly fails with a full report
let report = builder.finish().unwrap_err();
assert!(report.count_of(ViolationKind::MissingRequiredField) > 1);
```

Batch helpers
-------------
```rust,no_run
use std::path::Path;
use nrbmeta::{process_directory_to_path, CertificationParams, ConstraintCatalog};

fn main() -> nrbmeta::Result<()> {
    let params = CertificationParams {
        self_check: true,
        write_report: true,
        write_stac: true, // <stem>.stac.json next to each document
    };

    let report = process_directory_to_path(
        Path::new("/data/facts"),
        Path::new("/out"),
        ConstraintCatalog::standard(),
        &params,
        true, // continue_on_error
    )?;

    println!(
        "processed={} rejected={} errors={}",
        report.processed, report.rejected, report.errors
    );
    Ok(())
}
```

Error handling
--------------
All public functions return `nrbmeta::Result<T>`. A record that fails
validation surfaces as `Error::Rejected` carrying the complete
`ValidationReport`; `Error::SerializationInvariant` signals an internal
serializer fault and is never caused by input data.

```rust,no_run
use std::path::Path;
use nrbmeta::{certify_to_path, CertificationParams, ConstraintCatalog, Error};

fn main() {
    let catalog = ConstraintCatalog::standard();
    let params = CertificationParams::default();
    match certify_to_path(Path::new("facts.json"), Path::new("out.xml"), catalog, &params) {
        Ok(_) => {}
        Err(Error::Rejected(report)) => eprintln!("{report}"),
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Useful modules
--------------
- [`api`] — high-level, ergonomic entry points.
- [`core`] — catalog, model, builder, consistency rules and validator.
- [`io`] — fact loading, document reader, XML and STAC writers.
- [`types`] — vocabulary enums (`Polarization`, `Statistic`, `OrbitDataSource`).
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use crate::core::builder::{BuildOutput, FactEntry, FactSet, FactValue, FieldId, RecordBuilder};
pub use crate::core::catalog::{ConstraintCatalog, ConstraintSpec, FixedValue};
pub use crate::core::model::{
    Acquisition, BeamMeasurement, BeamSeries, EarthObservationRecord, Measure, OrbitStateVector,
    PerformanceIndicators, Platform, PolarizationEstimate, ProcessingInformation, Reference, Sensor,
};
pub use crate::core::params::CertificationParams;
pub use crate::core::report::{ValidationReport, Violation, ViolationKind};
pub use crate::core::validator::{Validation, ValidatedRecord, Validator, validate};
pub use error::{Error, Result};
pub use types::{OrbitDataSource, Polarization, Statistic};

// Reader and writers
pub use io::{load_facts, parse_document};
pub use io::writers::{
    StacItem, to_checked_document, to_document, to_stac_item, to_stac_json, write_document,
    write_stac_item,
};

// High-level API re-exports
pub use api::{
    BatchReport, Certified, certify, certify_to_path, iterate_fact_files,
    process_directory_to_path,
};
