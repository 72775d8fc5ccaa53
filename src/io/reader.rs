//! Reader for NRB source metadata documents.
//!
//! Leaf elements are collected as facts by local name and assembled with a
//! strict [`RecordBuilder`], so nothing absent from the document is filled
//! in. The result is an unvalidated record.
use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::core::builder::{FactEntry, FactValue, FieldId, RecordBuilder};
use crate::core::catalog::{ConstraintCatalog, XLINK_HREF};
use crate::core::model::EarthObservationRecord;
use crate::error::{Error, Result};

/// Wrapper elements that carry no value of their own
const CONTAINERS: &[&str] = &[
    "EarthObservation",
    "platform",
    "Platform",
    "sensor",
    "Sensor",
    "acquisitionParameters",
    "Acquisition",
    "processing",
    "ProcessingInformation",
    "performanceIndicators",
    "PerformanceIndicators",
];

fn field_for(local: &str) -> Option<FieldId> {
    match local {
        "shortName" => Some(FieldId::Platform),
        l if CONTAINERS.contains(&l) => None,
        other => other.parse().ok(),
    }
}

struct Leaf {
    field: FieldId,
    name: String,
    attrs: BTreeMap<String, String>,
    text: String,
}

impl Leaf {
    fn attr(&self, key: &str) -> Result<String> {
        self.attrs.get(key).cloned().ok_or_else(|| {
            Error::Document(format!("<{}> lacks the '{}' attribute", self.name, key))
        })
    }

    fn number(&self, text: &str) -> Result<f64> {
        text.trim().parse().map_err(|_| {
            Error::Document(format!("<{}> holds '{}', not a number", self.name, text))
        })
    }

    fn integer(&self) -> Result<i64> {
        self.text.trim().parse().map_err(|_| {
            Error::Document(format!("<{}> holds '{}', not an integer", self.name, self.text))
        })
    }

    fn into_fact(self) -> Result<(FieldId, FactValue)> {
        use FieldId::*;

        let value = match self.field {
            Platform | SensorCalibration | FaradayRotationReference => {
                FactValue::reference(self.text.clone(), self.attr(XLINK_HREF)?)
            }
            OrbitStateVector => FactValue::reference(self.text.clone(), self.attr("access")?),
            NoiseEquivalentIntensityType => FactValue::label(self.text.clone(), self.attr("uom")?),
            RadarCenterFrequency | MeanOrbitAltitude | PeakSideLobeRatio
            | IntegratedSideLobeRatio | AzimuthPixelSpacing | RangePixelSpacing
            | MeanFaradayRotationAngle => {
                FactValue::measure(self.number(&self.text)?, self.attr("uom")?)
            }
            DataTakeId | MajorCycleId | EquivalentNumberOfLooks | AzimuthNumberOfLooks
            | RangeNumberOfLooks => FactValue::Integer(self.integer()?),
            IonosphereIndicator => FactValue::Number(self.number(&self.text)?),
            AzimuthLookBandwidth | RangeLookBandwidth | AzimuthResolution | RangeResolution => {
                FactValue::Entries(vec![FactEntry::Beam {
                    beam_id: self.attr("beamID")?,
                    value: self.number(&self.text)?,
                    unit: Some(self.attr("uom")?),
                }])
            }
            NoiseEquivalentIntensity => FactValue::Entries(vec![FactEntry::Polarization {
                polarization: self.attr("polarization")?,
                statistic: self.attr("statistic")?,
                value: self.number(&self.text)?,
            }]),
            RadarBand | ProcessingLevel | OrbitDataSource | LutApplied | ProductType
            | DataGeometry => FactValue::Text(self.text.clone()),
        };
        Ok((self.field, value))
    }
}

fn open_leaf(e: &BytesStart<'_>) -> Result<Option<Leaf>> {
    let local = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
    let Some(field) = field_for(&local) else {
        if CONTAINERS.contains(&local.as_str()) {
            return Ok(None);
        }
        return Err(Error::Document(format!("unexpected element <{}>", local)));
    };

    let mut attrs = BTreeMap::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr.unescape_value()?.to_string();
        attrs.insert(key, value);
    }

    Ok(Some(Leaf {
        field,
        name: local,
        attrs,
        text: String::new(),
    }))
}

/// Parse a document into an unvalidated record
pub fn parse_document(xml: &str, catalog: &ConstraintCatalog) -> Result<EarthObservationRecord> {
    let mut reader = Reader::from_str(xml);
    let mut builder = RecordBuilder::strict(catalog);
    let mut current: Option<Leaf> = None;
    let mut saw_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                if current.is_some() {
                    return Err(Error::Document("nested element inside a value".to_string()));
                }
                if e.local_name().as_ref() == b"EarthObservation" {
                    saw_root = true;
                }
                current = open_leaf(e)?;
            }
            Event::Empty(ref e) => {
                if let Some(leaf) = open_leaf(e)? {
                    let (field, value) = leaf.into_fact()?;
                    builder.insert_field(field, value);
                }
            }
            Event::Text(e) => {
                if let Some(leaf) = current.as_mut() {
                    leaf.text.push_str(&e.unescape()?);
                }
            }
            Event::End(_) => {
                if let Some(leaf) = current.take() {
                    let (field, value) = leaf.into_fact()?;
                    builder.insert_field(field, value);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(Error::Document(
            "document has no EarthObservation root element".to_string(),
        ));
    }

    match builder.finish() {
        Ok(output) => Ok(output.record),
        Err(report) => Err(Error::Document(format!(
            "document is incomplete:\n{}",
            report
        ))),
    }
}
