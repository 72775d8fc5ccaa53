//! Serializer for certified NRB source metadata documents.
//!
//! Element order, namespaces and attributes are fixed, so the same record
//! always yields the same bytes. Only a [`ValidatedRecord`] can be written.
use std::io::{Cursor, Write};
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::core::catalog::{is_xml_char, ConstraintCatalog, XLINK_HREF};
use crate::core::model::{BeamSeries, Measure};
use crate::core::validator::{Validation, ValidatedRecord, Validator};
use crate::error::{Error, Result};
use crate::io::reader::parse_document;

pub const NRB_NAMESPACE: &str = "http://earth.esa.int/sentinel-1/nrb/source/1.0";
pub const EOP_NAMESPACE: &str = "http://www.opengis.net/eop/2.1";
pub const SAR_NAMESPACE: &str = "http://www.opengis.net/sar/2.1";
pub const GML_NAMESPACE: &str = "http://www.opengis.net/gml/3.2";
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// `codeSpace` of `nrb:dataTakeID`
pub const DATA_TAKE_CODE_SPACE: &str = "urn:esa:eop:Sentinel1:dataTakeID";

pub(crate) const ROOT_ELEMENT: &str = "nrb:EarthObservation";

struct DocumentWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl DocumentWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2),
        }
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for attr in attrs {
            start.push_attribute(*attr);
        }
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn leaf(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.open(name, attrs)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    fn measure(&mut self, name: &str, m: &Measure) -> Result<()> {
        self.leaf(name, &[("uom", m.uom.as_str())], &m.value.to_string())
    }

    fn series(&mut self, name: &str, series: &BeamSeries) -> Result<()> {
        for entry in &series.entries {
            self.leaf(
                name,
                &[("uom", series.uom.as_str()), ("beamID", entry.beam_id.as_str())],
                &entry.value.to_string(),
            )?;
        }
        Ok(())
    }

    fn finish(self) -> Result<String> {
        let mut bytes = self.writer.into_inner().into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(Error::document)
    }
}

/// Serialize a validated record into its document text
pub fn to_document(validated: &ValidatedRecord) -> Result<String> {
    let r = validated.record();
    let mut w = DocumentWriter::new();

    w.writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    w.open(
        ROOT_ELEMENT,
        &[
            ("xmlns:nrb", NRB_NAMESPACE),
            ("xmlns:eop", EOP_NAMESPACE),
            ("xmlns:sar", SAR_NAMESPACE),
            ("xmlns:gml", GML_NAMESPACE),
            ("xmlns:xlink", XLINK_NAMESPACE),
        ],
    )?;

    w.open("eop:platform", &[])?;
    w.open("eop:Platform", &[])?;
    let satellite = &r.platform.satellite;
    w.leaf("eop:shortName", &[(XLINK_HREF, satellite.href.as_str())], &satellite.identifier)?;
    w.close("eop:Platform")?;
    w.close("eop:platform")?;

    w.open("eop:sensor", &[])?;
    w.open("nrb:Sensor", &[])?;
    w.leaf("sar:radarBand", &[], &r.sensor.radar_band)?;
    w.measure("nrb:radarCenterFrequency", &r.sensor.center_frequency)?;
    let calibration = &r.sensor.calibration;
    w.leaf(
        "nrb:sensorCalibration",
        &[(XLINK_HREF, calibration.href.as_str())],
        &calibration.identifier,
    )?;
    w.close("nrb:Sensor")?;
    w.close("eop:sensor")?;

    let acq = &r.acquisition;
    w.open("eop:acquisitionParameters", &[])?;
    w.open("nrb:Acquisition", &[])?;
    w.measure("nrb:meanOrbitAltitude", &acq.mean_orbit_altitude)?;
    w.leaf(
        "nrb:dataTakeID",
        &[("codeSpace", DATA_TAKE_CODE_SPACE)],
        &acq.data_take_id.to_string(),
    )?;
    w.leaf("nrb:majorCycleID", &[], &acq.major_cycle_id.to_string())?;
    w.close("nrb:Acquisition")?;
    w.close("eop:acquisitionParameters")?;

    let p = &r.processing;
    w.open("eop:processing", &[])?;
    w.open("nrb:ProcessingInformation", &[])?;
    w.leaf("nrb:processingLevel", &[], &p.processing_level)?;
    w.leaf("nrb:orbitDataSource", &[], &p.orbit_data_source)?;
    w.leaf(
        "nrb:orbitStateVector",
        &[("access", p.orbit_state_vector.access.as_str())],
        &p.orbit_state_vector.file_name,
    )?;
    w.leaf("nrb:lutApplied", &[], &p.lut_applied)?;
    w.series("nrb:azimuthLookBandwidth", &p.azimuth_look_bandwidth)?;
    w.series("nrb:rangeLookBandwidth", &p.range_look_bandwidth)?;
    w.close("nrb:ProcessingInformation")?;
    w.close("eop:processing")?;

    let q = &r.performance;
    w.open("nrb:performanceIndicators", &[])?;
    w.open("nrb:PerformanceIndicators", &[])?;
    w.leaf(
        "nrb:noiseEquivalentIntensityType",
        &[("uom", q.noise_equivalent_intensity_uom.as_str())],
        &q.noise_equivalent_intensity_type,
    )?;
    for e in &q.estimates {
        w.leaf(
            "nrb:noiseEquivalentIntensity",
            &[("polarization", e.polarization.as_str()), ("statistic", e.statistic.as_str())],
            &e.value.to_string(),
        )?;
    }
    w.leaf(
        "nrb:equivalentNumberOfLooks",
        &[],
        &q.equivalent_number_of_looks.to_string(),
    )?;
    w.measure("nrb:peakSideLobeRatio", &q.peak_side_lobe_ratio)?;
    w.measure("nrb:integratedSideLobeRatio", &q.integrated_side_lobe_ratio)?;
    w.close("nrb:PerformanceIndicators")?;
    w.close("nrb:performanceIndicators")?;

    w.leaf("nrb:productType", &[], &r.product_type)?;
    w.leaf("nrb:azimuthNumberOfLooks", &[], &r.azimuth_number_of_looks.to_string())?;
    w.leaf("nrb:rangeNumberOfLooks", &[], &r.range_number_of_looks.to_string())?;
    w.leaf("nrb:dataGeometry", &[], &r.data_geometry)?;
    w.measure("nrb:azimuthPixelSpacing", &r.azimuth_pixel_spacing)?;
    w.measure("nrb:rangePixelSpacing", &r.range_pixel_spacing)?;
    w.series("nrb:azimuthResolution", &r.azimuth_resolution)?;
    w.series("nrb:rangeResolution", &r.range_resolution)?;
    w.measure("nrb:meanFaradayRotationAngle", &r.mean_faraday_rotation_angle)?;
    let faraday = &r.faraday_rotation_reference;
    w.leaf(
        "nrb:faradayRotationReference",
        &[(XLINK_HREF, faraday.href.as_str())],
        &faraday.identifier,
    )?;
    w.leaf("nrb:ionosphereIndicator", &[], &r.ionosphere_indicator.to_string())?;

    w.close(ROOT_ELEMENT)?;
    let document = w.finish()?;
    debug!("serialized record into {} bytes", document.len());
    Ok(document)
}

/// Re-parse `document`, re-validate it and compare against `validated`.
///
/// Any difference means the serializer and the reader disagree, which is
/// reported as [`Error::SerializationInvariant`] and never as a data error.
pub fn self_check(
    validated: &ValidatedRecord,
    document: &str,
    catalog: &ConstraintCatalog,
) -> Result<()> {
    // the reader accepts characters a strict XML parser would not
    if let Some(c) = document.chars().find(|c| !is_xml_char(*c)) {
        return Err(Error::SerializationInvariant(format!(
            "emitted document contains U+{:04X}, which is not an XML character",
            u32::from(c)
        )));
    }

    let parsed = parse_document(document, catalog).map_err(|e| {
        Error::SerializationInvariant(format!("emitted document does not re-parse: {}", e))
    })?;

    let reparsed = match Validator::new(catalog).validate(parsed) {
        Validation::Valid(reparsed) => reparsed,
        Validation::Invalid(report) => {
            return Err(Error::SerializationInvariant(format!(
                "re-parsed record fails validation with {} violations:\n{}",
                report.failure_count(),
                report
            )));
        }
    };

    if reparsed.record() != validated.record() {
        return Err(Error::SerializationInvariant(
            "re-parsed record differs from the record that was serialized".to_string(),
        ));
    }

    if to_document(&reparsed)? != document {
        return Err(Error::SerializationInvariant(
            "re-serialized document is not byte-identical".to_string(),
        ));
    }

    debug!("self-check passed");
    Ok(())
}

/// Serialize and self-check in one step
pub fn to_checked_document(
    validated: &ValidatedRecord,
    catalog: &ConstraintCatalog,
) -> Result<String> {
    let document = to_document(validated)?;
    self_check(validated, &document, catalog)?;
    Ok(document)
}

/// Write `document` to `path` atomically: the text goes to a temporary file
/// in the destination directory, which is renamed over `path` only once
/// everything is on disk. On any error the temporary file is removed.
pub fn write_document(document: &str, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(document.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;

    info!("Wrote metadata document: {:?}", path);
    Ok(())
}
