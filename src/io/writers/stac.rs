//! STAC item companion for certified records.
//!
//! The item carries the `sar` extension fields plus `nrb:` prefixed
//! properties for everything the extension has no slot for. Per-beam
//! collections are summarized by their coarsest entry in the `sar` fields and
//! kept in full under `nrb:`. The record has no footprint or acquisition
//! time, so `geometry` and `datetime` are null.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::core::model::BeamSeries;
use crate::core::validator::ValidatedRecord;
use crate::error::Result;
use crate::io::writers::metadata::write_document;

pub const STAC_VERSION: &str = "1.0.0";
pub const SAR_EXTENSION: &str = "https://stac-extensions.github.io/sar/v1.0.0/schema.json";
pub const PROCESSING_EXTENSION: &str =
    "https://stac-extensions.github.io/processing/v1.1.0/schema.json";

/// Suffix of the item written next to a document
pub const STAC_SUFFIX: &str = ".stac.json";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StacItem {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub stac_version: &'static str,
    pub stac_extensions: Vec<&'static str>,
    pub id: String,
    pub geometry: Option<serde_json::Value>,
    pub properties: ItemProperties,
    pub links: Vec<Link>,
    pub assets: BTreeMap<String, Asset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemProperties {
    pub datetime: Option<String>,
    pub platform: String,
    pub constellation: &'static str,
    pub instruments: Vec<&'static str>,
    #[serde(rename = "processing:level")]
    pub processing_level: String,

    #[serde(rename = "sar:frequency_band")]
    pub frequency_band: String,
    /// GHz
    #[serde(rename = "sar:center_frequency")]
    pub center_frequency: f64,
    #[serde(rename = "sar:polarizations")]
    pub polarizations: Vec<&'static str>,
    #[serde(rename = "sar:product_type")]
    pub product_type: String,
    #[serde(rename = "sar:looks_range")]
    pub looks_range: i64,
    #[serde(rename = "sar:looks_azimuth")]
    pub looks_azimuth: i64,
    #[serde(rename = "sar:looks_equivalent_number")]
    pub looks_equivalent_number: i64,
    #[serde(rename = "sar:pixel_spacing_range")]
    pub pixel_spacing_range: f64,
    #[serde(rename = "sar:pixel_spacing_azimuth")]
    pub pixel_spacing_azimuth: f64,
    #[serde(rename = "sar:resolution_range")]
    pub resolution_range: f64,
    #[serde(rename = "sar:resolution_azimuth")]
    pub resolution_azimuth: f64,

    #[serde(rename = "nrb:dataGeometry")]
    pub data_geometry: String,
    #[serde(rename = "nrb:dataTakeID")]
    pub data_take_id: i64,
    #[serde(rename = "nrb:majorCycleID")]
    pub major_cycle_id: i64,
    #[serde(rename = "nrb:meanOrbitAltitude")]
    pub mean_orbit_altitude: f64,
    #[serde(rename = "nrb:orbitDataSource")]
    pub orbit_data_source: &'static str,
    #[serde(rename = "nrb:orbitStateVector")]
    pub orbit_state_vector: String,
    #[serde(rename = "nrb:lutApplied")]
    pub lut_applied: String,
    #[serde(rename = "nrb:azimuthLookBandwidth")]
    pub azimuth_look_bandwidth: BTreeMap<String, f64>,
    #[serde(rename = "nrb:rangeLookBandwidth")]
    pub range_look_bandwidth: BTreeMap<String, f64>,
    #[serde(rename = "nrb:azimuthResolution")]
    pub azimuth_resolution: BTreeMap<String, f64>,
    #[serde(rename = "nrb:rangeResolution")]
    pub range_resolution: BTreeMap<String, f64>,
    #[serde(rename = "nrb:noiseEquivalentIntensityType")]
    pub noise_equivalent_intensity_type: String,
    #[serde(rename = "nrb:noiseEquivalentIntensity")]
    pub noise_equivalent_intensity: Vec<NoiseEstimate>,
    #[serde(rename = "nrb:peakSideLobeRatio")]
    pub peak_side_lobe_ratio: f64,
    #[serde(rename = "nrb:integratedSideLobeRatio")]
    pub integrated_side_lobe_ratio: f64,
    #[serde(rename = "nrb:meanFaradayRotationAngle")]
    pub mean_faraday_rotation_angle: f64,
    #[serde(rename = "nrb:ionosphereIndicator")]
    pub ionosphere_indicator: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoiseEstimate {
    pub polarization: String,
    pub statistic: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub rel: &'static str,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asset {
    pub href: String,
    #[serde(rename = "type")]
    pub media_type: &'static str,
    pub title: &'static str,
    pub roles: Vec<&'static str>,
}

fn coarsest(series: &BeamSeries) -> f64 {
    series.entries.iter().map(|e| e.value).fold(f64::NAN, f64::max)
}

fn per_beam(series: &BeamSeries) -> BTreeMap<String, f64> {
    series
        .entries
        .iter()
        .map(|e| (e.beam_id.clone(), e.value))
        .collect()
}

fn related(identifier: &str, href: &str) -> Link {
    Link {
        rel: "related",
        href: href.to_string(),
        title: Some(identifier.to_string()),
    }
}

/// Build the STAC item of `validated`; `document_href` locates its XML document
pub fn to_stac_item(validated: &ValidatedRecord, item_id: &str, document_href: &str) -> StacItem {
    let r = validated.record();
    let p = &r.processing;
    let q = &r.performance;

    let properties = ItemProperties {
        datetime: None,
        platform: r.platform.satellite.identifier.to_lowercase(),
        constellation: "sentinel-1",
        instruments: vec!["c-sar"],
        processing_level: p.processing_level.clone(),
        frequency_band: r.sensor.radar_band.clone(),
        center_frequency: r.sensor.center_frequency.value / 1e9,
        polarizations: validated.polarizations().iter().map(|p| p.as_str()).collect(),
        product_type: r.product_type.clone(),
        looks_range: r.range_number_of_looks,
        looks_azimuth: r.azimuth_number_of_looks,
        looks_equivalent_number: q.equivalent_number_of_looks,
        pixel_spacing_range: r.range_pixel_spacing.value,
        pixel_spacing_azimuth: r.azimuth_pixel_spacing.value,
        resolution_range: coarsest(&r.range_resolution),
        resolution_azimuth: coarsest(&r.azimuth_resolution),
        data_geometry: r.data_geometry.clone(),
        data_take_id: r.acquisition.data_take_id,
        major_cycle_id: r.acquisition.major_cycle_id,
        mean_orbit_altitude: r.acquisition.mean_orbit_altitude.value,
        orbit_data_source: validated.orbit_data_source().as_str(),
        orbit_state_vector: p.orbit_state_vector.file_name.clone(),
        lut_applied: p.lut_applied.clone(),
        azimuth_look_bandwidth: per_beam(&p.azimuth_look_bandwidth),
        range_look_bandwidth: per_beam(&p.range_look_bandwidth),
        azimuth_resolution: per_beam(&r.azimuth_resolution),
        range_resolution: per_beam(&r.range_resolution),
        noise_equivalent_intensity_type: q.noise_equivalent_intensity_type.clone(),
        noise_equivalent_intensity: q
            .estimates
            .iter()
            .map(|e| NoiseEstimate {
                polarization: e.polarization.clone(),
                statistic: e.statistic.clone(),
                value: e.value,
            })
            .collect(),
        peak_side_lobe_ratio: q.peak_side_lobe_ratio.value,
        integrated_side_lobe_ratio: q.integrated_side_lobe_ratio.value,
        mean_faraday_rotation_angle: r.mean_faraday_rotation_angle.value,
        ionosphere_indicator: r.ionosphere_indicator,
    };

    let links = vec![
        related(&r.platform.satellite.identifier, &r.platform.satellite.href),
        related(&r.sensor.calibration.identifier, &r.sensor.calibration.href),
        related(&p.orbit_state_vector.file_name, &p.orbit_state_vector.access),
        related(
            &r.faraday_rotation_reference.identifier,
            &r.faraday_rotation_reference.href,
        ),
    ];

    let mut assets = BTreeMap::new();
    assets.insert(
        "metadata".to_string(),
        Asset {
            href: document_href.to_string(),
            media_type: "application/xml",
            title: "NRB source metadata",
            roles: vec!["metadata"],
        },
    );

    StacItem {
        kind: "Feature",
        stac_version: STAC_VERSION,
        stac_extensions: vec![SAR_EXTENSION, PROCESSING_EXTENSION],
        id: item_id.to_string(),
        geometry: None,
        properties,
        links,
        assets,
    }
}

/// Pretty-printed JSON text of `item`
pub fn to_stac_json(item: &StacItem) -> Result<String> {
    let mut json = serde_json::to_string_pretty(item)?;
    json.push('\n');
    Ok(json)
}

/// Path of the STAC item belonging to the document at `document_path`
pub fn stac_path_for(document_path: &Path) -> PathBuf {
    let stem = document_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "product".to_string());
    document_path.with_file_name(format!("{}{}", stem, STAC_SUFFIX))
}

/// Write the STAC item for the document at `document_path` next to it
pub fn write_stac_item(validated: &ValidatedRecord, document_path: &Path) -> Result<PathBuf> {
    let item_id = document_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "product".to_string());
    let document_href = document_path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let item = to_stac_item(validated, &item_id, &document_href);
    let path = stac_path_for(document_path);
    write_document(&to_stac_json(&item)?, &path)?;
    info!("Wrote STAC item: {:?}", path);
    Ok(path)
}
