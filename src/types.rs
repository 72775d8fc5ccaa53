//! Shared vocabulary types used across nrbmeta.
//! Includes `Polarization`, `Statistic` and `OrbitDataSource`, the typed views a
//! frozen record exposes once its raw values passed the constraint catalog.
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Polarization {
    Vh,
    Vv,
    Hh,
    Hv,
}

impl Polarization {
    pub const ALL: [Polarization; 4] = [
        Polarization::Vh,
        Polarization::Vv,
        Polarization::Hh,
        Polarization::Hv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Polarization::Vh => "VH",
            Polarization::Vv => "VV",
            Polarization::Hh => "HH",
            Polarization::Hv => "HV",
        }
    }
}

impl std::fmt::Display for Polarization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Polarization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VH" => Ok(Polarization::Vh),
            "VV" => Ok(Polarization::Vv),
            "HH" => Ok(Polarization::Hh),
            "HV" => Ok(Polarization::Hv),
            other => Err(format!("unknown polarization: {}", other)),
        }
    }
}

/// Statistic kind of a noise-equivalent intensity estimate
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Statistic {
    Minimum,
    Maximum,
    Mean,
}

impl Statistic {
    pub const ALL: [Statistic; 3] = [Statistic::Minimum, Statistic::Maximum, Statistic::Mean];

    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Minimum => "minimum",
            Statistic::Maximum => "maximum",
            Statistic::Mean => "mean",
        }
    }
}

impl std::fmt::Display for Statistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Statistic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minimum" => Ok(Statistic::Minimum),
            "maximum" => Ok(Statistic::Maximum),
            "mean" => Ok(Statistic::Mean),
            other => Err(format!("unknown statistic: {}", other)),
        }
    }
}

/// Source of the orbit state vectors used during processing
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum OrbitDataSource {
    Precise,
    Restituted,
    Predicted,
}

impl OrbitDataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrbitDataSource::Precise => "PRECISE",
            OrbitDataSource::Restituted => "RESTITUTED",
            OrbitDataSource::Predicted => "PREDICTED",
        }
    }

    /// Auxiliary product type an orbit file of this source carries in its name,
    /// e.g. `S1A_OPER_AUX_POEORB_OPOD_...EOF` for precise orbits.
    pub fn orbit_file_type(&self) -> &'static str {
        match self {
            OrbitDataSource::Precise => "AUX_POEORB",
            OrbitDataSource::Restituted => "AUX_RESORB",
            OrbitDataSource::Predicted => "AUX_PREORB",
        }
    }
}

impl std::fmt::Display for OrbitDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrbitDataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRECISE" => Ok(OrbitDataSource::Precise),
            "RESTITUTED" => Ok(OrbitDataSource::Restituted),
            "PREDICTED" => Ok(OrbitDataSource::Predicted),
            other => Err(format!("unknown orbit data source: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polarization_round_trips_through_text() {
        for pol in Polarization::ALL {
            assert_eq!(pol.as_str().parse::<Polarization>(), Ok(pol));
        }
        assert!("vv".parse::<Polarization>().is_err());
    }

    #[test]
    fn orbit_source_maps_to_aux_product() {
        assert_eq!(OrbitDataSource::Precise.orbit_file_type(), "AUX_POEORB");
        assert_eq!(
            "RESTITUTED".parse::<OrbitDataSource>(),
            Ok(OrbitDataSource::Restituted)
        );
    }
}
