//! CSV zone profile loader.
//!
//! # CSV format
//!
//! One row per zone.  Period columns are expected calls per hour; category
//! columns are relative weights.
//!
//! ```csv
//! zone_id,name,morning,day,evening,night,traffic,property,violent,disturbance,assistance,emergency
//! 0,Downtown,2.0,3.5,4.0,2.5,3,4,2,4,2,1
//! 1,Harbor,0.5,1.0,1.5,1.0,1,3,1,2,1,1
//! ```
//!
//! Negative or non-finite numbers are rejected.  Duplicate zone ids are
//! rejected.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashSet;
use serde::Deserialize;

use dispatch_core::{CategoryTable, PeriodTable, ZoneId};

use crate::{GenError, GenResult, ZoneProfile};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ZoneRecord {
    zone_id:     u16,
    name:        String,
    morning:     f64,
    day:         f64,
    evening:     f64,
    night:       f64,
    traffic:     f64,
    property:    f64,
    violent:     f64,
    disturbance: f64,
    assistance:  f64,
    emergency:   f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load zone profiles from a CSV file.
pub fn load_zones_csv(path: &Path) -> GenResult<Vec<ZoneProfile>> {
    let file = std::fs::File::open(path)?;
    load_zones_reader(file)
}

/// Like [`load_zones_csv`] but accepts any `Read` source.
pub fn load_zones_reader<R: Read>(reader: R) -> GenResult<Vec<ZoneProfile>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut seen: FxHashSet<u16> = FxHashSet::default();
    let mut zones = Vec::new();

    for (line, result) in csv_reader.deserialize::<ZoneRecord>().enumerate() {
        let row = result.map_err(|e| GenError::Parse(e.to_string()))?;
        if !seen.insert(row.zone_id) {
            return Err(GenError::Parse(format!("duplicate zone_id {} on row {}", row.zone_id, line + 1)));
        }

        let per_hour = PeriodTable([row.morning, row.day, row.evening, row.night]);
        let weights = CategoryTable([
            row.traffic,
            row.property,
            row.violent,
            row.disturbance,
            row.assistance,
            row.emergency,
        ]);
        if let Some(bad) = per_hour.values().chain(weights.values()).find(|v| !v.is_finite() || **v < 0.0) {
            return Err(GenError::Parse(format!(
                "zone {} has invalid rate or weight {bad}",
                row.zone_id
            )));
        }

        zones.push(ZoneProfile::new(ZoneId(row.zone_id), row.name, per_hour).with_category_weights(weights));
    }

    Ok(zones)
}
