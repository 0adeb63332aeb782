//! File-backed asset and telemetry providers.
//!
//! Both providers return structured, validated data. Absence of a device's
//! telemetry file is a skip signal (`Ok(None)`), kept strictly distinct
//! from a malformed payload, which is a validation error for that device.

use std::fs;
use std::path::Path;

use bm_common::{AssetCatalog, Error, Result, TelemetryDocument};
use tracing::debug;

/// Load and validate the asset catalog.
///
/// An unreadable file is fatal for the run (there is nothing to ingest
/// without the registry); malformed JSON or an inconsistent item count is
/// an asset-validation error, also fatal.
pub fn load_assets(path: &Path) -> Result<AssetCatalog> {
    debug!(path = %path.display(), "loading asset catalog");
    let contents = fs::read_to_string(path)?;
    let catalog: AssetCatalog = serde_json::from_str(&contents)
        .map_err(|e| Error::AssetValidation(format!("malformed asset catalog: {e}")))?;
    catalog.validate()?;
    Ok(catalog)
}

/// Load telemetry for one device from `<dir>/<device_id>.json`.
///
/// A missing file means this device has nothing to ingest this run and
/// yields `Ok(None)`.
pub fn load_telemetry(dir: &Path, device_id: &str) -> Result<Option<TelemetryDocument>> {
    let path = dir.join(format!("{device_id}.json"));
    if !path.exists() {
        return Ok(None);
    }
    debug!(path = %path.display(), "loading telemetry");
    let contents = fs::read_to_string(&path)?;
    let telemetry: TelemetryDocument =
        serde_json::from_str(&contents).map_err(|e| Error::TelemetryValidation {
            device_id: device_id.to_string(),
            reason: format!("malformed telemetry payload: {e}"),
        })?;
    Ok(Some(telemetry))
}
