pub mod builtin;
pub mod schema;

use std::collections::HashSet;
use std::path::Path;

use crate::error::EtiquetaError;
use schema::ReportProfile;

/// Load a report profile from a JSON file.
pub fn load_profile(path: &Path) -> Result<ReportProfile, EtiquetaError> {
    let content = std::fs::read_to_string(path).map_err(|e| EtiquetaError::ProfileLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let profile: ReportProfile =
        serde_json::from_str(&content).map_err(|e| EtiquetaError::ProfileLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_profile(&profile)?;
    Ok(profile)
}

/// Parse a profile from a JSON string (no file path context).
pub fn parse_profile_str(json: &str) -> Result<ReportProfile, EtiquetaError> {
    let profile: ReportProfile = serde_json::from_str(json)?;
    validate_profile(&profile)?;
    Ok(profile)
}

/// Validate that a profile is well-formed.
pub fn validate_profile(profile: &ReportProfile) -> Result<(), EtiquetaError> {
    if profile.name.trim().is_empty() {
        return Err(EtiquetaError::ProfileInvalid("name must not be empty".into()));
    }
    if profile.version.trim().is_empty() {
        return Err(EtiquetaError::ProfileInvalid(format!(
            "profile '{}' has an empty version",
            profile.name
        )));
    }

    if let Some(ref destination) = profile.destination {
        if destination.trim().is_empty() {
            return Err(EtiquetaError::ProfileInvalid(format!(
                "profile '{}' has a blank destination (omit it to keep every row)",
                profile.name
            )));
        }
    }

    if let Some(tolerance) = profile.line_tolerance {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(EtiquetaError::ProfileInvalid(format!(
                "profile '{}' has invalid line_tolerance {} (expected a positive number)",
                profile.name, tolerance
            )));
        }
    }

    let mut seen = HashSet::new();
    for market in &profile.markets {
        if !seen.insert(market) {
            return Err(EtiquetaError::ProfileInvalid(format!(
                "profile '{}' lists market '{}' more than once",
                profile.name, market
            )));
        }
    }

    Ok(())
}
