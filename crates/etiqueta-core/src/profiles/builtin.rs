use crate::error::EtiquetaError;
use crate::profiles::schema::ReportProfile;

const UPC_STICKER_JSON: &str = include_str!("../../profiles/upc-sticker.json");
const CASE_CONTENT_JSON: &str = include_str!("../../profiles/case-content.json");

/// Available predefined profiles.
pub const PRESETS: &[&str] = &["upc-sticker", "case-content"];

/// Load a predefined profile by name.
pub fn load_preset(name: &str) -> Result<ReportProfile, EtiquetaError> {
    let json = match name {
        "upc-sticker" => UPC_STICKER_JSON,
        "case-content" => CASE_CONTENT_JSON,
        _ => {
            return Err(EtiquetaError::ProfileInvalid(format!(
                "unknown preset '{}'. Available: {}",
                name,
                PRESETS.join(", ")
            )))
        }
    };
    let profile: ReportProfile = serde_json::from_str(json)?;
    Ok(profile)
}
