use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DesignForm {
    pub theme: String,
    pub school_logo_url: String,
    pub enable_crs_imagery: Option<String>,
}
