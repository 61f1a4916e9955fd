use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnnouncementForm {
    pub text: String,
    pub start_at: String,
    pub end_at: String,
    pub enabled: Option<String>,
}
