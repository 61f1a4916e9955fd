use serde::Deserialize;

/// Weekly quiz edit form. Every field arrives as text.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QuizForm {
    pub country_name: String,
    pub description: String,
    pub forms_link: String,
    pub schedule_mode: String,
    pub manual_visible: Option<String>,
    pub opens_at: String,
    pub closes_at: String,
    pub participant_count: String,
    pub participants_text: String,
    pub winner_1: String,
    pub winner_2: String,
    pub winner_3: String,
}
