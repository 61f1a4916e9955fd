use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TotalsForm {
    pub crs_donation_link: String,
    pub online_total: String,
    pub show_grand_total: Option<String>,
}
