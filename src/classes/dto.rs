use serde::{Deserialize, Serialize};

/// Add-class and full-page edit form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClassForm {
    pub name: String,
    pub rice_bowl_amount: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AmountForm {
    pub rice_bowl_amount: String,
}

/// Body of the inline rename request.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenameRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct RenameResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
