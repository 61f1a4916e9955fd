use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use super::dto::DesignForm;
use super::repo::SettingRepo;
use super::repo_types::{SettingKey, Theme, LEGACY_ONLINE_TOTAL};
use crate::error::{AdminError, AdminResult};
use crate::forms::{checkbox, non_blank};

/// Snapshot of the settings table with defaults applied on read.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Settings {
    pub async fn load(repo: &dyn SettingRepo) -> anyhow::Result<Self> {
        Ok(Self::from_map(repo.all().await?))
    }

    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    pub fn get(&self, key: SettingKey) -> &str {
        self.values
            .get(key.key())
            .map(String::as_str)
            .unwrap_or(key.default_value())
    }

    /// Only the literal `"true"` is on.
    pub fn flag(&self, key: SettingKey) -> bool {
        self.get(key) == "true"
    }

    pub fn theme(&self) -> Theme {
        Theme::parse(self.get(SettingKey::Theme)).unwrap_or_default()
    }

    /// Canonical key first, then the legacy one. Unparseable values count as zero.
    pub fn online_total(&self) -> f64 {
        let raw = self
            .values
            .get(SettingKey::OnlineTotal.key())
            .or_else(|| self.values.get(LEGACY_ONLINE_TOTAL))
            .map(String::as_str)
            .unwrap_or(SettingKey::OnlineTotal.default_value());
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

/// Display settings exposed to the public page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicSettings {
    pub crs_donation_link: String,
    pub show_grand_total: String,
    pub theme: String,
    pub school_logo_url: String,
    pub enable_crs_imagery: String,
}

impl Default for PublicSettings {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for PublicSettings {
    fn from(s: &Settings) -> Self {
        Self {
            crs_donation_link: s.get(SettingKey::CrsDonationLink).to_string(),
            show_grand_total: s.get(SettingKey::ShowGrandTotal).to_string(),
            theme: s.theme().as_str().to_string(),
            school_logo_url: s.get(SettingKey::SchoolLogoUrl).to_string(),
            enable_crs_imagery: s.get(SettingKey::EnableCrsImagery).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesignSettings {
    pub theme: Theme,
    pub school_logo_url: String,
    pub enable_crs_imagery: bool,
}

pub async fn design(repo: &dyn SettingRepo) -> AdminResult<DesignSettings> {
    let s = Settings::load(repo).await?;
    Ok(DesignSettings {
        theme: s.theme(),
        school_logo_url: s.get(SettingKey::SchoolLogoUrl).to_string(),
        enable_crs_imagery: s.flag(SettingKey::EnableCrsImagery),
    })
}

pub async fn update_design(repo: &dyn SettingRepo, form: &DesignForm) -> AdminResult<String> {
    let theme = match non_blank(&form.theme) {
        None => Theme::default(),
        Some(raw) => {
            Theme::parse(&raw).ok_or_else(|| AdminError::validation("Please choose a valid theme."))?
        }
    };
    let logo = form.school_logo_url.trim().to_string();
    let imagery = checkbox(form.enable_crs_imagery.as_deref());

    repo.put_many(&[
        (SettingKey::Theme.key(), theme.as_str().to_string()),
        (SettingKey::SchoolLogoUrl.key(), logo),
        (SettingKey::EnableCrsImagery.key(), imagery.to_string()),
    ])
    .await?;
    info!(theme = theme.as_str(), imagery, "design settings updated");
    Ok("Design settings updated successfully.".into())
}
