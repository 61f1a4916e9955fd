use serde::{Deserialize, Serialize};

/// Every setting the application reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    CrsDonationLink,
    OnlineTotal,
    ShowGrandTotal,
    Theme,
    SchoolLogoUrl,
    EnableCrsImagery,
}

/// Former name of [`SettingKey::OnlineTotal`]. Read as a fallback, never written.
pub const LEGACY_ONLINE_TOTAL: &str = "online_alms_total";

impl SettingKey {
    pub fn key(self) -> &'static str {
        match self {
            SettingKey::CrsDonationLink => "crs_donation_link",
            SettingKey::OnlineTotal => "online_total",
            SettingKey::ShowGrandTotal => "show_grand_total",
            SettingKey::Theme => "theme",
            SettingKey::SchoolLogoUrl => "school_logo_url",
            SettingKey::EnableCrsImagery => "enable_crs_imagery",
        }
    }

    pub fn default_value(self) -> &'static str {
        match self {
            SettingKey::CrsDonationLink | SettingKey::SchoolLogoUrl => "",
            SettingKey::OnlineTotal => "0.00",
            SettingKey::ShowGrandTotal => "false",
            SettingKey::Theme => Theme::default().as_str(),
            SettingKey::EnableCrsImagery => "true",
        }
    }
}

/// Colour scheme of the public page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    LentenPurple,
    Classic,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::LentenPurple, Theme::Classic];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::LentenPurple => "lenten-purple",
            Theme::Classic => "classic",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::LentenPurple => "Lenten Purple",
            Theme::Classic => "Classic",
        }
    }

    /// `default` is what older installs stored for the classic scheme.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "lenten-purple" => Some(Theme::LentenPurple),
            "classic" | "default" => Some(Theme::Classic),
            _ => None,
        }
    }
}
