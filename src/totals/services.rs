use serde::Serialize;
use tracing::info;

use super::dto::TotalsForm;
use crate::classes::{repo::ClassRepo, repo_types::SchoolClass};
use crate::error::{AdminError, AdminResult};
use crate::forms::{checkbox, parse_amount};
use crate::settings::{repo::SettingRepo, repo_types::SettingKey, Settings};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub online_total: f64,
    pub rice_bowl_total: f64,
    pub grand_total: f64,
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl Totals {
    /// Every field is finite; an overflowing sum reads as zero.
    pub fn compute(classes: &[SchoolClass], online_total: f64) -> Self {
        let online_total = finite_or_zero(online_total);
        let rice_bowl_total = finite_or_zero(classes.iter().map(|c| c.rice_bowl_amount).sum());
        Self {
            online_total,
            rice_bowl_total,
            grand_total: finite_or_zero(rice_bowl_total + online_total),
        }
    }
}

/// Everything the totals page shows.
#[derive(Debug, Clone)]
pub struct TotalsOverview {
    pub crs_donation_link: String,
    pub show_grand_total: bool,
    pub classes: Vec<SchoolClass>,
    pub totals: Totals,
}

pub async fn overview(
    classes: &dyn ClassRepo,
    settings: &dyn SettingRepo,
) -> AdminResult<TotalsOverview> {
    let list = classes.list().await?;
    let s = Settings::load(settings).await?;
    Ok(TotalsOverview {
        crs_donation_link: s.get(SettingKey::CrsDonationLink).to_string(),
        show_grand_total: s.flag(SettingKey::ShowGrandTotal),
        totals: Totals::compute(&list, s.online_total()),
        classes: list,
    })
}

/// Stores the donation link, online total and grand-total toggle together.
pub async fn update_totals(repo: &dyn SettingRepo, form: &TotalsForm) -> AdminResult<String> {
    let online = parse_amount(&form.online_total)
        .map_err(|_| AdminError::validation("Please enter a valid number for online total."))?;
    let link = form.crs_donation_link.trim().to_string();
    let show = checkbox(form.show_grand_total.as_deref());

    repo.put_many(&[
        (SettingKey::CrsDonationLink.key(), link),
        (SettingKey::OnlineTotal.key(), format!("{online:.2}")),
        (SettingKey::ShowGrandTotal.key(), show.to_string()),
    ])
    .await?;
    info!(online_total = online, show_grand_total = show, "totals updated");
    Ok("Totals updated successfully.".into())
}
