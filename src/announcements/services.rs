use tracing::info;

use super::dto::AnnouncementForm;
use super::repo::AnnouncementRepo;
use super::repo_types::{Announcement, AnnouncementDraft};
use crate::error::{AdminError, AdminResult};
use crate::forms::{checkbox, non_blank, parse_datetime};

pub async fn list_announcements(repo: &dyn AnnouncementRepo) -> AdminResult<Vec<Announcement>> {
    Ok(repo.list().await?)
}

pub fn parse_form(form: &AnnouncementForm) -> AdminResult<AnnouncementDraft> {
    let text = non_blank(&form.text)
        .ok_or_else(|| AdminError::validation("Announcement text is required."))?;
    let date = |raw: &str| {
        parse_datetime(raw).map_err(|e| AdminError::validation(format!("Invalid date format: {e}")))
    };
    let start_at = date(&form.start_at)?;
    let end_at = date(&form.end_at)?;
    if let (Some(start), Some(end)) = (start_at, end_at) {
        if start >= end {
            return Err(AdminError::validation("Start date must be before end date."));
        }
    }
    Ok(AnnouncementDraft {
        text,
        start_at,
        end_at,
        enabled: checkbox(form.enabled.as_deref()),
    })
}

pub async fn add_announcement(
    repo: &dyn AnnouncementRepo,
    form: &AnnouncementForm,
) -> AdminResult<String> {
    let draft = parse_form(form)?;
    let created = repo.create(&draft).await?;
    info!(announcement_id = created.id, enabled = created.enabled, "announcement added");
    Ok("Announcement added successfully.".into())
}

pub async fn update_announcement(
    repo: &dyn AnnouncementRepo,
    id: i32,
    form: &AnnouncementForm,
) -> AdminResult<String> {
    if repo.find(id).await?.is_none() {
        return Err(AdminError::not_found("Announcement not found."));
    }
    let draft = parse_form(form)?;
    if !repo.update(id, &draft).await? {
        return Err(AdminError::not_found("Announcement not found."));
    }
    info!(announcement_id = id, enabled = draft.enabled, "announcement updated");
    Ok("Announcement updated successfully.".into())
}

pub async fn delete_announcement(repo: &dyn AnnouncementRepo, id: i32) -> AdminResult<String> {
    if !repo.delete(id).await? {
        return Err(AdminError::not_found("Announcement not found."));
    }
    info!(announcement_id = id, "announcement deleted");
    Ok("Announcement deleted successfully.".into())
}
