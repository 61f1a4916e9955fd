use std::ops::RangeInclusive;

use tracing::info;

use super::dto::QuizForm;
use super::repo::QuizRepo;
use super::repo_types::{Quiz, QuizUpdate, ScheduleMode};
use crate::error::{AdminError, AdminResult};
use crate::forms::{checkbox, non_blank, parse_count, parse_datetime};

/// Lent runs six quiz weeks.
pub const WEEKS: RangeInclusive<i32> = 1..=6;

/// Creates any missing week with its defaults. Idempotent.
pub async fn ensure_weeks_exist(repo: &dyn QuizRepo) -> anyhow::Result<u64> {
    let weeks: Vec<i32> = WEEKS.collect();
    let created = repo.insert_missing_weeks(&weeks).await?;
    if created > 0 {
        info!(created, "created missing quiz weeks");
    }
    Ok(created)
}

pub async fn list_weeks(repo: &dyn QuizRepo) -> AdminResult<Vec<Quiz>> {
    ensure_weeks_exist(repo).await?;
    Ok(repo.list().await?)
}

/// Validates the whole form before anything is written.
pub fn parse_week_form(week: i32, form: &QuizForm) -> AdminResult<QuizUpdate> {
    let schedule_mode = match form.schedule_mode.trim() {
        "" => ScheduleMode::Manual,
        raw => ScheduleMode::parse(raw)
            .ok_or_else(|| AdminError::validation(format!("Invalid schedule mode: {raw}")))?,
    };

    let opens_at = parse_datetime(&form.opens_at)
        .map_err(|e| AdminError::validation(format!("Invalid data: {e}")))?;
    let closes_at = parse_datetime(&form.closes_at)
        .map_err(|e| AdminError::validation(format!("Invalid data: {e}")))?;
    if let (Some(open), Some(close)) = (opens_at, closes_at) {
        if open >= close {
            return Err(AdminError::validation(
                "Opening date must be before closing date.",
            ));
        }
    }

    let participant_count = parse_count(&form.participant_count).map_err(|_| {
        AdminError::validation("Participant count must be a whole number of zero or more.")
    })?;

    Ok(QuizUpdate {
        country_name: non_blank(&form.country_name).unwrap_or_else(|| format!("Week {week}")),
        description: non_blank(&form.description),
        forms_link: non_blank(&form.forms_link),
        opens_at,
        closes_at,
        schedule_mode,
        manual_visible: checkbox(form.manual_visible.as_deref()),
        participant_count,
        participants_text: non_blank(&form.participants_text),
        winners: [
            non_blank(&form.winner_1),
            non_blank(&form.winner_2),
            non_blank(&form.winner_3),
        ],
    })
}

pub async fn update_week(repo: &dyn QuizRepo, week: i32, form: &QuizForm) -> AdminResult<String> {
    let not_found = || AdminError::not_found(format!("Quiz for week {week} not found."));
    if repo.find_by_week(week).await?.is_none() {
        return Err(not_found());
    }
    let update = parse_week_form(week, form)?;
    if !repo.update(week, &update).await? {
        return Err(not_found());
    }
    info!(week, mode = update.schedule_mode.as_str(), "quiz updated");
    Ok(format!("Week {week} quiz updated successfully."))
}
