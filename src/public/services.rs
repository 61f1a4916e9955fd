use time::OffsetDateTime;

use super::dto::{PublicAnnouncement, PublicClass, PublicQuiz, Snapshot};
use crate::quizzes::repo_types::Quiz;
use crate::settings::{PublicSettings, Settings};
use crate::state::AppState;
use crate::totals::Totals;

/// Week the public page should feature. `quizzes` must be ordered by week.
///
/// The first visible quiz wins. Otherwise the week after the latest closed
/// scheduled quiz, never past the last defined week. Otherwise week 1.
pub fn current_week(quizzes: &[Quiz], now: OffsetDateTime) -> i32 {
    if let Some(q) = quizzes.iter().find(|q| q.is_visible(now)) {
        return q.week_number;
    }
    let Some(max_week) = quizzes.iter().map(|q| q.week_number).max() else {
        return 1;
    };
    quizzes
        .iter()
        .rev()
        .find(|q| q.has_closed(now))
        .map(|q| (q.week_number + 1).min(max_week))
        .unwrap_or(1)
}

pub async fn snapshot(state: &AppState, now: OffsetDateTime) -> anyhow::Result<Snapshot> {
    let quizzes = state.quizzes.list().await?;
    let classes = state.classes.list().await?;
    let settings = Settings::load(state.settings.as_ref()).await?;
    let announcements = state.announcements.list().await?;

    Ok(Snapshot {
        current_week: current_week(&quizzes, now),
        quizzes: quizzes.iter().map(|q| PublicQuiz::new(q, now)).collect(),
        classes: classes.iter().map(PublicClass::from).collect(),
        settings: PublicSettings::from(&settings),
        announcements: announcements
            .iter()
            .filter(|a| a.is_active(now))
            .map(PublicAnnouncement::from)
            .collect(),
        totals: Totals::compute(&classes, settings.online_total()),
    })
}
