use time::OffsetDateTime;

use crate::announcements::repo_types::Announcement;
use crate::classes::repo_types::SchoolClass;
use crate::error::AdminResult;
use crate::quizzes::repo_types::Quiz;
use crate::settings::Settings;
use crate::state::AppState;
use crate::totals::Totals;

#[derive(Debug, Clone)]
pub struct Overview {
    pub current_quiz: Option<Quiz>,
    pub next_quiz: Option<Quiz>,
    pub totals: Totals,
    pub class_count: usize,
    pub active_announcements: usize,
}

impl Overview {
    /// `quizzes` must be ordered by week.
    pub fn build(
        quizzes: &[Quiz],
        classes: &[SchoolClass],
        announcements: &[Announcement],
        settings: &Settings,
        now: OffsetDateTime,
    ) -> Self {
        let current_quiz = quizzes.iter().rev().find(|q| q.is_visible(now)).cloned();
        let next_quiz = quizzes
            .iter()
            .find(|q| !q.is_visible(now) && q.opens_at.is_some_and(|open| open > now))
            .cloned();
        Self {
            current_quiz,
            next_quiz,
            totals: Totals::compute(classes, settings.online_total()),
            class_count: classes.len(),
            active_announcements: announcements.iter().filter(|a| a.is_active(now)).count(),
        }
    }
}

pub async fn overview(state: &AppState, now: OffsetDateTime) -> AdminResult<Overview> {
    let quizzes = state.quizzes.list().await?;
    let classes = state.classes.list().await?;
    let announcements = state.announcements.list().await?;
    let settings = Settings::load(state.settings.as_ref()).await?;
    Ok(Overview::build(&quizzes, &classes, &announcements, &settings, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quizzes::repo_types::{sample_quiz, ScheduleMode};
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2026-03-04 12:00 UTC);

    fn scheduled(week: i32, open: OffsetDateTime, close: OffsetDateTime) -> Quiz {
        let mut q = sample_quiz(week);
        q.schedule_mode = ScheduleMode::Scheduled;
        q.opens_at = Some(open);
        q.closes_at = Some(close);
        q
    }

    #[test]
    fn picks_last_visible_and_first_upcoming() {
        let mut w1 = sample_quiz(1);
        w1.manual_visible = true;
        let w2 = scheduled(2, datetime!(2026-03-01 00:00 UTC), datetime!(2026-03-07 00:00 UTC));
        let w3 = scheduled(3, datetime!(2026-03-08 00:00 UTC), datetime!(2026-03-14 00:00 UTC));
        let w4 = scheduled(4, datetime!(2026-03-15 00:00 UTC), datetime!(2026-03-21 00:00 UTC));

        let o = Overview::build(&[w1, w2, w3, w4], &[], &[], &Settings::default(), NOW);
        assert_eq!(o.current_quiz.map(|q| q.week_number), Some(2));
        assert_eq!(o.next_quiz.map(|q| q.week_number), Some(3));
    }

    #[test]
    fn nothing_scheduled_means_no_quiz_cards() {
        let quizzes: Vec<_> = (1..=6).map(sample_quiz).collect();
        let o = Overview::build(&quizzes, &[], &[], &Settings::default(), NOW);
        assert!(o.current_quiz.is_none());
        assert!(o.next_quiz.is_none());
        assert_eq!(o.totals, Totals::default());
    }
}
