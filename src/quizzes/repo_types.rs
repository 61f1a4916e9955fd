use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// How a quiz decides whether it is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleMode {
    #[default]
    Manual,
    Scheduled,
}

impl ScheduleMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ScheduleMode::Manual => "manual",
            ScheduleMode::Scheduled => "scheduled",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "manual" => Some(ScheduleMode::Manual),
            "scheduled" => Some(ScheduleMode::Scheduled),
            _ => None,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct QuizRow {
    pub id: i32,
    pub week_number: i32,
    pub country_name: String,
    pub description: Option<String>,
    pub forms_link: Option<String>,
    pub opens_at: Option<OffsetDateTime>,
    pub closes_at: Option<OffsetDateTime>,
    pub schedule_mode: String,
    pub manual_visible: bool,
    pub participant_count: i32,
    pub participants_text: Option<String>,
    pub winner_1: Option<String>,
    pub winner_2: Option<String>,
    pub winner_3: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    pub id: i32,
    pub week_number: i32,
    pub country_name: String,
    pub description: Option<String>,
    pub forms_link: Option<String>,
    pub opens_at: Option<OffsetDateTime>,
    pub closes_at: Option<OffsetDateTime>,
    pub schedule_mode: ScheduleMode,
    pub manual_visible: bool,
    pub participant_count: i32,
    pub participants_text: Option<String>,
    pub winners: [Option<String>; 3],
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<QuizRow> for Quiz {
    fn from(r: QuizRow) -> Self {
        Self {
            id: r.id,
            week_number: r.week_number,
            country_name: r.country_name,
            description: r.description,
            forms_link: r.forms_link,
            opens_at: r.opens_at,
            closes_at: r.closes_at,
            schedule_mode: ScheduleMode::parse(&r.schedule_mode).unwrap_or_default(),
            manual_visible: r.manual_visible,
            participant_count: r.participant_count,
            participants_text: r.participants_text,
            winners: [r.winner_1, r.winner_2, r.winner_3],
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl Quiz {
    /// Manual quizzes follow their flag; scheduled ones need both bounds and
    /// `opens_at <= now <= closes_at`.
    pub fn is_visible(&self, now: OffsetDateTime) -> bool {
        match self.schedule_mode {
            ScheduleMode::Manual => self.manual_visible,
            ScheduleMode::Scheduled => match (self.opens_at, self.closes_at) {
                (Some(open), Some(close)) => open <= now && now <= close,
                _ => false,
            },
        }
    }

    pub fn has_closed(&self, now: OffsetDateTime) -> bool {
        self.schedule_mode == ScheduleMode::Scheduled
            && self.closes_at.is_some_and(|close| now > close)
    }

    /// One participant per non-blank line.
    pub fn participants(&self) -> Vec<String> {
        self.participants_text
            .as_deref()
            .unwrap_or_default()
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn winners(&self) -> Vec<String> {
        self.winners
            .iter()
            .flatten()
            .filter(|w| !w.trim().is_empty())
            .cloned()
            .collect()
    }
}

/// Validated replacement for every editable quiz field.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizUpdate {
    pub country_name: String,
    pub description: Option<String>,
    pub forms_link: Option<String>,
    pub opens_at: Option<OffsetDateTime>,
    pub closes_at: Option<OffsetDateTime>,
    pub schedule_mode: ScheduleMode,
    pub manual_visible: bool,
    pub participant_count: i32,
    pub participants_text: Option<String>,
    pub winners: [Option<String>; 3],
}

#[cfg(test)]
pub(crate) fn sample_quiz(week: i32) -> Quiz {
    let at = time::macros::datetime!(2026-02-18 00:00 UTC);
    Quiz {
        id: week,
        week_number: week,
        country_name: format!("Week {week}"),
        description: None,
        forms_link: None,
        opens_at: None,
        closes_at: None,
        schedule_mode: ScheduleMode::Manual,
        manual_visible: false,
        participant_count: 0,
        participants_text: None,
        winners: [None, None, None],
        created_at: at,
        updated_at: at,
    }
}
