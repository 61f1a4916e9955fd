use serde::Serialize;
use time::OffsetDateTime;

use crate::announcements::repo_types::Announcement;
use crate::classes::repo_types::SchoolClass;
use crate::quizzes::repo_types::Quiz;
use crate::settings::PublicSettings;
use crate::totals::Totals;

#[derive(Debug, Serialize)]
pub struct PublicQuiz {
    pub week_number: i32,
    pub country_name: String,
    pub description: String,
    pub forms_link: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub opens_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub closes_at: Option<OffsetDateTime>,
    pub is_visible: bool,
    pub participant_count: i32,
    pub participants: Vec<String>,
    pub winners: Vec<String>,
}

impl PublicQuiz {
    pub fn new(quiz: &Quiz, now: OffsetDateTime) -> Self {
        Self {
            week_number: quiz.week_number,
            country_name: quiz.country_name.clone(),
            description: quiz.description.clone().unwrap_or_default(),
            forms_link: quiz.forms_link.clone().unwrap_or_default(),
            opens_at: quiz.opens_at,
            closes_at: quiz.closes_at,
            is_visible: quiz.is_visible(now),
            participant_count: quiz.participant_count,
            participants: quiz.participants(),
            winners: quiz.winners(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PublicClass {
    pub id: i32,
    pub name: String,
    pub rice_bowl_amount: f64,
}

impl From<&SchoolClass> for PublicClass {
    fn from(c: &SchoolClass) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            rice_bowl_amount: c.rice_bowl_amount,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PublicAnnouncement {
    pub id: i32,
    pub text: String,
    pub enabled: bool,
}

impl From<&Announcement> for PublicAnnouncement {
    fn from(a: &Announcement) -> Self {
        Self {
            id: a.id,
            text: a.text.clone(),
            enabled: a.enabled,
        }
    }
}

/// Everything the public page renders, in one document.
#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub current_week: i32,
    pub quizzes: Vec<PublicQuiz>,
    pub classes: Vec<PublicClass>,
    pub settings: PublicSettings,
    pub announcements: Vec<PublicAnnouncement>,
    #[serde(flatten)]
    pub totals: Totals,
}

impl Snapshot {
    /// Served when assembling the real snapshot fails.
    pub fn fallback() -> Self {
        Self {
            current_week: 1,
            quizzes: Vec::new(),
            classes: Vec::new(),
            settings: PublicSettings::default(),
            announcements: Vec::new(),
            totals: Totals::default(),
        }
    }
}
