use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Announcement {
    pub id: i32,
    pub text: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub start_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_at: Option<OffsetDateTime>,
    pub enabled: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Announcement {
    /// Enabled and inside its window; a missing bound leaves that side open.
    pub fn is_active(&self, now: OffsetDateTime) -> bool {
        self.enabled
            && self.start_at.map_or(true, |start| now >= start)
            && self.end_at.map_or(true, |end| now <= end)
    }
}

/// Validated content of an announcement form.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnouncementDraft {
    pub text: String,
    pub start_at: Option<OffsetDateTime>,
    pub end_at: Option<OffsetDateTime>,
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn announcement(start: Option<OffsetDateTime>, end: Option<OffsetDateTime>) -> Announcement {
        Announcement {
            id: 1,
            text: "Soup lunch Friday".into(),
            start_at: start,
            end_at: end,
            enabled: true,
            created_at: datetime!(2026-02-01 00:00 UTC),
        }
    }

    #[test]
    fn unbounded_follows_enabled_flag() {
        let now = datetime!(2026-03-01 12:00 UTC);
        let mut a = announcement(None, None);
        assert!(a.is_active(now));
        a.enabled = false;
        assert!(!a.is_active(now));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let start = datetime!(2026-03-01 00:00 UTC);
        let end = datetime!(2026-03-08 00:00 UTC);
        let a = announcement(Some(start), Some(end));
        assert!(a.is_active(start));
        assert!(a.is_active(end));
        assert!(!a.is_active(datetime!(2026-02-28 23:59 UTC)));
        assert!(!a.is_active(datetime!(2026-03-08 00:01 UTC)));
    }

    #[test]
    fn single_bound_windows() {
        let at = datetime!(2026-03-05 00:00 UTC);
        assert!(!announcement(Some(at), None).is_active(datetime!(2026-03-04 00:00 UTC)));
        assert!(announcement(Some(at), None).is_active(datetime!(2026-04-01 00:00 UTC)));
        assert!(!announcement(None, Some(at)).is_active(datetime!(2026-03-06 00:00 UTC)));
    }
}
