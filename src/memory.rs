//! In-memory repositories backing `AppState::fake()`.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::announcements::{
    repo::AnnouncementRepo,
    repo_types::{Announcement, AnnouncementDraft},
};
use crate::auth::{repo::UserRepo, repo_types::User};
use crate::classes::{
    repo::ClassRepo,
    repo_types::{DuplicateClassName, SchoolClass},
};
use crate::quizzes::{
    repo::QuizRepo,
    repo_types::{Quiz, QuizUpdate, ScheduleMode},
};
use crate::settings::repo::SettingRepo;

#[derive(Default)]
pub struct MemoryUserRepo {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, username: &str, password_hash: &str) -> anyhow::Result<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == username) {
            return Err(anyhow!("duplicate username {username}"));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> anyhow::Result<bool> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == id) {
            Some(u) => {
                u.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> anyhow::Result<i64> {
        Ok(self.users.lock().unwrap().len() as i64)
    }
}

#[derive(Default)]
pub struct MemoryQuizRepo {
    quizzes: Mutex<Vec<Quiz>>,
}

#[async_trait]
impl QuizRepo for MemoryQuizRepo {
    async fn list(&self) -> anyhow::Result<Vec<Quiz>> {
        let mut list = self.quizzes.lock().unwrap().clone();
        list.sort_by_key(|q| q.week_number);
        Ok(list)
    }

    async fn find_by_week(&self, week: i32) -> anyhow::Result<Option<Quiz>> {
        let quizzes = self.quizzes.lock().unwrap();
        Ok(quizzes.iter().find(|q| q.week_number == week).cloned())
    }

    async fn insert_missing_weeks(&self, weeks: &[i32]) -> anyhow::Result<u64> {
        let mut quizzes = self.quizzes.lock().unwrap();
        let now = OffsetDateTime::now_utc();
        let mut created = 0;
        for &week in weeks {
            if quizzes.iter().any(|q| q.week_number == week) {
                continue;
            }
            let id = quizzes.iter().map(|q| q.id).max().unwrap_or(0) + 1;
            quizzes.push(Quiz {
                id,
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
                created_at: now,
                updated_at: now,
            });
            created += 1;
        }
        Ok(created)
    }

    async fn update(&self, week: i32, update: &QuizUpdate) -> anyhow::Result<bool> {
        let mut quizzes = self.quizzes.lock().unwrap();
        let Some(q) = quizzes.iter_mut().find(|q| q.week_number == week) else {
            return Ok(false);
        };
        q.country_name = update.country_name.clone();
        q.description = update.description.clone();
        q.forms_link = update.forms_link.clone();
        q.opens_at = update.opens_at;
        q.closes_at = update.closes_at;
        q.schedule_mode = update.schedule_mode;
        q.manual_visible = update.manual_visible;
        q.participant_count = update.participant_count;
        q.participants_text = update.participants_text.clone();
        q.winners = update.winners.clone();
        q.updated_at = OffsetDateTime::now_utc();
        Ok(true)
    }
}

/// Every call fails, as a lost database connection would.
pub struct FailingQuizRepo;

#[async_trait]
impl QuizRepo for FailingQuizRepo {
    async fn list(&self) -> anyhow::Result<Vec<Quiz>> {
        Err(anyhow!("connection refused"))
    }

    async fn find_by_week(&self, _week: i32) -> anyhow::Result<Option<Quiz>> {
        Err(anyhow!("connection refused"))
    }

    async fn insert_missing_weeks(&self, _weeks: &[i32]) -> anyhow::Result<u64> {
        Err(anyhow!("connection refused"))
    }

    async fn update(&self, _week: i32, _update: &QuizUpdate) -> anyhow::Result<bool> {
        Err(anyhow!("connection refused"))
    }
}

#[derive(Default)]
pub struct MemoryClassRepo {
    classes: Mutex<Vec<SchoolClass>>,
}

#[async_trait]
impl ClassRepo for MemoryClassRepo {
    async fn list(&self) -> anyhow::Result<Vec<SchoolClass>> {
        let mut list = self.classes.lock().unwrap().clone();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    async fn find(&self, id: i32) -> anyhow::Result<Option<SchoolClass>> {
        let classes = self.classes.lock().unwrap();
        Ok(classes.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<SchoolClass>> {
        let classes = self.classes.lock().unwrap();
        Ok(classes.iter().find(|c| c.name == name).cloned())
    }

    async fn create(&self, name: &str, amount: f64) -> anyhow::Result<SchoolClass> {
        let mut classes = self.classes.lock().unwrap();
        if classes.iter().any(|c| c.name == name) {
            return Err(DuplicateClassName(name.to_string()).into());
        }
        let class = SchoolClass {
            id: classes.iter().map(|c| c.id).max().unwrap_or(0) + 1,
            name: name.to_string(),
            rice_bowl_amount: amount,
            created_at: OffsetDateTime::now_utc(),
        };
        classes.push(class.clone());
        Ok(class)
    }

    async fn update(
        &self,
        id: i32,
        name: Option<&str>,
        amount: Option<f64>,
    ) -> anyhow::Result<Option<SchoolClass>> {
        let mut classes = self.classes.lock().unwrap();
        if let Some(name) = name {
            if classes.iter().any(|c| c.name == name && c.id != id) {
                return Err(DuplicateClassName(name.to_string()).into());
            }
        }
        let Some(class) = classes.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(name) = name {
            class.name = name.to_string();
        }
        if let Some(amount) = amount {
            class.rice_bowl_amount = amount;
        }
        Ok(Some(class.clone()))
    }

    async fn delete(&self, id: i32) -> anyhow::Result<bool> {
        let mut classes = self.classes.lock().unwrap();
        let before = classes.len();
        classes.retain(|c| c.id != id);
        Ok(classes.len() != before)
    }
}

/// Name lookups always miss, so only the write sees a clash, as when two
/// admins add the same class at once.
#[derive(Default)]
pub struct StaleLookupClassRepo {
    pub inner: MemoryClassRepo,
}

#[async_trait]
impl ClassRepo for StaleLookupClassRepo {
    async fn list(&self) -> anyhow::Result<Vec<SchoolClass>> {
        self.inner.list().await
    }

    async fn find(&self, id: i32) -> anyhow::Result<Option<SchoolClass>> {
        self.inner.find(id).await
    }

    async fn find_by_name(&self, _name: &str) -> anyhow::Result<Option<SchoolClass>> {
        Ok(None)
    }

    async fn create(&self, name: &str, amount: f64) -> anyhow::Result<SchoolClass> {
        self.inner.create(name, amount).await
    }

    async fn update(
        &self,
        id: i32,
        name: Option<&str>,
        amount: Option<f64>,
    ) -> anyhow::Result<Option<SchoolClass>> {
        self.inner.update(id, name, amount).await
    }

    async fn delete(&self, id: i32) -> anyhow::Result<bool> {
        self.inner.delete(id).await
    }
}

#[derive(Default)]
pub struct MemorySettingRepo {
    values: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl SettingRepo for MemorySettingRepo {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn put_many(&self, pairs: &[(&str, String)]) -> anyhow::Result<()> {
        let mut values = self.values.lock().unwrap();
        for (key, value) in pairs {
            values.insert(key.to_string(), value.clone());
        }
        Ok(())
    }

    async fn all(&self) -> anyhow::Result<HashMap<String, String>> {
        Ok(self.values.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MemoryAnnouncementRepo {
    rows: Mutex<Vec<Announcement>>,
}

#[async_trait]
impl AnnouncementRepo for MemoryAnnouncementRepo {
    async fn list(&self) -> anyhow::Result<Vec<Announcement>> {
        let mut list = self.rows.lock().unwrap().clone();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(list)
    }

    async fn find(&self, id: i32) -> anyhow::Result<Option<Announcement>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|a| a.id == id).cloned())
    }

    async fn create(&self, draft: &AnnouncementDraft) -> anyhow::Result<Announcement> {
        let mut rows = self.rows.lock().unwrap();
        let row = Announcement {
            id: rows.iter().map(|a| a.id).max().unwrap_or(0) + 1,
            text: draft.text.clone(),
            start_at: draft.start_at,
            end_at: draft.end_at,
            enabled: draft.enabled,
            created_at: OffsetDateTime::now_utc(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: i32, draft: &AnnouncementDraft) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|a| a.id == id) else {
            return Ok(false);
        };
        row.text = draft.text.clone();
        row.start_at = draft.start_at;
        row.end_at = draft.end_at;
        row.enabled = draft.enabled;
        Ok(true)
    }

    async fn delete(&self, id: i32) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|a| a.id != id);
        Ok(rows.len() != before)
    }
}
