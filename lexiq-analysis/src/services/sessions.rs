//! User sessions and projects

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use lexiq_common::{InMemoryStore, Store};

use crate::models::{Project, ProjectData, UserSession};

pub struct SessionManager {
    sessions: Arc<dyn Store<String, UserSession>>,
    projects: Arc<dyn Store<String, Project>>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryStore::new()), Arc::new(InMemoryStore::new()))
    }
}

impl SessionManager {
    pub fn new(
        sessions: Arc<dyn Store<String, UserSession>>,
        projects: Arc<dyn Store<String, Project>>,
    ) -> Self {
        Self { sessions, projects }
    }

    pub fn create_session(&self, user_id: &str, language: &str, domain: &str) -> UserSession {
        let session = UserSession::new(user_id, language, domain);
        debug!(session_id = %session.session_id, "Session created");
        self.sessions.put(session.session_id.clone(), session.clone());
        session
    }

    /// Live session by id; expired sessions are removed and reported missing
    pub fn get_session(&self, session_id: &str) -> Option<UserSession> {
        let key = session_id.to_string();
        let session = self.sessions.get(&key)?;
        if session.is_expired(Utc::now()) {
            self.sessions.delete(&key);
            return None;
        }
        Some(session)
    }

    /// Record activity on a session
    pub fn touch(&self, session_id: &str) {
        self.sessions
            .update(&session_id.to_string(), &mut |s: &mut UserSession| {
                s.last_activity = Utc::now();
            });
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn end_session(&self, session_id: &str) -> bool {
        self.sessions.delete(&session_id.to_string()).is_some()
    }

    /// Drop expired sessions, returning how many were removed
    pub fn prune_expired(&self, now: DateTime<Utc>) -> usize {
        self.sessions
            .values()
            .into_iter()
            .filter(|s| s.is_expired(now))
            .filter(|s| self.sessions.delete(&s.session_id).is_some())
            .count()
    }

    /// Create a project; `data` must already be validated
    pub fn create_project(&self, user_id: &str, data: ProjectData) -> Project {
        let now = Utc::now();
        let project = Project {
            project_id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            data,
            created_at: now,
            updated_at: now,
            analysis_count: 0,
            file_count: 0,
            status: "active".to_string(),
        };
        self.projects.put(project.project_id.clone(), project.clone());
        project
    }

    /// Projects owned by a user, oldest first
    pub fn user_projects(&self, user_id: &str) -> Vec<Project> {
        let mut projects: Vec<Project> = self
            .projects
            .values()
            .into_iter()
            .filter(|p| p.user_id == user_id)
            .collect();
        projects.sort_by_key(|p| p.created_at);
        projects
    }

    /// A project, only if owned by `user_id`
    pub fn get_project(&self, user_id: &str, project_id: &str) -> Option<Project> {
        self.projects
            .get(&project_id.to_string())
            .filter(|p| p.user_id == user_id)
    }

    pub fn record_project_analysis(&self, project_id: &str) {
        self.projects
            .update(&project_id.to_string(), &mut |p: &mut Project| {
                p.analysis_count += 1;
                p.updated_at = Utc::now();
            });
    }

    pub fn record_project_file(&self, project_id: &str) {
        self.projects
            .update(&project_id.to_string(), &mut |p: &mut Project| {
                p.file_count += 1;
                p.updated_at = Utc::now();
            });
    }
}
