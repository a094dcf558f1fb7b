use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::Session,
    services::{
        catalog::{BROWSE_MAX_RESULTS, SEARCH_MAX_RESULTS},
        BookCatalog, RecommendationSettings,
    },
};

/// Request-independent settings handlers read
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub search_max_results: u32,
    pub browse_max_results: u32,
    pub recommendation: RecommendationSettings,
    pub session_ttl: Duration,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            search_max_results: SEARCH_MAX_RESULTS,
            browse_max_results: BROWSE_MAX_RESULTS,
            recommendation: RecommendationSettings::default(),
            session_ttl: Duration::hours(24),
        }
    }
}

impl TryFrom<&Config> for AppSettings {
    type Error = anyhow::Error;

    fn try_from(config: &Config) -> Result<Self, Self::Error> {
        Ok(Self {
            search_max_results: config.search_max_results,
            browse_max_results: config.browse_max_results,
            recommendation: RecommendationSettings {
                max_features: config.tfidf_max_features,
                title_match_cutoff: config.title_match_cutoff,
            },
            session_ttl: config.session_ttl()?,
        })
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn BookCatalog>,
    pub settings: AppSettings,
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn BookCatalog>, settings: AppSettings) -> Self {
        Self {
            catalog,
            settings,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Starts a new session, purging sessions idle longer than the TTL
    pub async fn create_session(&self) -> Session {
        let session = Session::new();
        let cutoff = Utc::now() - self.settings.session_ttl;

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.last_active >= cutoff);
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::info!(purged, "Purged idle sessions");
        }
        sessions.insert(session.id, session.clone());

        session
    }

    pub async fn remove_session(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Copy of a session's current state; counts as activity
    pub async fn session(&self, id: Uuid) -> AppResult<Session> {
        self.with_session(id, |session| session.clone()).await
    }

    /// Runs `f` against a session under the write lock
    pub async fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> R,
    ) -> AppResult<R> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
        session.touch();
        Ok(f(session))
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockBookCatalog;

    fn state_with_ttl(ttl: Duration) -> AppState {
        let settings = AppSettings {
            session_ttl: ttl,
            ..AppSettings::default()
        };
        AppState::new(Arc::new(MockBookCatalog::new()), settings)
    }

    #[tokio::test]
    async fn test_create_and_remove_session() {
        let state = state_with_ttl(Duration::hours(1));
        let session = state.create_session().await;

        assert!(state.session(session.id).await.is_ok());
        assert!(state.remove_session(session.id).await);
        assert!(!state.remove_session(session.id).await);
        assert!(matches!(
            state.session(session.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_idle_sessions_are_purged_on_create() {
        let state = state_with_ttl(Duration::milliseconds(10));
        let stale = state.create_session().await;
        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        let fresh = state.create_session().await;

        assert_eq!(state.session_count().await, 1);
        assert!(state.session(stale.id).await.is_err());
        assert!(state.session(fresh.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_with_session_mutates_in_place() {
        let state = state_with_ttl(Duration::hours(1));
        let session = state.create_session().await;

        state
            .with_session(session.id, |s| {
                s.liked.add(crate::models::test_book("a", "Dune", ""));
            })
            .await
            .unwrap();

        assert_eq!(state.session(session.id).await.unwrap().liked.len(), 1);
        assert!(state.with_session(Uuid::new_v4(), |_| ()).await.is_err());
    }

    #[tokio::test]
    async fn test_reading_a_session_keeps_it_alive() {
        let state = state_with_ttl(Duration::milliseconds(80));
        let reader = state.create_session().await;

        for _ in 0..3 {
            tokio::time::sleep(std::time::Duration::from_millis(40)).await;
            state.session(reader.id).await.unwrap();
        }
        let before = state.session(reader.id).await.unwrap().last_active;
        assert!(before > reader.last_active);

        state.create_session().await;
        assert!(state.session(reader.id).await.is_ok());
    }

    #[test]
    fn test_settings_reject_out_of_range_session_ttl() {
        let vars = vec![("SESSION_TTL_SECS".to_string(), u64::MAX.to_string())];
        let config: Config = envy::from_iter(vars).unwrap();
        assert!(AppSettings::try_from(&config).is_err());

        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        let settings = AppSettings::try_from(&config).unwrap();
        assert_eq!(settings.session_ttl, Duration::hours(24));
    }
}
