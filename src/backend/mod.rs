//! Access to the hosted backend.
//!
//! Persistence, ordering and authorization all live in the hosted service.
//! The traits here are the seam between the web handlers and the
//! [`supabase::SupabaseClient`] that talks to it.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Project, ProjectPayload};

pub mod supabase;

/// Errors from the hosted backend.
///
/// `Display` is the message the service returned so handlers can show it
/// to the operator unchanged.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response from backend: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BackendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Api { status, .. } => Some(*status),
            BackendError::Http(e) => e.status().map(|s| s.as_u16()),
            BackendError::Decode(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BackendError>;

/// Signed-in operator as returned by the auth service
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub access_token: String,
    /// Unix timestamp when `access_token` stops being accepted
    pub expires_at: i64,
    /// Single-use token that exchanges for a fresh `access_token`
    pub refresh_token: String,
    pub user_id: String,
    pub email: String,
}

/// Row operations on the projects table.
///
/// `access_token` is the operator's token; `None` means the anonymous key.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// All rows, newest `created_at` first.
    async fn list_projects(&self, access_token: Option<&str>) -> Result<Vec<Project>>;

    async fn insert_project(&self, access_token: &str, payload: &ProjectPayload) -> Result<()>;

    async fn update_project(
        &self,
        access_token: &str,
        id: i64,
        payload: &ProjectPayload,
    ) -> Result<()>;

    async fn delete_project(&self, access_token: &str, id: i64) -> Result<()>;
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// Exchange a refresh token for a new session. The old refresh token
    /// is spent.
    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession>;

    async fn sign_out(&self, access_token: &str) -> Result<()>;
}
