use async_trait::async_trait;
use chrono::Utc;
use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::{AuthProvider, AuthSession, BackendError, ProjectStore, Result};
use crate::config::Settings;
use crate::models::{Project, ProjectPayload};
use crate::monitoring;

/// Fallback when the auth service omits both `expires_at` and `expires_in`
const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Client for a Supabase project: PostgREST under `/rest/v1`, GoTrue under `/auth/v1`.
#[derive(Clone)]
pub struct SupabaseClient {
    base_url: String,
    anon_key: String,
    table: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    refresh_token: String,
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl TokenResponse {
    fn into_session(self, fallback_email: &str) -> AuthSession {
        let expires_at = self.expires_at.unwrap_or_else(|| {
            Utc::now().timestamp() + self.expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS)
        });

        AuthSession {
            access_token: self.access_token,
            expires_at,
            refresh_token: self.refresh_token,
            user_id: self.user.id,
            email: self.user.email.unwrap_or_else(|| fallback_email.to_string()),
        }
    }
}

impl SupabaseClient {
    pub fn new(
        base_url: &str,
        anon_key: &str,
        table: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            table: table.to_string(),
            client,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            &settings.supabase_url,
            &settings.supabase_anon_key,
            &settings.projects_table,
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    fn rest_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Attach the project key and the bearer token (anon key when signed out).
    fn authorized(&self, request: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token.unwrap_or(&self.anon_key))
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<reqwest::Response> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                monitoring::record_backend_call(operation, "transport_error");
                warn!(operation, error = %e, "Backend request failed");
                return Err(e.into());
            }
        };

        let status = response.status();
        if status.is_success() {
            monitoring::record_backend_call(operation, "ok");
            debug!(operation, status = status.as_u16(), "Backend request succeeded");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body, status);
        monitoring::record_backend_call(operation, "api_error");
        warn!(operation, status = status.as_u16(), %message, "Backend returned an error");

        Err(BackendError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Pull the human-readable message out of a PostgREST or GoTrue error body.
pub fn error_message(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(message) = value
                .get(key)
                .and_then(|v| v.as_str())
                .filter(|m| !m.is_empty())
            {
                return message.to_string();
            }
        }
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }

    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

#[async_trait]
impl ProjectStore for SupabaseClient {
    async fn list_projects(&self, access_token: Option<&str>) -> Result<Vec<Project>> {
        let request = self
            .client
            .get(self.rest_url())
            .query(&[("select", "*"), ("order", "created_at.desc")]);

        let response = self
            .send("select", self.authorized(request, access_token))
            .await?;
        let body = response.text().await?;

        Ok(serde_json::from_str(&body)?)
    }

    async fn insert_project(&self, access_token: &str, payload: &ProjectPayload) -> Result<()> {
        let request = self
            .client
            .post(self.rest_url())
            .header("Prefer", "return=minimal")
            .json(&[payload]);

        self.send("insert", self.authorized(request, Some(access_token)))
            .await?;
        Ok(())
    }

    async fn update_project(
        &self,
        access_token: &str,
        id: i64,
        payload: &ProjectPayload,
    ) -> Result<()> {
        let request = self
            .client
            .patch(self.rest_url())
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=minimal")
            .json(payload);

        self.send("update", self.authorized(request, Some(access_token)))
            .await?;
        Ok(())
    }

    async fn delete_project(&self, access_token: &str, id: i64) -> Result<()> {
        let request = self
            .client
            .delete(self.rest_url())
            .query(&[("id", format!("eq.{}", id))]);

        self.send("delete", self.authorized(request, Some(access_token)))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AuthProvider for SupabaseClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        let request = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&PasswordGrant { email, password });

        let response = self.send("sign_in", request).await?;
        let body = response.text().await?;
        let token: TokenResponse = serde_json::from_str(&body)?;

        Ok(token.into_session(email))
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession> {
        let request = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "refresh_token")])
            .header("apikey", &self.anon_key)
            .json(&RefreshGrant { refresh_token });

        let response = self.send("refresh", request).await?;
        let body = response.text().await?;
        let token: TokenResponse = serde_json::from_str(&body)?;

        Ok(token.into_session(""))
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let request = self.client.post(self.auth_url("logout"));

        self.send("sign_out", self.authorized(request, Some(access_token)))
            .await?;
        Ok(())
    }
}
