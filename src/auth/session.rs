use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::backend::AuthSession;
use crate::config;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "folio_session";

/// Access tokens this close to expiry are renewed before the request runs
const REFRESH_MARGIN_SECS: i64 = 30;

/// JWT session claims for the signed-in operator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID at the auth service)
    pub sub: String,
    /// Expiration time (Unix timestamp), end of the session window
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub email: String,
    /// Bearer token for row mutations
    pub access_token: String,
    /// When the auth service stops accepting `access_token`
    pub access_expires_at: i64,
    pub refresh_token: String,
}

impl SessionClaims {
    pub fn access_expired(&self) -> bool {
        self.access_expires_at <= Utc::now().timestamp()
    }

    fn needs_refresh(&self) -> bool {
        self.access_expires_at <= Utc::now().timestamp() + REFRESH_MARGIN_SECS
    }
}

/// Wrap an auth service session in a signed session token
pub fn create_session_token(session: &AuthSession) -> Result<String> {
    let now = Utc::now().timestamp();

    sign_claims(&SessionClaims {
        sub: session.user_id.clone(),
        exp: now + config::get_settings().session_ttl_secs,
        iat: now,
        email: session.email.clone(),
        access_token: session.access_token.clone(),
        access_expires_at: session.expires_at,
        refresh_token: session.refresh_token.clone(),
    })
}

fn sign_claims(claims: &SessionClaims) -> Result<String> {
    let settings = config::get_settings();

    let token = encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(settings.session_secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a session token
pub fn verify_session_token(token: &str) -> Result<SessionClaims> {
    let settings = config::get_settings();

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(settings.session_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| anyhow!("Invalid session token: {}", e))?;

    Ok(token_data.claims)
}

/// Session cookie that lives as long as the session token
pub fn create_session_cookie(token: &str) -> Cookie<'static> {
    let settings = config::get_settings();

    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.session_cookie_secure)
        .max_age(time::Duration::seconds(settings.session_ttl_secs))
        .build()
}

pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO)
        .build()
}

/// Renew the hosted access token when it is about to lapse.
///
/// Layered in front of the guarded routes. The renewed session replaces the
/// cookie on the incoming request, so [`SessionCookie`] and the handler see
/// the new token, and is set on the response. A failed refresh leaves the
/// request alone and the extractor sends the operator to `/login`.
pub async fn refresh_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let claims = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| verify_session_token(cookie.value()).ok())
        .filter(|claims| claims.needs_refresh() && !claims.refresh_token.is_empty());

    let Some(claims) = claims else {
        return next.run(request).await;
    };

    let session = match state.auth.refresh_session(&claims.refresh_token).await {
        Ok(session) => session,
        Err(e) => {
            tracing::info!(user_id = %claims.sub, "Session refresh failed: {}", e);
            return next.run(request).await;
        }
    };

    let token = match create_session_token(&session) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to create session token: {}", e);
            return next.run(request).await;
        }
    };

    let cookie_header = jar
        .iter()
        .map(|cookie| match cookie.name() {
            SESSION_COOKIE => format!("{}={}", SESSION_COOKIE, token),
            name => format!("{}={}", name, cookie.value()),
        })
        .collect::<Vec<_>>()
        .join("; ");

    match HeaderValue::from_str(&cookie_header) {
        Ok(value) => {
            request.headers_mut().insert(header::COOKIE, value);
        }
        Err(e) => {
            tracing::error!("Failed to rewrite session cookie: {}", e);
            return next.run(request).await;
        }
    }

    tracing::debug!(user_id = %session.user_id, "Refreshed operator session");

    let response = next.run(request).await;
    (jar.add(create_session_cookie(&token)), response).into_response()
}

/// Authenticated operator, read from the session cookie.
///
/// Rejects with a redirect to `/login`, so guarded handlers never run
/// (and never touch the backend) without a valid session and a live
/// access token.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    claims: SessionClaims,
}

impl SessionCookie {
    pub fn user_id(&self) -> &str {
        &self.claims.sub
    }

    pub fn email(&self) -> &str {
        &self.claims.email
    }

    pub fn access_token(&self) -> &str {
        &self.claims.access_token
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionCookie
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| Redirect::to("/login"))?;

        let claims = verify_session_token(&token).map_err(|e| {
            tracing::debug!("Rejected session cookie: {}", e);
            Redirect::to("/login")
        })?;

        if claims.access_expired() {
            tracing::debug!(user_id = %claims.sub, "Rejected session with expired access token");
            return Err(Redirect::to("/login"));
        }

        Ok(SessionCookie { claims })
    }
}
