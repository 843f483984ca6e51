#[cfg(test)]
pub mod helpers {
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request},
        response::Response,
        Router,
    };
    use chrono::{Duration, TimeZone, Utc};
    use parking_lot::Mutex;
    use std::sync::Arc;

    use crate::auth::session::{create_session_token, SESSION_COOKIE};
    use crate::backend::{AuthProvider, AuthSession, BackendError, ProjectStore, Result};
    use crate::models::{Project, ProjectPayload};
    use crate::state::AppState;
    use crate::web;

    pub const TEST_EMAIL: &str = "operator@example.com";
    pub const TEST_PASSWORD: &str = "correct-horse";
    pub const OPERATOR_TOKEN: &str = "operator-token";
    pub const OPERATOR_REFRESH_TOKEN: &str = "operator-refresh";
    pub const REFRESHED_TOKEN: &str = "operator-token-2";

    #[derive(Default)]
    struct Inner {
        rows: Vec<Project>,
        next_id: i64,
        requests: usize,
        tokens: Vec<Option<String>>,
        sign_outs: usize,
        refreshes: usize,
        failure: Option<String>,
    }

    /// In-memory stand-in for the hosted backend
    #[derive(Default)]
    pub struct MemoryBackend {
        inner: Mutex<Inner>,
    }

    impl MemoryBackend {
        /// Insert a row directly; does not count as a request.
        pub fn seed(&self, payload: ProjectPayload) -> i64 {
            let mut inner = self.inner.lock();
            insert_row(&mut inner, &payload)
        }

        /// Make every following request fail with `message`.
        pub fn fail_with(&self, message: &str) {
            self.inner.lock().failure = Some(message.to_string());
        }

        pub fn rows(&self) -> Vec<Project> {
            self.inner.lock().rows.clone()
        }

        /// Data requests received (select, insert, update, delete)
        pub fn request_count(&self) -> usize {
            self.inner.lock().requests
        }

        pub fn tokens_seen(&self) -> Vec<Option<String>> {
            self.inner.lock().tokens.clone()
        }

        pub fn sign_outs(&self) -> usize {
            self.inner.lock().sign_outs
        }

        pub fn refreshes(&self) -> usize {
            self.inner.lock().refreshes
        }

        fn begin(&self, token: Option<&str>) -> Result<parking_lot::MutexGuard<'_, Inner>> {
            let mut inner = self.inner.lock();
            inner.requests += 1;
            inner.tokens.push(token.map(str::to_string));
            if let Some(message) = inner.failure.clone() {
                return Err(BackendError::Api {
                    status: 400,
                    message,
                });
            }
            Ok(inner)
        }
    }

    fn insert_row(inner: &mut Inner, payload: &ProjectPayload) -> i64 {
        inner.next_id += 1;
        let id = inner.next_id;
        // Distinct, increasing timestamps keep the ordering deterministic
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(id);

        inner.rows.push(Project {
            id,
            title: payload.title.clone(),
            description: Some(payload.description.clone()),
            tech_stack: Some(payload.tech_stack.clone()),
            repo_url: payload.repo_url.clone(),
            demo_url: payload.demo_url.clone(),
            created_at,
        });
        id
    }

    #[async_trait]
    impl ProjectStore for MemoryBackend {
        async fn list_projects(&self, access_token: Option<&str>) -> Result<Vec<Project>> {
            let inner = self.begin(access_token)?;
            let mut rows = inner.rows.clone();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(rows)
        }

        async fn insert_project(&self, access_token: &str, payload: &ProjectPayload) -> Result<()> {
            let mut inner = self.begin(Some(access_token))?;
            insert_row(&mut inner, payload);
            Ok(())
        }

        async fn update_project(
            &self,
            access_token: &str,
            id: i64,
            payload: &ProjectPayload,
        ) -> Result<()> {
            let mut inner = self.begin(Some(access_token))?;
            if let Some(row) = inner.rows.iter_mut().find(|p| p.id == id) {
                row.title = payload.title.clone();
                row.description = Some(payload.description.clone());
                row.tech_stack = Some(payload.tech_stack.clone());
                row.repo_url = payload.repo_url.clone();
                row.demo_url = payload.demo_url.clone();
            }
            Ok(())
        }

        async fn delete_project(&self, access_token: &str, id: i64) -> Result<()> {
            let mut inner = self.begin(Some(access_token))?;
            inner.rows.retain(|p| p.id != id);
            Ok(())
        }
    }

    #[async_trait]
    impl AuthProvider for MemoryBackend {
        async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
            if email == TEST_EMAIL && password == TEST_PASSWORD {
                Ok(operator_session())
            } else {
                Err(BackendError::Api {
                    status: 400,
                    message: "Invalid login credentials".to_string(),
                })
            }
        }

        async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession> {
            if refresh_token != OPERATOR_REFRESH_TOKEN {
                return Err(BackendError::Api {
                    status: 400,
                    message: "Invalid Refresh Token: Refresh Token Not Found".to_string(),
                });
            }

            self.inner.lock().refreshes += 1;
            Ok(AuthSession {
                access_token: REFRESHED_TOKEN.to_string(),
                refresh_token: format!("{}-2", OPERATOR_REFRESH_TOKEN),
                ..operator_session()
            })
        }

        async fn sign_out(&self, _access_token: &str) -> Result<()> {
            self.inner.lock().sign_outs += 1;
            Ok(())
        }
    }

    pub fn memory_backend() -> Arc<MemoryBackend> {
        Arc::new(MemoryBackend::default())
    }

    pub fn test_app(backend: &Arc<MemoryBackend>) -> Router {
        web::router(AppState::new(backend.clone(), backend.clone()))
    }

    pub fn operator_session() -> AuthSession {
        AuthSession {
            access_token: OPERATOR_TOKEN.to_string(),
            expires_at: Utc::now().timestamp() + 3600,
            refresh_token: OPERATOR_REFRESH_TOKEN.to_string(),
            user_id: "operator-1".to_string(),
            email: TEST_EMAIL.to_string(),
        }
    }

    /// `Cookie` header value for a signed-in operator
    pub fn session_cookie_header() -> String {
        cookie_header_for(&operator_session())
    }

    pub fn cookie_header_for(session: &AuthSession) -> String {
        let token = create_session_token(session).expect("Failed to create session token");
        format!("{}={}", SESSION_COOKIE, token)
    }

    /// Operator session whose hosted access token has already lapsed
    pub fn lapsed_session() -> AuthSession {
        AuthSession {
            expires_at: Utc::now().timestamp() - 1,
            ..operator_session()
        }
    }

    pub fn sample_payload(title: &str, demo_url: Option<&str>) -> ProjectPayload {
        ProjectPayload {
            title: title.to_string(),
            description: format!("{} description", title),
            tech_stack: "Rust".to_string(),
            repo_url: None,
            demo_url: demo_url.map(str::to_string),
        }
    }

    pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    pub fn form_request(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    pub async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}
