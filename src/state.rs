//! Application state for the web server.

use std::sync::Arc;

use crate::backend::{supabase::SupabaseClient, AuthProvider, ProjectStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Row access for the projects table.
    pub projects: Arc<dyn ProjectStore>,
    /// Operator sign-in and sign-out.
    pub auth: Arc<dyn AuthProvider>,
}

impl AppState {
    pub fn new(projects: Arc<dyn ProjectStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { projects, auth }
    }

    /// One client serves both the data and the auth endpoints.
    pub fn from_supabase(client: SupabaseClient) -> Self {
        let client = Arc::new(client);
        Self {
            projects: client.clone(),
            auth: client,
        }
    }
}
