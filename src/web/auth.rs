use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use maud::{html, Markup};
use serde::Deserialize;

use crate::auth::session::{
    clear_session_cookie, create_session_cookie, create_session_token, verify_session_token,
    SESSION_COOKIE,
};
use crate::monitoring;
use crate::state::AppState;

use super::components::layout::{self, icons};

/// Login form data
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Show login page
pub async fn login_page() -> Markup {
    login_view("", None)
}

fn login_view(email: &str, error: Option<&str>) -> Markup {
    layout::base(
        "Login",
        html! {
            div class="min-h-screen flex items-center justify-center p-4" {
                div class="w-full max-w-sm" {
                    a href="/" class="flex items-center gap-2 text-zinc-500 hover:text-white mb-8 text-sm transition" {
                        (layout::icon(icons::ARROW_LEFT, "w-4 h-4"))
                        " Back to portfolio"
                    }

                    div class="bg-zinc-900 border border-zinc-800 rounded-2xl p-8 shadow-2xl" {
                        h2 class="text-2xl font-bold text-white mb-2" { "Welcome Back" }
                        p class="text-zinc-500 text-sm mb-6" { "Sign in to manage your projects." }

                        @if let Some(message) = error {
                            (layout::alert(message, "error"))
                        }

                        form class="space-y-4" action="/login" method="POST"
                            onsubmit="this.querySelector('button').disabled = true" {
                            input
                                type="email"
                                name="email"
                                placeholder="Email"
                                autocomplete="email"
                                required
                                value=(email)
                                class="w-full bg-zinc-950 border border-zinc-800 text-white rounded-lg px-4 py-3 focus:ring-2 focus:ring-blue-500 outline-none transition placeholder:text-zinc-600";
                            input
                                type="password"
                                name="password"
                                placeholder="Password"
                                autocomplete="current-password"
                                required
                                class="w-full bg-zinc-950 border border-zinc-800 text-white rounded-lg px-4 py-3 focus:ring-2 focus:ring-blue-500 outline-none transition placeholder:text-zinc-600";
                            button
                                type="submit"
                                class="w-full bg-white text-black font-bold py-3 rounded-lg hover:bg-zinc-200 transition disabled:opacity-50" {
                                "Sign In"
                            }
                        }
                    }
                }
            }
        },
    )
}

/// Handle login form submission
pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), Response> {
    let session = state
        .auth
        .sign_in_with_password(&form.email, &form.password)
        .await
        .map_err(|e| {
            monitoring::record_login(false);
            tracing::info!("Login failed for {}: {}", form.email, e);

            let status = match e.status() {
                Some(code) if code < 500 => StatusCode::UNAUTHORIZED,
                _ => StatusCode::BAD_GATEWAY,
            };
            (status, login_view(&form.email, Some(&e.to_string()))).into_response()
        })?;

    let token = create_session_token(&session).map_err(|e| {
        tracing::error!("Failed to create session token: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session").into_response()
    })?;

    monitoring::record_login(true);
    tracing::info!("User {} logged in", session.email);

    let cookie = create_session_cookie(&token);
    Ok((jar.add(cookie), Redirect::to("/dashboard")))
}

/// Handle logout - end the hosted session, clear the cookie and go home
pub async fn logout_submit(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let claims = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| verify_session_token(cookie.value()).ok());

    if let Some(claims) = claims {
        if let Err(e) = state.auth.sign_out(&claims.access_token).await {
            tracing::warn!("Sign-out at auth service failed for {}: {}", claims.email, e);
        }
    }

    (jar.add(clear_session_cookie()), Redirect::to("/"))
}
