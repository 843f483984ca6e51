pub mod auth;
pub mod components;
pub mod dashboard;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{Datelike, Utc};
use maud::{html, Markup};
use serde::Serialize;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::auth::session;
use crate::config;
use crate::models::Project;
use crate::monitoring;
use crate::state::AppState;
use components::layout::{self, icons};

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let settings = config::get_settings();

    // Guarded pages renew the hosted access token before the session check
    let dashboard_routes = Router::new()
        .route("/dashboard", get(dashboard::show))
        .route("/dashboard/projects", post(dashboard::submit))
        .route("/dashboard/projects/:id/delete", post(dashboard::delete))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::refresh_session,
        ));

    Router::new()
        .route("/", get(home))
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/logout", post(auth::logout_submit))
        .merge(dashboard_routes)
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .nest_service("/assets", ServeDir::new(&settings.static_dir))
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Public portfolio page. A failed fetch renders an empty list.
pub async fn home(State(state): State<AppState>) -> Markup {
    let projects = match state.projects.list_projects(None).await {
        Ok(projects) => projects,
        Err(e) => {
            tracing::warn!("Failed to load projects for home page: {}", e);
            Vec::new()
        }
    };

    let settings = config::get_settings();

    layout::base(
        "Home",
        html! {
            nav class="fixed top-0 w-full z-50 bg-zinc-950/80 backdrop-blur-xl border-b border-zinc-800/50" {
                div class="max-w-6xl mx-auto px-4 sm:px-6 h-16 flex items-center" {
                    div class="flex items-center gap-2 font-bold text-xl tracking-tight text-white" {
                        (layout::icon(icons::TERMINAL, "w-6 h-6 text-blue-500"))
                        span { (settings.app_name) span class="text-blue-500" { "." } }
                    }
                }
            }

            main class="max-w-6xl mx-auto px-4 sm:px-6 pt-32 pb-24" {
                // Hero
                section class="flex flex-col-reverse md:flex-row items-center gap-10 md:gap-20 mb-32" {
                    div class="flex-1 text-center md:text-left" {
                        h1 class="text-4xl sm:text-5xl lg:text-7xl font-extrabold text-white tracking-tight mb-6 leading-tight" {
                            "Building digital solutions "
                            span class="bg-clip-text text-transparent bg-gradient-to-r from-blue-400 to-emerald-400" {
                                "that make an impact."
                            }
                        }
                        p class="text-lg sm:text-xl text-zinc-400 max-w-2xl leading-relaxed mb-8 mx-auto md:mx-0" {
                            "Hi! I'm a " b { (settings.site_owner) } ". " (settings.site_tagline)
                        }
                        div class="flex flex-col sm:flex-row items-center justify-center md:justify-start gap-4" {
                            a href="#projects" class="flex items-center gap-2 bg-white text-zinc-950 px-6 py-3 rounded-full font-bold hover:bg-zinc-200 transition" {
                                "View Projects "
                                (layout::icon(icons::ARROW_RIGHT, "w-4 h-4"))
                            }
                            div class="flex gap-3" {
                                a href=(settings.github_url) target="_blank" rel="noopener noreferrer"
                                    class="p-3 rounded-full bg-zinc-900 border border-zinc-800 hover:text-white transition text-zinc-400"
                                    title="GitHub" {
                                    (layout::icon(icons::CODE, "w-5 h-5"))
                                }
                                @if !settings.contact_email.is_empty() {
                                    a href=(format!("mailto:{}", settings.contact_email))
                                        class="p-3 rounded-full bg-zinc-900 border border-zinc-800 hover:text-white transition text-zinc-400"
                                        title="Email" {
                                        (layout::icon(icons::MAIL, "w-5 h-5"))
                                    }
                                }
                            }
                        }
                    }
                    div class="flex-1 flex justify-center md:justify-end w-full max-w-xs md:max-w-md" {
                        div class="rounded-3xl border-2 border-zinc-800/80 p-2 bg-zinc-950/50 rotate-3 hover:rotate-0 transition-all duration-500" {
                            img src=(settings.profile_photo_url) alt="Profile"
                                class="rounded-2xl w-full h-auto object-cover aspect-square grayscale hover:grayscale-0 transition-all duration-500";
                        }
                    }
                }

                section id="projects" class="scroll-mt-20" {
                    h2 class="text-3xl font-bold text-white tracking-tight mb-12" { "Featured Projects" }
                    div class="grid grid-cols-1 md:grid-cols-2 gap-6 lg:gap-8" {
                        @for project in &projects {
                            (project_card(project))
                        }
                    }
                }
            }

            footer class="border-t border-zinc-800/50 py-10 text-center text-zinc-500 text-sm" {
                p { "© " (Utc::now().year()) " " (settings.site_owner) "." }
                p { "Built with Rust, axum and Supabase." }
            }
        },
    )
}

fn project_card(project: &Project) -> Markup {
    let tech = project
        .tech_stack
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or("Tech");

    html! {
        article class="group bg-zinc-900/40 border border-zinc-800/80 rounded-3xl hover:border-blue-500/50 transition-all duration-300 flex flex-col" {
            div class="p-6 sm:p-8 flex-1 flex flex-col" {
                div class="flex flex-col gap-3 mb-4" {
                    span class="text-[10px] uppercase tracking-wider font-mono text-blue-400 bg-blue-950/50 px-3 py-1 rounded-full border border-blue-800/50 w-fit" {
                        (tech)
                    }
                    h3 class="text-2xl font-bold text-zinc-100 group-hover:text-blue-400 transition leading-tight" {
                        (project.title)
                    }
                }
                p class="text-zinc-400 leading-relaxed mb-6 line-clamp-3 flex-1" {
                    (project.description.as_deref().unwrap_or_default())
                }
                div class="flex items-center gap-4 pt-6 border-t border-zinc-800/50 mt-auto" {
                    @if let Some(repo) = project.repo_link() {
                        a href=(repo) target="_blank" rel="noopener noreferrer"
                            class="flex items-center gap-2 text-sm font-medium text-zinc-400 hover:text-white transition bg-zinc-950/50 px-4 py-2 rounded-full border border-zinc-800" {
                            (layout::icon(icons::CODE, "w-4 h-4"))
                            " Code"
                        }
                    }
                    @if let Some(demo) = project.demo_link() {
                        a href=(demo) target="_blank" rel="noopener noreferrer"
                            class="flex items-center gap-2 text-sm font-bold text-emerald-50 bg-emerald-600/20 px-4 py-2 rounded-full border border-emerald-500/30 hover:bg-emerald-600/30 transition ml-auto" {
                            (layout::icon(icons::EXTERNAL, "w-4 h-4"))
                            " Live Demo"
                        }
                    } @else {
                        span class="flex items-center gap-2 text-sm text-zinc-500 bg-zinc-950 px-4 py-2 rounded-full border border-zinc-900 cursor-not-allowed ml-auto font-medium" {
                            (layout::icon(icons::LOCK, "w-4 h-4"))
                            " Offline Project"
                        }
                    }
                }
            }
        }
    }
}

/// 404 Not Found page
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        layout::base(
            "404 Not Found",
            html! {
                div class="min-h-screen flex items-center justify-center" {
                    div class="text-center" {
                        h1 class="text-6xl font-bold text-white mb-4" { "404" }
                        p class="text-xl text-zinc-400 mb-8" { "Page not found" }
                        a href="/" class="text-blue-400 hover:text-blue-300 underline" {
                            "Go back home"
                        }
                    }
                }
            },
        ),
    )
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub git_hash: String,
    pub git_date: String,
    pub build_timestamp: String,
}

pub async fn health_handler() -> Json<HealthResponse> {
    let settings = config::get_settings();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: settings.version.clone(),
        git_hash: env!("GIT_HASH").to_string(),
        git_date: env!("GIT_DATE").to_string(),
        build_timestamp: env!("BUILD_TIMESTAMP").to_string(),
    })
}

pub async fn metrics_handler() -> Result<String, StatusCode> {
    monitoring::gather_text().map_err(|e| {
        tracing::error!("Failed to encode metrics: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
