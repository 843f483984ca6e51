use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use maud::{html, Markup};
use serde::Deserialize;

use crate::auth::SessionCookie;
use crate::backend::BackendError;
use crate::models::{Project, ProjectForm, ProjectStats};
use crate::state::AppState;

use super::components::layout::{self, icons};

const INPUT_CLASS: &str = "w-full bg-zinc-950 border border-zinc-800 text-white text-sm rounded-lg px-4 py-3 focus:ring-1 focus:ring-blue-500 outline-none transition placeholder:text-zinc-600";

/// `?edit=<id>` puts the form in edit mode for that row
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub edit: Option<String>,
}

impl DashboardQuery {
    /// Blank or non-numeric values mean create mode
    fn editing_id(&self) -> Option<i64> {
        self.edit.as_deref().and_then(|v| v.trim().parse().ok())
    }
}

/// Show the dashboard
pub async fn show(
    session: SessionCookie,
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Markup {
    let (projects, error) = match state
        .projects
        .list_projects(Some(session.access_token()))
        .await
    {
        Ok(projects) => (projects, None),
        Err(e) => {
            tracing::warn!("Failed to load projects for dashboard: {}", e);
            (Vec::new(), Some(e.to_string()))
        }
    };

    // An id that is not in the list falls back to create mode
    let form = query
        .editing_id()
        .and_then(|id| projects.iter().find(|p| p.id == id))
        .map(ProjectForm::from_project)
        .unwrap_or_default();

    dashboard_view(session.email(), &projects, &form, error.as_deref())
}

/// Insert a new project, or update the one named by `editing_id`
pub async fn submit(
    session: SessionCookie,
    State(state): State<AppState>,
    Form(form): Form<ProjectForm>,
) -> Result<Redirect, Response> {
    let payload = match form.to_payload() {
        Ok(payload) => payload,
        Err(message) => {
            return Err(
                render_failure(&state, &session, &form, &message, StatusCode::UNPROCESSABLE_ENTITY)
                    .await,
            )
        }
    };

    let token = session.access_token();
    let result = match form.editing_id {
        Some(id) => state.projects.update_project(token, id, &payload).await,
        None => state.projects.insert_project(token, &payload).await,
    };

    if let Err(e) = result {
        tracing::error!("Failed to save project: {}", e);
        return Err(
            render_failure(&state, &session, &form, &e.to_string(), failure_status(&e)).await,
        );
    }

    match form.editing_id {
        Some(id) => tracing::info!(user_id = session.user_id(), "Updated project {}", id),
        None => tracing::info!(
            user_id = session.user_id(),
            "Created project {:?}",
            payload.title
        ),
    }

    Ok(Redirect::to("/dashboard"))
}

/// Delete a project (the browser asks for confirmation first)
pub async fn delete(
    session: SessionCookie,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, Response> {
    if let Err(e) = state
        .projects
        .delete_project(session.access_token(), id)
        .await
    {
        tracing::error!("Failed to delete project {}: {}", id, e);
        return Err(render_failure(
            &state,
            &session,
            &ProjectForm::default(),
            &e.to_string(),
            failure_status(&e),
        )
        .await);
    }

    tracing::info!(user_id = session.user_id(), "Deleted project {}", id);
    Ok(Redirect::to("/dashboard"))
}

fn failure_status(error: &BackendError) -> StatusCode {
    match error.status() {
        Some(code) if (400..500).contains(&code) => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// Re-render the dashboard with the error and the operator's input kept
async fn render_failure(
    state: &AppState,
    session: &SessionCookie,
    form: &ProjectForm,
    message: &str,
    status: StatusCode,
) -> Response {
    let projects = state
        .projects
        .list_projects(Some(session.access_token()))
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to reload projects: {}", e);
            Vec::new()
        });

    (
        status,
        dashboard_view(session.email(), &projects, form, Some(message)),
    )
        .into_response()
}

fn dashboard_view(
    email: &str,
    projects: &[Project],
    form: &ProjectForm,
    error: Option<&str>,
) -> Markup {
    let stats = ProjectStats::from_projects(projects);

    layout::base(
        "Dashboard",
        html! {
            header class="border-b border-zinc-800 bg-zinc-950/50 backdrop-blur-md sticky top-0 z-10" {
                div class="max-w-7xl mx-auto px-4 sm:px-6 h-16 flex justify-between items-center" {
                    div class="flex items-center gap-2 text-white font-bold text-lg" {
                        (layout::icon(icons::DASHBOARD, "w-6 h-6 text-blue-500"))
                        span { "CMS Dashboard" }
                    }
                    div class="flex items-center gap-4" {
                        span class="hidden sm:inline text-sm text-zinc-500" { (email) }
                        form action="/logout" method="POST" {
                            button type="submit"
                                class="text-zinc-400 hover:text-red-400 text-sm flex items-center gap-2 transition px-3 py-2 rounded-md hover:bg-zinc-900" {
                                (layout::icon(icons::LOGOUT, "w-4 h-4"))
                                span class="hidden sm:inline" { "Logout" }
                            }
                        }
                    }
                }
            }

            (layout::container(html! {
                @if let Some(message) = error {
                    (layout::alert(message, "error"))
                }

                div class="grid grid-cols-1 md:grid-cols-3 gap-4 mb-8" {
                    (layout::stat_card("Total Projects", stats.total, "text-white",
                        layout::icon(icons::LAYERS, "w-6 h-6 text-blue-500")))
                    (layout::stat_card("Online / Live", stats.live, "text-emerald-400",
                        layout::icon(icons::GLOBE, "w-6 h-6 text-emerald-500")))
                    (layout::stat_card("Offline / Local", stats.offline, "text-amber-400",
                        layout::icon(icons::LOCK, "w-6 h-6 text-amber-500")))
                }

                div class="grid grid-cols-1 lg:grid-cols-3 gap-8" {
                    div class="lg:col-span-1" {
                        (project_form(form))
                    }
                    div class="lg:col-span-2" {
                        (projects_table(projects, form.editing_id))
                    }
                }
            }))
        },
    )
}

fn project_form(form: &ProjectForm) -> Markup {
    let editing = form.is_editing();
    let border = if editing { "border-amber-500/50" } else { "border-zinc-800" };
    let button_color = if editing {
        "bg-amber-600 hover:bg-amber-500"
    } else {
        "bg-blue-600 hover:bg-blue-500"
    };

    html! {
        div class=(format!("bg-zinc-900 border {} rounded-xl p-6 sticky top-24", border)) {
            div class="flex justify-between items-center mb-6" {
                @if editing {
                    h2 class="text-lg font-semibold flex items-center gap-2 text-amber-400" {
                        (layout::icon(icons::PENCIL, "w-4 h-4"))
                        " Edit Project"
                    }
                    a href="/dashboard"
                        class="text-xs text-zinc-400 hover:text-white flex items-center gap-1 bg-zinc-800 px-2 py-1 rounded" {
                        (layout::icon(icons::X, "w-3 h-3"))
                        " Cancel"
                    }
                } @else {
                    h2 class="text-lg font-semibold flex items-center gap-2 text-white" {
                        (layout::icon(icons::PLUS, "w-4 h-4 text-blue-500"))
                        " Add Project"
                    }
                }
            }

            form action="/dashboard/projects" method="POST" class="space-y-4"
                onsubmit="this.querySelector('button[type=submit]').disabled = true" {
                @if let Some(id) = form.editing_id {
                    input type="hidden" name="editing_id" value=(id);
                }
                div {
                    label for="title" class="block text-xs font-medium text-zinc-500 mb-1.5" { "Project Title" }
                    input id="title" name="title" required value=(form.title)
                        class=(INPUT_CLASS) placeholder="App name...";
                }
                div {
                    label for="description" class="block text-xs font-medium text-zinc-500 mb-1.5" { "Description" }
                    textarea id="description" name="description" required rows="3"
                        class=(INPUT_CLASS) placeholder="Short description..." {
                        (form.description)
                    }
                }
                div {
                    label for="tech_stack" class="block text-xs font-medium text-zinc-500 mb-1.5" { "Tech Stack" }
                    input id="tech_stack" name="tech_stack" value=(form.tech_stack)
                        class=(INPUT_CLASS) placeholder="Rust, axum...";
                }
                div class="grid grid-cols-2 gap-3" {
                    div {
                        label for="repo_url" class="block text-xs font-medium text-zinc-500 mb-1.5" { "GitHub URL" }
                        input id="repo_url" name="repo_url" value=(form.repo_url)
                            class=(INPUT_CLASS) placeholder="https://...";
                    }
                    div {
                        label for="demo_url" class="block text-xs font-medium text-zinc-500 mb-1.5" { "Demo URL" }
                        input id="demo_url" name="demo_url" value=(form.demo_url)
                            class=(INPUT_CLASS) placeholder="Empty = Offline";
                    }
                }
                button type="submit"
                    class=(format!("w-full mt-4 text-white text-sm font-medium py-2.5 rounded-lg transition flex items-center justify-center gap-2 disabled:opacity-50 {}", button_color)) {
                    (layout::icon(icons::SAVE, "w-4 h-4"))
                    @if editing { " Update Project" } @else { " Publish Project" }
                }
            }
        }
    }
}

fn projects_table(projects: &[Project], editing_id: Option<i64>) -> Markup {
    html! {
        div class="bg-zinc-900 border border-zinc-800 rounded-xl overflow-hidden" {
            div class="p-6 border-b border-zinc-800 flex justify-between items-center" {
                h2 class="text-lg font-semibold text-white" { "Project List" }
                span class="text-xs text-zinc-500 bg-zinc-950 px-2 py-1 rounded border border-zinc-800" {
                    (projects.len()) " Items"
                }
            }

            @if projects.is_empty() {
                div class="p-8 text-center text-zinc-500 italic" { "No projects yet." }
            } @else {
                div class="overflow-x-auto" {
                    table class="w-full text-left border-collapse" {
                        thead {
                            tr class="bg-zinc-950/50 text-xs text-zinc-500 border-b border-zinc-800 uppercase tracking-wider" {
                                th class="px-6 py-3 font-medium" { "Project Name" }
                                th class="px-6 py-3 font-medium" { "Status" }
                                th class="px-6 py-3 font-medium text-right" { "Action" }
                            }
                        }
                        tbody class="divide-y divide-zinc-800" {
                            @for item in projects {
                                @let row_class = if editing_id == Some(item.id) {
                                    "bg-amber-500/10 border-l-2 border-amber-500"
                                } else {
                                    "hover:bg-zinc-800/50"
                                };
                                tr class=(row_class) data-project-id=(item.id) {
                                    td class="px-6 py-4" {
                                        p class="text-sm font-medium text-white" { (item.title) }
                                        p class="text-xs text-zinc-500 truncate max-w-[200px]" {
                                            (item.tech_stack.as_deref().unwrap_or_default())
                                        }
                                    }
                                    td class="px-6 py-4" {
                                        (layout::status_badge(item.status()))
                                    }
                                    td class="px-6 py-4 text-right flex justify-end gap-2" {
                                        a href=(format!("/dashboard?edit={}", item.id))
                                            class="p-2 text-zinc-400 hover:text-amber-400 hover:bg-amber-400/10 rounded-lg transition"
                                            title="Edit Project" {
                                            (layout::icon(icons::PENCIL, "w-4 h-4"))
                                        }
                                        form action=(format!("/dashboard/projects/{}/delete", item.id)) method="POST" class="inline" {
                                            button type="submit"
                                                class="p-2 text-zinc-400 hover:text-red-400 hover:bg-red-400/10 rounded-lg transition"
                                                title="Delete Project"
                                                onclick="return confirm('Are you sure you want to delete this project?')" {
                                                (layout::icon(icons::TRASH, "w-4 h-4"))
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
