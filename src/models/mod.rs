use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

/// A row of the `projects` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tech_stack: Option<String>,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// A project is live when it has a non-empty demo URL.
    pub fn is_live(&self) -> bool {
        non_empty(&self.demo_url).is_some()
    }

    pub fn repo_link(&self) -> Option<&str> {
        non_empty(&self.repo_url)
    }

    pub fn demo_link(&self) -> Option<&str> {
        non_empty(&self.demo_url)
    }

    pub fn status(&self) -> ProjectStatus {
        if self.is_live() {
            ProjectStatus::Live
        } else {
            ProjectStatus::Offline
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    Live,
    Offline,
}

/// Body sent on insert and update. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPayload {
    pub title: String,
    pub description: String,
    pub tech_stack: String,
    pub repo_url: Option<String>,
    pub demo_url: Option<String>,
}

/// Dashboard form state. `editing_id` selects update over insert.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
pub struct ProjectForm {
    #[serde(default)]
    pub editing_id: Option<i64>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(default)]
    pub tech_stack: String,
    #[serde(default)]
    pub repo_url: String,
    #[serde(default)]
    pub demo_url: String,
}

impl ProjectForm {
    /// Prefill the form for editing an existing row.
    pub fn from_project(project: &Project) -> Self {
        ProjectForm {
            editing_id: Some(project.id),
            title: project.title.clone(),
            description: project.description.clone().unwrap_or_default(),
            tech_stack: project.tech_stack.clone().unwrap_or_default(),
            repo_url: project.repo_url.clone().unwrap_or_default(),
            demo_url: project.demo_url.clone().unwrap_or_default(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    /// Validate and build the payload. Blank URLs become `null`.
    pub fn to_payload(&self) -> Result<ProjectPayload, String> {
        let trimmed = ProjectForm {
            editing_id: self.editing_id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            tech_stack: self.tech_stack.trim().to_string(),
            repo_url: self.repo_url.trim().to_string(),
            demo_url: self.demo_url.trim().to_string(),
        };

        trimmed.validate().map_err(|e| first_message(&e))?;

        Ok(ProjectPayload {
            title: trimmed.title,
            description: trimmed.description,
            tech_stack: trimmed.tech_stack,
            repo_url: blank_to_none(trimmed.repo_url),
            demo_url: blank_to_none(trimmed.demo_url),
        })
    }
}

fn blank_to_none(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn first_message(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    ["title", "description"]
        .iter()
        .filter_map(|name| fields.get(*name))
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid project data".to_string())
}

/// Dashboard counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectStats {
    pub total: usize,
    pub live: usize,
    pub offline: usize,
}

impl ProjectStats {
    pub fn from_projects(projects: &[Project]) -> Self {
        projects.iter().fold(ProjectStats::default(), |mut stats, p| {
            stats.total += 1;
            if p.is_live() {
                stats.live += 1;
            } else {
                stats.offline += 1;
            }
            stats
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: i64, demo_url: Option<&str>) -> Project {
        Project {
            id,
            title: format!("Project {}", id),
            description: Some("A thing".to_string()),
            tech_stack: None,
            repo_url: None,
            demo_url: demo_url.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_live_requires_non_empty_demo_url() {
        assert!(project(1, Some("https://demo.example.com")).is_live());
        assert!(!project(2, Some("")).is_live());
        assert!(!project(3, None).is_live());
        assert_eq!(project(3, None).status(), ProjectStatus::Offline);
    }

    #[test]
    fn test_stats_split_live_and_offline() {
        let projects = vec![
            project(1, Some("https://a.example.com")),
            project(2, None),
            project(3, Some("")),
            project(4, Some("https://b.example.com")),
        ];

        let stats = ProjectStats::from_projects(&projects);
        assert_eq!(
            stats,
            ProjectStats {
                total: 4,
                live: 2,
                offline: 2
            }
        );
        assert_eq!(ProjectStats::from_projects(&[]), ProjectStats::default());
    }

    #[test]
    fn test_payload_nulls_blank_urls() {
        let form = ProjectForm {
            title: "Folio".to_string(),
            description: "Portfolio site".to_string(),
            tech_stack: "Rust, axum".to_string(),
            repo_url: "  ".to_string(),
            demo_url: "".to_string(),
            ..Default::default()
        };

        let payload = form.to_payload().unwrap();
        assert_eq!(payload.repo_url, None);
        assert_eq!(payload.demo_url, None);

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["demo_url"].is_null());
    }

    #[test]
    fn test_payload_rejects_blank_title_and_description() {
        let form = ProjectForm {
            title: "   ".to_string(),
            description: "desc".to_string(),
            ..Default::default()
        };
        assert_eq!(form.to_payload().unwrap_err(), "Title is required");

        let form = ProjectForm {
            title: "Title".to_string(),
            description: "".to_string(),
            ..Default::default()
        };
        assert_eq!(form.to_payload().unwrap_err(), "Description is required");
    }

    #[test]
    fn test_form_from_project_prefills_edit_mode() {
        let mut p = project(7, None);
        p.repo_url = Some("https://github.com/me/folio".to_string());

        let form = ProjectForm::from_project(&p);
        assert_eq!(form.editing_id, Some(7));
        assert!(form.is_editing());
        assert_eq!(form.tech_stack, "");
        assert_eq!(form.demo_url, "");
        assert_eq!(form.repo_url, "https://github.com/me/folio");
        assert!(!ProjectForm::default().is_editing());
    }

    #[test]
    fn test_project_deserializes_store_row() {
        let row = serde_json::json!({
            "id": 3,
            "title": "Folio",
            "description": null,
            "tech_stack": "Rust",
            "repo_url": null,
            "demo_url": "https://folio.example.com",
            "created_at": "2024-05-01T10:15:30.123456+00:00"
        });

        let p: Project = serde_json::from_value(row).unwrap();
        assert_eq!(p.id, 3);
        assert!(p.is_live());
        assert_eq!(p.description, None);
    }
}
