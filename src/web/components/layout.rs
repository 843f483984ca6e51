use maud::{html, Markup, DOCTYPE};

use crate::config;
use crate::models::ProjectStatus;

/// Base HTML layout with Tailwind CSS
pub fn base(title: &str, content: Markup) -> Markup {
    let settings = config::get_settings();

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " - " (settings.app_name) }

                // Tailwind CSS (using CDN for now, can switch to build later)
                script src="https://cdn.tailwindcss.com" {}
            }
            body class="bg-zinc-950 text-zinc-200 font-sans min-h-screen" {
                (content)
            }
        }
    }
}

/// Container for main content
pub fn container(content: Markup) -> Markup {
    html! {
        main class="max-w-7xl mx-auto px-4 sm:px-6 py-8" {
            (content)
        }
    }
}

/// Alert message component
pub fn alert(message: &str, alert_type: &str) -> Markup {
    let classes = match alert_type {
        "success" => "bg-emerald-500/10 text-emerald-400 border-emerald-500/30",
        "error" => "bg-red-500/10 text-red-400 border-red-500/30",
        "warning" => "bg-amber-500/10 text-amber-400 border-amber-500/30",
        _ => "bg-blue-500/10 text-blue-400 border-blue-500/30",
    };

    html! {
        div class=(format!("rounded-lg px-4 py-3 mb-4 border text-sm {}", classes)) role="alert" {
            (message)
        }
    }
}

/// Counter card on the dashboard
pub fn stat_card(label: &str, value: usize, value_class: &str, icon: Markup) -> Markup {
    html! {
        div class="bg-zinc-900/50 border border-zinc-800 p-5 rounded-xl flex items-center justify-between" {
            div {
                p class="text-zinc-500 text-xs font-medium uppercase tracking-wider" { (label) }
                h3 class=(format!("text-3xl font-bold mt-1 {}", value_class)) { (value) }
            }
            div class="p-3 bg-zinc-800/50 rounded-lg" { (icon) }
        }
    }
}

pub fn status_badge(status: ProjectStatus) -> Markup {
    match status {
        ProjectStatus::Live => html! {
            span class="inline-flex items-center gap-1.5 px-2.5 py-1 rounded-full text-xs font-medium bg-emerald-500/10 text-emerald-500 border border-emerald-500/20" {
                span class="w-1.5 h-1.5 rounded-full bg-emerald-500" {}
                " Live"
            }
        },
        ProjectStatus::Offline => html! {
            span class="inline-flex items-center gap-1.5 px-2.5 py-1 rounded-full text-xs font-medium bg-zinc-800 text-zinc-400 border border-zinc-700" {
                span class="w-1.5 h-1.5 rounded-full bg-zinc-500" {}
                " Offline"
            }
        },
    }
}

/// Stroke icon in the 24x24 outline style
pub fn icon(path: &str, classes: &str) -> Markup {
    html! {
        svg class=(classes) xmlns="http://www.w3.org/2000/svg" fill="none" stroke="currentColor" stroke-width="2" viewBox="0 0 24 24" {
            path stroke-linecap="round" stroke-linejoin="round" d=(path) {}
        }
    }
}

pub mod icons {
    pub const TERMINAL: &str = "M4 17l6-6-6-6M12 19h8";
    pub const LAYERS: &str = "M12 2L2 7l10 5 10-5-10-5zM2 17l10 5 10-5M2 12l10 5 10-5";
    pub const GLOBE: &str = "M12 21a9 9 0 100-18 9 9 0 000 18zM3.6 9h16.8M3.6 15h16.8M12 3a15 15 0 010 18M12 3a15 15 0 000 18";
    pub const LOCK: &str = "M5 11h14v10H5zM8 11V7a4 4 0 118 0v4";
    pub const PLUS: &str = "M12 4v16m8-8H4";
    pub const PENCIL: &str = "M15.2 5.2l3.6 3.6M4 20h4L19 9a2.5 2.5 0 00-3.6-3.6L4 16v4z";
    pub const TRASH: &str = "M3 6h18M8 6V4h8v2M19 6l-1 14H6L5 6";
    pub const EXTERNAL: &str = "M14 3h7v7M10 14L21 3M19 14v5a2 2 0 01-2 2H5a2 2 0 01-2-2V7a2 2 0 012-2h5";
    pub const CODE: &str = "M16 18l6-6-6-6M8 6l-6 6 6 6";
    pub const MAIL: &str = "M4 4h16v16H4zM4 6l8 7 8-7";
    pub const LOGOUT: &str = "M9 21H5a2 2 0 01-2-2V5a2 2 0 012-2h4M16 17l5-5-5-5M21 12H9";
    pub const ARROW_LEFT: &str = "M19 12H5M12 19l-7-7 7-7";
    pub const ARROW_RIGHT: &str = "M5 12h14M12 5l7 7-7 7";
    pub const SAVE: &str = "M19 21H5a2 2 0 01-2-2V5a2 2 0 012-2h11l5 5v11a2 2 0 01-2 2zM17 21v-8H7v8M7 3v5h8";
    pub const DASHBOARD: &str = "M3 3h7v9H3zM14 3h7v5h-7zM14 12h7v9h-7zM3 16h7v5H3z";
    pub const X: &str = "M18 6L6 18M6 6l12 12";
}
