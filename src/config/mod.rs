use once_cell::sync::Lazy;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Settings {
    // App Settings
    pub app_name: String,
    pub version: String,

    // Server Settings
    pub host: String,
    pub port: u16,
    pub static_dir: String,
    pub log_format: LogFormat,

    // Hosted backend Settings
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub projects_table: String,
    pub request_timeout_secs: u64,

    // Session Settings
    pub session_secret: String,
    pub session_cookie_secure: bool,
    /// How long a signed-in operator stays signed in; the hosted access
    /// token is refreshed within this window
    pub session_ttl_secs: i64,

    // Public profile
    pub site_owner: String,
    pub site_tagline: String,
    pub github_url: String,
    pub contact_email: String,
    pub profile_photo_url: String,
}

impl Settings {
    pub fn new() -> Self {
        Settings {
            app_name: get_env("APP_NAME", "Portfolio"),
            version: get_env("VERSION", env!("CARGO_PKG_VERSION")),

            host: get_env("HOST", "0.0.0.0"),
            port: get_env_parsed("PORT", 8080),
            static_dir: get_env("STATIC_DIR", "./public"),
            log_format: match get_env("LOG_FORMAT", "pretty").to_lowercase().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },

            supabase_url: get_env("SUPABASE_URL", "http://localhost:54321")
                .trim_end_matches('/')
                .to_string(),
            supabase_anon_key: get_env("SUPABASE_ANON_KEY", ""),
            projects_table: get_env("PROJECTS_TABLE", "projects"),
            request_timeout_secs: get_env_parsed("REQUEST_TIMEOUT_SECS", 10),

            session_secret: get_env(
                "SESSION_SECRET",
                "change-this-to-a-secure-random-key-in-production",
            ),
            session_cookie_secure: get_env_bool("SESSION_COOKIE_SECURE", false),
            session_ttl_secs: i64::from(get_env_parsed::<u32>("SESSION_TTL_SECS", 7 * 24 * 3600)),

            site_owner: get_env("SITE_OWNER", "Fullstack Developer"),
            site_tagline: get_env(
                "SITE_TAGLINE",
                "I turn complex ideas into fast, elegant and functional web applications.",
            ),
            github_url: get_env("GITHUB_URL", "https://github.com"),
            contact_email: get_env("CONTACT_EMAIL", ""),
            profile_photo_url: get_env("PROFILE_PHOTO_URL", "/assets/profile.jpeg"),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

pub static SETTINGS: Lazy<Settings> = Lazy::new(Settings::new);

pub fn get_settings() -> &'static Settings {
    &SETTINGS
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Unset or out-of-range values fall back to `default`.
fn get_env_parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn get_env_bool(key: &str, default: bool) -> bool {
    get_env_parsed(key, default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_numbers_fall_back_to_default() {
        env::set_var("FOLIO_TEST_PORT_OVERFLOW", "70000");
        assert_eq!(get_env_parsed::<u16>("FOLIO_TEST_PORT_OVERFLOW", 8080), 8080);

        env::set_var("FOLIO_TEST_NEGATIVE_TIMEOUT", "-5");
        assert_eq!(get_env_parsed::<u64>("FOLIO_TEST_NEGATIVE_TIMEOUT", 10), 10);
    }

    #[test]
    fn test_valid_numbers_are_parsed() {
        env::set_var("FOLIO_TEST_PORT_VALID", " 3000 ");
        assert_eq!(get_env_parsed::<u16>("FOLIO_TEST_PORT_VALID", 8080), 3000);
        assert_eq!(get_env_parsed::<u16>("FOLIO_TEST_PORT_UNSET", 8080), 8080);
    }
}
