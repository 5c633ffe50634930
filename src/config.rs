use std::{env, path::PathBuf, time::Duration};

/// Key under which the bearer token lives in persistent client storage.
pub const TOKEN_KEY: &str = "token";

/// ClientConfig
///
/// Holds the client's entire configuration state. Loaded once at startup and
/// cloned into the API client and the application bootstrap.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    // Origin of the blog backend. All `/api` and `/uploads` paths are resolved against it.
    pub api_base_url: String,
    // File backing the persistent key/value storage that holds the auth token.
    pub storage_path: PathBuf,
    // Upper bound for a single request round-trip.
    pub request_timeout: Duration,
    // Runtime environment marker. Controls log format and proxy behaviour.
    pub env: Env,
}

/// Env
///
/// Local runs talk straight to a backend on localhost; production requires an
/// explicitly configured backend origin.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for ClientConfig {
    /// default
    ///
    /// Safe, non-panicking values for tests. Points at the local backend port.
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            storage_path: PathBuf::from(".blog-client/storage.json"),
            request_timeout: Duration::from_secs(30),
            env: Env::Local,
        }
    }
}

impl ClientConfig {
    /// load
    ///
    /// Reads all parameters from environment variables.
    ///
    /// # Panics
    /// Panics in production when `BLOG_API_BASE_URL` is not set, so a deployed
    /// client never silently talks to localhost.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let api_base_url = match env {
            Env::Production => env::var("BLOG_API_BASE_URL")
                .expect("FATAL: BLOG_API_BASE_URL must be set in production."),
            Env::Local => env::var("BLOG_API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        };

        let storage_path = env::var("BLOG_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".blog-client/storage.json"));

        // Unparsable values fall back to the default rather than aborting startup.
        let request_timeout = env::var("BLOG_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|secs| secs.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        Self {
            api_base_url,
            storage_path,
            request_timeout,
            env,
        }
    }

    /// Joins an absolute path (`/api/...`) onto the configured origin.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url.trim_end_matches('/'), path)
    }

    /// resolve_asset_url
    ///
    /// Uploaded images come back as server-relative paths (`/uploads/...`).
    /// Absolute urls are returned untouched.
    pub fn resolve_asset_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            self.endpoint(url)
        } else {
            self.endpoint(&format!("/{url}"))
        }
    }
}
