// --- Module Structure ---

// Content clients (public, admin articles, admin tags) and their shared request funnel.
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod scope;

// UI side: route table, viewport properties and the application root.
pub mod app;
pub mod routes;
pub mod viewport;

// --- Public Re-exports ---

pub use api::{ApiClient, Operation};
pub use app::App;
pub use auth::{FileTokenStore, MemoryTokenStore, TokenState, TokenStore, auth_header};
pub use config::{ClientConfig, Env};
pub use error::ClientError;
pub use routes::{Layout, Route, RouteMatch, RouteTable, View};
pub use scope::ViewScope;
