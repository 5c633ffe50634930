use std::sync::Arc;

use crate::{
    api::ApiClient,
    auth::{FileTokenStore, TokenState},
    config::ClientConfig,
    error::ClientError,
    routes::{RouteMatch, RouteTable},
    scope::ViewScope,
    viewport::Viewport,
};

/// App
///
/// Application root: the configured API client, the route table, the
/// document viewport properties and the currently mounted view.
///
/// Each mounted view owns a `ViewScope`. Navigating replaces it, which aborts
/// whatever the previous view still had in flight.
pub struct App {
    pub config: ClientConfig,
    pub routes: RouteTable,
    pub viewport: Viewport,
    client: ApiClient,
    current: Option<RouteMatch>,
    scope: ViewScope,
}

impl App {
    /// bootstrap
    ///
    /// Builds the client over the given token storage and installs the route table.
    pub fn bootstrap(config: ClientConfig, tokens: TokenState) -> Result<Self, ClientError> {
        let client = ApiClient::new(config.clone(), tokens)?;
        let routes = RouteTable::new();
        tracing::info!(
            base_url = %config.api_base_url,
            routes = routes.routes().len(),
            "application bootstrapped"
        );
        Ok(Self {
            config,
            routes,
            viewport: Viewport::new(),
            client,
            current: None,
            scope: ViewScope::new(),
        })
    }

    /// Bootstraps with the file-backed token storage named in the config.
    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        let tokens = Arc::new(FileTokenStore::new(config.storage_path.clone())) as TokenState;
        Self::bootstrap(config, tokens)
    }

    /// mount
    ///
    /// Initial render: sets the viewport property and resolves the entry path.
    pub fn mount(&mut self, path: &str, inner_height: f64) -> Option<&RouteMatch> {
        self.viewport.on_load(inner_height);
        self.navigate(path)
    }

    /// navigate
    ///
    /// Resolves `path`. On a match the previous view is unmounted (its scope
    /// cancelled) and the new one becomes current. An unknown path leaves the
    /// current view in place and returns `None`.
    pub fn navigate(&mut self, path: &str) -> Option<&RouteMatch> {
        let Some(matched) = self.routes.resolve(path) else {
            tracing::warn!(path = %path, "no route matches");
            return None;
        };
        tracing::info!(path = %matched.path, route = matched.name, "navigated");

        // Dropping the old scope cancels its in-flight requests.
        self.scope = ViewScope::new();
        self.current = Some(matched);
        self.current.as_ref()
    }

    pub fn current_route(&self) -> Option<&RouteMatch> {
        self.current.as_ref()
    }

    /// Client for the current view; its requests end with the view.
    pub fn view_client(&self) -> ApiClient {
        self.client.scoped(&self.scope)
    }

    /// Client not bound to any view (login, background work).
    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}
