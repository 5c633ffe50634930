/// Route Table Module Index
///
/// UI routes are split the same way the API is:
/// - `public`: reader-facing pages and the login page.
/// - `admin`: the editor pages, nested under `/admin` with a shared layout.
///
/// The table is static. `RouteTable::resolve` matches a path segment by
/// segment, extracts `:name` parameters and follows redirects.
pub mod admin;
pub mod public;

use std::collections::HashMap;

/// Upper bound on chained redirects before a path is treated as unroutable.
const MAX_REDIRECTS: usize = 4;

/// View
///
/// The page component a route renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Article,
    ArticleList,
    Login,
    AdminWrite,
    AdminArticles,
    AdminTags,
}

/// Layout
///
/// Layout category applied around the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Home,
    Article,
    ArticleList,
    Admin,
}

impl Layout {
    /// Class name used by the page shell.
    pub fn class_name(&self) -> &'static str {
        match self {
            Layout::Home => "home",
            Layout::Article => "article",
            Layout::ArticleList => "articleList",
            Layout::Admin => "admin",
        }
    }
}

/// Target
///
/// What a matched route does: render a view or send the reader elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    View(View),
    Redirect(String),
}

/// RouteDef
///
/// One declarative entry of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDef {
    pub name: &'static str,
    pub pattern: String,
    pub target: Target,
    pub layout: Layout,
}

impl RouteDef {
    pub fn view(name: &'static str, pattern: &str, view: View, layout: Layout) -> Self {
        Self {
            name,
            pattern: pattern.to_string(),
            target: Target::View(view),
            layout,
        }
    }

    pub fn redirect(name: &'static str, pattern: &str, to: &str, layout: Layout) -> Self {
        Self {
            name,
            pattern: pattern.to_string(),
            target: Target::Redirect(to.to_string()),
            layout,
        }
    }

    /// Extracts parameters if `segments` fit this pattern exactly.
    fn matches(&self, segments: &[&str]) -> Option<HashMap<String, String>> {
        let pattern = split_segments(&self.pattern);
        if pattern.len() != segments.len() {
            return None;
        }
        let mut params = HashMap::new();
        for (expected, actual) in pattern.iter().zip(segments) {
            match expected.strip_prefix(':') {
                Some(name) => {
                    params.insert(name.to_string(), (*actual).to_string());
                }
                None if expected == actual => {}
                None => return None,
            }
        }
        Some(params)
    }
}

/// RouteMatch
///
/// Result of resolving a path: the final (post-redirect) path, the route
/// that rendered it and its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
    pub name: &'static str,
    pub path: String,
    pub view: View,
    pub layout: Layout,
    pub params: HashMap<String, String>,
}

impl RouteMatch {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// The numeric `:id` parameter (article id or article being edited).
    pub fn id_param(&self) -> Option<i64> {
        self.param("id").and_then(|id| id.parse().ok())
    }
}

/// RouteTable
///
/// Ordered list of route definitions. First match wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<RouteDef>,
}

impl RouteTable {
    /// new
    ///
    /// The application's route table: public pages plus the admin section.
    pub fn new() -> Self {
        Self::default()
            .merge(public::public_routes())
            .nest("/admin", Layout::Admin, admin::admin_routes())
    }

    pub fn merge(mut self, routes: Vec<RouteDef>) -> Self {
        self.routes.extend(routes);
        self
    }

    /// nest
    ///
    /// Mounts `children` under `prefix`, forcing `layout` on all of them.
    /// A child with an empty pattern matches the prefix itself; relative
    /// redirect targets are resolved against the prefix.
    pub fn nest(mut self, prefix: &str, layout: Layout, children: Vec<RouteDef>) -> Self {
        let prefix = prefix.trim_end_matches('/');
        for child in children {
            let pattern = join_path(prefix, &child.pattern);
            let target = match child.target {
                Target::Redirect(to) if !to.starts_with('/') => {
                    Target::Redirect(join_path(prefix, &to))
                }
                other => other,
            };
            self.routes.push(RouteDef {
                name: child.name,
                pattern,
                target,
                layout,
            });
        }
        self
    }

    pub fn routes(&self) -> &[RouteDef] {
        &self.routes
    }

    /// resolve
    ///
    /// Query string, fragment and a trailing slash are ignored.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let mut current = normalize(path);
        for _ in 0..=MAX_REDIRECTS {
            let segments = split_segments(&current);
            let (route, params) = self
                .routes
                .iter()
                .find_map(|route| route.matches(&segments).map(|params| (route, params)))?;
            match &route.target {
                Target::View(view) => {
                    return Some(RouteMatch {
                        name: route.name,
                        path: current,
                        view: *view,
                        layout: route.layout,
                        params,
                    });
                }
                Target::Redirect(to) => {
                    tracing::debug!(from = %current, to = %to, "route redirect");
                    current = normalize(to);
                }
            }
        }
        tracing::warn!(path = %path, "redirect chain too long");
        None
    }
}

/// Route
///
/// Typed form of every routable page, used to build links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Article { id: i64 },
    ArticleList,
    Login,
    Admin,
    AdminWrite,
    AdminEdit { id: i64 },
    AdminArticles,
    AdminTags,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Article { id } => format!("/article/{id}"),
            Route::ArticleList => "/articles".to_string(),
            Route::Login => "/login".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::AdminWrite => "/admin/write".to_string(),
            Route::AdminEdit { id } => format!("/admin/write/{id}"),
            Route::AdminArticles => "/admin/articles".to_string(),
            Route::AdminTags => "/admin/tags".to_string(),
        }
    }
}

fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments = split_segments(path);
    format!("/{}", segments.join("/"))
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

fn join_path(prefix: &str, child: &str) -> String {
    let child = child.trim_start_matches('/');
    if child.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix}/{child}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_query_fragment_and_slashes() {
        assert_eq!(normalize("/articles/?page=2#top"), "/articles");
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("//admin//tags"), "/admin/tags");
    }

    #[test]
    fn nest_prefixes_patterns_and_relative_redirects() {
        let table = RouteTable::default().nest(
            "/admin",
            Layout::Admin,
            vec![
                RouteDef::redirect("Admin", "", "write", Layout::Home),
                RouteDef::view("AdminWrite", "write", View::AdminWrite, Layout::Home),
            ],
        );
        assert_eq!(table.routes()[0].pattern, "/admin");
        assert_eq!(
            table.routes()[0].target,
            Target::Redirect("/admin/write".to_string())
        );
        assert_eq!(table.routes()[1].layout, Layout::Admin);
    }

    #[test]
    fn redirect_loop_is_unroutable() {
        let table = RouteTable::default().merge(vec![
            RouteDef::redirect("A", "/a", "/b", Layout::Home),
            RouteDef::redirect("B", "/b", "/a", Layout::Home),
        ]);
        assert!(table.resolve("/a").is_none());
    }
}
