use super::{Layout, RouteDef, View};

/// Public Routes
///
/// Reader-facing pages. The login page borrows the home layout.
pub fn public_routes() -> Vec<RouteDef> {
    vec![
        // Landing page: latest published articles and the tag tree.
        RouteDef::view("Home", "/", View::Home, Layout::Home),
        // A single published article.
        RouteDef::view("Article", "/article/:id", View::Article, Layout::Article),
        // Filterable, paginated archive.
        RouteDef::view("ArticleList", "/articles", View::ArticleList, Layout::ArticleList),
        RouteDef::view("Login", "/login", View::Login, Layout::Home),
    ]
}
