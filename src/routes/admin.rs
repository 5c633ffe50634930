use super::{Layout, RouteDef, View};

/// Admin Routes
///
/// Editor pages, mounted under `/admin` by `RouteTable::nest`, which also
/// applies the shared admin layout. Patterns here are relative to the prefix.
pub fn admin_routes() -> Vec<RouteDef> {
    vec![
        // Bare /admin lands on the editor.
        RouteDef::redirect("Admin", "", "write", Layout::Admin),
        // New article.
        RouteDef::view("AdminWrite", "write", View::AdminWrite, Layout::Admin),
        // Edit an existing article; `:id` is the article being edited.
        RouteDef::view("AdminEdit", "write/:id", View::AdminWrite, Layout::Admin),
        RouteDef::view("AdminArticles", "articles", View::AdminArticles, Layout::Admin),
        RouteDef::view("AdminTags", "tags", View::AdminTags, Layout::Admin),
    ]
}
