use blog_client::{
    App, ClientError, View,
    config::{ClientConfig, Env},
    models::{AdminArticleQuery, ArticleFilter},
};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Assumed window height when no real viewport exists.
const DEFAULT_INNER_HEIGHT: f64 = 900.0;

/// main
///
/// Bootstraps the client, mounts the path given on the command line (default
/// `/`) and prints the data its view would render as JSON.
#[tokio::main]
async fn main() -> ExitCode {
    // 1. Configuration
    dotenv::dotenv().ok();
    let config = ClientConfig::load();

    // 2. Logging: pretty locally, JSON in production.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "blog_client=debug,reqwest=info".into());
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
    }

    tracing::info!("Client starting in {:?} mode", config.env);

    // 3. Bootstrap and mount
    let mut app = match App::from_config(config) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "bootstrap failed");
            return ExitCode::FAILURE;
        }
    };

    let path = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());
    let Some(route) = app.mount(&path, DEFAULT_INNER_HEIGHT).cloned() else {
        tracing::error!(path = %path, "no route matches");
        return ExitCode::FAILURE;
    };

    // 4. Load the view's data
    match render(&app, route.view, route.id_param()).await {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(route = route.name, error = %e, "view failed to load");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn render(app: &App, view: View, id: Option<i64>) -> Result<serde_json::Value, ClientError> {
    let client = app.view_client();
    let value = match (view, id) {
        (View::Home, _) | (View::ArticleList, _) => {
            let articles = client.list_published_articles(&ArticleFilter::default()).await?;
            let tags = client.list_tags().await?;
            serde_json::json!({ "articles": articles, "tags": tags })
        }
        (View::Article, Some(id)) | (View::AdminWrite, Some(id)) => {
            serde_json::to_value(client.get_article(id).await?)?
        }
        (View::AdminArticles, _) => {
            serde_json::to_value(client.list_articles(&AdminArticleQuery::default()).await?)?
        }
        (View::AdminTags, _) => serde_json::to_value(client.list_tags().await?)?,
        (view, _) => serde_json::json!({ "view": format!("{view:?}") }),
    };
    Ok(value)
}
