/// API Client Module Index
///
/// The content clients are split by access level, the same way the backend
/// splits its routers:
/// - `public`: anonymous read access (published articles, tag hierarchy).
/// - `admin`: article management, bearer token required.
/// - `tags`: tag taxonomy management, bearer token required.
///
/// All three are `impl` blocks on `ApiClient` and share one request funnel.
pub mod admin;
pub mod public;
pub mod tags;

use reqwest::{
    Client, Method, RequestBuilder, Response, StatusCode, Url,
    header::{HeaderName, HeaderValue},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{fmt, future::Future};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    auth::{self, TokenState},
    config::{ClientConfig, Env},
    error::ClientError,
    scope::{ScopeToken, ViewScope},
};

/// Header used to correlate client and backend log lines.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Operation
///
/// Every backend call the client makes. Each carries the message shown when
/// the backend fails without saying why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListPublishedArticles,
    ListTags,
    ListArticles,
    GetArticle,
    CreateArticle,
    UpdateArticle,
    DeleteArticle,
    UploadArticleImage,
    CreateTag,
    UpdateTag,
    DeleteTag,
}

/// Message for a 409 on tag deletion when the body has none.
pub const TAG_IN_USE_MESSAGE: &str = "该标签仍有文章在使用，无法删除";

impl Operation {
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Operation::ListPublishedArticles => "加载文章失败",
            Operation::ListTags => "获取标签失败",
            Operation::ListArticles => "获取文章列表失败",
            Operation::GetArticle => "获取文章失败",
            Operation::CreateArticle => "创建文章失败",
            Operation::UpdateArticle => "更新文章失败",
            Operation::DeleteArticle => "删除文章失败",
            Operation::UploadArticleImage => "图片上传失败",
            Operation::CreateTag => "创建标签失败",
            Operation::UpdateTag => "更新标签失败",
            Operation::DeleteTag => "删除标签失败",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::ListPublishedArticles => "list_published_articles",
            Operation::ListTags => "list_tags",
            Operation::ListArticles => "list_articles",
            Operation::GetArticle => "get_article",
            Operation::CreateArticle => "create_article",
            Operation::UpdateArticle => "update_article",
            Operation::DeleteArticle => "delete_article",
            Operation::UploadArticleImage => "upload_article_image",
            Operation::CreateTag => "create_tag",
            Operation::UpdateTag => "update_tag",
            Operation::DeleteTag => "delete_tag",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// ApiClient
///
/// Thin HTTP client for the blog backend. Cloning is cheap (the reqwest pool
/// and token storage are shared). A clone produced by `scoped` aborts its
/// requests when the given view scope ends.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    tokens: TokenState,
    scope: Option<ScopeToken>,
}

impl ApiClient {
    /// new
    ///
    /// Local runs bypass any system proxy so requests reach the backend on
    /// localhost directly.
    pub fn new(config: ClientConfig, tokens: TokenState) -> Result<Self, ClientError> {
        Url::parse(&config.api_base_url).map_err(|e| {
            ClientError::Config(format!("invalid base url {}: {e}", config.api_base_url))
        })?;

        let mut builder = Client::builder().timeout(config.request_timeout);
        if config.env == Env::Local {
            builder = builder.no_proxy();
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self {
            http,
            config,
            tokens,
            scope: None,
        })
    }

    /// Returns a client whose requests are tied to `scope`.
    pub fn scoped(&self, scope: &ViewScope) -> Self {
        Self {
            scope: Some(scope.token()),
            ..self.clone()
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenState {
        &self.tokens
    }

    /// Builds the absolute url for `path`, appending only the given pairs.
    /// No pairs means no `?` at all.
    fn url(&self, path: &str, query: &[(&'static str, String)]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.config.endpoint(path))
            .map_err(|e| ClientError::Config(format!("invalid endpoint {path}: {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Starts an authenticated request. Fails before touching the network
    /// when no token is stored.
    async fn authed(&self, method: Method, url: Url) -> Result<RequestBuilder, ClientError> {
        let headers = auth::auth_header(self.tokens.as_ref()).await?;
        Ok(self.request(method, url).headers(headers))
    }

    /// dispatch
    ///
    /// The single exit point to the network: stamps a request id, sends, and
    /// hands the response to `handle`. The whole exchange, body read and
    /// decode included, is raced against the view scope.
    async fn dispatch<T, F, Fut>(
        &self,
        operation: Operation,
        request: RequestBuilder,
        handle: F,
    ) -> Result<T, ClientError>
    where
        F: FnOnce(Response) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        if self.scope.as_ref().is_some_and(ScopeToken::is_cancelled) {
            return Err(ClientError::Cancelled);
        }

        let request_id = Uuid::new_v4().to_string();
        let request = request
            .header(
                HeaderName::from_static(REQUEST_ID_HEADER),
                HeaderValue::from_str(&request_id)
                    .map_err(|e| ClientError::Config(e.to_string()))?,
            )
            .build()?;

        let span = tracing::info_span!(
            "api_request",
            operation = %operation,
            method = %request.method(),
            url = %request.url(),
            req_id = %request_id,
        );

        async move {
            let exchange = async {
                tracing::debug!("sending request");
                let response = self.http.execute(request).await.map_err(|e| {
                    tracing::warn!(error = %e, "request failed before a response");
                    ClientError::Transport(e)
                })?;
                tracing::debug!(status = %response.status(), "response received");
                handle(response).await
            };

            match &self.scope {
                Some(scope) => tokio::select! {
                    result = exchange => result,
                    _ = scope.cancelled() => {
                        tracing::debug!("view scope ended, request aborted");
                        Err(ClientError::Cancelled)
                    }
                },
                None => exchange.await,
            }
        }
        .instrument(span)
        .await
    }
}

/// Reads the body as JSON. Anything unparsable (including an empty body)
/// becomes an empty object. A body that breaks off mid-stream is folded the
/// same way on a failure status; on success it is a transport error.
async fn read_body(response: Response) -> Result<(StatusCode, Value), ClientError> {
    let status = response.status();
    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) if !status.is_success() => {
            tracing::debug!(error = %e, "error body unreadable");
            Default::default()
        }
        Err(e) => return Err(ClientError::Transport(e)),
    };
    let body = serde_json::from_slice::<Value>(&bytes).unwrap_or_else(|_| empty_object());
    Ok((status, body))
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// `body.error || body.message || fallback`, skipping empty strings.
pub(crate) fn error_message(body: &Value, fallback: &str) -> String {
    ["error", "message"]
        .iter()
        .filter_map(|key| body.get(key).and_then(Value::as_str))
        .find(|message| !message.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

fn failure(operation: Operation, status: StatusCode, body: &Value) -> ClientError {
    let message = error_message(body, operation.fallback_message());
    tracing::warn!(operation = %operation, status = %status, message = %message, "backend rejected request");
    ClientError::RequestFailed { status, message }
}

/// Success-with-body path shared by every call that returns data.
async fn expect_json<T: DeserializeOwned>(
    operation: Operation,
    response: Response,
) -> Result<T, ClientError> {
    let (status, body) = read_body(response).await?;
    if !status.is_success() {
        return Err(failure(operation, status, &body));
    }
    Ok(serde_json::from_value(body)?)
}

/// Success-without-body path for deletions. 204 short-circuits before the
/// body is read.
async fn expect_empty(operation: Operation, response: Response) -> Result<(), ClientError> {
    if response.status() == StatusCode::NO_CONTENT {
        return Ok(());
    }
    let (status, body) = read_body(response).await?;
    if !status.is_success() {
        return Err(failure(operation, status, &body));
    }
    Ok(())
}
