use reqwest::Method;
use serde_json::Value;

use super::{ApiClient, Operation, expect_json};
use crate::{
    error::ClientError,
    models::{ArticleFilter, ArticleList, Tag},
};

/// Public Content Client
///
/// Anonymous, read-only calls. No token is read and no auth header is sent.
impl ApiClient {
    /// list_published_articles
    ///
    /// GET /api/articles?topTag=&subTag=&year=&month=&page=&limit=&search=
    /// Only filter fields that are present end up in the query string.
    pub async fn list_published_articles(
        &self,
        filter: &ArticleFilter,
    ) -> Result<ArticleList, ClientError> {
        let operation = Operation::ListPublishedArticles;
        let url = self.url("/api/articles", &filter.query_pairs())?;
        let request = self.request(Method::GET, url);
        self.dispatch(operation, request, |response| expect_json(operation, response))
            .await
    }

    /// list_tags
    ///
    /// GET /api/tags. Top-level tags with their sub-tags nested inside. An
    /// unparsable success body reads as no hierarchy at all.
    pub async fn list_tags(&self) -> Result<Vec<Tag>, ClientError> {
        let operation = Operation::ListTags;
        let url = self.url("/api/tags", &[])?;
        let request = self.request(Method::GET, url);
        self.dispatch(operation, request, |response| async move {
            let body: Value = expect_json(operation, response).await?;
            if body.as_object().is_some_and(|map| map.is_empty()) {
                return Ok(Vec::new());
            }
            let tags: Vec<Tag> = serde_json::from_value(body)?;
            Ok::<_, ClientError>(tags)
        })
        .await
    }
}
