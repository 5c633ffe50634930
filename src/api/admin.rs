use reqwest::{
    Method,
    header::CONTENT_TYPE,
    multipart::{Form, Part},
};

use super::{ApiClient, Operation, expect_empty, expect_json};
use crate::{
    error::ClientError,
    models::{
        AdminArticleQuery, Article, ArticleForm, ArticleList, ArticlePayload, ImageFile,
        UploadedImage,
    },
};

/// Admin Article Client
///
/// Every call reads the bearer token first; with no token stored it fails
/// with `AuthenticationRequired` and nothing is sent.
///
/// Multipart bodies never get a hand-written content-type: reqwest sets
/// `multipart/form-data` together with the generated boundary.
impl ApiClient {
    /// list_articles
    ///
    /// GET /api/admin/articles?search=&page=&limit=
    pub async fn list_articles(
        &self,
        query: &AdminArticleQuery,
    ) -> Result<ArticleList, ClientError> {
        let operation = Operation::ListArticles;
        let url = self.url("/api/admin/articles", &query.query_pairs())?;
        let request = self.authed(Method::GET, url).await?;
        self.dispatch(operation, request, |response| expect_json(operation, response))
            .await
    }

    /// get_article
    ///
    /// GET /api/admin/articles/{id}. Full detail including drafts and tag ids.
    pub async fn get_article(&self, id: i64) -> Result<Article, ClientError> {
        let operation = Operation::GetArticle;
        let url = self.url(&format!("/api/admin/articles/{id}"), &[])?;
        let request = self.authed(Method::GET, url).await?;
        self.dispatch(operation, request, |response| expect_json(operation, response))
            .await
    }

    /// create_article
    ///
    /// POST /api/admin/articles (multipart).
    pub async fn create_article(&self, form: ArticleForm) -> Result<Article, ClientError> {
        let operation = Operation::CreateArticle;
        let url = self.url("/api/admin/articles", &[])?;
        let request = self.authed(Method::POST, url).await?;
        let request = request.multipart(article_form(form)?);
        self.dispatch(operation, request, |response| expect_json(operation, response))
            .await
    }

    /// update_article
    ///
    /// PUT /api/admin/articles/{id}. Multipart when a new header image is
    /// attached, `application/json` otherwise.
    pub async fn update_article(
        &self,
        id: i64,
        payload: ArticlePayload,
    ) -> Result<Article, ClientError> {
        let operation = Operation::UpdateArticle;
        let url = self.url(&format!("/api/admin/articles/{id}"), &[])?;
        let request = self.authed(Method::PUT, url).await?;
        let request = match payload {
            ArticlePayload::Multipart(form) => request.multipart(article_form(form)?),
            ArticlePayload::Json(update) => request
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_string(&update)?),
        };
        self.dispatch(operation, request, |response| expect_json(operation, response))
            .await
    }

    /// delete_article
    ///
    /// DELETE /api/admin/articles/{id}. The backend answers 204 on success.
    pub async fn delete_article(&self, id: i64) -> Result<(), ClientError> {
        let operation = Operation::DeleteArticle;
        let url = self.url(&format!("/api/admin/articles/{id}"), &[])?;
        let request = self.authed(Method::DELETE, url).await?;
        self.dispatch(operation, request, |response| expect_empty(operation, response))
            .await
    }

    /// upload_article_image
    ///
    /// POST /api/admin/articles/upload-image with a single `image` part.
    /// Used by the editor to inline images into the article body.
    pub async fn upload_article_image(&self, file: ImageFile) -> Result<UploadedImage, ClientError> {
        let operation = Operation::UploadArticleImage;
        let url = self.url("/api/admin/articles/upload-image", &[])?;
        let request = self.authed(Method::POST, url).await?;
        let form = Form::new().part("image", image_part(file)?);
        let request = request.multipart(form);
        self.dispatch(operation, request, |response| expect_json(operation, response))
            .await
    }
}

fn image_part(file: ImageFile) -> Result<Part, ClientError> {
    Part::bytes(file.bytes)
        .file_name(file.file_name)
        .mime_str(&file.mime_type)
        .map_err(ClientError::Transport)
}

fn article_form(form: ArticleForm) -> Result<Form, ClientError> {
    let mut multipart = Form::new()
        .text("title", form.title)
        .text("content", form.content)
        .text("status", form.status.as_str())
        .text("tag_ids", serde_json::to_string(&form.tag_ids)?);
    if let Some(thumbnail_url) = form.thumbnail_url {
        multipart = multipart.text("thumbnail_url", thumbnail_url);
    }
    if let Some(header_image) = form.header_image {
        multipart = multipart.part("headerImage", image_part(header_image)?);
    }
    Ok(multipart)
}
