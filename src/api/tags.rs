use reqwest::{Method, StatusCode};

use super::{
    ApiClient, Operation, TAG_IN_USE_MESSAGE, error_message, expect_empty, expect_json,
    read_body,
};
use crate::{
    error::ClientError,
    models::{CreateTagRequest, Tag, UpdateTagRequest},
};

/// Tag Admin Client
///
/// Taxonomy management. The backend validates `parent_id` and refuses to
/// delete tags that still have sub-tags or articles.
impl ApiClient {
    /// create_tag
    ///
    /// POST /api/admin/tags `{ name, parent_id }`.
    pub async fn create_tag(&self, tag: &CreateTagRequest) -> Result<Tag, ClientError> {
        let operation = Operation::CreateTag;
        let url = self.url("/api/admin/tags", &[])?;
        let request = self.authed(Method::POST, url).await?.json(tag);
        self.dispatch(operation, request, |response| expect_json(operation, response))
            .await
    }

    /// update_tag
    ///
    /// PUT /api/admin/tags/{id} `{ name }`.
    pub async fn update_tag(&self, id: i64, tag: &UpdateTagRequest) -> Result<Tag, ClientError> {
        let operation = Operation::UpdateTag;
        let url = self.url(&format!("/api/admin/tags/{id}"), &[])?;
        let request = self.authed(Method::PUT, url).await?.json(tag);
        self.dispatch(operation, request, |response| expect_json(operation, response))
            .await
    }

    /// delete_tag
    ///
    /// DELETE /api/admin/tags/{id}. 204 is success; 409 means the tag is
    /// still in use and is reported as `Conflict`.
    pub async fn delete_tag(&self, id: i64) -> Result<(), ClientError> {
        let operation = Operation::DeleteTag;
        let url = self.url(&format!("/api/admin/tags/{id}"), &[])?;
        let request = self.authed(Method::DELETE, url).await?;
        self.dispatch(operation, request, |response| async move {
            if response.status() == StatusCode::CONFLICT {
                let (_, body) = read_body(response).await?;
                let message = error_message(&body, TAG_IN_USE_MESSAGE);
                tracing::info!(tag_id = id, message = %message, "tag still in use");
                return Err(ClientError::Conflict { message });
            }
            expect_empty(operation, response).await
        })
        .await
    }
}
