//! Content endpoints: reports, blog, forum, newsletter, upcoming tests

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use choosepure_core::models::{
    BlogPost, BlogPostDraft, ForumPost, ForumPostDraft, TestReport, TestReportDraft, UpcomingTest,
    UpcomingTestDraft,
};
use choosepure_core::UserId;

use super::{extract_item, extract_list, ApiClient};
use crate::error::ClientResult;

/// Filters for the report list
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Generic acknowledgement of a write
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WriteAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiClient {
    // ========================================================================
    // Reports
    // ========================================================================

    pub async fn list_reports(&self, query: &ReportQuery) -> ClientResult<Vec<TestReport>> {
        let body: Value = self.get_with_query("/reports", query).await?;
        extract_list(body, "reports")
    }

    pub async fn get_report(&self, id: &str) -> ClientResult<TestReport> {
        let body: Value = self.get(&format!("/reports/{}", id)).await?;
        extract_item(body, "report")
    }

    pub async fn create_report(&self, draft: &TestReportDraft) -> ClientResult<WriteAck> {
        self.post("/reports", draft).await
    }

    pub async fn update_report(&self, id: &str, draft: &TestReportDraft) -> ClientResult<WriteAck> {
        self.put(&format!("/reports/{}", id), draft).await
    }

    pub async fn delete_report(&self, id: &str) -> ClientResult<WriteAck> {
        self.delete(&format!("/reports/{}", id)).await
    }

    // ========================================================================
    // Blog
    // ========================================================================

    pub async fn list_blog_posts(&self, category: Option<&str>) -> ClientResult<Vec<BlogPost>> {
        let body: Value = match category {
            Some(category) => {
                self.get_with_query("/blog/posts", &[("category", category)])
                    .await?
            }
            None => self.get("/blog/posts").await?,
        };
        extract_list(body, "posts")
    }

    pub async fn get_blog_post(&self, id: &str) -> ClientResult<BlogPost> {
        let body: Value = self.get(&format!("/blog/posts/{}", id)).await?;
        extract_item(body, "post")
    }

    pub async fn create_blog_post(&self, draft: &BlogPostDraft) -> ClientResult<WriteAck> {
        self.post("/blog/posts", draft).await
    }

    pub async fn update_blog_post(&self, id: &str, draft: &BlogPostDraft) -> ClientResult<WriteAck> {
        self.put(&format!("/blog/posts/{}", id), draft).await
    }

    pub async fn delete_blog_post(&self, id: &str) -> ClientResult<WriteAck> {
        self.delete(&format!("/blog/posts/{}", id)).await
    }

    // ========================================================================
    // Forum
    // ========================================================================

    pub async fn list_forum_posts(&self, category: Option<&str>) -> ClientResult<Vec<ForumPost>> {
        let body: Value = match category {
            Some(category) => {
                self.get_with_query("/forum/posts", &[("category", category)])
                    .await?
            }
            None => self.get("/forum/posts").await?,
        };
        extract_list(body, "posts")
    }

    pub async fn get_forum_post(&self, id: &str) -> ClientResult<ForumPost> {
        let body: Value = self.get(&format!("/forum/posts/{}", id)).await?;
        extract_item(body, "post")
    }

    pub async fn create_forum_post(
        &self,
        user_id: &UserId,
        draft: &ForumPostDraft,
    ) -> ClientResult<WriteAck> {
        let body = json!({
            "user_id": user_id,
            "title": draft.title,
            "content": draft.content,
            "category": draft.category,
        });
        self.post("/forum/posts", &body).await
    }

    /// Toggle the user's like on a post
    pub async fn like_forum_post(&self, id: &str, user_id: &UserId) -> ClientResult<WriteAck> {
        self.post(
            &format!("/forum/posts/{}/like", id),
            &json!({ "user_id": user_id }),
        )
        .await
    }

    pub async fn reply_to_forum_post(
        &self,
        id: &str,
        user_id: &UserId,
        content: &str,
    ) -> ClientResult<WriteAck> {
        self.post(
            &format!("/forum/posts/{}/reply", id),
            &json!({ "user_id": user_id, "content": content }),
        )
        .await
    }

    pub async fn delete_forum_post(&self, id: &str) -> ClientResult<WriteAck> {
        self.delete(&format!("/forum/posts/{}", id)).await
    }

    // ========================================================================
    // Newsletter
    // ========================================================================

    pub async fn subscribe_newsletter(&self, email: &str) -> ClientResult<WriteAck> {
        self.post("/newsletter/subscribe", &json!({ "email": email }))
            .await
    }

    pub async fn unsubscribe_newsletter(&self, email: &str) -> ClientResult<WriteAck> {
        self.post("/newsletter/unsubscribe", &json!({ "email": email }))
            .await
    }

    // ========================================================================
    // Upcoming tests
    // ========================================================================

    pub async fn list_upcoming_tests(&self) -> ClientResult<Vec<UpcomingTest>> {
        let body: Value = self.get("/voting/upcoming-tests").await?;
        extract_list(body, "tests")
    }

    pub async fn create_upcoming_test(&self, draft: &UpcomingTestDraft) -> ClientResult<WriteAck> {
        self.post("/voting/create-test", draft).await
    }

    pub async fn update_upcoming_test(
        &self,
        id: &str,
        draft: &UpcomingTestDraft,
    ) -> ClientResult<WriteAck> {
        self.put(&format!("/voting/tests/{}", id), draft).await
    }

    pub async fn delete_upcoming_test(&self, id: &str) -> ClientResult<WriteAck> {
        self.delete(&format!("/voting/tests/{}", id)).await
    }
}
