//! Admin content management
//!
//! One [`AdminPanel`] per resource. Access is checked client-side before
//! every operation; the server authorizes every write on its own. Each
//! successful write reloads the whole list.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use choosepure_core::models::{
    BlogPost, BlogPostDraft, TestReport, TestReportDraft, UpcomingTest, UpcomingTestDraft,
};
use choosepure_core::SubscriptionTier;

use crate::api::{ApiClient, ReportQuery};
use crate::error::{ClientError, ClientResult};
use crate::session::SessionStore;
use crate::state::AppState;
use crate::ui::{Confirm, Notification, Route};

/// Target of the "back to home" link shown when access is denied
pub const ACCESS_DENIED_ROUTE: Route = Route::Home;

/// A resource managed from the admin panel
#[async_trait]
pub trait AdminResource: Send + Sync + 'static {
    type Item: Clone + Send + Sync;
    type Draft: Send + Sync;

    /// Singular lower-case name used in prompts and notifications
    const LABEL: &'static str;

    fn id(item: &Self::Item) -> &str;

    async fn list(api: &ApiClient) -> ClientResult<Vec<Self::Item>>;

    async fn create(api: &ApiClient, draft: &Self::Draft) -> ClientResult<()>;

    async fn update(api: &ApiClient, id: &str, draft: &Self::Draft) -> ClientResult<()>;

    async fn delete(api: &ApiClient, id: &str) -> ClientResult<()>;
}

pub struct TestReports;

#[async_trait]
impl AdminResource for TestReports {
    type Item = TestReport;
    type Draft = TestReportDraft;
    const LABEL: &'static str = "test report";

    fn id(item: &TestReport) -> &str {
        &item.id
    }

    async fn list(api: &ApiClient) -> ClientResult<Vec<TestReport>> {
        api.list_reports(&ReportQuery::default()).await
    }

    async fn create(api: &ApiClient, draft: &TestReportDraft) -> ClientResult<()> {
        api.create_report(draft).await.map(drop)
    }

    async fn update(api: &ApiClient, id: &str, draft: &TestReportDraft) -> ClientResult<()> {
        api.update_report(id, draft).await.map(drop)
    }

    async fn delete(api: &ApiClient, id: &str) -> ClientResult<()> {
        api.delete_report(id).await.map(drop)
    }
}

pub struct BlogPosts;

#[async_trait]
impl AdminResource for BlogPosts {
    type Item = BlogPost;
    type Draft = BlogPostDraft;
    const LABEL: &'static str = "blog post";

    fn id(item: &BlogPost) -> &str {
        &item.id
    }

    async fn list(api: &ApiClient) -> ClientResult<Vec<BlogPost>> {
        api.list_blog_posts(None).await
    }

    async fn create(api: &ApiClient, draft: &BlogPostDraft) -> ClientResult<()> {
        api.create_blog_post(draft).await.map(drop)
    }

    async fn update(api: &ApiClient, id: &str, draft: &BlogPostDraft) -> ClientResult<()> {
        api.update_blog_post(id, draft).await.map(drop)
    }

    async fn delete(api: &ApiClient, id: &str) -> ClientResult<()> {
        api.delete_blog_post(id).await.map(drop)
    }
}

pub struct UpcomingTests;

#[async_trait]
impl AdminResource for UpcomingTests {
    type Item = UpcomingTest;
    type Draft = UpcomingTestDraft;
    const LABEL: &'static str = "upcoming test";

    fn id(item: &UpcomingTest) -> &str {
        &item.id
    }

    async fn list(api: &ApiClient) -> ClientResult<Vec<UpcomingTest>> {
        api.list_upcoming_tests().await
    }

    async fn create(api: &ApiClient, draft: &UpcomingTestDraft) -> ClientResult<()> {
        api.create_upcoming_test(draft).await.map(drop)
    }

    async fn update(api: &ApiClient, id: &str, draft: &UpcomingTestDraft) -> ClientResult<()> {
        api.update_upcoming_test(id, draft).await.map(drop)
    }

    async fn delete(api: &ApiClient, id: &str) -> ClientResult<()> {
        api.delete_upcoming_test(id).await.map(drop)
    }
}

pub struct SubscriptionTiers;

#[async_trait]
impl AdminResource for SubscriptionTiers {
    type Item = SubscriptionTier;
    type Draft = SubscriptionTier;
    const LABEL: &'static str = "subscription tier";

    fn id(item: &SubscriptionTier) -> &str {
        &item.id
    }

    async fn list(api: &ApiClient) -> ClientResult<Vec<SubscriptionTier>> {
        api.subscription_tiers().await
    }

    async fn create(api: &ApiClient, draft: &SubscriptionTier) -> ClientResult<()> {
        api.create_tier(draft).await.map(drop)
    }

    async fn update(api: &ApiClient, id: &str, draft: &SubscriptionTier) -> ClientResult<()> {
        api.update_tier(id, draft).await.map(drop)
    }

    async fn delete(api: &ApiClient, id: &str) -> ClientResult<()> {
        api.delete_tier(id).await.map(drop)
    }
}

/// Admin access requires a session whose user is an admin
pub fn check_access(session: &SessionStore) -> ClientResult<()> {
    match session.user() {
        Some(user) if user.is_admin() => Ok(()),
        _ => Err(ClientError::AccessDenied),
    }
}

/// Where to point the user after `err`, when it denied admin access
pub fn denied_link(err: &ClientError) -> Option<Route> {
    match err {
        ClientError::AccessDenied => Some(ACCESS_DENIED_ROUTE),
        _ => None,
    }
}

fn capitalized(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct AdminPanel<R: AdminResource> {
    state: Arc<AppState>,
    items: Vec<R::Item>,
    _resource: PhantomData<R>,
}

impl<R: AdminResource> AdminPanel<R> {
    /// Check access and load the list
    pub async fn open(state: Arc<AppState>) -> ClientResult<Self> {
        let mut panel = Self {
            state,
            items: Vec::new(),
            _resource: PhantomData,
        };
        panel.authorize()?;
        panel.reload().await?;
        Ok(panel)
    }

    pub fn items(&self) -> &[R::Item] {
        &self.items
    }

    pub fn find(&self, id: &str) -> Option<&R::Item> {
        self.items.iter().find(|item| R::id(item) == id)
    }

    pub async fn reload(&mut self) -> ClientResult<()> {
        match R::list(&self.state.api).await {
            Ok(items) => {
                tracing::debug!(resource = R::LABEL, count = items.len(), "Admin list loaded");
                self.items = items;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(resource = R::LABEL, error = %e, "Failed to load admin data");
                self.state
                    .notify(Notification::error("Error", "Failed to load admin data"));
                Err(e)
            }
        }
    }

    pub async fn create(&mut self, draft: &R::Draft) -> ClientResult<()> {
        self.authorize()?;
        let result = R::create(&self.state.api, draft).await;
        self.finish_save(result, "created").await
    }

    pub async fn update(&mut self, id: &str, draft: &R::Draft) -> ClientResult<()> {
        self.authorize()?;
        let result = R::update(&self.state.api, id, draft).await;
        self.finish_save(result, "updated").await
    }

    /// Delete after confirmation.
    ///
    /// Returns `false` without any request when the prompt is declined.
    pub async fn delete(&mut self, id: &str, confirm: &dyn Confirm) -> ClientResult<bool> {
        self.authorize()?;
        if !confirm.confirm(&format!("Are you sure you want to delete this {}?", R::LABEL)) {
            return Ok(false);
        }

        match R::delete(&self.state.api, id).await {
            Ok(()) => {
                tracing::info!(resource = R::LABEL, id, "Deleted");
                self.state.notify(Notification::info(
                    "Success",
                    format!("{} deleted successfully", capitalized(R::LABEL)),
                ));
                self.reload().await?;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(resource = R::LABEL, id, error = %e, "Delete failed");
                self.state.notify(Notification::error(
                    "Error",
                    format!("Failed to delete {}", R::LABEL),
                ));
                Err(e)
            }
        }
    }

    async fn finish_save(&mut self, result: ClientResult<()>, verb: &str) -> ClientResult<()> {
        match result {
            Ok(()) => {
                tracing::info!(resource = R::LABEL, verb, "Saved");
                self.state.notify(Notification::info(
                    "Success!",
                    format!("{} {} successfully", capitalized(R::LABEL), verb),
                ));
                self.reload().await
            }
            Err(e) => {
                tracing::warn!(resource = R::LABEL, error = %e, "Save failed");
                self.state.notify(Notification::error(
                    "Error",
                    e.user_message(&format!("Failed to save {}", R::LABEL)),
                ));
                Err(e)
            }
        }
    }

    fn authorize(&self) -> ClientResult<()> {
        if let Err(e) = check_access(&self.state.session) {
            tracing::warn!(resource = R::LABEL, "Admin access denied");
            self.state.notify(Notification::error(
                "Access Denied",
                "You need admin privileges to access this page",
            ));
            return Err(e);
        }
        Ok(())
    }
}
