//! Content resources served by the backend
//!
//! These mirror the JSON the REST API returns. Fields the client never
//! reads are left out; unknown fields are ignored on deserialization.

use serde::{Deserialize, Serialize};

/// One measured parameter of a purity test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestParameter {
    pub name: String,
    pub result: String,
    /// pass, warning, fail
    pub status: String,
}

/// A published purity test report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    #[serde(default)]
    pub id: String,
    #[serde(alias = "productName")]
    pub product_name: String,
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, alias = "purityScore")]
    pub purity_score: Option<f64>,
    #[serde(default, alias = "testDate")]
    pub test_date: String,
    #[serde(default, alias = "testedBy")]
    pub tested_by: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub parameters: Vec<TestParameter>,
    #[serde(default)]
    pub summary: String,
}

/// Payload for creating or updating a test report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestReportDraft {
    pub product_name: String,
    pub brand: String,
    pub category: String,
    pub purity_score: f64,
    pub test_date: String,
    pub tested_by: String,
    pub image: String,
    pub parameters: Vec<TestParameter>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub publish_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPostDraft {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub image: String,
}

/// A product category queued for testing and open to community funding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingTest {
    #[serde(default)]
    pub id: String,
    pub product_category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub votes: u64,
    #[serde(default)]
    pub funded: u64,
    #[serde(default)]
    pub target_funding: u64,
    #[serde(default)]
    pub estimated_test_date: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingTestDraft {
    pub product_category: String,
    pub description: String,
    pub estimated_test_date: String,
    pub target_funding: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForumReply {
    #[serde(default, alias = "user_name")]
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForumPost {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub replies: Vec<ForumReply>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForumPostDraft {
    pub title: String,
    pub content: String,
    pub category: String,
}
