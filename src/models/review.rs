//! Review models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Published review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub name: String,
    pub rating: u8,
    pub review: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Submit review request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct ReviewRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(range(min = 1, max = 5, message = "Please select a rating"))]
    pub rating: u8,
    #[validate(length(min = 1, message = "Review text is required"))]
    pub review: String,
}

impl ReviewRequest {
    pub fn new(name: &str, rating: u8, review: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            rating,
            review: review.trim().to_string(),
        }
    }
}
