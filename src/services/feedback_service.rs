//! 评价与联系表单服务

use crate::{
    error::AppError,
    gateway::{ApiGateway, ApiRequest},
    models::{contact::*, review::*},
};
use std::sync::Arc;
use validator::Validate;

pub const REVIEWS_PATH: &str = "/reviews/";
pub const CONTACT_PATH: &str = "/mess/contact/";

pub struct FeedbackService {
    gateway: Arc<ApiGateway>,
}

impl FeedbackService {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn fetch_reviews(&self) -> Result<Vec<Review>, AppError> {
        let response = self.gateway.send(ApiRequest::get(REVIEWS_PATH)).await?;
        response.json()
    }

    pub async fn submit_review(&self, review: &ReviewRequest) -> Result<Review, AppError> {
        review.validate()?;
        let response = self
            .gateway
            .send(ApiRequest::post(REVIEWS_PATH).with_json(review)?)
            .await?;
        response.json()
    }

    pub async fn submit_contact(&self, contact: &ContactRequest) -> Result<ContactResponse, AppError> {
        contact.validate()?;
        let response = self
            .gateway
            .send(ApiRequest::post(CONTACT_PATH).with_json(contact)?)
            .await?;
        let ack: ContactResponse = response.json()?;
        if !ack.is_success() {
            return Err(AppError::api(response.status, "Failed to send message. Please try again."));
        }
        Ok(ack)
    }
}
