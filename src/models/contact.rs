//! Contact form models

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Contact message request (`POST /mess/contact/`)
#[derive(Debug, Clone, Serialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

/// Contact endpoint acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub status: String,
}

impl ContactResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}
