//! 预订服务：校验、计价、提交以及预订管理

use crate::{
    auth::TokenKind,
    error::AppError,
    gateway::{ApiGateway, ApiRequest},
    models::booking::*,
    models::premise::Premise,
    validation::{self, BookingErrors},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const BOOKINGS_PATH: &str = "/bookings/bookings/";
pub const USER_BOOKINGS_PATH: &str = "/bookings/user-bookings/";

/// 预订提交结果
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BookingOutcome {
    /// 校验未通过，没有发出请求
    Rejected { errors: BookingErrors },
    /// 后端已创建预订
    Submitted(BookingConfirmation),
}

/// 预订成功后的摘要
#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub booking_id: Option<i64>,
    pub premise: String,
    pub location: String,
    pub duration: i64,
    pub total: String,
    pub phone: String,
    pub start_time: DateTime<Utc>,
}

#[derive(Deserialize)]
struct CreatedBooking {
    #[serde(default)]
    id: Option<i64>,
}

pub struct BookingService {
    gateway: Arc<ApiGateway>,
}

impl BookingService {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// 当前车场和时长的总价
    pub fn quote(&self, premise: Option<&Premise>, duration_hours: Option<i64>) -> String {
        validation::calculate_total_price(premise, duration_hours)
    }

    /// 校验草稿并提交预订
    ///
    /// 校验失败时返回全部字段错误，不发出网络请求。
    pub async fn submit(
        &self,
        draft: &BookingDraft,
        premise: &Premise,
        now: DateTime<Utc>,
    ) -> Result<BookingOutcome, AppError> {
        let errors = validation::validate_booking(draft, now);
        if !errors.is_valid() {
            return Ok(BookingOutcome::Rejected { errors });
        }

        if self.gateway.store().get(TokenKind::Access)?.is_none() {
            return Err(AppError::NotAuthenticated);
        }

        let request = self.build_request(draft, premise)?;
        let confirmation_base = BookingConfirmation {
            booking_id: None,
            premise: premise.name.clone(),
            location: premise.location.clone(),
            duration: request.duration,
            total: request.total_price.clone(),
            phone: request.phone.clone(),
            start_time: request.booking_time,
        };

        let response = self
            .gateway
            .send(ApiRequest::post(BOOKINGS_PATH).with_json(&request)?)
            .await?;
        let created = match response.json::<CreatedBooking>() {
            Ok(created) => created,
            Err(e) => {
                tracing::warn!(
                    premise_id = premise.id,
                    status = response.status,
                    error = %e,
                    "Booking created but response body could not be decoded"
                );
                CreatedBooking { id: None }
            }
        };

        tracing::info!(
            premise_id = premise.id,
            booking_id = ?created.id,
            duration = request.duration,
            total = %request.total_price,
            "Booking created"
        );

        Ok(BookingOutcome::Submitted(BookingConfirmation {
            booking_id: created.id,
            ..confirmation_base
        }))
    }

    /// 构造提交请求；调用前草稿必须已通过校验
    pub fn build_request(
        &self,
        draft: &BookingDraft,
        premise: &Premise,
    ) -> Result<CreateBookingRequest, AppError> {
        let (Some(duration), Some(start_time)) = (draft.duration_hours, draft.start_time) else {
            return Err(AppError::Validation(
                "Booking draft is incomplete".to_string(),
            ));
        };

        Ok(CreateBookingRequest {
            premise_id: premise.id,
            name: draft.name.clone(),
            phone: validation::normalize_phone(&draft.phone),
            duration,
            total_price: validation::calculate_total_price(Some(premise), Some(duration)),
            booking_time: start_time,
        })
    }

    /// 当前用户的全部预订
    pub async fn list(&self) -> Result<Vec<Booking>, AppError> {
        let response = self.gateway.send(ApiRequest::get(USER_BOOKINGS_PATH)).await?;
        response.json()
    }

    /// 当前用户的预订，按状态分组
    pub async fn list_grouped(&self) -> Result<GroupedBookings, AppError> {
        Ok(group_bookings(self.list().await?))
    }

    /// 取消预订
    pub async fn cancel(&self, booking_id: i64) -> Result<serde_json::Value, AppError> {
        let path = format!("{}{}/cancel/", BOOKINGS_PATH, booking_id);
        let response = self.gateway.send(ApiRequest::post(path)).await?;
        tracing::info!(booking_id, "Booking cancelled");
        response.json_value()
    }

    /// 完成预订
    pub async fn complete(&self, booking_id: i64) -> Result<serde_json::Value, AppError> {
        let path = format!("{}{}/complete/", BOOKINGS_PATH, booking_id);
        let response = self.gateway.send(ApiRequest::post(path)).await?;
        tracing::info!(booking_id, "Booking completed");
        response.json_value()
    }
}
