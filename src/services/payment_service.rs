//! 订阅支付服务：创建结账会话、校验支付结果

use crate::{
    error::AppError,
    gateway::{ApiGateway, ApiRequest},
    models::payment::*,
};
use std::sync::Arc;
use validator::Validate;

pub const CHECKOUT_SESSION_PATH: &str = "/create-checkout-session/";
pub const VERIFY_PAYMENT_PATH: &str = "/verify-payment/";

pub struct PaymentService {
    gateway: Arc<ApiGateway>,
}

impl PaymentService {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub fn plans(&self) -> &'static [PricingPlan] {
        &PLANS
    }

    /// 创建结账会话，返回会话 id 供支付页面跳转
    pub async fn create_checkout_session(
        &self,
        plan_id: &str,
        billing_period: BillingPeriod,
        customer_email: &str,
    ) -> Result<CheckoutSession, AppError> {
        if find_plan(plan_id).is_none() {
            return Err(AppError::Validation(format!("Unknown plan: {}", plan_id)));
        }

        let req = CheckoutSessionRequest {
            plan_id: plan_id.to_string(),
            billing_period,
            customer_email: customer_email.trim().to_string(),
        };
        req.validate()?;

        let response = self
            .gateway
            .send(ApiRequest::post(CHECKOUT_SESSION_PATH).with_json(&req)?)
            .await?;
        let session: CheckoutSession = response.json()?;

        match session.session_id.as_deref() {
            Some(id) if !id.is_empty() => {
                tracing::info!(%plan_id, session_id = %id, "Checkout session created");
                Ok(session)
            }
            _ => Err(AppError::api(
                response.status,
                "Checkout session was not created",
            )),
        }
    }

    /// 校验支付结果
    pub async fn verify_payment(&self, session_id: &str) -> Result<PaymentVerification, AppError> {
        if session_id.trim().is_empty() {
            return Err(AppError::Validation("Session id is required".to_string()));
        }

        let request = ApiRequest::get(VERIFY_PAYMENT_PATH).with_query("session_id", session_id.trim());
        let response = self.gateway.send(request).await?;
        let verification: PaymentVerification = response.json()?;

        tracing::info!(
            session_id = %session_id,
            paid = verification.is_paid(),
            "Payment verified"
        );
        Ok(verification)
    }
}
