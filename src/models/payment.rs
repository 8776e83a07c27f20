//! Subscription plan and checkout models

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 计费周期
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    Month,
    Year,
}

impl std::str::FromStr for BillingPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "month" | "monthly" => Ok(BillingPeriod::Month),
            "year" | "yearly" => Ok(BillingPeriod::Year),
            other => Err(format!("Unknown billing period: {}", other)),
        }
    }
}

/// 订阅套餐
#[derive(Debug, Clone, Serialize)]
pub struct PricingPlan {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// 月付价格（卢比）
    pub monthly_price: u32,
    /// 年付价格（卢比）
    pub yearly_price: u32,
    pub popular: bool,
    pub features: &'static [&'static str],
}

impl PricingPlan {
    pub fn price_for(&self, period: BillingPeriod) -> u32 {
        match period {
            BillingPeriod::Month => self.monthly_price,
            BillingPeriod::Year => self.yearly_price,
        }
    }
}

pub static PLANS: [PricingPlan; 3] = [
    PricingPlan {
        id: "basic",
        name: "Basic",
        description: "Perfect for occasional parkers",
        monthly_price: 199,
        yearly_price: 1999,
        popular: false,
        features: &[
            "Book up to 5 parking slots per month",
            "Access to city-based search",
            "View booking history",
            "Email booking confirmation",
        ],
    },
    PricingPlan {
        id: "standard",
        name: "Standard",
        description: "Great for regular commuters",
        monthly_price: 399,
        yearly_price: 3999,
        popular: true,
        features: &[
            "Book up to 20 parking slots per month",
            "Real-time availability updates",
            "SMS booking notifications",
            "Cancel and reschedule bookings",
            "Priority customer support",
        ],
    },
    PricingPlan {
        id: "premium",
        name: "Premium",
        description: "Ultimate parking experience",
        monthly_price: 699,
        yearly_price: 6999,
        popular: false,
        features: &[
            "Unlimited bookings",
            "Real-time availability + predictive availability",
            "SMS and email notifications",
            "Advanced location-based search with filters",
            "Premium customer support (phone + chat)",
            "Early access to new features",
        ],
    },
];

/// 按 id 查找套餐
pub fn find_plan(plan_id: &str) -> Option<&'static PricingPlan> {
    PLANS.iter().find(|plan| plan.id == plan_id)
}

/// Create checkout session request
#[derive(Debug, Serialize, Validate)]
pub struct CheckoutSessionRequest {
    #[validate(length(min = 1, message = "Plan is required"))]
    pub plan_id: String,
    pub billing_period: BillingPeriod,
    #[validate(email(message = "Enter a valid email address"))]
    pub customer_email: String,
}

/// Checkout session created by the backend
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutSession {
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
    #[serde(rename = "publicKey", default)]
    pub public_key: Option<String>,
}

/// Payment verification result
#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentVerification {
    pub status: String,
    #[serde(default)]
    pub payment_id: Option<serde_json::Value>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub billing_period: Option<String>,
    #[serde(default)]
    pub subscription_id: Option<String>,
    #[serde(default)]
    pub subscription_status: Option<String>,
    #[serde(default)]
    pub next_billing_date: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl PaymentVerification {
    pub fn is_paid(&self) -> bool {
        self.status == "success" && self.payment_status.as_deref() == Some("paid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_catalogue() {
        let standard = find_plan("standard").unwrap();
        assert!(standard.popular);
        assert_eq!(standard.price_for(BillingPeriod::Month), 399);
        assert_eq!(standard.price_for(BillingPeriod::Year), 3999);
        assert!(find_plan("gold").is_none());
    }

    #[test]
    fn test_billing_period_wire_format() {
        assert_eq!(serde_json::to_string(&BillingPeriod::Year).unwrap(), "\"year\"");
        assert_eq!("Monthly".parse::<BillingPeriod>().unwrap(), BillingPeriod::Month);
        assert!("weekly".parse::<BillingPeriod>().is_err());
    }

    #[test]
    fn test_checkout_request_validation() {
        let req = CheckoutSessionRequest {
            plan_id: "basic".to_string(),
            billing_period: BillingPeriod::Month,
            customer_email: "not-an-email".to_string(),
        };
        assert!(req.validate().is_err());

        let json = serde_json::to_value(&CheckoutSessionRequest {
            customer_email: "asha@example.com".to_string(),
            ..req
        })
        .unwrap();
        assert_eq!(json["plan_id"], "basic");
        assert_eq!(json["billing_period"], "month");
    }

    #[test]
    fn test_payment_verification_paid() {
        let json = r#"{"status":"success","payment_id":42,"payment_status":"paid","amount":399.0,"currency":"INR"}"#;
        let v: PaymentVerification = serde_json::from_str(json).unwrap();
        assert!(v.is_paid());

        let pending: PaymentVerification =
            serde_json::from_str(r#"{"status":"success","payment_status":"unpaid"}"#).unwrap();
        assert!(!pending.is_paid());
    }
}
