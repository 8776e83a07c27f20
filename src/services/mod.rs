//! Business logic services layer
//! 每个服务对应后端的一组接口，统一经由 ApiGateway 发送请求

pub mod auth_service;
pub mod booking_service;
pub mod feedback_service;
pub mod payment_service;
pub mod premise_service;

pub use auth_service::AuthService;
pub use booking_service::{BookingConfirmation, BookingOutcome, BookingService};
pub use feedback_service::FeedbackService;
pub use payment_service::PaymentService;
pub use premise_service::PremiseService;
