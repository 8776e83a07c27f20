//! 停车预订客户端命令行入口
//! 命令结果以 JSON 输出到 stdout，日志输出到 stderr

use chrono::Utc;
use clap::{Parser, Subcommand};
use park_client::{
    config::AppConfig,
    error::AppError,
    models::{
        booking::{parse_duration, parse_start_time, BookingDraft},
        contact::ContactRequest,
        payment::{find_plan, BillingPeriod},
        premise::Premise,
        review::ReviewRequest,
    },
    services::BookingOutcome,
    state::AppState,
    telemetry,
    validation::{format_phone_number, min_start_time},
};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "park-client", version, about = "Parking reservation client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 登录并保存令牌
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// 注册新账号
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// 清空本地凭据
    Logout,
    /// 列出支持城市的车场
    Premises {
        #[arg(long)]
        city: Option<String>,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// 计算预订总价
    Quote {
        #[arg(long)]
        premise: i64,
        #[arg(long, default_value = "1")]
        duration: String,
    },
    /// 提交预订
    Book {
        #[arg(long)]
        premise: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "1")]
        duration: String,
        /// RFC 3339 或本地时间 "YYYY-MM-DDTHH:MM"
        #[arg(long)]
        start: Option<String>,
    },
    /// 我的预订（按状态分组）
    Bookings,
    /// 取消预订
    Cancel { id: i64 },
    /// 完成预订
    Complete { id: i64 },
    /// 订阅套餐
    Plans,
    /// 创建订阅结账会话
    Checkout {
        #[arg(long)]
        plan: String,
        #[arg(long, default_value = "month")]
        period: BillingPeriod,
        #[arg(long)]
        email: String,
    },
    /// 校验支付结果
    VerifyPayment {
        #[arg(long)]
        session_id: String,
    },
    /// 列出评价
    Reviews,
    /// 发表评价
    Review {
        #[arg(long)]
        name: String,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        text: String,
    },
    /// 发送联系消息
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 按优先级加载：.env.local > .env
    dotenv::from_filename(".env.local").ok();
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    telemetry::init_telemetry(&config);

    let state = AppState::from_config(config)?;

    match run(cli.command, &state).await {
        Ok(ExitStatus::Success) => Ok(()),
        Ok(ExitStatus::Rejected) => std::process::exit(2),
        Err(e) => {
            tracing::error!(error = %e, code = e.code(), "Command failed");
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    }
}

enum ExitStatus {
    Success,
    /// 预订表单未通过校验
    Rejected,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(command: Command, state: &AppState) -> Result<ExitStatus, AppError> {
    match command {
        Command::Login { username, password } => {
            state.auth_service.login(&username, &password).await?;
            print_json(&serde_json::json!({ "status": "logged_in", "username": username }))?;
        }
        Command::Register {
            username,
            email,
            password,
        } => {
            let body = state
                .auth_service
                .register(&username, &email, &password)
                .await?;
            print_json(&body)?;
        }
        Command::Logout => {
            state.auth_service.logout()?;
            print_json(&serde_json::json!({ "status": "logged_out" }))?;
        }
        Command::Premises { city, search } => {
            let premises = state
                .premise_service
                .search(city.as_deref(), &search)
                .await?;
            let listings: Vec<_> = premises.iter().map(Premise::listing).collect();
            print_json(&listings)?;
        }
        Command::Quote { premise, duration } => {
            let premise = state.premise_service.find(premise).await?;
            let total = state
                .booking_service
                .quote(Some(&premise), parse_duration(&duration));
            print_json(&serde_json::json!({
                "premise": premise.name,
                "price": premise.price,
                "total": total,
                "earliest_start": min_start_time(Utc::now()),
            }))?;
        }
        Command::Book {
            premise,
            name,
            phone,
            duration,
            start,
        } => {
            // 未登录时不必查询车场
            if !state.auth_service.is_authenticated()? {
                return Err(AppError::NotAuthenticated);
            }

            let premise = state.premise_service.find(premise).await?;
            let draft = BookingDraft {
                premise_id: premise.id,
                name,
                phone: format_phone_number(&phone),
                duration_hours: parse_duration(&duration),
                start_time: start.as_deref().and_then(parse_start_time),
            };

            let outcome = state
                .booking_service
                .submit(&draft, &premise, Utc::now())
                .await?;
            print_json(&outcome)?;
            if matches!(outcome, BookingOutcome::Rejected { .. }) {
                return Ok(ExitStatus::Rejected);
            }
        }
        Command::Bookings => {
            let grouped = state.booking_service.list_grouped().await?;
            print_json(&grouped.summaries())?;
        }
        Command::Cancel { id } => {
            print_json(&state.booking_service.cancel(id).await?)?;
        }
        Command::Complete { id } => {
            print_json(&state.booking_service.complete(id).await?)?;
        }
        Command::Plans => {
            print_json(&state.payment_service.plans())?;
        }
        Command::Checkout {
            plan,
            period,
            email,
        } => {
            let session = state
                .payment_service
                .create_checkout_session(&plan, period, &email)
                .await?;
            print_json(&serde_json::json!({
                "plan": plan,
                "billing_period": period,
                "amount": find_plan(&plan).map(|p| p.price_for(period)),
                "session": session,
            }))?;
        }
        Command::VerifyPayment { session_id } => {
            print_json(&state.payment_service.verify_payment(&session_id).await?)?;
        }
        Command::Reviews => {
            print_json(&state.feedback_service.fetch_reviews().await?)?;
        }
        Command::Review { name, rating, text } => {
            let review = ReviewRequest::new(&name, rating, &text);
            print_json(&state.feedback_service.submit_review(&review).await?)?;
        }
        Command::Contact {
            name,
            email,
            message,
        } => {
            let contact = ContactRequest {
                name: name.trim().to_string(),
                email: email.trim().to_string(),
                message: message.trim().to_string(),
            };
            print_json(&state.feedback_service.submit_contact(&contact).await?)?;
        }
    }

    Ok(ExitStatus::Success)
}
