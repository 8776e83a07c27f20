//! 预订表单校验
//!
//! 规则表驱动：每个字段按顺序检查规则，首个失败的规则给出该字段的错误消息。
//! 所有字段都会被检查，调用方可以一次性展示全部错误。
//! 校验从不返回 Err，结果只包含逐字段的消息（空字符串表示通过）。

pub mod phone;
pub mod pricing;

pub use phone::{format_phone_number, normalize_phone};
pub use pricing::{calculate_total_price, parse_price};

use crate::models::booking::BookingDraft;
use chrono::{DateTime, Duration, Timelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// 最早可预订时间相对当前时间的提前量（分钟）
pub const MIN_LEAD_MINUTES: i64 = 30;

/// 时长范围（小时，闭区间）
pub const MIN_DURATION_HOURS: i64 = 1;
pub const MAX_DURATION_HOURS: i64 = 8;

static NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z ]{2,30}$").unwrap());

// 印度手机号：6-9 开头共 10 位
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[6-9][0-9]{9}$").unwrap());

/// 预订表单字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingField {
    Name,
    Phone,
    Duration,
    StartTime,
}

impl BookingField {
    pub const ALL: [BookingField; 4] = [
        BookingField::Name,
        BookingField::Phone,
        BookingField::Duration,
        BookingField::StartTime,
    ];
}

/// 单条校验规则：check 返回 true 表示通过
struct Rule {
    field: BookingField,
    check: fn(&BookingDraft, DateTime<Utc>) -> bool,
    message: &'static str,
}

static RULES: [Rule; 7] = [
    Rule {
        field: BookingField::Name,
        check: name_present,
        message: "Name is required",
    },
    Rule {
        field: BookingField::Name,
        check: name_well_formed,
        message: "Enter a valid name (2-30 characters)",
    },
    Rule {
        field: BookingField::Phone,
        check: phone_present,
        message: "Phone number is required",
    },
    Rule {
        field: BookingField::Phone,
        check: phone_well_formed,
        message: "Enter a valid 10-digit Indian phone number",
    },
    Rule {
        field: BookingField::Duration,
        check: duration_in_range,
        message: "Duration must be between 1-8 hours",
    },
    Rule {
        field: BookingField::StartTime,
        check: start_time_present,
        message: "Please select a date and time",
    },
    Rule {
        field: BookingField::StartTime,
        check: start_time_far_enough,
        message: "Please select a time at least 30 minutes from now",
    },
];

fn name_present(draft: &BookingDraft, _now: DateTime<Utc>) -> bool {
    !draft.name.trim().is_empty()
}

fn name_well_formed(draft: &BookingDraft, _now: DateTime<Utc>) -> bool {
    NAME_REGEX.is_match(&draft.name)
}

fn phone_present(draft: &BookingDraft, _now: DateTime<Utc>) -> bool {
    !draft.phone.trim().is_empty()
}

fn phone_well_formed(draft: &BookingDraft, _now: DateTime<Utc>) -> bool {
    is_valid_phone(&draft.phone)
}

fn duration_in_range(draft: &BookingDraft, _now: DateTime<Utc>) -> bool {
    draft
        .duration_hours
        .is_some_and(|hours| (MIN_DURATION_HOURS..=MAX_DURATION_HOURS).contains(&hours))
}

fn start_time_present(draft: &BookingDraft, _now: DateTime<Utc>) -> bool {
    draft.start_time.is_some()
}

fn start_time_far_enough(draft: &BookingDraft, now: DateTime<Utc>) -> bool {
    draft
        .start_time
        .is_some_and(|start| start >= now + Duration::minutes(MIN_LEAD_MINUTES))
}

/// 号码去掉非数字后是否为有效的印度手机号
pub fn is_valid_phone(raw: &str) -> bool {
    PHONE_REGEX.is_match(&normalize_phone(raw))
}

/// 校验结果：字段 -> 错误消息（空字符串表示通过）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BookingErrors(BTreeMap<BookingField, String>);

impl BookingErrors {
    /// 指定字段的错误消息
    pub fn get(&self, field: BookingField) -> &str {
        self.0.get(&field).map(String::as_str).unwrap_or("")
    }

    /// 所有字段都通过才可提交
    pub fn is_valid(&self) -> bool {
        self.0.values().all(String::is_empty)
    }

    /// 失败的字段及其消息
    pub fn failures(&self) -> impl Iterator<Item = (BookingField, &str)> {
        self.0
            .iter()
            .filter(|(_, message)| !message.is_empty())
            .map(|(field, message)| (*field, message.as_str()))
    }
}

/// 校验预订草稿
pub fn validate_booking(draft: &BookingDraft, now: DateTime<Utc>) -> BookingErrors {
    let mut errors: BTreeMap<BookingField, String> = BookingField::ALL
        .iter()
        .map(|field| (*field, String::new()))
        .collect();

    for rule in RULES.iter() {
        let message = errors.entry(rule.field).or_default();
        if message.is_empty() && !(rule.check)(draft, now) {
            *message = rule.message.to_string();
        }
    }

    let result = BookingErrors(errors);
    tracing::debug!(
        premise_id = draft.premise_id,
        valid = result.is_valid(),
        failed_fields = result.failures().count(),
        "Booking draft validated"
    );
    result
}

/// 最早可选择的开始时间：当前时间 + 30 分钟，截断到分钟
///
/// 每次调用重新计算，不缓存。
pub fn min_start_time(now: DateTime<Utc>) -> DateTime<Utc> {
    let earliest = now + Duration::minutes(MIN_LEAD_MINUTES);
    earliest
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(earliest)
}
