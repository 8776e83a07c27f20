//! Booking domain models

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// 预订草稿：用户选择车场后逐字段填写
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub premise_id: i64,
    pub name: String,
    /// 用户输入的原始号码（可能带分组空格）
    pub phone: String,
    /// 停车时长（小时），缺失表示未填写
    pub duration_hours: Option<i64>,
    pub start_time: Option<DateTime<Utc>>,
}

impl BookingDraft {
    pub fn new(premise_id: i64) -> Self {
        Self {
            premise_id,
            name: String::new(),
            phone: String::new(),
            duration_hours: Some(1),
            start_time: None,
        }
    }
}

/// 解析时长输入，无法解析时视为缺失
pub fn parse_duration(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok()
}

/// 解析开始时间：RFC 3339，或按本地时区解释的 `YYYY-MM-DDTHH:MM`
pub fn parse_start_time(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc))
}

/// Create booking request (`POST /bookings/bookings/`)
#[derive(Debug, Clone, Serialize)]
pub struct CreateBookingRequest {
    pub premise_id: i64,
    pub name: String,
    /// 仅数字的 10 位号码
    pub phone: String,
    pub duration: i64,
    pub total_price: String,
    pub booking_time: DateTime<Utc>,
}

/// Booking status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Completed => "Completed",
            BookingStatus::Unknown => "Unknown",
        }
    }
}

/// Booking as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    #[serde(default)]
    pub premise: Option<super::premise::Premise>,
    pub name: String,
    pub phone: String,
    pub duration: i64,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "amount_as_string")]
    pub total_price: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub booking_time: Option<String>,
}

impl Booking {
    /// "1 hour" / "3 hours"
    pub fn display_duration(&self) -> String {
        format!(
            "{} hour{}",
            self.duration,
            if self.duration != 1 { "s" } else { "" }
        )
    }

    /// 本地日期，时间缺失时为 "Invalid date"
    pub fn display_date(&self) -> String {
        match self.start_time {
            Some(start) => start.with_timezone(&Local).format("%Y-%m-%d").to_string(),
            None => "Invalid date".to_string(),
        }
    }

    /// 本地时间段 "HH:MM - HH:MM"
    pub fn display_time_range(&self) -> String {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => format!(
                "{} - {}",
                start.with_timezone(&Local).format("%H:%M"),
                end.with_timezone(&Local).format("%H:%M")
            ),
            _ => "Invalid time range".to_string(),
        }
    }
}

/// Bookings split into the tabs of the bookings page
#[derive(Debug, Default, Serialize)]
pub struct GroupedBookings {
    pub current: Vec<Booking>,
    pub cancelled: Vec<Booking>,
    pub history: Vec<Booking>,
}

impl GroupedBookings {
    /// 各分组的展示摘要
    pub fn summaries(&self) -> GroupedSummaries {
        let summarize = |bookings: &[Booking]| -> Vec<BookingSummary> {
            bookings.iter().map(BookingSummary::from).collect()
        };
        GroupedSummaries {
            current: summarize(&self.current),
            cancelled: summarize(&self.cancelled),
            history: summarize(&self.history),
        }
    }
}

/// 预订列表中的一行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingSummary {
    pub id: i64,
    pub premise: Option<String>,
    pub status: &'static str,
    pub date: String,
    pub time: String,
    pub duration: String,
    pub total_price: String,
}

impl From<&Booking> for BookingSummary {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            premise: booking.premise.as_ref().map(|p| p.name.clone()),
            status: booking.status.label(),
            date: booking.display_date(),
            time: booking.display_time_range(),
            duration: booking.display_duration(),
            total_price: booking.total_price.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupedSummaries {
    pub current: Vec<BookingSummary>,
    pub cancelled: Vec<BookingSummary>,
    pub history: Vec<BookingSummary>,
}

/// 按状态分组，未知状态忽略
pub fn group_bookings(bookings: Vec<Booking>) -> GroupedBookings {
    let mut grouped = GroupedBookings::default();
    for booking in bookings {
        match booking.status {
            BookingStatus::Confirmed => grouped.current.push(booking),
            BookingStatus::Cancelled => grouped.cancelled.push(booking),
            BookingStatus::Completed => grouped.history.push(booking),
            BookingStatus::Unknown => {}
        }
    }
    grouped
}

/// DRF 的 DecimalField 可能序列化为字符串或数字
fn amount_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Text(String),
        Number(f64),
    }

    Ok(match Amount::deserialize(deserializer)? {
        Amount::Text(text) => text,
        Amount::Number(value) => format!("{:.2}", value),
    })
}
