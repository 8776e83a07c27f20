//! 预订总价计算
//!
//! 价格文本形如 "₹150/hr"：去掉数字和小数点以外的字符，取开头的十进制数，
//! 乘以时长并保留两位小数。车场、价格或时长缺失以及价格无法解析时返回 "0.00"。

use crate::models::premise::Premise;

const ZERO_TOTAL: &str = "0.00";

/// 从价格文本中提取每小时单价
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    // 遇到第二个小数点即截断，例如 "1.5.0" -> 1.5
    let mut end = 0;
    let mut seen_dot = false;
    for (idx, c) in cleaned.char_indices() {
        if c == '.' {
            if seen_dot {
                break;
            }
            seen_dot = true;
        }
        end = idx + c.len_utf8();
    }

    let number = &cleaned[..end];
    if !number.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    number.parse::<f64>().ok()
}

/// 计算总价，每次调用都根据当前车场和时长重新计算
pub fn calculate_total_price(premise: Option<&Premise>, duration_hours: Option<i64>) -> String {
    let unit_price = premise
        .and_then(|p| p.price.as_deref())
        .and_then(parse_price);

    match (unit_price, duration_hours) {
        (Some(price), Some(hours)) => {
            // 按分四舍五入，恰好一半时进位
            let cents = (price * hours as f64 * 100.0).round();
            format!("{:.2}", cents / 100.0)
        }
        _ => ZERO_TOTAL.to_string(),
    }
}
