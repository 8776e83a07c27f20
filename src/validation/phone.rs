//! 手机号规范化与输入分组显示

/// 仅保留 ASCII 数字，用于校验和提交
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// 输入过程中的分组显示：`XXX YYY` 或 `XXXXX YYYYY`，超过 10 位的数字丢弃
///
/// 只影响显示，提交时仍使用 [`normalize_phone`] 的结果。
pub fn format_phone_number(raw: &str) -> String {
    let digits = normalize_phone(raw);
    let len = digits.len();

    if len < 4 {
        return digits;
    }
    if len < 7 {
        return format!("{} {}", &digits[..3], &digits[3..]);
    }
    format!("{} {}", &digits[..5], &digits[5..len.min(10)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("98765 43210"), "9876543210");
        assert_eq!(normalize_phone("+91-98765-43210"), "919876543210");
        assert_eq!(normalize_phone("abc"), "");
        // 全角数字不算数字
        assert_eq!(normalize_phone("９８7"), "7");
    }

    #[test]
    fn test_format_phone_number_progressive() {
        assert_eq!(format_phone_number(""), "");
        assert_eq!(format_phone_number("987"), "987");
        assert_eq!(format_phone_number("9876"), "987 6");
        assert_eq!(format_phone_number("987654"), "987 654");
        assert_eq!(format_phone_number("9876543"), "98765 43");
        assert_eq!(format_phone_number("9876543210"), "98765 43210");
    }

    #[test]
    fn test_format_phone_number_reformats_and_truncates() {
        assert_eq!(format_phone_number("987 6543"), "98765 43");
        assert_eq!(format_phone_number("98765432109999"), "98765 43210");
    }
}
