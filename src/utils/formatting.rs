//! Value formatting shared by CLI tables.

/// `12345` → `"12 345"`; negative values keep their sign.
pub fn km(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }

    if value < 0 {
        format!("-{out}")
    } else {
        out
    }
}

/// Unread odometer values show as `--`.
pub fn reading(value: i64) -> String {
    if value > 0 { km(value) } else { "--".into() }
}

pub fn opt_id(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "--".into())
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
