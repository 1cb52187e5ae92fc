use crate::models::DateStyle;

/// True when `value` is exactly eight ASCII digits, the `YYYYMMDD` shape.
pub fn is_compact_date(value: &str) -> bool {
    value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit())
}

/// Rearranges a `YYYYMMDD` string. No calendar check is made.
pub fn reformat(raw: &str, style: DateStyle) -> Option<String> {
    if !is_compact_date(raw) {
        return None;
    }
    let (year, month, day) = (&raw[0..4], &raw[4..6], &raw[6..8]);
    Some(match style {
        DateStyle::DayMonthYear => format!("{}/{}/{}", day, month, year),
        DateStyle::Iso => format!("{}-{}-{}", year, month, day),
    })
}

/// Inverse of [`reformat`].
pub fn restore(formatted: &str, style: DateStyle) -> Option<String> {
    let separator = match style {
        DateStyle::DayMonthYear => '/',
        DateStyle::Iso => '-',
    };
    let parts: Vec<&str> = formatted.split(separator).collect();
    let compact = match (style, parts.as_slice()) {
        (DateStyle::DayMonthYear, [day, month, year])
            if day.len() == 2 && month.len() == 2 && year.len() == 4 =>
        {
            format!("{}{}{}", year, month, day)
        }
        (DateStyle::Iso, [year, month, day])
            if year.len() == 4 && month.len() == 2 && day.len() == 2 =>
        {
            format!("{}{}{}", year, month, day)
        }
        _ => return None,
    };
    if is_compact_date(&compact) {
        Some(compact)
    } else {
        None
    }
}

/// Birth date slot value as it goes into a record.
pub fn birth_date_field(raw: &str, style: DateStyle) -> String {
    let trimmed = raw.trim();
    reformat(trimmed, style).unwrap_or_else(|| trimmed.to_string())
}
