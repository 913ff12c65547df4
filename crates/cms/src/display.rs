//! Formatting of values shown in tables.

use chrono::{DateTime, TimeZone, Utc};

/// Formats an amount of Vietnamese dong, e.g. `1.500.000 ₫`.
pub fn format_vnd(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{grouped} ₫")
}

pub fn format_date<Tz: TimeZone>(timestamp: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.with_timezone(tz).format("%d/%m/%Y").to_string()
}

pub fn format_datetime<Tz: TimeZone>(timestamp: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.with_timezone(tz).format("%d/%m/%Y %H:%M").to_string()
}

/// Footer of a paged table.
pub fn total_label(total: u64) -> String {
    format!("Total {total} items")
}

pub fn page_count(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size)).try_into().unwrap_or(u32::MAX)
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn vnd_uses_dots_between_thousands() {
        assert_eq!(format_vnd(1_500_000.0), "1.500.000 ₫");
        assert_eq!(format_vnd(999.0), "999 ₫");
        assert_eq!(format_vnd(1000.4), "1.000 ₫");
        assert_eq!(format_vnd(0.0), "0 ₫");
        assert_eq!(format_vnd(-25_000.0), "-25.000 ₫");
    }

    #[test]
    fn dates_are_shown_in_the_given_zone() {
        let timestamp = cms_api::timestamp::parse("2024-03-01T20:30:00Z").unwrap();
        let hanoi = FixedOffset::east_opt(7 * 3600).unwrap();
        assert_eq!(format_date(&timestamp, &hanoi), "02/03/2024");
        assert_eq!(format_datetime(&timestamp, &Utc), "01/03/2024 20:30");
    }

    #[test]
    fn pages_round_up() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(11, 0), 0);
    }
}
