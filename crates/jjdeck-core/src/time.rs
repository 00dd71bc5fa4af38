use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

/// Renders a change-set timestamp as `YYYY-MM-DD HH:MM`, or returns the
/// input untouched when it is not RFC 3339.
pub fn format_change_date(raw: &str) -> String {
    let display = format_description!("[year]-[month]-[day] [hour]:[minute]");
    OffsetDateTime::parse(raw.trim(), &Rfc3339)
        .ok()
        .and_then(|value| value.format(&display).ok())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_change_date_keeps_local_offset_time() {
        assert_eq!(
            format_change_date("2026-01-05T10:07:00+02:00"),
            "2026-01-05 10:07"
        );
        assert_eq!(
            format_change_date(" 2026-01-05T22:59:00Z\n"),
            "2026-01-05 22:59"
        );
    }

    #[test]
    fn unparseable_dates_pass_through() {
        assert_eq!(format_change_date("yesterday"), "yesterday");
        assert_eq!(format_change_date(""), "");
    }
}
