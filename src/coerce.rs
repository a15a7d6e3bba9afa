//! Conversions from editor input strings into typed field values.
//!
//! Timestamps: the edit widget works in a configured display offset (UTC unless
//! configured otherwise), never the host's ambient zone. Canonical timestamps
//! exchanged with the services are RFC 3339 in UTC.

use crate::WidgetError;
use std::sync::OnceLock;
use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

fn local_input_format() -> &'static [FormatItem<'static>] {
    static FMT: OnceLock<Vec<FormatItem<'static>>> = OnceLock::new();
    FMT.get_or_init(|| {
        time::format_description::parse(
            "[year]-[month padding:zero]-[day padding:zero]T[hour padding:zero]:[minute padding:zero]:[second padding:zero]",
        )
        .expect("valid time format")
    })
}

fn local_display_format() -> &'static [FormatItem<'static>] {
    static FMT: OnceLock<Vec<FormatItem<'static>>> = OnceLock::new();
    FMT.get_or_init(|| {
        time::format_description::parse(
            "[year]-[month padding:zero]-[day padding:zero]T[hour padding:zero]:[minute padding:zero]",
        )
        .expect("valid time format")
    })
}

fn offset_format() -> &'static [FormatItem<'static>] {
    static FMT: OnceLock<Vec<FormatItem<'static>>> = OnceLock::new();
    FMT.get_or_init(|| {
        time::format_description::parse("[offset_hour sign:mandatory]:[offset_minute]")
            .expect("valid offset format")
    })
}

/// Empty text means "no order"; anything else must be an integer.
pub fn parse_order(text: &str) -> Result<Option<i64>, WidgetError> {
    let t = text.trim();
    if t.is_empty() {
        return Ok(None);
    }
    t.parse::<i64>()
        .map(Some)
        .map_err(|_| WidgetError::conversion("order", text))
}

pub fn parse_flag(text: &str) -> Result<bool, WidgetError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "on" => Ok(true),
        "false" | "0" | "no" | "n" | "off" => Ok(false),
        _ => Err(WidgetError::conversion("active", text)),
    }
}

/// Blank group names collapse to "no group".
pub fn parse_group(text: &str) -> Option<String> {
    let t = text.trim();
    (!t.is_empty()).then(|| t.to_string())
}

/// Interpret a `YYYY-MM-DDTHH:MM[:SS]` string in `offset` and return the instant in UTC.
pub fn local_to_canonical(text: &str, offset: UtcOffset) -> Result<OffsetDateTime, WidgetError> {
    let mut normalized = text.trim().replacen(' ', "T", 1);
    // Date (10) + 'T' + HH:MM (5); seconds are optional in the editor.
    if normalized.len() == 16 {
        normalized.push_str(":00");
    }
    let local = PrimitiveDateTime::parse(&normalized, local_input_format())
        .map_err(|_| WidgetError::conversion("timestamp", text))?;
    local
        .assume_offset(offset)
        .checked_to_offset(UtcOffset::UTC)
        .ok_or_else(|| WidgetError::conversion("timestamp", text))
}

/// Render `dt` in `offset`. Instants that cannot be shifted into `offset`
/// fall back to the canonical form.
pub fn canonical_to_local(dt: OffsetDateTime, offset: UtcOffset) -> String {
    dt.checked_to_offset(offset)
        .and_then(|local| local.format(local_display_format()).ok())
        .unwrap_or_else(|| format_canonical(dt))
}

/// Parse an RFC 3339 instant and shift it to UTC. Instants outside the
/// representable range once in UTC are a conversion error.
pub fn parse_canonical(text: &str) -> Result<OffsetDateTime, WidgetError> {
    OffsetDateTime::parse(text.trim(), &Rfc3339)
        .ok()
        .and_then(|dt| dt.checked_to_offset(UtcOffset::UTC))
        .ok_or_else(|| WidgetError::conversion("timestamp", text))
}

pub fn format_canonical(dt: OffsetDateTime) -> String {
    dt.checked_to_offset(UtcOffset::UTC)
        .and_then(|utc| utc.format(&Rfc3339).ok())
        .unwrap_or_else(|| dt.to_string())
}

/// `UTC`, `Z` or a signed `HH:MM` offset.
pub fn parse_utc_offset(text: &str) -> Result<UtcOffset, WidgetError> {
    let t = text.trim();
    if t.is_empty() || t.eq_ignore_ascii_case("utc") || t.eq_ignore_ascii_case("z") {
        return Ok(UtcOffset::UTC);
    }
    UtcOffset::parse(t, offset_format()).map_err(|_| WidgetError::conversion("offset", text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset(h: i8, m: i8) -> UtcOffset {
        UtcOffset::from_hms(h, m, 0).unwrap()
    }

    #[test]
    fn order_parsing() {
        assert_eq!(parse_order("").unwrap(), None);
        assert_eq!(parse_order("   ").unwrap(), None);
        assert_eq!(parse_order("12").unwrap(), Some(12));
        assert_eq!(parse_order(" -3 ").unwrap(), Some(-3));
        assert!(parse_order("1.5").is_err());
        assert!(parse_order("abc").is_err());
    }

    #[test]
    fn flag_parsing() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(parse_flag("on").unwrap());
        assert!(!parse_flag("0").unwrap());
        assert!(!parse_flag(" No ").unwrap());
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn local_time_without_seconds_gets_seconds_appended() {
        let dt = local_to_canonical("2024-03-05T14:30", UtcOffset::UTC).unwrap();
        assert_eq!(format_canonical(dt), "2024-03-05T14:30:00Z");

        let dt = local_to_canonical("2024-03-05 14:30:15", UtcOffset::UTC).unwrap();
        assert_eq!(format_canonical(dt), "2024-03-05T14:30:15Z");
    }

    #[test]
    fn local_time_is_interpreted_in_display_offset() {
        let dt = local_to_canonical("2024-03-05T14:30", offset(2, 0)).unwrap();
        assert_eq!(format_canonical(dt), "2024-03-05T12:30:00Z");

        assert_eq!(canonical_to_local(dt, offset(2, 0)), "2024-03-05T14:30");
        assert_eq!(canonical_to_local(dt, offset(-5, -30)), "2024-03-05T07:00");
    }

    #[test]
    fn malformed_local_time_is_rejected() {
        assert!(local_to_canonical("", UtcOffset::UTC).is_err());
        assert!(local_to_canonical("2024-13-05T14:30", UtcOffset::UTC).is_err());
        assert!(local_to_canonical("yesterday", UtcOffset::UTC).is_err());
    }

    #[test]
    fn canonical_parsing_normalizes_to_utc() {
        let dt = parse_canonical("2024-03-05T14:30:00+01:00").unwrap();
        assert_eq!(format_canonical(dt), "2024-03-05T13:30:00Z");
        assert!(parse_canonical("not a date").is_err());
    }

    #[test]
    fn out_of_range_instants_are_conversion_errors() {
        let err = local_to_canonical("9999-12-31T23:30", offset(-5, 0)).unwrap_err();
        assert_eq!(err, WidgetError::conversion("timestamp", "9999-12-31T23:30"));
        assert!(local_to_canonical("-9999-01-01T00:10", offset(5, 0)).is_err());

        assert!(parse_canonical("9999-12-31T23:30:00-05:00").is_err());
        assert!(parse_canonical("9999-12-31T23:30:00Z").is_ok());
    }

    #[test]
    fn local_rendering_falls_back_to_canonical_at_the_range_edge() {
        let dt = parse_canonical("9999-12-31T23:30:00Z").unwrap();
        assert_eq!(canonical_to_local(dt, offset(2, 0)), "9999-12-31T23:30:00Z");
        assert_eq!(canonical_to_local(dt, offset(-2, 0)), "9999-12-31T21:30");
    }

    #[test]
    fn offsets() {
        assert_eq!(parse_utc_offset("UTC").unwrap(), UtcOffset::UTC);
        assert_eq!(parse_utc_offset("").unwrap(), UtcOffset::UTC);
        assert_eq!(parse_utc_offset("+02:00").unwrap(), offset(2, 0));
        assert_eq!(parse_utc_offset("-05:30").unwrap(), offset(-5, -30));
        assert!(parse_utc_offset("02:00").is_err());
    }
}
