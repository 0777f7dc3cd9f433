//! Codecs between raw JSON values and the typed scalar value spaces of the
//! vocabulary: strings, floats, non-negative integers, booleans, RFC 3339
//! date-times, xsd:duration spans, BCP 47 language tags, media types,
//! RFC 5988 link-relation tokens and absolute IRIs.
//!
//! Decoding is a pure format check. A mismatch returns [`Error::Format`],
//! which the union engine reads as "this alternative does not apply" rather
//! than as a fatal condition.

use chrono::{DateTime, Duration, FixedOffset, SecondsFormat};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};

lazy_static! {
    // Lexical space of xsd:duration, restricted to integral fields except
    // for the seconds component.
    static ref DURATION_REGEX: Regex =
        Regex::new(r"^(-)?P(?:(\d+)Y)?(?:(\d+)M)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)(?:\.(\d{1,3}))?S)?)?$").expect("duration regex compiles");

    // Language-Tag shape from BCP 47, without registry validation.
    static ref LANG_TAG_REGEX: Regex =
        Regex::new(r"^[A-Za-z]{1,8}(-[A-Za-z0-9]{1,8})*$").expect("language tag regex compiles");

    // type/subtype with optional parameters.
    static ref MEDIA_TYPE_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]*/[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]*(;.*)?$").expect("media type regex compiles");

    // reg-rel-type from RFC 5988 section 4.1.
    static ref LINK_REL_REGEX: Regex =
        Regex::new(r"^[a-z][a-z0-9.\-]*$").expect("link relation regex compiles");
}

fn mismatch(expected: &'static str, raw: &Value) -> Error {
    Error::Format {
        expected,
        value: raw.clone(),
    }
}

pub fn decode_string(raw: &Value) -> Result<String> {
    raw.as_str()
        .map(str::to_owned)
        .ok_or_else(|| mismatch("string", raw))
}

pub fn encode_string(value: &str) -> Value {
    Value::String(value.to_owned())
}

pub fn decode_float(raw: &Value) -> Result<f64> {
    raw.as_f64().ok_or_else(|| mismatch("float", raw))
}

pub fn encode_float(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Rejects negative numbers and numbers carrying a fractional part.
pub fn decode_non_neg_int(raw: &Value) -> Result<u64> {
    raw.as_u64()
        .ok_or_else(|| mismatch("non-negative integer", raw))
}

pub fn encode_non_neg_int(value: u64) -> Value {
    Value::Number(value.into())
}

pub fn decode_bool(raw: &Value) -> Result<bool> {
    raw.as_bool().ok_or_else(|| mismatch("boolean", raw))
}

pub fn encode_bool(value: bool) -> Value {
    Value::Bool(value)
}

pub fn decode_date_time(raw: &Value) -> Result<DateTime<FixedOffset>> {
    let s = raw.as_str().ok_or_else(|| mismatch("date-time", raw))?;
    DateTime::parse_from_rfc3339(s).map_err(|_| mismatch("date-time", raw))
}

pub fn encode_date_time(value: &DateTime<FixedOffset>) -> Value {
    Value::String(value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// Decodes the xsd:duration lexical form into a fixed span.
///
/// Years and months have no fixed length; they enter as 365-day and 30-day
/// spans respectively, so durations using those fields round-trip
/// semantically rather than lexically.
pub fn decode_duration(raw: &Value) -> Result<Duration> {
    let s = raw.as_str().ok_or_else(|| mismatch("duration", raw))?;
    let caps = DURATION_REGEX
        .captures(s)
        .ok_or_else(|| mismatch("duration", raw))?;

    let field = |i: usize| -> i64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    if (2..=7).all(|i| caps.get(i).is_none()) {
        // "P" and "-PT" carry no component at all.
        return Err(mismatch("duration", raw));
    }

    let mut span = Duration::days(field(2) * 365)
        + Duration::days(field(3) * 30)
        + Duration::days(field(4))
        + Duration::hours(field(5))
        + Duration::minutes(field(6))
        + Duration::seconds(field(7));
    if let Some(frac) = caps.get(8) {
        // The regex caps the fraction at millisecond precision.
        let digits = format!("{:0<3}", frac.as_str());
        span = span + Duration::milliseconds(digits.parse().unwrap_or(0));
    }
    if caps.get(1).is_some() {
        span = -span;
    }
    Ok(span)
}

/// Encodes a span as a day/hour/minute/second decomposition.
pub fn encode_duration(value: &Duration) -> Value {
    let negative = *value < Duration::zero();
    let mut rest = if negative { -*value } else { *value };

    let days = rest.num_days();
    rest = rest - Duration::days(days);
    let hours = rest.num_hours();
    rest = rest - Duration::hours(hours);
    let minutes = rest.num_minutes();
    rest = rest - Duration::minutes(minutes);
    let seconds = rest.num_seconds();
    let millis = rest.num_milliseconds() - seconds * 1000;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push('P');
    if days != 0 {
        out.push_str(&format!("{days}D"));
    }
    if hours != 0 || minutes != 0 || seconds != 0 || millis != 0 || days == 0 {
        out.push('T');
        if hours != 0 {
            out.push_str(&format!("{hours}H"));
        }
        if minutes != 0 {
            out.push_str(&format!("{minutes}M"));
        }
        if millis != 0 {
            out.push_str(&format!("{seconds}.{millis:03}S"));
        } else if seconds != 0 || (days == 0 && hours == 0 && minutes == 0) {
            out.push_str(&format!("{seconds}S"));
        }
    }
    Value::String(out)
}

pub fn decode_lang_tag(raw: &Value) -> Result<String> {
    let s = raw.as_str().ok_or_else(|| mismatch("language tag", raw))?;
    if LANG_TAG_REGEX.is_match(s) {
        Ok(s.to_owned())
    } else {
        Err(mismatch("language tag", raw))
    }
}

pub fn decode_media_type(raw: &Value) -> Result<String> {
    let s = raw.as_str().ok_or_else(|| mismatch("media type", raw))?;
    if MEDIA_TYPE_REGEX.is_match(s) {
        Ok(s.to_owned())
    } else {
        Err(mismatch("media type", raw))
    }
}

pub fn decode_link_rel(raw: &Value) -> Result<String> {
    let s = raw.as_str().ok_or_else(|| mismatch("link relation", raw))?;
    if LINK_REL_REGEX.is_match(s) {
        Ok(s.to_owned())
    } else {
        Err(mismatch("link relation", raw))
    }
}

/// Only absolute IRIs qualify; a relative reference fails the check and the
/// value falls through to the next declared alternative.
pub fn decode_iri(raw: &Value) -> Result<Url> {
    let s = raw.as_str().ok_or_else(|| mismatch("IRI", raw))?;
    Url::parse(s).map_err(|_| mismatch("IRI", raw))
}

pub fn encode_iri(value: &Url) -> Value {
    Value::String(value.as_str().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_negative_integer_rejects_negatives_and_fractions() {
        assert_eq!(decode_non_neg_int(&json!(3)).unwrap(), 3);
        assert!(decode_non_neg_int(&json!(-3)).is_err());
        assert!(decode_non_neg_int(&json!(3.5)).is_err());
        assert!(decode_non_neg_int(&json!("3")).is_err());
    }

    #[test]
    fn date_time_round_trips_in_utc() {
        let raw = json!("2024-05-01T12:00:00Z");
        let dt = decode_date_time(&raw).unwrap();
        assert_eq!(encode_date_time(&dt), raw);
    }

    #[test]
    fn date_time_keeps_offset_and_fraction() {
        let raw = json!("2024-05-01T12:00:00.250+02:00");
        let dt = decode_date_time(&raw).unwrap();
        assert_eq!(encode_date_time(&dt), raw);
        assert!(decode_date_time(&json!("yesterday")).is_err());
    }

    #[test]
    fn duration_parses_each_component() {
        assert_eq!(decode_duration(&json!("PT5M")).unwrap(), Duration::minutes(5));
        assert_eq!(
            decode_duration(&json!("P1DT2H")).unwrap(),
            Duration::days(1) + Duration::hours(2)
        );
        assert_eq!(decode_duration(&json!("-PT90S")).unwrap(), Duration::seconds(-90));
        assert_eq!(decode_duration(&json!("P1Y")).unwrap(), Duration::days(365));
        assert_eq!(decode_duration(&json!("P2M")).unwrap(), Duration::days(60));
        assert_eq!(
            decode_duration(&json!("PT0.500S")).unwrap(),
            Duration::milliseconds(500)
        );
    }

    #[test]
    fn duration_rejects_empty_and_garbage() {
        assert!(decode_duration(&json!("P")).is_err());
        assert!(decode_duration(&json!("PT")).is_err());
        assert!(decode_duration(&json!("5 minutes")).is_err());
        assert!(decode_duration(&json!(300)).is_err());
    }

    #[test]
    fn duration_encodes_decomposed() {
        assert_eq!(encode_duration(&Duration::minutes(5)), json!("PT5M"));
        assert_eq!(
            encode_duration(&(Duration::days(1) + Duration::hours(2))),
            json!("P1DT2H")
        );
        assert_eq!(encode_duration(&Duration::seconds(-90)), json!("-PT1M30S"));
        assert_eq!(encode_duration(&Duration::zero()), json!("PT0S"));
    }

    #[test]
    fn duration_round_trips_lexically_without_year_month_fields() {
        for s in ["PT5M", "P3DT4H12M9S", "-PT2H", "PT0S"] {
            let d = decode_duration(&json!(s)).unwrap();
            assert_eq!(encode_duration(&d), json!(s));
        }
    }

    #[test]
    fn language_tags_follow_bcp47_shape() {
        assert!(decode_lang_tag(&json!("en")).is_ok());
        assert!(decode_lang_tag(&json!("zh-Hant")).is_ok());
        assert!(decode_lang_tag(&json!("en-US-x-twain")).is_ok());
        assert!(decode_lang_tag(&json!("not a tag")).is_err());
        assert!(decode_lang_tag(&json!("")).is_err());
    }

    #[test]
    fn media_types_require_type_and_subtype() {
        assert!(decode_media_type(&json!("text/html")).is_ok());
        assert!(decode_media_type(&json!("application/ld+json")).is_ok());
        assert!(decode_media_type(&json!("text/html; charset=utf-8")).is_ok());
        assert!(decode_media_type(&json!("html")).is_err());
        assert!(decode_media_type(&json!("https://example.com/page")).is_err());
    }

    #[test]
    fn link_relations_are_lowercase_tokens() {
        assert!(decode_link_rel(&json!("next")).is_ok());
        assert!(decode_link_rel(&json!("canonical")).is_ok());
        assert!(decode_link_rel(&json!("Next Page")).is_err());
    }

    #[test]
    fn iri_must_be_absolute() {
        assert!(decode_iri(&json!("https://example.com/notes/1")).is_ok());
        assert!(decode_iri(&json!("/notes/1")).is_err());
        assert!(decode_iri(&json!(42)).is_err());
    }
}
