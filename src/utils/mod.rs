use std::time::Duration;

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts},
    http::{HeaderMap, HeaderName},
};
use serde::Serialize;
use thiserror::Error;

use crate::{error::AppError, result::ApiResponse};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("invalid duration {0:?}")]
    Malformed(String),

    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),

    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { input: String, unit: String },
}

/// 解析时长字符串，支持 "d"(天)、"h"、"m"、"s"、"ms"，可组合，如 "1d12h"、"1.5h"。
///
/// 空字符串和 "0" 视为零时长。
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let s = input.trim();
    if s.is_empty() || s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total_secs = 0f64;
    let mut rest = s;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        if number.is_empty() {
            return Err(DurationError::Malformed(input.to_string()));
        }
        let value: f64 = number
            .parse()
            .map_err(|_| DurationError::Malformed(input.to_string()))?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);
        let secs = match unit {
            "d" => value * 86_400.0,
            "h" => value * 3_600.0,
            "m" => value * 60.0,
            "s" => value,
            "ms" => value / 1_000.0,
            "" => return Err(DurationError::MissingUnit(input.to_string())),
            other => {
                return Err(DurationError::UnknownUnit {
                    input: input.to_string(),
                    unit: other.to_string(),
                });
            }
        };

        total_secs += secs;
        rest = next;
    }

    Duration::try_from_secs_f64(total_secs).map_err(|_| DurationError::Malformed(input.to_string()))
}

/// 读取请求头，非 ASCII 或缺失时返回 None
pub fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// JSON 请求体，解析失败时返回 invalid/request_body
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// 路径参数，解析失败时返回 invalid/path_param
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct PathParam<T>(pub T);

pub fn success_to_api_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_units() {
        assert_eq!(parse_duration("15m"), Ok(Duration::from_secs(900)));
        assert_eq!(parse_duration("2h"), Ok(Duration::from_secs(7_200)));
        assert_eq!(parse_duration("45s"), Ok(Duration::from_secs(45)));
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
    }

    #[test]
    fn parses_day_unit() {
        assert_eq!(parse_duration("7d"), Ok(Duration::from_secs(7 * 86_400)));
        assert_eq!(parse_duration("1d12h"), Ok(Duration::from_secs(36 * 3_600)));
    }

    #[test]
    fn parses_fractional_and_compound_values() {
        assert_eq!(parse_duration("1.5h"), Ok(Duration::from_secs(5_400)));
        assert_eq!(parse_duration("1h30m"), Ok(Duration::from_secs(5_400)));
    }

    #[test]
    fn empty_and_zero_are_zero() {
        assert_eq!(parse_duration(""), Ok(Duration::ZERO));
        assert_eq!(parse_duration("0"), Ok(Duration::ZERO));
        assert_eq!(parse_duration("0s"), Ok(Duration::ZERO));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(parse_duration("15"), Err(DurationError::MissingUnit(_))));
        assert!(matches!(
            parse_duration("3w"),
            Err(DurationError::UnknownUnit { .. })
        ));
        assert!(matches!(parse_duration("h"), Err(DurationError::Malformed(_))));
        assert!(matches!(parse_duration("1..5h"), Err(DurationError::Malformed(_))));
        assert!(matches!(parse_duration("-5m"), Err(DurationError::Malformed(_))));
    }
}
