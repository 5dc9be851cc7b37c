// ==========================================
// spooltrack - payload validation
// ==========================================
// Validation runs before any store access. Violations are collected per
// field, not reported one at a time.
// ==========================================

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::api::error::{ApiError, ApiResult, FieldViolation};
use crate::api::filament_api::{CreateFilamentPayload, CreateUsagePayload};

/// Parse a date field from the wire.
///
/// HTML date inputs send "YYYY-MM-DD", which is normalized to midnight UTC;
/// full RFC3339 timestamps are accepted as-is.
pub fn parse_date_field(field: &str, value: &str) -> Result<DateTime<Utc>, FieldViolation> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| FieldViolation {
            field: field.to_string(),
            message: format!("expected YYYY-MM-DD or RFC3339 date, got {value:?}"),
        })
}

fn require_non_empty(field: &str, value: &str, violations: &mut Vec<FieldViolation>) {
    if value.trim().is_empty() {
        violations.push(FieldViolation {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        });
    }
}

fn require_non_negative(field: &str, value: f64, violations: &mut Vec<FieldViolation>) {
    if !value.is_finite() || value < 0.0 {
        violations.push(FieldViolation {
            field: field.to_string(),
            message: "must be a non-negative number".to_string(),
        });
    }
}

fn reject(violations: Vec<FieldViolation>) -> ApiResult<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ApiError::ValidationError {
            message: format!("{} field(s) invalid", violations.len()),
            violations,
        })
    }
}

/// Validate a create-filament payload.
///
/// Required: brand, material, colorName, colorHex, diameter > 0,
/// totalWeight >= 0, remainingWeight in 0..=totalWeight, price >= 0.
pub fn validate_create_filament(payload: &CreateFilamentPayload) -> ApiResult<()> {
    let mut violations = Vec::new();

    require_non_empty("brand", &payload.brand, &mut violations);
    require_non_empty("material", &payload.material, &mut violations);
    require_non_empty("colorName", &payload.color_name, &mut violations);
    require_non_empty("colorHex", &payload.color_hex, &mut violations);

    if !payload.diameter.is_finite() || payload.diameter <= 0.0 {
        violations.push(FieldViolation {
            field: "diameter".to_string(),
            message: "must be a positive number".to_string(),
        });
    }
    require_non_negative("totalWeight", payload.total_weight, &mut violations);
    require_non_negative("remainingWeight", payload.remaining_weight, &mut violations);
    require_non_negative("price", payload.price, &mut violations);

    if payload.remaining_weight > payload.total_weight {
        violations.push(FieldViolation {
            field: "remainingWeight".to_string(),
            message: "must not exceed totalWeight".to_string(),
        });
    }

    reject(violations)
}

/// Validate remaining/total consistency after a partial update is merged.
pub fn validate_spool_weights(remaining: f64, total: f64) -> ApiResult<()> {
    let mut violations = Vec::new();
    require_non_negative("totalWeight", total, &mut violations);
    require_non_negative("remainingWeight", remaining, &mut violations);
    if remaining > total {
        violations.push(FieldViolation {
            field: "remainingWeight".to_string(),
            message: "must not exceed totalWeight".to_string(),
        });
    }
    reject(violations)
}

/// Validate a usage payload: gramsUsed >= 1.
pub fn validate_create_usage(payload: &CreateUsagePayload) -> ApiResult<()> {
    let mut violations = Vec::new();
    if !payload.grams_used.is_finite() || payload.grams_used < 1.0 {
        violations.push(FieldViolation {
            field: "gramsUsed".to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    reject(violations)
}
