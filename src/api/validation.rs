use chrono::NaiveDate;

use super::ApiError;

pub fn validate_id(resource: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {} ID: {}. ID must be a positive integer",
            resource, id
        )));
    }
    Ok(id)
}

/// Empty or whitespace-only query values mean "no filter".
fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

pub fn parse_id_param(name: &str, raw: Option<&str>) -> Result<Option<i32>, ApiError> {
    non_empty(raw)
        .map(|value| {
            value
                .parse::<i32>()
                .map_err(|_| ApiError::validation(format!("{name}: select a valid choice, got '{value}'")))
                .and_then(|id| validate_id(name, id))
        })
        .transpose()
}

pub fn parse_date_param(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    non_empty(raw)
        .map(|value| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                ApiError::validation(format!("{name}: enter a valid date (YYYY-MM-DD), got '{value}'"))
            })
        })
        .transpose()
}

pub fn parse_search_param(raw: Option<&str>) -> Option<String> {
    non_empty(raw).map(str::to_string)
}
