//! Planning API endpoints.
//!
//! Handlers only translate HTTP into service calls; scoping and write
//! rights are enforced by [`PlanningService`](crate::services::PlanningService).

use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{parse_date_param, parse_id_param, parse_search_param};
use super::{ApiError, ApiResponse, AppState, PlanningDto};
use crate::domain::{Caller, MagasinId, PlanningId, UserId};
use crate::models::{NewPlanning, PlanningChanges, PlanningQuery, planning::parse_ordering};
use crate::services::PlanningError;

impl From<PlanningError> for ApiError {
    fn from(err: PlanningError) -> Self {
        match err {
            PlanningError::NotFound(id) => Self::not_found("Planning", id),
            PlanningError::PermissionDenied(msg) => Self::forbidden(msg),
            PlanningError::Validation(msg) => Self::validation(msg),
            PlanningError::Database(msg) => Self::DatabaseError(msg),
            PlanningError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// Raw list query string. Every value is optional and empty values are
/// treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct PlanningListParams {
    pub user: Option<String>,
    pub magasin: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "date__gte")]
    pub date_gte: Option<String>,
    #[serde(rename = "date__lte")]
    pub date_lte: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl PlanningListParams {
    pub fn into_query(self) -> Result<PlanningQuery, ApiError> {
        Ok(PlanningQuery {
            user: parse_id_param("user", self.user.as_deref())?.map(UserId::new),
            magasin: parse_id_param("magasin", self.magasin.as_deref())?.map(MagasinId::new),
            date: parse_date_param("date", self.date.as_deref())?,
            date_from: parse_date_param("date__gte", self.date_gte.as_deref())?,
            date_to: parse_date_param("date__lte", self.date_lte.as_deref())?,
            search: parse_search_param(self.search.as_deref()),
            ordering: self
                .ordering
                .as_deref()
                .map(parse_ordering)
                .unwrap_or_default(),
        })
    }
}

/// Ids are never assigned below 1, so such a path cannot name a record.
fn planning_id(id: i32) -> Result<PlanningId, ApiError> {
    if id <= 0 {
        return Err(ApiError::not_found("Planning", id));
    }
    Ok(PlanningId::new(id))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::validation(rejection.body_text()))
}

/// `GET /api/plannings`
pub async fn list_plannings(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    params: Result<Query<PlanningListParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<PlanningDto>>>, ApiError> {
    let Query(params) = params.map_err(|rejection| ApiError::validation(rejection.body_text()))?;
    let query = params.into_query()?;

    let plannings = state.planning_service().list(&caller, &query).await?;
    Ok(Json(ApiResponse::success(plannings)))
}

/// `POST /api/plannings`
pub async fn create_planning(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<NewPlanning>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(payload)?;

    let planning = state.planning_service().create(&caller, payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(planning))))
}

/// `GET /api/plannings/{id}`
pub async fn get_planning(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<PlanningDto>>, ApiError> {
    let id = planning_id(id)?;

    let planning = state.planning_service().get(&caller, id).await?;
    Ok(Json(ApiResponse::success(planning)))
}

/// `PUT /api/plannings/{id}`
///
/// Full replacement: every writable field is required, missing `notes`
/// clears them.
pub async fn replace_planning(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
    payload: Result<Json<NewPlanning>, JsonRejection>,
) -> Result<Json<ApiResponse<PlanningDto>>, ApiError> {
    let id = planning_id(id)?;
    let changes = PlanningChanges::from(json_body(payload)?);

    let planning = state.planning_service().update(&caller, id, changes).await?;
    Ok(Json(ApiResponse::success(planning)))
}

/// `PATCH /api/plannings/{id}`
pub async fn patch_planning(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
    payload: Result<Json<PlanningChanges>, JsonRejection>,
) -> Result<Json<ApiResponse<PlanningDto>>, ApiError> {
    let id = planning_id(id)?;
    let changes = json_body(payload)?;

    let planning = state.planning_service().update(&caller, id, changes).await?;
    Ok(Json(ApiResponse::success(planning)))
}

/// `DELETE /api/plannings/{id}`
pub async fn delete_planning(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = planning_id(id)?;

    state.planning_service().delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SortField, SortKey};
    use chrono::NaiveDate;

    #[test]
    fn list_params_treat_empty_values_as_absent() {
        let params = PlanningListParams {
            user: Some(String::new()),
            magasin: Some("7".to_string()),
            date: Some(" ".to_string()),
            ..PlanningListParams::default()
        };

        let query = params.into_query().unwrap();
        assert_eq!(query.user, None);
        assert_eq!(query.magasin, Some(MagasinId::new(7)));
        assert_eq!(query.date, None);
        assert!(query.ordering.is_empty());
    }

    #[test]
    fn list_params_parse_ranges_and_ordering() {
        let params = PlanningListParams {
            date_gte: Some("2024-01-01".to_string()),
            date_lte: Some("2024-01-31".to_string()),
            ordering: Some("-heure_fin".to_string()),
            ..PlanningListParams::default()
        };

        let query = params.into_query().unwrap();
        assert_eq!(query.date_from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(query.date_to, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(query.ordering, vec![SortKey::desc(SortField::HeureFin)]);
    }

    #[test]
    fn list_params_reject_malformed_values() {
        let params = PlanningListParams {
            user: Some("abc".to_string()),
            ..PlanningListParams::default()
        };
        assert!(matches!(
            params.into_query(),
            Err(ApiError::ValidationError(_))
        ));
    }

    #[test]
    fn non_positive_path_ids_are_not_found() {
        assert!(matches!(planning_id(0), Err(ApiError::NotFound(_))));
        assert!(matches!(planning_id(-1), Err(ApiError::NotFound(_))));
        assert_eq!(planning_id(3).unwrap(), PlanningId::new(3));
    }

    #[test]
    fn service_errors_map_to_api_errors() {
        assert!(matches!(
            ApiError::from(PlanningError::NotFound(PlanningId::new(4))),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(PlanningError::PermissionDenied("no".into())),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from(PlanningError::Validation("bad".into())),
            ApiError::ValidationError(_)
        ));
    }
}
