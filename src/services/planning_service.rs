//! Domain service for role-scoped planning operations.
//!
//! Every operation takes the authenticated [`Caller`]. Reads are narrowed to
//! the caller's scope and never fail for lack of rights; writes require a
//! role that may manage plannings.

use crate::api::types::PlanningDto;
use crate::domain::{Caller, PlanningId};
use crate::models::{NewPlanning, PlanningChanges, PlanningQuery};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanningError {
    /// Missing, or outside the caller's scope.
    #[error("Planning {0} not found")]
    NotFound(PlanningId),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for PlanningError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for PlanningError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait PlanningService: Send + Sync {
    /// Lists the entries visible to `caller`, narrowed by `query`.
    ///
    /// An unknown role, or a manager without a store, yields an empty list.
    async fn list(
        &self,
        caller: &Caller,
        query: &PlanningQuery,
    ) -> Result<Vec<PlanningDto>, PlanningError>;

    /// # Errors
    ///
    /// - [`PlanningError::PermissionDenied`] unless the caller is a manager or admin
    /// - [`PlanningError::Validation`] for an unknown user/store or an inverted time range
    async fn create(
        &self,
        caller: &Caller,
        payload: NewPlanning,
    ) -> Result<PlanningDto, PlanningError>;

    async fn get(&self, caller: &Caller, id: PlanningId) -> Result<PlanningDto, PlanningError>;

    /// Applies a full or partial change set.
    ///
    /// # Errors
    ///
    /// [`PlanningError::NotFound`] takes precedence over
    /// [`PlanningError::PermissionDenied`].
    async fn update(
        &self,
        caller: &Caller,
        id: PlanningId,
        changes: PlanningChanges,
    ) -> Result<PlanningDto, PlanningError>;

    async fn delete(&self, caller: &Caller, id: PlanningId) -> Result<(), PlanningError>;
}
