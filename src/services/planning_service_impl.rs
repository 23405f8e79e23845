//! `SeaORM` implementation of the `PlanningService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveTime;
use tracing::{debug, info, warn};

use crate::api::types::PlanningDto;
use crate::db::Store;
use crate::domain::{Caller, MagasinId, PlanningId, ScopeRegistry, UserId};
use crate::models::{NewPlanning, Planning, PlanningChanges, PlanningQuery};
use crate::services::planning_service::{PlanningError, PlanningService};

pub struct SeaOrmPlanningService {
    store: Store,
    scopes: Arc<ScopeRegistry>,
}

impl SeaOrmPlanningService {
    #[must_use]
    pub const fn new(store: Store, scopes: Arc<ScopeRegistry>) -> Self {
        Self { store, scopes }
    }

    /// Loads a record the caller is allowed to see. Records outside the
    /// caller's scope are reported exactly like missing ones.
    async fn load_visible(
        &self,
        caller: &Caller,
        id: PlanningId,
    ) -> Result<Planning, PlanningError> {
        let planning = self
            .store
            .get_planning(id)
            .await?
            .ok_or(PlanningError::NotFound(id))?;

        if !self
            .scopes
            .resolve(caller)
            .permits(planning.user, planning.magasin)
        {
            debug!(planning_id = %id, user_id = %caller.id, "Planning outside caller scope");
            return Err(PlanningError::NotFound(id));
        }

        Ok(planning)
    }

    /// A writer may only move a record to a user or store they could see.
    fn ensure_within_scope(&self, caller: &Caller, planning: &Planning) -> Result<(), PlanningError> {
        if self
            .scopes
            .resolve(caller)
            .permits(planning.user, planning.magasin)
        {
            return Ok(());
        }

        metrics::counter!("planning_permission_denied_total", "action" => "reassign").increment(1);
        warn!(
            planning_id = %planning.id,
            user_id = %caller.id,
            role = %caller.role,
            magasin_id = %planning.magasin,
            "Planning moved outside caller scope"
        );
        Err(PlanningError::PermissionDenied(
            "Cannot move a planning outside your scope".to_string(),
        ))
    }

    async fn ensure_references(
        &self,
        user: Option<UserId>,
        magasin: Option<MagasinId>,
    ) -> Result<(), PlanningError> {
        if let Some(user) = user
            && !self.store.user_exists(user).await?
        {
            return Err(PlanningError::Validation(format!(
                "Invalid user {user}: object does not exist"
            )));
        }

        if let Some(magasin) = magasin
            && self.store.get_magasin(magasin).await?.is_none()
        {
            return Err(PlanningError::Validation(format!(
                "Invalid magasin {magasin}: object does not exist"
            )));
        }

        Ok(())
    }

    async fn present(&self, plannings: Vec<Planning>) -> Result<Vec<PlanningDto>, PlanningError> {
        let mut user_ids: Vec<UserId> = plannings
            .iter()
            .flat_map(|p| std::iter::once(p.user).chain(p.created_by))
            .collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let mut magasin_ids: Vec<MagasinId> = plannings.iter().map(|p| p.magasin).collect();
        magasin_ids.sort_unstable();
        magasin_ids.dedup();

        let users = self.store.get_users(&user_ids).await?;
        let magasins = self.store.get_magasins(&magasin_ids).await?;

        Ok(plannings
            .into_iter()
            .map(|p| {
                let assignee = users.get(&p.user);
                let creator = p.created_by.and_then(|id| users.get(&id));
                let magasin = magasins.get(&p.magasin);
                PlanningDto::new(p, assignee, magasin, creator)
            })
            .collect())
    }

    async fn present_one(&self, planning: Planning) -> Result<PlanningDto, PlanningError> {
        self.present(vec![planning])
            .await?
            .pop()
            .ok_or_else(|| PlanningError::Internal("Failed to render planning".to_string()))
    }
}

fn ensure_writer(caller: &Caller, action: &'static str) -> Result<(), PlanningError> {
    if caller.role.can_write_plannings() {
        return Ok(());
    }

    metrics::counter!("planning_permission_denied_total", "action" => action).increment(1);
    warn!(
        user_id = %caller.id,
        role = %caller.role,
        action,
        "Planning write rejected"
    );
    Err(PlanningError::PermissionDenied(
        "Only managers and admins can manage plannings".to_string(),
    ))
}

fn ensure_fields(tache: &str, debut: NaiveTime, fin: NaiveTime) -> Result<(), PlanningError> {
    if tache.trim().is_empty() {
        return Err(PlanningError::Validation("tache cannot be empty".to_string()));
    }

    if debut > fin {
        return Err(PlanningError::Validation(format!(
            "heure_debut ({debut}) must not be after heure_fin ({fin})"
        )));
    }

    Ok(())
}

#[async_trait]
impl PlanningService for SeaOrmPlanningService {
    async fn list(
        &self,
        caller: &Caller,
        query: &PlanningQuery,
    ) -> Result<Vec<PlanningDto>, PlanningError> {
        let scope = self.scopes.resolve(caller);
        debug!(user_id = %caller.id, role = %caller.role, ?scope, "Listing plannings");

        let plannings = self.store.list_plannings(scope, query).await?;
        self.present(plannings).await
    }

    async fn create(
        &self,
        caller: &Caller,
        payload: NewPlanning,
    ) -> Result<PlanningDto, PlanningError> {
        ensure_writer(caller, "create")?;
        ensure_fields(&payload.tache, payload.heure_debut, payload.heure_fin)?;
        self.ensure_references(Some(payload.user), Some(payload.magasin))
            .await?;

        let planning = self.store.insert_planning(payload, caller.id).await?;

        metrics::counter!("plannings_created_total").increment(1);
        info!(
            planning_id = %planning.id,
            created_by = %caller.id,
            magasin_id = %planning.magasin,
            "Planning created"
        );

        self.present_one(planning).await
    }

    async fn get(&self, caller: &Caller, id: PlanningId) -> Result<PlanningDto, PlanningError> {
        let planning = self.load_visible(caller, id).await?;
        self.present_one(planning).await
    }

    async fn update(
        &self,
        caller: &Caller,
        id: PlanningId,
        changes: PlanningChanges,
    ) -> Result<PlanningDto, PlanningError> {
        let existing = self.load_visible(caller, id).await?;
        ensure_writer(caller, "update")?;

        let merged = existing.merged(&changes);
        self.ensure_within_scope(caller, &merged)?;
        ensure_fields(&merged.tache, merged.heure_debut, merged.heure_fin)?;
        self.ensure_references(
            changes.user.filter(|u| *u != existing.user),
            changes.magasin.filter(|m| *m != existing.magasin),
        )
        .await?;

        let planning = self
            .store
            .update_planning(id, changes)
            .await?
            .ok_or(PlanningError::NotFound(id))?;

        info!(planning_id = %id, updated_by = %caller.id, "Planning updated");

        self.present_one(planning).await
    }

    async fn delete(&self, caller: &Caller, id: PlanningId) -> Result<(), PlanningError> {
        self.load_visible(caller, id).await?;
        ensure_writer(caller, "delete")?;

        if !self.store.delete_planning(id).await? {
            return Err(PlanningError::NotFound(id));
        }

        metrics::counter!("plannings_deleted_total").increment(1);
        info!(planning_id = %id, deleted_by = %caller.id, "Planning deleted");
        Ok(())
    }
}
