use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, Set, sea_query::LikeExpr,
};

use crate::domain::{PlanningId, Scope, UserId};
use crate::entities::{plannings, prelude::*};
use crate::models::{NewPlanning, Planning, PlanningChanges, PlanningQuery, SortField};

/// Repository for planning entries.
///
/// Visibility is passed in as a [`Scope`]; the repository only translates it
/// into SQL and never decides it.
pub struct PlanningRepository {
    conn: DatabaseConnection,
}

impl PlanningRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, scope: Scope, query: &PlanningQuery) -> Result<Vec<Planning>> {
        let Some(visible) = scope_condition(scope) else {
            return Ok(Vec::new());
        };

        let mut select = Plannings::find()
            .filter(visible)
            .filter(filter_condition(query));

        for key in query.effective_ordering() {
            let order = if key.descending {
                Order::Desc
            } else {
                Order::Asc
            };
            select = select.order_by(sort_column(key.field), order);
        }

        let rows = select
            .order_by_asc(plannings::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list plannings")?;

        Ok(rows.into_iter().map(Planning::from).collect())
    }

    pub async fn get(&self, id: PlanningId) -> Result<Option<Planning>> {
        let row = Plannings::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query planning")?;

        Ok(row.map(Planning::from))
    }

    pub async fn insert(&self, new: NewPlanning, created_by: UserId) -> Result<Planning> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = plannings::ActiveModel {
            user_id: Set(new.user.value()),
            magasin_id: Set(new.magasin.value()),
            date: Set(new.date),
            heure_debut: Set(new.heure_debut),
            heure_fin: Set(new.heure_fin),
            tache: Set(new.tache),
            notes: Set(new.notes),
            created_by_id: Set(Some(created_by.value())),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = Plannings::insert(active)
            .exec_with_returning(&self.conn)
            .await
            .context("Failed to insert planning")?;

        Ok(Planning::from(model))
    }

    /// Applies `changes` and bumps `updated_at`. Returns `None` if the row
    /// vanished in the meantime.
    pub async fn update(
        &self,
        id: PlanningId,
        changes: PlanningChanges,
    ) -> Result<Option<Planning>> {
        let Some(existing) = Plannings::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query planning for update")?
        else {
            return Ok(None);
        };

        let mut active: plannings::ActiveModel = existing.into();
        if let Some(user) = changes.user {
            active.user_id = Set(user.value());
        }
        if let Some(magasin) = changes.magasin {
            active.magasin_id = Set(magasin.value());
        }
        if let Some(date) = changes.date {
            active.date = Set(date);
        }
        if let Some(debut) = changes.heure_debut {
            active.heure_debut = Set(debut);
        }
        if let Some(fin) = changes.heure_fin {
            active.heure_fin = Set(fin);
        }
        if let Some(tache) = changes.tache {
            active.tache = Set(tache);
        }
        if let Some(notes) = changes.notes {
            active.notes = Set(notes);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update planning")?;

        Ok(Some(Planning::from(model)))
    }

    pub async fn delete(&self, id: PlanningId) -> Result<bool> {
        let result = Plannings::delete_by_id(id.value())
            .exec(&self.conn)
            .await
            .context("Failed to delete planning")?;

        Ok(result.rows_affected > 0)
    }
}

/// `None` means the caller can see nothing and the query can be skipped.
fn scope_condition(scope: Scope) -> Option<Condition> {
    match scope {
        Scope::All => Some(Condition::all()),
        Scope::Magasin(id) => {
            Some(Condition::all().add(plannings::Column::MagasinId.eq(id.value())))
        }
        Scope::User(id) => Some(Condition::all().add(plannings::Column::UserId.eq(id.value()))),
        Scope::Nothing => None,
    }
}

fn filter_condition(query: &PlanningQuery) -> Condition {
    let mut condition = Condition::all();

    if let Some(user) = query.user {
        condition = condition.add(plannings::Column::UserId.eq(user.value()));
    }
    if let Some(magasin) = query.magasin {
        condition = condition.add(plannings::Column::MagasinId.eq(magasin.value()));
    }
    if let Some(date) = query.date {
        condition = condition.add(plannings::Column::Date.eq(date));
    }
    if let Some(from) = query.date_from {
        condition = condition.add(plannings::Column::Date.gte(from));
    }
    if let Some(to) = query.date_to {
        condition = condition.add(plannings::Column::Date.lte(to));
    }
    if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = format!("%{}%", escape_like(term));
        condition = condition.add(
            Condition::any()
                .add(plannings::Column::Tache.like(LikeExpr::new(pattern.clone()).escape('\\')))
                .add(plannings::Column::Notes.like(LikeExpr::new(pattern).escape('\\'))),
        );
    }

    condition
}

/// Search terms match literally, so `LIKE` wildcards are escaped.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

const fn sort_column(field: SortField) -> plannings::Column {
    match field {
        SortField::Id => plannings::Column::Id,
        SortField::Date => plannings::Column::Date,
        SortField::HeureDebut => plannings::Column::HeureDebut,
        SortField::HeureFin => plannings::Column::HeureFin,
        SortField::Tache => plannings::Column::Tache,
        SortField::User => plannings::Column::UserId,
        SortField::Magasin => plannings::Column::MagasinId,
        SortField::CreatedAt => plannings::Column::CreatedAt,
        SortField::UpdatedAt => plannings::Column::UpdatedAt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("Caisse"), "Caisse");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("C_isse"), "C\\_isse");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
