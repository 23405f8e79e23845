use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{MagasinId, PlanningId, UserId};
use crate::entities::plannings;

/// A stored shift assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Planning {
    pub id: PlanningId,
    pub user: UserId,
    pub magasin: MagasinId,
    pub date: NaiveDate,
    pub heure_debut: NaiveTime,
    pub heure_fin: NaiveTime,
    pub tache: String,
    pub notes: Option<String>,
    pub created_by: Option<UserId>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<plannings::Model> for Planning {
    fn from(model: plannings::Model) -> Self {
        Self {
            id: PlanningId::new(model.id),
            user: UserId::new(model.user_id),
            magasin: MagasinId::new(model.magasin_id),
            date: model.date,
            heure_debut: model.heure_debut,
            heure_fin: model.heure_fin,
            tache: model.tache,
            notes: model.notes,
            created_by: model.created_by_id.map(UserId::new),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl Planning {
    /// Returns a copy with `changes` applied; used to validate an update
    /// before it is written.
    #[must_use]
    pub fn merged(&self, changes: &PlanningChanges) -> Self {
        let mut merged = self.clone();
        if let Some(user) = changes.user {
            merged.user = user;
        }
        if let Some(magasin) = changes.magasin {
            merged.magasin = magasin;
        }
        if let Some(date) = changes.date {
            merged.date = date;
        }
        if let Some(debut) = changes.heure_debut {
            merged.heure_debut = debut;
        }
        if let Some(fin) = changes.heure_fin {
            merged.heure_fin = fin;
        }
        if let Some(tache) = &changes.tache {
            merged.tache.clone_from(tache);
        }
        if let Some(notes) = &changes.notes {
            merged.notes.clone_from(notes);
        }
        merged
    }
}

/// Client-writable fields of a planning entry. Read-only fields sent by a
/// client (`id`, `created_by`, timestamps, display fields) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewPlanning {
    pub user: UserId,
    pub magasin: MagasinId,
    pub date: NaiveDate,
    pub heure_debut: NaiveTime,
    pub heure_fin: NaiveTime,
    pub tache: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update. `notes: Some(None)` clears the notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlanningChanges {
    #[serde(default)]
    pub user: Option<UserId>,
    #[serde(default)]
    pub magasin: Option<MagasinId>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub heure_debut: Option<NaiveTime>,
    #[serde(default)]
    pub heure_fin: Option<NaiveTime>,
    #[serde(default)]
    pub tache: Option<String>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub notes: Option<Option<String>>,
}

fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl From<NewPlanning> for PlanningChanges {
    fn from(full: NewPlanning) -> Self {
        Self {
            user: Some(full.user),
            magasin: Some(full.magasin),
            date: Some(full.date),
            heure_debut: Some(full.heure_debut),
            heure_fin: Some(full.heure_fin),
            tache: Some(full.tache),
            notes: Some(full.notes),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Date,
    HeureDebut,
    HeureFin,
    Tache,
    User,
    Magasin,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let field = match name {
            "id" => Self::Id,
            "date" => Self::Date,
            "heure_debut" => Self::HeureDebut,
            "heure_fin" => Self::HeureFin,
            "tache" => Self::Tache,
            "user" => Self::User,
            "magasin" => Self::Magasin,
            "created_at" => Self::CreatedAt,
            "updated_at" => Self::UpdatedAt,
            _ => return None,
        };
        Some(field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

impl SortKey {
    #[must_use]
    pub const fn asc(field: SortField) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    #[must_use]
    pub const fn desc(field: SortField) -> Self {
        Self {
            field,
            descending: true,
        }
    }
}

/// Newest day first, earliest shift first within a day.
pub const DEFAULT_ORDERING: [SortKey; 2] = [
    SortKey::desc(SortField::Date),
    SortKey::asc(SortField::HeureDebut),
];

/// Parses `"-date,heure_debut"` style ordering. Unknown fields are dropped.
#[must_use]
pub fn parse_ordering(raw: &str) -> Vec<SortKey> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| match part.strip_prefix('-') {
            Some(name) => SortField::parse(name).map(SortKey::desc),
            None => SortField::parse(part).map(SortKey::asc),
        })
        .collect()
}

/// Caller-supplied list narrowing. Applied on top of the caller's scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanningQuery {
    pub user: Option<UserId>,
    pub magasin: Option<MagasinId>,
    pub date: Option<NaiveDate>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub search: Option<String>,
    pub ordering: Vec<SortKey>,
}

impl PlanningQuery {
    #[must_use]
    pub fn effective_ordering(&self) -> Vec<SortKey> {
        if self.ordering.is_empty() {
            DEFAULT_ORDERING.to_vec()
        } else {
            self.ordering.clone()
        }
    }
}
