use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::db::{Magasin, User};
use crate::domain::{MagasinId, PlanningId, UserId};
use crate::models::Planning;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Wire form of a planning entry, with denormalized display fields.
///
/// The display fields are `null` whenever the referenced row is missing.
#[derive(Debug, Clone, Serialize)]
pub struct PlanningDto {
    pub id: PlanningId,
    pub user: UserId,
    pub user_email: Option<String>,
    pub user_nom: Option<String>,
    pub user_prenom: Option<String>,
    pub magasin: MagasinId,
    pub magasin_nom: Option<String>,
    pub date: NaiveDate,
    pub heure_debut: NaiveTime,
    pub heure_fin: NaiveTime,
    pub tache: String,
    pub notes: Option<String>,
    pub created_by: Option<UserId>,
    pub created_by_email: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl PlanningDto {
    #[must_use]
    pub fn new(
        planning: Planning,
        assignee: Option<&User>,
        magasin: Option<&Magasin>,
        creator: Option<&User>,
    ) -> Self {
        Self {
            id: planning.id,
            user: planning.user,
            user_email: assignee.map(|u| u.email.clone()),
            user_nom: assignee.map(|u| u.nom.clone()),
            user_prenom: assignee.map(|u| u.prenom.clone()),
            magasin: planning.magasin,
            magasin_nom: magasin.map(|m| m.nom.clone()),
            date: planning.date,
            heure_debut: planning.heure_debut,
            heure_fin: planning.heure_fin,
            tache: planning.tache,
            notes: planning.notes,
            created_by: planning.created_by,
            created_by_email: creator.map(|u| u.email.clone()),
            created_at: planning.created_at,
            updated_at: planning.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    fn planning() -> Planning {
        Planning {
            id: PlanningId::new(1),
            user: UserId::new(5),
            magasin: MagasinId::new(7),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            heure_debut: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            heure_fin: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            tache: "Caisse".to_string(),
            notes: None,
            created_by: None,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
            updated_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn user() -> User {
        User {
            id: UserId::new(5),
            email: "lea@example.com".to_string(),
            nom: "Martin".to_string(),
            prenom: "Lea".to_string(),
            role: Role::Employe,
            magasin_id: None,
            api_key: "k".to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn display_fields_are_null_without_references() {
        let dto = PlanningDto::new(planning(), None, None, None);
        let json = serde_json::to_value(&dto).unwrap();

        for field in [
            "user_email",
            "user_nom",
            "user_prenom",
            "magasin_nom",
            "created_by_email",
        ] {
            assert!(json[field].is_null(), "{field} should be null");
        }
        assert_eq!(json["heure_debut"], "09:00:00");
        assert_eq!(json["date"], "2024-02-01");
    }

    #[test]
    fn display_fields_follow_references() {
        let magasin = Magasin {
            id: MagasinId::new(7),
            nom: "Centre".to_string(),
            adresse: None,
            created_at: String::new(),
        };
        let assignee = user();
        let dto = PlanningDto::new(planning(), Some(&assignee), Some(&magasin), Some(&assignee));

        assert_eq!(dto.user_email.as_deref(), Some("lea@example.com"));
        assert_eq!(dto.user_nom.as_deref(), Some("Martin"));
        assert_eq!(dto.user_prenom.as_deref(), Some("Lea"));
        assert_eq!(dto.magasin_nom.as_deref(), Some("Centre"));
        assert_eq!(dto.created_by_email.as_deref(), Some("lea@example.com"));
    }
}
