use std::collections::HashMap;

use anyhow::{Context, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::domain::MagasinId;
use crate::entities::{magasins, prelude::*};

#[derive(Debug, Clone)]
pub struct Magasin {
    pub id: MagasinId,
    pub nom: String,
    pub adresse: Option<String>,
    pub created_at: String,
}

impl From<magasins::Model> for Magasin {
    fn from(model: magasins::Model) -> Self {
        Self {
            id: MagasinId::new(model.id),
            nom: model.nom,
            adresse: model.adresse,
            created_at: model.created_at,
        }
    }
}

pub struct MagasinRepository {
    conn: DatabaseConnection,
}

impl MagasinRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, nom: &str, adresse: Option<&str>) -> Result<Magasin> {
        let active = magasins::ActiveModel {
            nom: Set(nom.trim().to_string()),
            adresse: Set(adresse.map(str::to_string)),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = Magasins::insert(active)
            .exec_with_returning(&self.conn)
            .await
            .context("Failed to insert magasin")?;

        Ok(Magasin::from(model))
    }

    pub async fn get(&self, id: MagasinId) -> Result<Option<Magasin>> {
        let row = Magasins::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query magasin")?;

        Ok(row.map(Magasin::from))
    }

    pub async fn get_many(&self, ids: &[MagasinId]) -> Result<HashMap<MagasinId, Magasin>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let raw: Vec<i32> = ids.iter().map(MagasinId::value).collect();
        let rows = Magasins::find()
            .filter(magasins::Column::Id.is_in(raw))
            .all(&self.conn)
            .await
            .context("Failed to query magasins by ID")?;

        Ok(rows
            .into_iter()
            .map(Magasin::from)
            .map(|m| (m.id, m))
            .collect())
    }

    pub async fn list(&self) -> Result<Vec<Magasin>> {
        let rows = Magasins::find()
            .order_by_asc(magasins::Column::Nom)
            .all(&self.conn)
            .await
            .context("Failed to list magasins")?;

        Ok(rows.into_iter().map(Magasin::from).collect())
    }
}
