use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::domain::{MagasinId, PlanningId, Scope, UserId};
use crate::models::{NewPlanning, Planning, PlanningChanges, PlanningQuery};

pub mod migrator;
pub mod repositories;

pub use repositories::magasin::Magasin;
pub use repositories::user::{NewUser, User};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let path_str = db_url.trim_start_matches("sqlite:");
        let in_memory = path_str.starts_with(":memory:");
        // Every pooled connection would otherwise open its own empty database
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        if !in_memory {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn magasin_repo(&self) -> repositories::magasin::MagasinRepository {
        repositories::magasin::MagasinRepository::new(self.conn.clone())
    }

    fn planning_repo(&self) -> repositories::planning::PlanningRepository {
        repositories::planning::PlanningRepository::new(self.conn.clone())
    }

    // ========== Plannings ==========

    pub async fn list_plannings(&self, scope: Scope, query: &PlanningQuery) -> Result<Vec<Planning>> {
        self.planning_repo().list(scope, query).await
    }

    pub async fn get_planning(&self, id: PlanningId) -> Result<Option<Planning>> {
        self.planning_repo().get(id).await
    }

    pub async fn insert_planning(&self, new: NewPlanning, created_by: UserId) -> Result<Planning> {
        self.planning_repo().insert(new, created_by).await
    }

    pub async fn update_planning(
        &self,
        id: PlanningId,
        changes: PlanningChanges,
    ) -> Result<Option<Planning>> {
        self.planning_repo().update(id, changes).await
    }

    pub async fn delete_planning(&self, id: PlanningId) -> Result<bool> {
        self.planning_repo().delete(id).await
    }

    // ========== Magasins ==========

    pub async fn create_magasin(&self, nom: &str, adresse: Option<&str>) -> Result<Magasin> {
        self.magasin_repo().create(nom, adresse).await
    }

    pub async fn get_magasin(&self, id: MagasinId) -> Result<Option<Magasin>> {
        self.magasin_repo().get(id).await
    }

    pub async fn get_magasins(&self, ids: &[MagasinId]) -> Result<HashMap<MagasinId, Magasin>> {
        self.magasin_repo().get_many(ids).await
    }

    pub async fn list_magasins(&self) -> Result<Vec<Magasin>> {
        self.magasin_repo().list().await
    }

    // ========== Users ==========

    pub async fn create_user(
        &self,
        new_user: NewUser,
        config: &crate::config::SecurityConfig,
    ) -> Result<User> {
        self.user_repo().create(new_user, config).await
    }

    pub async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_users(&self, ids: &[UserId]) -> Result<HashMap<UserId, User>> {
        self.user_repo().get_many(ids).await
    }

    pub async fn user_exists(&self, id: UserId) -> Result<bool> {
        self.user_repo().exists(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn get_user_api_key(&self, email: &str) -> Result<Option<String>> {
        self.user_repo().get_api_key(email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecurityConfig;
    use crate::domain::Role;
    use chrono::{NaiveDate, NaiveTime};

    async fn memory_store() -> Store {
        Store::new("sqlite::memory:").await.unwrap()
    }

    fn cheap_security() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }

    #[tokio::test]
    async fn migrations_seed_bootstrap_admin() {
        let store = memory_store().await;
        let admin = store
            .get_user_by_email(migrator::DEFAULT_ADMIN_EMAIL)
            .await
            .unwrap()
            .expect("admin seeded");
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.api_key, migrator::DEFAULT_API_KEY);
        assert!(
            store
                .verify_user_password(migrator::DEFAULT_ADMIN_EMAIL, "password")
                .await
                .unwrap()
        );
        assert!(
            !store
                .verify_user_password(migrator::DEFAULT_ADMIN_EMAIL, "wrong")
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn planning_crud_round_trip() {
        let store = memory_store().await;
        let magasin = store.create_magasin("Centre", None).await.unwrap();
        let user = store
            .create_user(
                NewUser {
                    email: "Jeanne@Example.com".to_string(),
                    nom: "Dupont".to_string(),
                    prenom: "Jeanne".to_string(),
                    role: Role::Employe,
                    magasin_id: Some(magasin.id),
                    password: "password123".to_string(),
                },
                &cheap_security(),
            )
            .await
            .unwrap();
        assert_eq!(user.email, "jeanne@example.com");

        let created = store
            .insert_planning(
                NewPlanning {
                    user: user.id,
                    magasin: magasin.id,
                    date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
                    heure_debut: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
                    heure_fin: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
                    tache: "Rayon frais".to_string(),
                    notes: None,
                },
                UserId::new(1),
            )
            .await
            .unwrap();
        assert_eq!(created.created_by, Some(UserId::new(1)));

        let updated = store
            .update_planning(
                created.id,
                PlanningChanges {
                    notes: Some(Some("Livraison".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.notes.as_deref(), Some("Livraison"));
        assert_eq!(updated.created_at, created.created_at);

        assert!(store.delete_planning(created.id).await.unwrap());
        assert!(!store.delete_planning(created.id).await.unwrap());
        assert!(store.get_planning(created.id).await.unwrap().is_none());
    }
}
