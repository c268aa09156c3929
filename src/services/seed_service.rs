// ============================================================================
// SEEDER DE DÉMARRAGE
// ============================================================================
//
// Description:
//   Crée les rôles ROLE_USER et ROLE_ADMIN s'ils n'existent pas, puis le
//   compte administrateur configuré (ADMIN_USERNAME / ADMIN_EMAIL /
//   ADMIN_PASSWORD) s'il est absent.
//
// Points d'attention:
//   - Idempotent: relancer le seeder ne crée aucun doublon
//   - Le flag `seeded` évite un second passage avec la même instance
//
// ============================================================================

use std::sync::atomic::{AtomicBool, Ordering};

use sea_orm::*;
use tracing::{debug, info};

use crate::config::{AdminSeed, AppConfig};
use crate::errors::{AppError, AppResult};
use crate::models::roles::{self, RoleName};
use crate::models::users;
use crate::services::auth_service::AuthService;
use crate::utils::password;

#[derive(Debug, Default)]
pub struct DatabaseSeeder {
    seeded: AtomicBool,
}

impl DatabaseSeeder {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn run(&self, db: &DatabaseConnection, config: &AppConfig) -> AppResult<()> {
        if self.seeded.swap(true, Ordering::SeqCst) {
            debug!("Seeder already ran, skipping");
            return Ok(());
        }

        // 1. Rôles
        for role in RoleName::ALL {
            let exists = roles::Entity::find()
                .filter(roles::Column::Name.eq(role.as_str()))
                .one(db)
                .await?
                .is_some();

            if !exists {
                roles::ActiveModel {
                    name: Set(role.as_str().to_string()),
                    ..Default::default()
                }
                .insert(db)
                .await?;
                info!(%role, "Role created");
            }
        }

        // 2. Compte administrateur
        if let Some(admin) = &config.admin {
            Self::seed_admin(db, admin).await?;
        }

        Ok(())
    }

    async fn seed_admin(db: &DatabaseConnection, admin: &AdminSeed) -> AppResult<()> {
        let exists = users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::Username.eq(&admin.username))
                    .add(users::Column::Email.eq(&admin.email)),
            )
            .one(db)
            .await?
            .is_some();

        if exists {
            debug!(username = %admin.username, "Admin account already present");
            return Ok(());
        }

        let password_hash = password::hash_password(&admin.password).map_err(AppError::Internal)?;

        let txn = db.begin().await?;
        let user = users::ActiveModel {
            username: Set(admin.username.clone()),
            email: Set(admin.email.clone()),
            password_hash: Set(password_hash),
            email_verified: Set(true),
            verification_token: Set(None),
            reset_password_token: Set(None),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        AuthService::grant_roles(&txn, user.id, &RoleName::ALL).await?;
        txn.commit().await?;

        info!(user_id = user.id, username = %user.username, "Admin account created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::utils::test_utils::test_config;

    #[tokio::test]
    async fn test_seeding_is_idempotent() {
        let database = db::establish_connection("sqlite::memory:").await.unwrap();
        db::ensure_schema(&database).await.unwrap();

        let mut config = test_config();
        config.admin = Some(AdminSeed {
            username: "root".into(),
            email: "root@example.com".into(),
            password: "secret123".into(),
        });

        let seeder = DatabaseSeeder::new();
        seeder.run(&database, &config).await.unwrap();
        seeder.run(&database, &config).await.unwrap();
        // Nouvelle instance: le flag est neuf mais les données existent déjà
        DatabaseSeeder::new().run(&database, &config).await.unwrap();

        assert_eq!(roles::Entity::find().count(&database).await.unwrap(), 2);
        assert_eq!(users::Entity::find().count(&database).await.unwrap(), 1);

        let admin = users::Entity::find().one(&database).await.unwrap().unwrap();
        assert!(admin.email_verified);
        assert_eq!(
            AuthService::roles_of(&database, admin.id).await.unwrap(),
            vec![RoleName::User, RoleName::Admin]
        );
    }
}
