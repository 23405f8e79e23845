//! User management command handlers

use anyhow::bail;

use crate::config::Config;
use crate::db::{NewUser, Store};
use crate::domain::{MagasinId, Role};

pub struct UserArgs {
    pub email: String,
    pub nom: String,
    pub prenom: String,
    pub role: String,
    pub magasin: Option<i32>,
    pub password: String,
}

pub async fn cmd_user_add(config: &Config, args: UserArgs) -> anyhow::Result<()> {
    let role = Role::parse(&args.role);
    if role == Role::Unknown {
        bail!(
            "Unknown role '{}'. Expected admin, manager or employe",
            args.role
        );
    }
    if args.password.len() < 8 {
        bail!("Password must be at least 8 characters");
    }

    let store = Store::new(&config.general.database_path).await?;

    let magasin_id = args.magasin.map(MagasinId::new);
    if let Some(id) = magasin_id
        && store.get_magasin(id).await?.is_none()
    {
        bail!("Store {id} does not exist");
    }

    if store.get_user_by_email(&args.email).await?.is_some() {
        bail!("A user with email {} already exists", args.email);
    }

    let user = store
        .create_user(
            NewUser {
                email: args.email,
                nom: args.nom,
                prenom: args.prenom,
                role,
                magasin_id,
                password: args.password,
            },
            &config.security,
        )
        .await?;

    println!("✓ Created {} {} <{}> as {}", user.prenom, user.nom, user.email, user.role);
    println!("  ID: {}", user.id);
    println!("  API key: {}", user.api_key);

    Ok(())
}
