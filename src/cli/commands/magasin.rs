//! Store management command handlers

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_magasin_add(
    config: &Config,
    nom: &str,
    adresse: Option<&str>,
) -> anyhow::Result<()> {
    let nom = nom.trim();
    if nom.is_empty() {
        println!("Store name cannot be empty.");
        return Ok(());
    }

    let store = Store::new(&config.general.database_path).await?;
    let magasin = store.create_magasin(nom, adresse).await?;

    println!("✓ Created store {} (ID: {})", magasin.nom, magasin.id);
    Ok(())
}

pub async fn cmd_magasin_list(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let magasins = store.list_magasins().await?;

    if magasins.is_empty() {
        println!("No stores registered.");
        println!();
        println!("Add one with: planning-api magasin add \"Centre\"");
        return Ok(());
    }

    println!("Stores ({} total)", magasins.len());
    println!("{:-<70}", "");

    for magasin in magasins {
        match magasin.adresse {
            Some(adresse) => println!("[{}] {} - {}", magasin.id, magasin.nom, adresse),
            None => println!("[{}] {}", magasin.id, magasin.nom),
        }
    }

    Ok(())
}
