//! Creates the roles, permission catalog, admin user and default branch.
//!
//! ```bash
//! cargo run --bin seed
//! ```
//!
//! Reads the same `config.toml` / environment as the server.

use anyhow::Context;
use dla_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    seed,
    utils::init_logger,
};

async fn run() -> anyhow::Result<()> {
    let config = Config::from_toml().context("loading configuration")?;
    let db = create_pool(&config.database)
        .await
        .context("connecting to the database")?;

    let result = async {
        run_migrations(&db).await.context("running migrations")?;
        seed::run(&db, &config.seed).await.context("seeding")
    }
    .await;

    // the connection is closed whether the seed worked or not
    if let Err(e) = db.close().await {
        log::warn!("Failed to close database connection: {e}");
    }

    let report = result?;
    println!(
        "Seed complete: {} roles, {} permissions, admin created: {}, branch created: {}",
        report.roles_created, report.permissions_created, report.admin_created, report.branch_created
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    init_logger();

    if let Err(e) = run().await {
        log::error!("Seed failed: {e:#}");
        eprintln!("Seed failed: {e:#}");
        std::process::exit(1);
    }
}
