pub use sea_orm_migration::prelude::*;

mod m20240601_000001_initial;
mod m20240601_000002_catalog;
mod m20240601_000003_orders;
mod m20240601_000004_inventory;
mod m20240601_000005_operations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_initial::Migration),
            Box::new(m20240601_000002_catalog::Migration),
            Box::new(m20240601_000003_orders::Migration),
            Box::new(m20240601_000004_inventory::Migration),
            Box::new(m20240601_000005_operations::Migration),
        ]
    }
}
