pub use sea_orm_migration::prelude::*;

mod m20251018_120000_init;
mod m20251019_090000_ledger_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251018_120000_init::Migration),
            Box::new(m20251019_090000_ledger_indexes::Migration),
        ]
    }
}
