pub use sea_orm_migration::prelude::*;

mod m20250901_000001_initial;
mod m20250902_000001_add_bank_details;
mod m20250903_000001_add_prizes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_initial::Migration),
            Box::new(m20250902_000001_add_bank_details::Migration),
            Box::new(m20250903_000001_add_prizes::Migration),
        ]
    }
}
