use sea_orm_migration::prelude::*;

mod m20240501_000001_create_users_table;
mod m20240501_000002_create_sessions_table;
mod m20240501_000003_create_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240501_000001_create_users_table::Migration),
            Box::new(m20240501_000002_create_sessions_table::Migration),
            Box::new(m20240501_000003_create_indexes::Migration),
        ]
    }
}
