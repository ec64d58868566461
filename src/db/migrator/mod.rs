use sea_orm_migration::prelude::*;

mod m20250301_create_users;
mod m20250302_add_cached_videos;
mod m20250303_add_analyses;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_create_users::Migration),
            Box::new(m20250302_add_cached_videos::Migration),
            Box::new(m20250303_add_analyses::Migration),
        ]
    }
}
