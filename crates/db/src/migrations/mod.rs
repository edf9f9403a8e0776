//! Database migrations.
//!
//! Schema migrations for the database. Foreign keys carry no `ON DELETE`
//! action; dependents are removed by the deletion cascade in `galerie-core`.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user_table;
mod m20250101_000002_create_galerie_tables;
mod m20250101_000003_create_image_table;
mod m20250101_000004_create_frame_tables;
mod m20250101_000005_create_profile_picture_table;
mod m20250101_000006_create_moderation_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user_table::Migration),
            Box::new(m20250101_000002_create_galerie_tables::Migration),
            Box::new(m20250101_000003_create_image_table::Migration),
            Box::new(m20250101_000004_create_frame_tables::Migration),
            Box::new(m20250101_000005_create_profile_picture_table::Migration),
            Box::new(m20250101_000006_create_moderation_tables::Migration),
        ]
    }
}
