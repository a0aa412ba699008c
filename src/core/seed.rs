//! Catalog seeding from configuration.
//!
//! Inserts the categories, products, menus and menu variants described in
//! [`CatalogConfig`]. Records that already exist (matched by name, or by size for
//! variants) are left alone, so seeding on every start is safe.

use crate::{
    config::catalog::CatalogConfig,
    core::{category, menu, product},
    entities::{Menu, MenuVariant, menu as menu_entity, menu_variant},
    errors::{Error, Result},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// Counts of records created by [`seed_catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub products: usize,
    pub menus: usize,
    pub menu_variants: usize,
}

/// Seeds the catalog from configuration, skipping records that already exist.
///
/// # Errors
/// Returns an error if a product lists a category that is neither in the
/// configuration nor in the database, or if any insert fails validation.
#[instrument(skip(db, config))]
pub async fn seed_catalog(db: &DatabaseConnection, config: &CatalogConfig) -> Result<SeedReport> {
    let mut report = SeedReport::default();
    let mut category_ids: HashMap<String, i64> = HashMap::new();

    for entry in &config.categories {
        let existing = category::get_category_by_name(db, &entry.name).await?;
        let id = if let Some(existing) = existing {
            existing.id
        } else {
            report.categories += 1;
            category::create_category(db, &entry.name, entry.description.clone(), entry.image.clone())
                .await?
                .id
        };
        category_ids.insert(entry.name.trim().to_string(), id);
    }

    for entry in &config.products {
        if product::get_product_by_name(db, &entry.name).await?.is_some() {
            continue;
        }

        let mut ids = Vec::with_capacity(entry.categories.len());
        for name in &entry.categories {
            let id = match category_ids.get(name.trim()) {
                Some(id) => *id,
                None => category::get_category_by_name(db, name)
                    .await?
                    .map(|c| c.id)
                    .ok_or_else(|| Error::Config {
                        message: format!(
                            "Product '{}' refers to unknown category '{name}'",
                            entry.name
                        ),
                    })?,
            };
            ids.push(id);
        }

        let created = product::create_product(
            db,
            &entry.name,
            entry.description.clone(),
            entry.image.clone(),
            entry.price,
        )
        .await?;
        if !ids.is_empty() {
            product::set_product_categories(db, created.id, &ids).await?;
        }
        if !entry.is_available {
            product::set_product_availability(db, created.id, false).await?;
        }
        report.products += 1;
    }

    for entry in &config.menus {
        let exists = Menu::find()
            .filter(menu_entity::Column::Name.eq(entry.name.trim()))
            .one(db)
            .await?
            .is_some();
        if !exists {
            menu::create_menu(db, &entry.name, entry.description.clone()).await?;
            report.menus += 1;
        }
    }

    for entry in &config.menu_variants {
        let exists = MenuVariant::find()
            .filter(menu_variant::Column::Size.eq(entry.size.trim()))
            .one(db)
            .await?
            .is_some();
        if exists {
            warn!("Menu variant '{}' already exists, skipping", entry.size);
            continue;
        }
        let created =
            menu::create_menu_variant(db, &entry.size, entry.price, entry.image.clone()).await?;
        if !entry.is_available {
            menu::set_menu_variant_availability(db, created.id, false).await?;
        }
        report.menu_variants += 1;
    }

    info!(?report, "Catalog seeded");
    Ok(report)
}
