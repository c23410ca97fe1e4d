use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info};

use crate::{
    models::{
        cart::{CartError, CartModel},
        catalog::{Amount, Catalog, CatalogItem, ItemId, PizzaSize, SizeMultipliers},
    },
    repositories::{CatalogRepository, CatalogRepositoryError},
};

#[derive(Error, Debug)]
pub enum CatalogServiceError {
    #[error("Catalog is empty")]
    EmptyCatalog,

    #[error("Cart error: {0}")]
    CartError(#[from] CartError),

    #[error("Repository error: {0}")]
    RepositoryError(#[from] CatalogRepositoryError),
}

/// Items of one category, in catalog order.
#[derive(Debug)]
pub struct CategorySection<'a> {
    pub category: &'a str,
    pub items: Vec<&'a CatalogItem>,
}

pub struct CatalogService {
    catalog: Arc<Catalog>,
    multipliers: SizeMultipliers,
}

impl CatalogService {
    /// Load the catalog from the repository. The table is immutable from here on.
    pub async fn load(
        repository: Arc<dyn CatalogRepository>,
        multipliers: SizeMultipliers,
    ) -> Result<Self, CatalogServiceError> {
        info!("Loading catalog from {}", repository.describe());

        let catalog = repository.load().await.map_err(|e| {
            error!("Failed to load catalog: {}", e);
            CatalogServiceError::RepositoryError(e)
        })?;

        if catalog.is_empty() {
            return Err(CatalogServiceError::EmptyCatalog);
        }

        info!("Catalog loaded with {} items", catalog.len());
        Ok(Self::new(Arc::new(catalog), multipliers))
    }

    pub fn new(catalog: Arc<Catalog>, multipliers: SizeMultipliers) -> Self {
        Self { catalog, multipliers }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// A fresh, empty cart priced against this catalog.
    pub fn open_cart(&self) -> CartModel {
        debug!("Opening new cart");
        CartModel::new(Arc::clone(&self.catalog), self.multipliers)
    }

    pub fn quote(&self, item_id: ItemId, size: Option<PizzaSize>) -> Result<Amount, CatalogServiceError> {
        // An empty cart prices exactly like a full one.
        Ok(self.open_cart().quote(item_id, size)?)
    }

    /// Every price a shopper can pick for the item, one per offered size.
    pub fn price_options(&self, item: &CatalogItem) -> Vec<(Option<PizzaSize>, Amount)> {
        if !item.has_sizes() {
            return vec![(None, item.base_price)];
        }
        item.sizes
            .iter()
            .map(|&size| (Some(size), self.multipliers.apply(item.base_price, Some(size))))
            .collect()
    }

    /// Group items by category in first-seen order. `filter` matches case-insensitively.
    pub fn sections(&self, filter: Option<&str>) -> Vec<CategorySection<'_>> {
        let mut sections: Vec<CategorySection<'_>> = Vec::new();

        for item in self.catalog.items() {
            if let Some(wanted) = filter {
                if !item.category.eq_ignore_ascii_case(wanted.trim()) {
                    continue;
                }
            }

            match sections.iter_mut().find(|s| s.category == item.category) {
                Some(section) => section.items.push(item),
                None => sections.push(CategorySection {
                    category: &item.category,
                    items: vec![item],
                }),
            }
        }

        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{BuiltinCatalogRepository, JsonCatalogRepository};

    #[tokio::test]
    async fn test_load_builtin() {
        let service = CatalogService::load(
            Arc::new(BuiltinCatalogRepository::new()),
            SizeMultipliers::default(),
        )
        .await
        .unwrap();

        assert_eq!(service.catalog().len(), Catalog::builtin().len());
        assert!(service.open_cart().is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let repo = Arc::new(JsonCatalogRepository::new("/nonexistent/menu.json"));
        let result = CatalogService::load(repo, SizeMultipliers::default()).await;
        assert!(matches!(
            result,
            Err(CatalogServiceError::RepositoryError(CatalogRepositoryError::Io { .. }))
        ));
    }

    #[test]
    fn test_sections_keep_first_seen_order() {
        let service = CatalogService::new(Arc::new(Catalog::builtin()), SizeMultipliers::default());
        let categories: Vec<&str> = service.sections(None).iter().map(|s| s.category).collect();
        assert_eq!(
            categories,
            vec!["Classic", "Meat", "Vegetarian", "Specials", "Drinks", "Desserts"]
        );

        let classic = service.sections(Some("classic"));
        assert_eq!(classic.len(), 1);
        let ids: Vec<ItemId> = classic[0].items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3]);

        assert!(service.sections(Some("Sushi")).is_empty());
    }

    #[test]
    fn test_price_options() {
        let service = CatalogService::new(Arc::new(Catalog::builtin()), SizeMultipliers::default());
        let margherita = service.catalog().get(1).unwrap();
        assert_eq!(
            service.price_options(margherita),
            vec![
                (Some(PizzaSize::Small), 315),
                (Some(PizzaSize::Medium), 450),
                (Some(PizzaSize::Large), 630),
            ]
        );

        let lemonade = service.catalog().get(7).unwrap();
        assert_eq!(service.price_options(lemonade), vec![(None, 150)]);
    }

    #[test]
    fn test_quote_errors() {
        let service = CatalogService::new(Arc::new(Catalog::builtin()), SizeMultipliers::default());
        assert_eq!(service.quote(9, None).unwrap(), 250);
        assert!(matches!(
            service.quote(100, None),
            Err(CatalogServiceError::CartError(CartError::InvalidReference(100)))
        ));
    }
}
