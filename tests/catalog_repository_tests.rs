use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::NamedTempFile;

use pizzeria_storefront::models::catalog::{CatalogError, PizzaSize, SizeMultipliers};
use pizzeria_storefront::repositories::catalog_repository::{
    BuiltinCatalogRepository, CatalogRepository, CatalogRepositoryError, JsonCatalogRepository,
};
use pizzeria_storefront::services::CatalogService;

fn write_catalog(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file
}

#[tokio::test]
async fn test_load_sample_menu() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/menu.json");
    let repo = JsonCatalogRepository::new(&path);

    let catalog = repo.load().await.unwrap();
    assert_eq!(catalog.len(), 4);

    let calzone = catalog.get(3).unwrap();
    assert_eq!(calzone.sizes, vec![PizzaSize::Medium, PizzaSize::Large]);
    assert_eq!(calzone.default_size(), Some(PizzaSize::Medium));

    let espresso = catalog.get(10).unwrap();
    assert!(!espresso.has_sizes());
    assert!(espresso.description.is_empty());
}

#[tokio::test]
async fn test_load_rejects_malformed_json() {
    let file = write_catalog("[{ \"id\": 1, \"name\": ");
    let repo = JsonCatalogRepository::new(file.path());

    let result = repo.load().await;
    assert!(matches!(result, Err(CatalogRepositoryError::Parse { .. })));
}

#[tokio::test]
async fn test_load_rejects_duplicate_ids() {
    let file = write_catalog(
        r#"[
            { "id": 1, "name": "A", "base_price": 100 },
            { "id": 1, "name": "B", "base_price": 200 }
        ]"#,
    );
    let repo = JsonCatalogRepository::new(file.path());

    let result = repo.load().await;
    assert!(matches!(
        result,
        Err(CatalogRepositoryError::Invalid(CatalogError::DuplicateId(1)))
    ));
}

#[tokio::test]
async fn test_load_rejects_unknown_size() {
    let file = write_catalog(r#"[{ "id": 1, "name": "A", "base_price": 100, "sizes": ["huge"] }]"#);
    let repo = JsonCatalogRepository::new(file.path());

    assert!(matches!(repo.load().await, Err(CatalogRepositoryError::Parse { .. })));
}

#[tokio::test]
async fn test_load_missing_file() {
    let repo = JsonCatalogRepository::new("/definitely/not/here.json");
    assert!(matches!(repo.load().await, Err(CatalogRepositoryError::Io { .. })));
}

#[tokio::test]
async fn test_service_opens_cart_over_loaded_catalog() {
    let file = write_catalog(
        r#"[{ "id": 5, "name": "Focaccia", "base_price": 300, "sizes": ["small", "large"] }]"#,
    );
    let repo: Arc<dyn CatalogRepository> = Arc::new(JsonCatalogRepository::new(file.path()));
    let multipliers = SizeMultipliers::new(0.5, 1.0, 2.0).unwrap();

    let service = CatalogService::load(repo, multipliers).await.unwrap();
    let mut cart = service.open_cart();
    cart.add_item(5, Some(PizzaSize::Small)).unwrap();
    cart.add_item(5, Some(PizzaSize::Large)).unwrap();

    assert_eq!(cart.total_price(), 150 + 600);
    assert!(cart.add_item(5, Some(PizzaSize::Medium)).is_err());
}

#[tokio::test]
async fn test_empty_catalog_is_rejected() {
    let file = write_catalog("[]");
    let repo: Arc<dyn CatalogRepository> = Arc::new(JsonCatalogRepository::new(file.path()));

    assert!(CatalogService::load(repo, SizeMultipliers::default()).await.is_err());
}

#[test]
fn test_builtin_repository() {
    let repo = BuiltinCatalogRepository::new();
    let catalog = tokio_test::block_on(repo.load()).unwrap();
    assert!(!catalog.is_empty());
    assert_eq!(repo.describe(), "built-in menu");
}
