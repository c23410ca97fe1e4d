use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Whole currency units.
pub type Amount = u64;

pub type ItemId = u32;

/// Upper bound for a catalog base price.
pub const MAX_BASE_PRICE: Amount = 1_000_000;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PizzaSize {
    Small,
    Medium,
    Large,
}

impl PizzaSize {
    pub const ALL: [PizzaSize; 3] = [PizzaSize::Small, PizzaSize::Medium, PizzaSize::Large];

    /// Portion weight in grams.
    pub fn grams(&self) -> u16 {
        match self {
            PizzaSize::Small => 300,
            PizzaSize::Medium => 500,
            PizzaSize::Large => 700,
        }
    }
}

impl fmt::Display for PizzaSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}g", self.grams())
    }
}

impl FromStr for PizzaSize {
    type Err = CatalogError;

    /// Accepts a size name (`small`, `s`) or a weight (`300`, `300g`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let weight = normalized.strip_suffix('g').unwrap_or(&normalized);
        match (normalized.as_str(), weight) {
            ("small" | "s", _) | (_, "300") => Ok(PizzaSize::Small),
            ("medium" | "m", _) | (_, "500") => Ok(PizzaSize::Medium),
            ("large" | "l", _) | (_, "700") => Ok(PizzaSize::Large),
            _ => Err(CatalogError::UnknownSize(s.to_string())),
        }
    }
}

/// Price scale factor per size variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeMultipliers {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
}

impl Default for SizeMultipliers {
    fn default() -> Self {
        Self {
            small: 0.7,
            medium: 1.0,
            large: 1.4,
        }
    }
}

impl SizeMultipliers {
    pub fn new(small: f64, medium: f64, large: f64) -> Result<Self, CatalogError> {
        let multipliers = Self { small, medium, large };
        for size in PizzaSize::ALL {
            let factor = multipliers.factor(size);
            if !factor.is_finite() || factor <= 0.0 {
                return Err(CatalogError::InvalidMultiplier { size, factor });
            }
        }
        Ok(multipliers)
    }

    pub fn factor(&self, size: PizzaSize) -> f64 {
        match size {
            PizzaSize::Small => self.small,
            PizzaSize::Medium => self.medium,
            PizzaSize::Large => self.large,
        }
    }

    /// `round(base_price * multiplier)`, ties away from zero. No size means factor 1.0.
    pub fn apply(&self, base_price: Amount, size: Option<PizzaSize>) -> Amount {
        match size {
            Some(size) => (base_price as f64 * self.factor(size)).round() as Amount,
            None => base_price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Validate)]
pub struct CatalogItem {
    pub id: ItemId,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom = "validate_name")]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be less than 500 characters"))]
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub category: String,

    pub base_price: Amount,

    /// Empty when the item sells at a single fixed price.
    #[validate(custom = "validate_sizes")]
    #[serde(default)]
    pub sizes: Vec<PizzaSize>,
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("Name is required"));
    }
    Ok(())
}

fn validate_sizes(sizes: &[PizzaSize]) -> Result<(), ValidationError> {
    for (i, size) in sizes.iter().enumerate() {
        if sizes[..i].contains(size) {
            return Err(ValidationError::new("Sizes must not repeat"));
        }
    }
    Ok(())
}

impl CatalogItem {
    pub fn new(
        id: ItemId,
        name: &str,
        description: &str,
        category: &str,
        base_price: Amount,
        sizes: &[PizzaSize],
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            base_price,
            sizes: sizes.to_vec(),
        }
    }

    pub fn has_sizes(&self) -> bool {
        !self.sizes.is_empty()
    }

    pub fn supports(&self, size: PizzaSize) -> bool {
        self.sizes.contains(&size)
    }

    /// Size preselected for the shopper: medium when offered, otherwise the first listed.
    pub fn default_size(&self) -> Option<PizzaSize> {
        if self.supports(PizzaSize::Medium) {
            Some(PizzaSize::Medium)
        } else {
            self.sizes.first().copied()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Validation error for item {id}: {source}")]
    ValidationError {
        id: ItemId,
        #[source]
        source: validator::ValidationErrors,
    },

    #[error("Base price of item {id} must be between 1 and {max}, got {price}")]
    PriceOutOfRange { id: ItemId, price: Amount, max: Amount },

    #[error("Duplicate catalog id: {0}")]
    DuplicateId(ItemId),

    #[error("Unknown size: {0}")]
    UnknownSize(String),

    #[error("Multiplier for {size} must be a positive number, got {factor}")]
    InvalidMultiplier { size: PizzaSize, factor: f64 },
}

/// Read-only, id-indexed item table. Listing order is the order items were supplied in.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    index: HashMap<ItemId, usize>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            item.validate()
                .map_err(|source| CatalogError::ValidationError { id: item.id, source })?;
            if item.base_price == 0 || item.base_price > MAX_BASE_PRICE {
                return Err(CatalogError::PriceOutOfRange {
                    id: item.id,
                    price: item.base_price,
                    max: MAX_BASE_PRICE,
                });
            }
            if index.insert(item.id, position).is_some() {
                return Err(CatalogError::DuplicateId(item.id));
            }
        }
        Ok(Self { items, index })
    }

    /// The house menu.
    pub fn builtin() -> Self {
        use PizzaSize::*;
        let all = [Small, Medium, Large];
        let items = vec![
            CatalogItem::new(1, "Margherita", "Mozzarella, tomato sauce, basil", "Classic", 450, &all),
            CatalogItem::new(2, "Pepperoni", "Pepperoni, mozzarella, tomato sauce", "Meat", 550, &all),
            CatalogItem::new(3, "Four Cheese", "Mozzarella, parmesan, gorgonzola, dor blue", "Classic", 600, &all),
            CatalogItem::new(4, "Meat Feast", "Beef, chicken, bacon, mozzarella", "Meat", 650, &all),
            CatalogItem::new(5, "Vegetarian", "Mushrooms, peppers, tomatoes, olives", "Vegetarian", 500, &all),
            CatalogItem::new(6, "Hawaiian", "Chicken, pineapple, mozzarella", "Specials", 580, &all),
            CatalogItem::new(7, "Lemonade", "Homemade lemonade, 0.5 l", "Drinks", 150, &[]),
            CatalogItem::new(8, "Cola", "Chilled cola, 0.33 l", "Drinks", 120, &[]),
            CatalogItem::new(9, "Tiramisu", "Mascarpone, savoiardi, espresso", "Desserts", 250, &[]),
        ];
        let index = items.iter().enumerate().map(|(i, item)| (item.id, i)).collect();
        Self { items, index }
    }

    pub fn get(&self, id: ItemId) -> Option<&CatalogItem> {
        self.index.get(&id).map(|&position| &self.items[position])
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
