use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::models::catalog::{Amount, Catalog, CatalogItem, ItemId, PizzaSize, SizeMultipliers};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CartError {
    #[error("Catalog item {0} does not exist")]
    InvalidReference(ItemId),

    #[error("Item {item_id} is not sold in size {size:?}")]
    UnsupportedSize {
        item_id: ItemId,
        size: Option<PizzaSize>,
    },
}

/// One (item, size) entry of the cart. Name and unit price are captured from the
/// catalog when the line is created; the catalog never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    item_id: ItemId,
    name: String,
    size: Option<PizzaSize>,
    unit_price: Amount,
    quantity: u32,
}

impl CartLine {
    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> Option<PizzaSize> {
        self.size
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn line_total(&self) -> Amount {
        self.unit_price.saturating_mul(Amount::from(self.quantity))
    }

    fn matches(&self, item_id: ItemId, size: Option<PizzaSize>) -> bool {
        self.item_id == item_id && self.size == size
    }
}

/// In-memory shopping cart bound to one catalog and one multiplier table.
///
/// Lines keep insertion order. At most one line exists per (item, size) pair.
#[derive(Debug, Clone)]
pub struct CartModel {
    catalog: Arc<Catalog>,
    multipliers: SizeMultipliers,
    lines: Vec<CartLine>,
}

impl CartModel {
    pub fn new(catalog: Arc<Catalog>, multipliers: SizeMultipliers) -> Self {
        Self {
            catalog,
            multipliers,
            lines: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn multipliers(&self) -> &SizeMultipliers {
        &self.multipliers
    }

    /// Unit price of one portion, without touching the cart.
    pub fn quote(&self, item_id: ItemId, size: Option<PizzaSize>) -> Result<Amount, CartError> {
        let item = self.resolve(item_id, size)?;
        Ok(self.multipliers.apply(item.base_price, size))
    }

    pub fn add_item(&mut self, item_id: ItemId, size: Option<PizzaSize>) -> Result<(), CartError> {
        let (name, unit_price) = match self.resolve(item_id, size) {
            Ok(item) => (item.name.clone(), self.multipliers.apply(item.base_price, size)),
            Err(e) => {
                error!("Rejected cart addition: {}", e);
                return Err(e);
            }
        };

        if let Some(line) = self.lines.iter_mut().find(|l| l.matches(item_id, size)) {
            line.quantity = line.quantity.saturating_add(1);
            debug!("Cart line {} {:?} now x{}", item_id, size, line.quantity);
            return Ok(());
        }

        let line = CartLine {
            item_id,
            name,
            size,
            unit_price,
            quantity: 1,
        };
        debug!("New cart line {} {:?} at {}", item_id, size, line.unit_price);
        self.lines.push(line);
        Ok(())
    }

    /// Drops the whole line. Returns whether a line was removed.
    pub fn remove_item(&mut self, item_id: ItemId, size: Option<PizzaSize>) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| !l.matches(item_id, size));
        let removed = self.lines.len() != before;
        if removed {
            debug!("Removed cart line {} {:?}", item_id, size);
        } else {
            warn!("No cart line {} {:?} to remove", item_id, size);
        }
        removed
    }

    /// Zero or negative quantities remove the line. Unknown lines are left alone.
    pub fn set_quantity(&mut self, item_id: ItemId, size: Option<PizzaSize>, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(item_id, size);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.lines.iter_mut().find(|l| l.matches(item_id, size)) {
            Some(line) => {
                line.quantity = quantity;
                debug!("Cart line {} {:?} set to x{}", item_id, size, quantity);
            }
            None => warn!("No cart line {} {:?} to update", item_id, size),
        }
    }

    pub fn clear(&mut self) {
        debug!("Clearing {} cart lines", self.lines.len());
        self.lines.clear();
    }

    pub fn line_unit_price(&self, line: &CartLine) -> Amount {
        line.unit_price
    }

    pub fn total_price(&self) -> Amount {
        self.lines
            .iter()
            .map(CartLine::line_total)
            .fold(0, Amount::saturating_add)
    }

    pub fn total_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn resolve(&self, item_id: ItemId, size: Option<PizzaSize>) -> Result<&CatalogItem, CartError> {
        let item = self
            .catalog
            .get(item_id)
            .ok_or(CartError::InvalidReference(item_id))?;

        let size_ok = match size {
            Some(size) => item.supports(size),
            None => !item.has_sizes(),
        };
        if !size_ok {
            return Err(CartError::UnsupportedSize { item_id, size });
        }
        Ok(item)
    }
}
