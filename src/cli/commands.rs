use std::fmt;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use console::{style, Emoji};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use tracing::{error, info};

use crate::{
    cli::args::*,
    models::{
        cart::{CartError, CartModel},
        catalog::{ItemId, PizzaSize},
    },
    repositories::{BuiltinCatalogRepository, CatalogRepository, JsonCatalogRepository},
    services::CatalogService,
    utils::{
        formatting::{format_cart_summary, format_cart_table, format_menu, format_money, format_size},
        Config,
    },
};

static CHECKMARK: Emoji<'_, '_> = Emoji("✅ ", "");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "");
static INFO: Emoji<'_, '_> = Emoji("ℹ️ ", "");
static PIZZA: Emoji<'_, '_> = Emoji("🍕 ", "");
static CART: Emoji<'_, '_> = Emoji("🛒 ", "");

/// One cart mutation chosen in the shopping session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopAction {
    Add { item_id: ItemId, size: Option<PizzaSize> },
    Increase { item_id: ItemId, size: Option<PizzaSize> },
    Decrease { item_id: ItemId, size: Option<PizzaSize> },
    SetQuantity { item_id: ItemId, size: Option<PizzaSize>, quantity: i64 },
    Remove { item_id: ItemId, size: Option<PizzaSize> },
    Clear,
}

impl ShopAction {
    /// Apply to the cart. +1/-1 steps go through `set_quantity`, so a decrement
    /// from one drops the line.
    pub fn apply(self, cart: &mut CartModel) -> Result<(), CartError> {
        match self {
            ShopAction::Add { item_id, size } => cart.add_item(item_id, size)?,
            ShopAction::Increase { item_id, size } => {
                let current = current_quantity(cart, item_id, size);
                cart.set_quantity(item_id, size, current + 1);
            }
            ShopAction::Decrease { item_id, size } => {
                let current = current_quantity(cart, item_id, size);
                cart.set_quantity(item_id, size, current - 1);
            }
            ShopAction::SetQuantity { item_id, size, quantity } => {
                cart.set_quantity(item_id, size, quantity)
            }
            ShopAction::Remove { item_id, size } => {
                cart.remove_item(item_id, size);
            }
            ShopAction::Clear => cart.clear(),
        }
        Ok(())
    }
}

fn current_quantity(cart: &CartModel, item_id: ItemId, size: Option<PizzaSize>) -> i64 {
    cart.lines()
        .iter()
        .find(|l| l.item_id() == item_id && l.size() == size)
        .map(|l| i64::from(l.quantity()))
        .unwrap_or(0)
}

/// Entries of the shop's main menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopChoice {
    AddItem,
    Increase,
    Decrease,
    SetQuantity,
    RemoveItem,
    ClearCart,
    ViewCart,
    Quit,
}

impl ShopChoice {
    pub const ALL: [ShopChoice; 8] = [
        ShopChoice::AddItem,
        ShopChoice::Increase,
        ShopChoice::Decrease,
        ShopChoice::SetQuantity,
        ShopChoice::RemoveItem,
        ShopChoice::ClearCart,
        ShopChoice::ViewCart,
        ShopChoice::Quit,
    ];
}

impl fmt::Display for ShopChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShopChoice::AddItem => write!(f, "Add item"),
            ShopChoice::Increase => write!(f, "Increase quantity"),
            ShopChoice::Decrease => write!(f, "Decrease quantity"),
            ShopChoice::SetQuantity => write!(f, "Set quantity"),
            ShopChoice::RemoveItem => write!(f, "Remove item"),
            ShopChoice::ClearCart => write!(f, "Clear cart"),
            ShopChoice::ViewCart => write!(f, "View cart"),
            ShopChoice::Quit => write!(f, "Quit"),
        }
    }
}

pub struct CliApp {
    catalog_service: Arc<CatalogService>,
    currency: String,
}

impl CliApp {
    pub async fn new(config: &Config) -> Result<Self> {
        let repository: Arc<dyn CatalogRepository> = match &config.catalog_path {
            Some(path) => Arc::new(JsonCatalogRepository::new(path)),
            None => Arc::new(BuiltinCatalogRepository::new()),
        };

        let catalog_service = CatalogService::load(repository, config.size_multipliers)
            .await
            .context("Failed to load catalog")?;

        Ok(Self {
            catalog_service: Arc::new(catalog_service),
            currency: config.currency_symbol.clone(),
        })
    }

    pub fn run(&self, args: Args) -> Result<()> {
        match args.command {
            Commands::Menu { category } => self.handle_menu(category),
            Commands::Quote { id, size } => self.handle_quote(id, size.map(PizzaSize::from)),
            Commands::Shop => self.handle_shop(),
        }
    }

    fn handle_menu(&self, category: Option<String>) -> Result<()> {
        let sections = self.catalog_service.sections(category.as_deref());
        if sections.is_empty() {
            println!("{} No items found", INFO);
            return Ok(());
        }

        println!("{} {}", PIZZA, style("Menu").bold().cyan());
        let service = &self.catalog_service;
        print!("{}", format_menu(&sections, &self.currency, |item| service.price_options(item)));
        Ok(())
    }

    fn handle_quote(&self, id: ItemId, size: Option<PizzaSize>) -> Result<()> {
        let item = match self.catalog_service.catalog().get(id) {
            Some(item) => item,
            None => {
                println!("{} No catalog item with ID {}", CROSS, style(id).red());
                return Err(anyhow!("No catalog item with ID {}", id));
            }
        };

        // A sized item quoted without a size gets the preselected one, as in the shop.
        let size = size.or_else(|| item.default_size());
        match self.catalog_service.quote(id, size) {
            Ok(price) => {
                println!(
                    "{} {} {}: {}",
                    INFO,
                    style(&item.name).green(),
                    format_size(size),
                    style(format_money(price, &self.currency)).bold()
                );
                Ok(())
            }
            Err(e) => {
                println!("{} {}", CROSS, style(&e).red());
                Err(anyhow!(e).context("Failed to quote"))
            }
        }
    }

    fn handle_shop(&self) -> Result<()> {
        let theme = ColorfulTheme::default();
        let mut cart = self.catalog_service.open_cart();
        info!("Shopping session started");
        println!("{} {}", PIZZA, style("Welcome! Pick something tasty.").bold().cyan());

        loop {
            let prompt = format!(
                "{}Cart ({}) {}",
                CART,
                cart.total_count(),
                format_money(cart.total_price(), &self.currency)
            );
            let choice = Select::with_theme(&theme)
                .with_prompt(prompt)
                .items(&ShopChoice::ALL)
                .default(0)
                .interact()?;

            let action = match ShopChoice::ALL[choice] {
                ShopChoice::AddItem => self.prompt_add(&theme)?,
                ShopChoice::Increase => Self::prompt_line(&theme, &cart)?
                    .map(|(item_id, size)| ShopAction::Increase { item_id, size }),
                ShopChoice::Decrease => Self::prompt_line(&theme, &cart)?
                    .map(|(item_id, size)| ShopAction::Decrease { item_id, size }),
                ShopChoice::SetQuantity => match Self::prompt_line(&theme, &cart)? {
                    Some((item_id, size)) => {
                        let quantity: i64 = Input::with_theme(&theme)
                            .with_prompt("Quantity (0 removes the line)")
                            .interact_text()?;
                        Some(ShopAction::SetQuantity { item_id, size, quantity })
                    }
                    None => None,
                },
                ShopChoice::RemoveItem => Self::prompt_line(&theme, &cart)?
                    .map(|(item_id, size)| ShopAction::Remove { item_id, size }),
                ShopChoice::ClearCart => {
                    if cart.is_empty() {
                        None
                    } else if Confirm::with_theme(&theme)
                        .with_prompt("Remove everything from the cart?")
                        .default(false)
                        .interact()?
                    {
                        Some(ShopAction::Clear)
                    } else {
                        println!("Cart left as is");
                        None
                    }
                }
                ShopChoice::ViewCart => {
                    self.print_cart(&cart);
                    None
                }
                ShopChoice::Quit => break,
            };

            if let Some(action) = action {
                match action.apply(&mut cart) {
                    Ok(()) => println!("{} {}", CHECKMARK, format_cart_summary(&cart, &self.currency)),
                    Err(e) => {
                        // Choices come from the catalog, so this is a defect rather than bad input.
                        error!("Cart rejected {:?}: {}", action, e);
                        println!("{} {}", CROSS, style(e).red());
                    }
                }
            }
        }

        info!(
            "Shopping session ended with {} items, total {}",
            cart.total_count(),
            cart.total_price()
        );
        self.print_cart(&cart);
        Ok(())
    }

    fn prompt_add(&self, theme: &ColorfulTheme) -> Result<Option<ShopAction>> {
        let items = self.catalog_service.catalog().items();
        let labels: Vec<String> = items
            .iter()
            .map(|item| format!("#{} {} ({})", item.id, item.name, item.category))
            .collect();

        let picked = Select::with_theme(theme)
            .with_prompt("Item")
            .items(&labels)
            .default(0)
            .interact()?;
        let item = &items[picked];

        let size = match item.default_size() {
            Some(preselected) => {
                let options: Vec<String> = self
                    .catalog_service
                    .price_options(item)
                    .into_iter()
                    .map(|(size, price)| {
                        format!("{} {}", format_size(size), format_money(price, &self.currency))
                    })
                    .collect();
                let default = item.sizes.iter().position(|&s| s == preselected).unwrap_or(0);
                let index = Select::with_theme(theme)
                    .with_prompt("Size")
                    .items(&options)
                    .default(default)
                    .interact()?;
                item.sizes.get(index).copied()
            }
            None => None,
        };

        Ok(Some(ShopAction::Add { item_id: item.id, size }))
    }

    fn prompt_line(theme: &ColorfulTheme, cart: &CartModel) -> Result<Option<(ItemId, Option<PizzaSize>)>> {
        if cart.is_empty() {
            println!("{} Your cart is empty", INFO);
            return Ok(None);
        }

        let labels: Vec<String> = cart
            .lines()
            .iter()
            .map(|l| format!("{} {} x{}", l.name(), format_size(l.size()), l.quantity()))
            .collect();
        let picked = Select::with_theme(theme)
            .with_prompt("Line")
            .items(&labels)
            .default(0)
            .interact()?;

        Ok(cart.lines().get(picked).map(|l| (l.item_id(), l.size())))
    }

    fn print_cart(&self, cart: &CartModel) {
        if cart.is_empty() {
            println!("{} Your cart is empty", INFO);
            return;
        }
        println!("{}", format_cart_table(cart, &self.currency));
        println!("{}", format_cart_summary(cart, &self.currency));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::{Catalog, SizeMultipliers};

    fn cart() -> CartModel {
        CartModel::new(Arc::new(Catalog::builtin()), SizeMultipliers::default())
    }

    #[test]
    fn test_increase_and_decrease_step_by_one() {
        let mut cart = cart();
        let size = Some(PizzaSize::Medium);
        ShopAction::Add { item_id: 1, size }.apply(&mut cart).unwrap();
        ShopAction::Increase { item_id: 1, size }.apply(&mut cart).unwrap();
        assert_eq!(cart.lines()[0].quantity(), 2);

        ShopAction::Decrease { item_id: 1, size }.apply(&mut cart).unwrap();
        ShopAction::Decrease { item_id: 1, size }.apply(&mut cart).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_increase_without_line_is_noop() {
        let mut cart = cart();
        ShopAction::Increase { item_id: 7, size: None }.apply(&mut cart).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_propagates_cart_errors() {
        let mut cart = cart();
        let result = ShopAction::Add { item_id: 77, size: None }.apply(&mut cart);
        assert_eq!(result, Err(CartError::InvalidReference(77)));
    }

    #[test]
    fn test_set_quantity_and_clear() {
        let mut cart = cart();
        ShopAction::Add { item_id: 8, size: None }.apply(&mut cart).unwrap();
        ShopAction::SetQuantity { item_id: 8, size: None, quantity: 4 }
            .apply(&mut cart)
            .unwrap();
        assert_eq!(cart.total_count(), 4);
        assert_eq!(cart.total_price(), 480);

        ShopAction::Clear.apply(&mut cart).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_shop_choices_have_distinct_labels() {
        let labels: Vec<String> = ShopChoice::ALL.iter().map(|c| c.to_string()).collect();
        for (i, label) in labels.iter().enumerate() {
            assert!(!labels[..i].contains(label), "duplicate label {}", label);
        }
        assert_eq!(ShopChoice::ALL[0], ShopChoice::AddItem);
        assert_eq!(ShopChoice::ALL[ShopChoice::ALL.len() - 1], ShopChoice::Quit);
    }

    async fn app() -> CliApp {
        CliApp::new(&Config::default()).await.unwrap()
    }

    fn quote_args(extra: &[&str]) -> Args {
        use clap::Parser;
        let mut argv = vec!["pizzeria", "quote"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[tokio::test]
    async fn test_quote_known_item_succeeds() {
        let app = app().await;
        assert!(app.run(quote_args(&["1", "--size", "large"])).is_ok());
        assert!(app.run(quote_args(&["7"])).is_ok());
        // Sized item without a size falls back to the preselected one
        assert!(app.run(quote_args(&["2"])).is_ok());
    }

    #[tokio::test]
    async fn test_quote_unknown_item_fails() {
        let app = app().await;
        let err = app.run(quote_args(&["99"])).unwrap_err();
        assert!(err.to_string().contains("99"));
    }

    #[tokio::test]
    async fn test_quote_unsupported_size_fails() {
        let app = app().await;
        assert!(app.run(quote_args(&["7", "--size", "small"])).is_err());
    }
}
