use console::style;
use tabled::{Table, Tabled, settings::{Style, Alignment}};

use crate::models::{
    cart::CartModel,
    catalog::{Amount, CatalogItem, PizzaSize},
};
use crate::services::CategorySection;

#[derive(Tabled)]
struct MenuTableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Price")]
    price: String,
}

#[derive(Tabled)]
struct CartTableRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Item")]
    name: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Unit")]
    unit_price: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Total")]
    total: String,
}

pub fn format_money(amount: Amount, currency: &str) -> String {
    format!("{}{}", amount, currency)
}

pub fn format_size(size: Option<PizzaSize>) -> String {
    size.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string())
}

/// `price_options` yields the prices shown for each item, one per size.
pub fn format_menu<F>(sections: &[CategorySection<'_>], currency: &str, price_options: F) -> String
where
    F: Fn(&CatalogItem) -> Vec<(Option<PizzaSize>, Amount)>,
{
    let mut output = String::new();

    for section in sections {
        output.push_str(&format!("{}\n", style(section.category).bold().cyan()));

        let rows: Vec<MenuTableRow> = section
            .items
            .iter()
            .map(|&item| MenuTableRow {
                id: item.id.to_string(),
                name: item.name.clone(),
                description: if item.description.chars().count() > 40 {
                    format!("{}...", item.description.chars().take(37).collect::<String>())
                } else {
                    item.description.clone()
                },
                price: price_options(item)
                    .into_iter()
                    .map(|(size, amount)| match size {
                        Some(size) => format!("{} {}", size, format_money(amount, currency)),
                        None => format_money(amount, currency),
                    })
                    .collect::<Vec<_>>()
                    .join(" / "),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Alignment::left());
        output.push_str(&table.to_string());
        output.push('\n');
    }

    output
}

pub fn format_cart_table(cart: &CartModel, currency: &str) -> String {
    if cart.is_empty() {
        return String::new();
    }

    let rows: Vec<CartTableRow> = cart
        .lines()
        .iter()
        .enumerate()
        .map(|(i, line)| CartTableRow {
            position: i + 1,
            name: line.name().to_string(),
            size: format_size(line.size()),
            unit_price: format_money(cart.line_unit_price(line), currency),
            quantity: line.quantity(),
            total: format_money(line.line_total(), currency),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Alignment::left());

    table.to_string()
}

pub fn format_cart_summary(cart: &CartModel, currency: &str) -> String {
    format!(
        "{}: {}   {}: {}",
        style("Items").bold(),
        style(cart.total_count()).yellow(),
        style("Total").bold(),
        style(format_money(cart.total_price(), currency)).green().bold(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::models::catalog::{Catalog, SizeMultipliers};

    #[test]
    fn test_format_money_and_size() {
        assert_eq!(format_money(630, "₽"), "630₽");
        assert_eq!(format_size(Some(PizzaSize::Large)), "700g");
        assert_eq!(format_size(None), "-");
    }

    #[test]
    fn test_cart_table_lists_lines() {
        let mut cart = CartModel::new(Arc::new(Catalog::builtin()), SizeMultipliers::default());
        assert!(format_cart_table(&cart, "₽").is_empty());

        cart.add_item(1, Some(PizzaSize::Small)).unwrap();
        cart.add_item(9, None).unwrap();
        let table = format_cart_table(&cart, "₽");
        assert!(table.contains("Margherita"));
        assert!(table.contains("315₽"));
        assert!(table.contains("Tiramisu"));
    }
}
