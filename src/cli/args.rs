use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;

use crate::models::catalog::PizzaSize;

#[derive(Parser)]
#[command(name = "pizzeria")]
#[command(about = "Pizzeria storefront: browse the menu and fill a cart")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Catalog file (JSON); overrides CATALOG_PATH
    #[arg(short, long, global = true)]
    pub catalog: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the menu with prices for every size
    Menu {
        /// Only show one category
        #[arg(long)]
        category: Option<String>,
    },
    /// Price a single portion
    Quote {
        /// Catalog item ID
        id: u32,
        /// Portion size, for items sold in sizes
        #[arg(short, long)]
        size: Option<SizeArg>,
    },
    /// Start an interactive shopping session
    Shop,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SizeArg {
    Small,
    Medium,
    Large,
}

impl From<SizeArg> for PizzaSize {
    fn from(size: SizeArg) -> Self {
        match size {
            SizeArg::Small => PizzaSize::Small,
            SizeArg::Medium => PizzaSize::Medium,
            SizeArg::Large => PizzaSize::Large,
        }
    }
}

impl fmt::Display for SizeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeArg::Small => write!(f, "small"),
            SizeArg::Medium => write!(f, "medium"),
            SizeArg::Large => write!(f, "large"),
        }
    }
}
