pub mod catalog;
pub mod cart;

pub use catalog::*;
pub use cart::*;
