pub mod offer;
pub mod preferences;
pub mod product;
pub mod recommendation;
pub mod retailer;
