//! Sea-ORM entities for the products tables.

pub mod product;
pub mod product_image;
