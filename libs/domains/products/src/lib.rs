//! Product domain: catalog CRUD with image galleries and URL slugs.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod slug;

pub use error::{ProductError, ProductResult};
pub use handlers::{create_products_router, ProductsApiDoc};
pub use models::{CreateProduct, Gender, Pagination, Product, UpdateProduct};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
pub use slug::derive_slug;
