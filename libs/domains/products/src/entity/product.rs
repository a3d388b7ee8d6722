use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

use crate::models::{Gender, Product};
use crate::slug::derive_slug;

/// Sea-ORM Entity for the products table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub title: String,
    pub price: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(unique)]
    pub slug: String,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub gender: String,
    pub tags: Vec<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_image::Entity")]
    Images,
}

impl Related<super::product_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Attach image URLs loaded from the related table
    pub fn into_product(self, images: Vec<String>) -> Product {
        Product {
            id: self.id,
            title: self.title,
            price: self.price,
            description: self.description,
            slug: self.slug,
            stock: self.stock,
            sizes: self.sizes,
            gender: self.gender.parse().unwrap_or_default(),
            tags: self.tags,
            images,
            user_id: self.user_id,
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
        }
    }
}

// Conversion from domain Product to ActiveModel; the slug is re-derived
// so a stored slug is always normalized
impl From<&Product> for ActiveModel {
    fn from(product: &Product) -> Self {
        ActiveModel {
            id: Set(product.id),
            title: Set(product.title.clone()),
            price: Set(product.price),
            description: Set(product.description.clone()),
            slug: Set(derive_slug(&product.slug)),
            stock: Set(product.stock),
            sizes: Set(product.sizes.clone()),
            gender: Set(product.gender.to_string()),
            tags: Set(product.tags.clone()),
            user_id: Set(product.user_id),
            created_at: Set(product.created_at.into()),
            updated_at: Set(product.updated_at.into()),
        }
    }
}
