use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Product audience
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Men,
    Women,
    Kid,
    #[default]
    Unisex,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Men => write!(f, "men"),
            Gender::Women => write!(f, "women"),
            Gender::Kid => write!(f, "kid"),
            Gender::Unisex => write!(f, "unisex"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "men" => Ok(Gender::Men),
            "women" => Ok(Gender::Women),
            "kid" => Ok(Gender::Kid),
            "unisex" => Ok(Gender::Unisex),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

/// Product entity with its image gallery flattened to URLs
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier
    pub id: Uuid,
    /// Product title (unique)
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    /// URL slug (unique, derived from title when not given)
    pub slug: String,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub gender: Gender,
    pub tags: Vec<String>,
    /// Image URLs, exposed flat regardless of row storage
    pub images: Vec<String>,
    /// Owner; re-attributed to the acting user on update
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Merge a partial update into this product.
    ///
    /// `None` fields keep their current value. A new title without an
    /// explicit slug re-derives the slug from that title. Images are
    /// handled by the repository because replacement touches separate rows.
    pub fn apply_update(&mut self, update: &UpdateProduct) {
        if let Some(ref title) = update.title {
            self.title = title.clone();
            if update.slug.is_none() {
                self.slug = crate::slug::derive_slug(title);
            }
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(ref description) = update.description {
            self.description = Some(description.clone());
        }
        if let Some(ref slug) = update.slug {
            self.slug = slug.clone();
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        if let Some(ref sizes) = update.sizes {
            self.sizes = sizes.clone();
        }
        if let Some(gender) = update.gender {
            self.gender = gender;
        }
        if let Some(ref tags) = update.tags {
            self.tags = tags.clone();
        }
        self.updated_at = Utc::now();
    }
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub price: f64,
    pub description: Option<String>,
    /// Optional explicit slug; derived from the title when absent
    pub slug: Option<String>,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock: i32,
    pub sizes: Vec<String>,
    pub gender: Gender,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// DTO for a partial product update.
///
/// `images: Some(urls)` replaces the whole gallery; `images: None`
/// (field omitted) leaves the existing gallery untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub description: Option<String>,
    pub slug: Option<String>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    pub sizes: Option<Vec<String>>,
    pub gender: Option<Gender>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

/// Pagination query parameters
#[derive(Debug, Clone, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

fn default_limit() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: Uuid::now_v7(),
            title: "Old Shoe".to_string(),
            price: 10.0,
            description: None,
            slug: "old_shoe".to_string(),
            stock: 3,
            sizes: vec!["M".to_string()],
            gender: Gender::Men,
            tags: vec![],
            images: vec!["a.jpg".to_string()],
            user_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_apply_update_merges_present_fields() {
        let mut product = sample_product();
        product.apply_update(&UpdateProduct {
            price: Some(25.0),
            ..Default::default()
        });
        assert_eq!(product.price, 25.0);
        // Untouched fields keep their values
        assert_eq!(product.stock, 3);
        assert_eq!(product.title, "Old Shoe");
        assert_eq!(product.slug, "old_shoe");
    }

    #[test]
    fn test_apply_update_new_title_rederives_slug() {
        let mut product = sample_product();
        product.apply_update(&UpdateProduct {
            title: Some("New Shoe's".to_string()),
            ..Default::default()
        });
        assert_eq!(product.title, "New Shoe's");
        assert_eq!(product.slug, "new_shoes");
    }

    #[test]
    fn test_apply_update_explicit_slug_wins_over_title() {
        let mut product = sample_product();
        product.apply_update(&UpdateProduct {
            title: Some("New Shoe".to_string()),
            slug: Some("custom_slug".to_string()),
            ..Default::default()
        });
        assert_eq!(product.slug, "custom_slug");
    }

    #[test]
    fn test_pagination_defaults() {
        let pagination: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(pagination.limit, 10);
        assert_eq!(pagination.offset, 0);
    }

    #[test]
    fn test_gender_round_trip() {
        assert_eq!("kid".parse::<Gender>().unwrap(), Gender::Kid);
        assert_eq!(Gender::Women.to_string(), "women");
    }

    #[test]
    fn test_update_images_omitted_deserializes_to_none() {
        let update: UpdateProduct = serde_json::from_str(r#"{"title": "T"}"#).unwrap();
        assert!(update.images.is_none());

        let update: UpdateProduct = serde_json::from_str(r#"{"images": []}"#).unwrap();
        assert_eq!(update.images, Some(vec![]));
    }
}
