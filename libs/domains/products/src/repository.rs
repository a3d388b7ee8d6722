use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{Pagination, Product, UpdateProduct};
use crate::slug::derive_slug;

/// Repository trait for Product persistence
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create a new product with its images
    async fn create(&self, product: Product) -> ProductResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// Get a product by case-insensitive title or exact slug
    async fn get_by_title_or_slug(&self, term: &str) -> ProductResult<Option<Product>>;

    /// List products, newest first
    async fn list(&self, pagination: Pagination) -> ProductResult<Vec<Product>>;

    /// Apply a partial update atomically.
    ///
    /// Image replacement and field changes either all land or none do.
    /// Ownership is re-attributed to `user_id`.
    async fn update(&self, id: Uuid, input: UpdateProduct, user_id: Uuid)
        -> ProductResult<Product>;

    /// Delete a product; its image rows go with it
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

fn conflicts(existing: &Product, candidate: &Product) -> bool {
    existing.id != candidate.id
        && (existing.title == candidate.title || existing.slug == candidate.slug)
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: Product) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        if products.values().any(|p| conflicts(p, &product)) {
            return Err(ProductError::Conflict(format!(
                "Product with title '{}' or slug '{}' already exists",
                product.title, product.slug
            )));
        }

        products.insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, title = %product.title, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn get_by_title_or_slug(&self, term: &str) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        let title = term.to_lowercase();
        let slug = term.to_lowercase();
        let product = products
            .values()
            .find(|p| p.title.to_lowercase() == title || p.slug == slug)
            .cloned();
        Ok(product)
    }

    async fn list(&self, pagination: Pagination) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;

        let mut result: Vec<Product> = products.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(result
            .into_iter()
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .collect())
    }

    async fn update(
        &self,
        id: Uuid,
        input: UpdateProduct,
        user_id: Uuid,
    ) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        let mut merged = products
            .get(&id)
            .cloned()
            .ok_or_else(|| ProductError::NotFound(id.to_string()))?;

        merged.apply_update(&input);
        merged.slug = derive_slug(&merged.slug);

        if products.values().any(|p| conflicts(p, &merged)) {
            return Err(ProductError::Conflict(format!(
                "Product with title '{}' or slug '{}' already exists",
                merged.title, merged.slug
            )));
        }

        if let Some(images) = input.images {
            merged.images = images;
        }
        merged.user_id = Some(user_id);

        products.insert(id, merged.clone());

        tracing::info!(product_id = %id, "Updated product");
        Ok(merged)
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let mut products = self.products.write().await;

        if products.remove(&id).is_some() {
            tracing::info!(product_id = %id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use chrono::Utc;

    fn test_product(title: &str) -> Product {
        Product {
            id: Uuid::now_v7(),
            title: title.to_string(),
            price: 10.0,
            description: None,
            slug: derive_slug(title),
            stock: 5,
            sizes: vec!["M".to_string()],
            gender: Gender::Unisex,
            tags: vec![],
            images: vec!["a.jpg".to_string()],
            user_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(test_product("Kids Shirt")).await.unwrap();

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.slug, "kids_shirt");
    }

    #[tokio::test]
    async fn test_get_by_title_is_case_insensitive() {
        let repo = InMemoryProductRepository::new();
        repo.create(test_product("Kids Shirt")).await.unwrap();

        let by_title = repo.get_by_title_or_slug("KIDS SHIRT").await.unwrap();
        assert!(by_title.is_some());

        let by_slug = repo.get_by_title_or_slug("kids_shirt").await.unwrap();
        assert!(by_slug.is_some());
    }

    #[tokio::test]
    async fn test_update_merges_and_reattributes_owner() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(test_product("Old Shoe")).await.unwrap();
        let editor = Uuid::now_v7();

        let updated = repo
            .update(
                created.id,
                UpdateProduct {
                    title: Some("New Shoe's".to_string()),
                    slug: Some("New Shoe's".to_string()),
                    images: Some(vec!["b.jpg".to_string(), "c.jpg".to_string()]),
                    ..Default::default()
                },
                editor,
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "New Shoe's");
        assert_eq!(updated.slug, "new_shoes");
        assert_eq!(updated.images, vec!["b.jpg", "c.jpg"]);
        assert_eq!(updated.user_id, Some(editor));
        // Unmentioned fields survive the merge
        assert_eq!(updated.stock, 5);
    }

    #[tokio::test]
    async fn test_update_title_without_slug_rederives_slug() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(test_product("Old Shoe")).await.unwrap();

        let updated = repo
            .update(
                created.id,
                UpdateProduct {
                    title: Some("New Shoe's".to_string()),
                    images: Some(vec!["b.jpg".to_string(), "c.jpg".to_string()]),
                    ..Default::default()
                },
                Uuid::now_v7(),
            )
            .await
            .unwrap();

        assert_eq!(updated.slug, "new_shoes");
        assert_eq!(updated.images, vec!["b.jpg", "c.jpg"]);
    }

    #[tokio::test]
    async fn test_update_omitted_images_left_untouched() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(test_product("Old Shoe")).await.unwrap();

        let updated = repo
            .update(
                created.id,
                UpdateProduct {
                    price: Some(99.0),
                    ..Default::default()
                },
                Uuid::now_v7(),
            )
            .await
            .unwrap();

        assert_eq!(updated.images, vec!["a.jpg"]);
        assert_eq!(updated.price, 99.0);
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let repo = InMemoryProductRepository::new();
        let result = repo
            .update(Uuid::now_v7(), UpdateProduct::default(), Uuid::now_v7())
            .await;
        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_to_conflicting_title_is_rejected() {
        let repo = InMemoryProductRepository::new();
        repo.create(test_product("Taken Title")).await.unwrap();
        let victim = repo.create(test_product("Other Title")).await.unwrap();

        let result = repo
            .update(
                victim.id,
                UpdateProduct {
                    title: Some("Taken Title".to_string()),
                    slug: Some("Taken Title".to_string()),
                    images: Some(vec!["x.jpg".to_string()]),
                    ..Default::default()
                },
                Uuid::now_v7(),
            )
            .await;
        assert!(matches!(result, Err(ProductError::Conflict(_))));

        // Failed update leaves the product untouched, images included
        let unchanged = repo.get_by_id(victim.id).await.unwrap().unwrap();
        assert_eq!(unchanged.title, "Other Title");
        assert_eq!(unchanged.images, vec!["a.jpg"]);
    }

    #[tokio::test]
    async fn test_create_duplicate_title_conflicts() {
        let repo = InMemoryProductRepository::new();
        repo.create(test_product("Kids Shirt")).await.unwrap();

        let result = repo.create(test_product("Kids Shirt")).await;
        assert!(matches!(result, Err(ProductError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let repo = InMemoryProductRepository::new();
        for i in 0..5 {
            repo.create(test_product(&format!("Product {}", i)))
                .await
                .unwrap();
        }

        let page = repo
            .list(Pagination {
                limit: 2,
                offset: 0,
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 2);

        let rest = repo
            .list(Pagination {
                limit: 10,
                offset: 4,
            })
            .await
            .unwrap();
        assert_eq!(rest.len(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(test_product("Kids Shirt")).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }
}
