use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Pagination, Product, UpdateProduct};
use crate::repository::ProductRepository;
use crate::slug::derive_slug;

/// Service layer for Product business logic
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product owned by the acting user.
    ///
    /// The slug comes from the explicit slug when given, the title
    /// otherwise, normalized either way.
    pub async fn create_product(
        &self,
        input: CreateProduct,
        user_id: Uuid,
    ) -> ProductResult<Product> {
        let slug_source = input.slug.as_deref().unwrap_or(&input.title);
        let slug = derive_slug(slug_source);

        let now = Utc::now();
        let product = Product {
            id: Uuid::now_v7(),
            title: input.title,
            price: input.price,
            description: input.description,
            slug,
            stock: input.stock,
            sizes: input.sizes,
            gender: input.gender,
            tags: input.tags,
            images: input.images,
            user_id: Some(user_id),
            created_at: now,
            updated_at: now,
        };

        self.repository.create(product).await
    }

    /// List products, newest first
    pub async fn find_all(&self, pagination: Pagination) -> ProductResult<Vec<Product>> {
        self.repository.list(pagination).await
    }

    /// Find one product by id, title (case-insensitive), or slug
    pub async fn find_one(&self, term: &str) -> ProductResult<Product> {
        let found = match Uuid::parse_str(term) {
            Ok(id) => self.repository.get_by_id(id).await?,
            Err(_) => self.repository.get_by_title_or_slug(term).await?,
        };

        found.ok_or_else(|| ProductError::NotFound(term.to_string()))
    }

    /// Apply a partial update; ownership moves to the acting user
    pub async fn update_product(
        &self,
        id: Uuid,
        mut input: UpdateProduct,
        user_id: Uuid,
    ) -> ProductResult<Product> {
        if let Some(ref slug) = input.slug {
            input.slug = Some(derive_slug(slug));
        }

        self.repository.update(id, input, user_id).await
    }

    /// Delete a product and its images
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(ProductError::NotFound(id.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use crate::repository::InMemoryProductRepository;

    fn test_service() -> ProductService<InMemoryProductRepository> {
        ProductService::new(InMemoryProductRepository::new())
    }

    fn create_input(title: &str) -> CreateProduct {
        CreateProduct {
            title: title.to_string(),
            price: 49.99,
            description: Some("A product".to_string()),
            slug: None,
            stock: 5,
            sizes: vec!["S".to_string(), "M".to_string()],
            gender: Gender::Men,
            tags: vec!["shirt".to_string()],
            images: vec!["1.jpg".to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_derives_slug_from_title() {
        let service = test_service();
        let owner = Uuid::now_v7();

        let product = service
            .create_product(create_input("Men's Shirt"), owner)
            .await
            .unwrap();

        assert_eq!(product.slug, "mens_shirt");
        assert_eq!(product.user_id, Some(owner));
    }

    #[tokio::test]
    async fn test_create_normalizes_explicit_slug() {
        let service = test_service();
        let mut input = create_input("Plain Title");
        input.slug = Some("My Custom Slug".to_string());

        let product = service
            .create_product(input, Uuid::now_v7())
            .await
            .unwrap();
        assert_eq!(product.slug, "my_custom_slug");
    }

    #[tokio::test]
    async fn test_find_one_by_id_title_and_slug() {
        let service = test_service();
        let created = service
            .create_product(create_input("Kids Shirt"), Uuid::now_v7())
            .await
            .unwrap();

        let by_id = service.find_one(&created.id.to_string()).await.unwrap();
        assert_eq!(by_id.id, created.id);

        let by_title = service.find_one("kids shirt").await.unwrap();
        assert_eq!(by_title.id, created.id);

        let by_slug = service.find_one("kids_shirt").await.unwrap();
        assert_eq!(by_slug.id, created.id);
    }

    #[tokio::test]
    async fn test_find_one_unknown_term() {
        let service = test_service();
        assert!(matches!(
            service.find_one("nope").await,
            Err(ProductError::NotFound(_))
        ));
        // A well-formed UUID that matches nothing is also a 404
        assert!(matches!(
            service.find_one(&Uuid::now_v7().to_string()).await,
            Err(ProductError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_normalizes_slug_before_merge() {
        let service = test_service();
        let created = service
            .create_product(create_input("Old Shoe"), Uuid::now_v7())
            .await
            .unwrap();
        let editor = Uuid::now_v7();

        let updated = service
            .update_product(
                created.id,
                UpdateProduct {
                    title: Some("New Shoe's".to_string()),
                    slug: Some("New Shoe's".to_string()),
                    ..Default::default()
                },
                editor,
            )
            .await
            .unwrap();

        assert_eq!(updated.slug, "new_shoes");
        assert_eq!(updated.user_id, Some(editor));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let service = test_service();
        assert!(matches!(
            service.delete_product(Uuid::now_v7()).await,
            Err(ProductError::NotFound(_))
        ));
    }
}
