use std::collections::HashMap;

use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, SqlErr, TransactionError, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity::{product, product_image},
    error::{ProductError, ProductResult},
    models::{Pagination, Product, UpdateProduct},
    repository::ProductRepository,
    slug::derive_slug,
};

pub struct PgProductRepository {
    base: BaseRepository<product::Entity>,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    async fn load_images(&self, product_id: Uuid) -> ProductResult<Vec<String>> {
        let rows = product_image::Entity::find()
            .filter(product_image::Column::ProductId.eq(product_id))
            .order_by_asc(product_image::Column::Id)
            .all(self.base.db())
            .await
            .map_err(internal)?;

        Ok(rows.into_iter().map(|r| r.url).collect())
    }

    /// Title/slug uniqueness pre-check so callers get a Conflict before any
    /// transaction is opened.
    async fn assert_unique(
        &self,
        title: &str,
        slug: &str,
        exclude: Option<Uuid>,
    ) -> ProductResult<()> {
        let mut query = product::Entity::find().filter(
            Condition::any()
                .add(product::Column::Title.eq(title))
                .add(product::Column::Slug.eq(slug)),
        );
        if let Some(id) = exclude {
            query = query.filter(product::Column::Id.ne(id));
        }

        let taken = query.one(self.base.db()).await.map_err(internal)?.is_some();
        if taken {
            return Err(ProductError::Conflict(format!(
                "Product with title '{}' or slug '{}' already exists",
                title, slug
            )));
        }
        Ok(())
    }
}

fn internal(e: DbErr) -> ProductError {
    ProductError::Internal(format!("Database error: {}", e))
}

fn map_db_err(e: DbErr) -> ProductError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => {
            ProductError::Conflict(format!("Product already exists: {}", msg))
        }
        _ => internal(e),
    }
}

fn map_txn_err(e: TransactionError<DbErr>) -> ProductError {
    match e {
        TransactionError::Connection(e) | TransactionError::Transaction(e) => map_db_err(e),
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: Product) -> ProductResult<Product> {
        self.assert_unique(&product.title, &product.slug, None)
            .await?;

        let id = product.id;
        let active: product::ActiveModel = (&product).into();
        let images = product.images.clone();

        self.base
            .db()
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    product::Entity::insert(active).exec(txn).await?;

                    if !images.is_empty() {
                        let rows = images.into_iter().map(|url| product_image::ActiveModel {
                            url: Set(url),
                            product_id: Set(id),
                            ..Default::default()
                        });
                        product_image::Entity::insert_many(rows).exec(txn).await?;
                    }

                    Ok(())
                })
            })
            .await
            .map_err(map_txn_err)?;

        tracing::info!(product_id = %id, title = %product.title, "Created product");
        self.get_by_id(id)
            .await?
            .ok_or_else(|| ProductError::Internal("Failed to re-read created product".to_string()))
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let model = self.base.find_by_id(id).await.map_err(internal)?;

        match model {
            Some(model) => {
                let images = self.load_images(model.id).await?;
                Ok(Some(model.into_product(images)))
            }
            None => Ok(None),
        }
    }

    async fn get_by_title_or_slug(&self, term: &str) -> ProductResult<Option<Product>> {
        let model = product::Entity::find()
            .filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::upper(Expr::col(product::Column::Title)))
                            .eq(term.to_uppercase()),
                    )
                    .add(product::Column::Slug.eq(term.to_lowercase())),
            )
            .one(self.base.db())
            .await
            .map_err(internal)?;

        match model {
            Some(model) => {
                let images = self.load_images(model.id).await?;
                Ok(Some(model.into_product(images)))
            }
            None => Ok(None),
        }
    }

    async fn list(&self, pagination: Pagination) -> ProductResult<Vec<Product>> {
        let models = product::Entity::find()
            .order_by_desc(product::Column::CreatedAt)
            .limit(pagination.limit)
            .offset(pagination.offset)
            .all(self.base.db())
            .await
            .map_err(internal)?;

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let image_rows = product_image::Entity::find()
            .filter(product_image::Column::ProductId.is_in(ids))
            .order_by_asc(product_image::Column::Id)
            .all(self.base.db())
            .await
            .map_err(internal)?;

        let mut images_by_product: HashMap<Uuid, Vec<String>> = HashMap::new();
        for row in image_rows {
            images_by_product
                .entry(row.product_id)
                .or_default()
                .push(row.url);
        }

        Ok(models
            .into_iter()
            .map(|m| {
                let images = images_by_product.remove(&m.id).unwrap_or_default();
                m.into_product(images)
            })
            .collect())
    }

    async fn update(
        &self,
        id: Uuid,
        input: UpdateProduct,
        user_id: Uuid,
    ) -> ProductResult<Product> {
        // Merge happens outside the transaction so a missing product
        // or a title/slug conflict never opens one
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(internal)?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))?;

        let mut merged = model.into_product(vec![]);
        merged.apply_update(&input);
        merged.slug = derive_slug(&merged.slug);
        merged.user_id = Some(user_id);

        self.assert_unique(&merged.title, &merged.slug, Some(id))
            .await?;

        let active: product::ActiveModel = (&merged).into();
        let images = input.images;

        self.base
            .db()
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    // images omitted: existing rows stay; images present:
                    // the whole gallery is replaced
                    if let Some(urls) = images {
                        product_image::Entity::delete_many()
                            .filter(product_image::Column::ProductId.eq(id))
                            .exec(txn)
                            .await?;

                        if !urls.is_empty() {
                            let rows = urls.into_iter().map(|url| product_image::ActiveModel {
                                url: Set(url),
                                product_id: Set(id),
                                ..Default::default()
                            });
                            product_image::Entity::insert_many(rows).exec(txn).await?;
                        }
                    }

                    product::Entity::update(active).exec(txn).await?;

                    Ok(())
                })
            })
            .await
            .map_err(map_txn_err)?;

        tracing::info!(product_id = %id, "Updated product");
        self.get_by_id(id)
            .await?
            .ok_or_else(|| ProductError::Internal("Failed to re-read updated product".to_string()))
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let rows_affected = self.base.delete_by_id(id).await.map_err(internal)?;

        if rows_affected > 0 {
            tracing::info!(product_id = %id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
