use sqlx::PgPool;

use crate::models::{Brand, Outlet};

const OUTLET_COLUMNS: &str = "id, name, latitude, longitude, is_active, \
     delivery_available, pickup_available, delivery_radius_km";

/// Repository for outlet lookups
#[derive(Clone)]
pub struct OutletRepository {
    pool: PgPool,
}

impl OutletRepository {
    /// Create a new OutletRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All active outlets, in id order
    pub async fn find_active(&self) -> Result<Vec<Outlet>, sqlx::Error> {
        let outlets = sqlx::query_as::<_, Outlet>(&format!(
            "SELECT {OUTLET_COLUMNS} FROM outlets WHERE is_active ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(outlets)
    }

    /// Find an outlet by id (active or not; callers check the flag)
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Outlet>, sqlx::Error> {
        let outlet = sqlx::query_as::<_, Outlet>(&format!(
            "SELECT {OUTLET_COLUMNS} FROM outlets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(outlet)
    }

    /// Find multiple outlets by ids
    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Outlet>, sqlx::Error> {
        let outlets = sqlx::query_as::<_, Outlet>(&format!(
            "SELECT {OUTLET_COLUMNS} FROM outlets WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(outlets)
    }
}

/// Repository for brand lookups
#[derive(Clone)]
pub struct BrandRepository {
    pool: PgPool,
}

impl BrandRepository {
    /// Create a new BrandRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a brand by id
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Brand>, sqlx::Error> {
        let brand =
            sqlx::query_as::<_, Brand>("SELECT id, name, is_active FROM brands WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(brand)
    }

    /// Find multiple active brands by ids
    pub async fn find_active_by_ids(&self, ids: &[i32]) -> Result<Vec<Brand>, sqlx::Error> {
        let brands = sqlx::query_as::<_, Brand>(
            "SELECT id, name, is_active FROM brands WHERE id = ANY($1) AND is_active",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(brands)
    }
}
