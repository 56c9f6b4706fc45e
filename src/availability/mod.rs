// Brand/outlet availability
//
// The many-to-many relation between brands and outlets is an explicit
// entity here: one row per (outlet, brand) pair carrying the commercial
// terms under which that outlet serves that brand. Absence of a row, or
// is_available = false, means "not served". This module is strictly
// read-only; writes are an operator/admin concern handled elsewhere.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// One outlet currently serving one brand, with per-pair terms
///
/// `priority` is an operator-set preference: lower is preferred, ties are
/// broken by distance at selection time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BrandOutletLink {
    pub outlet_id: i32,
    pub brand_id: i32,
    pub is_available: bool,
    pub preparation_time_minutes: i32,
    pub minimum_order_amount: Decimal,
    pub delivery_fee: Decimal,
    pub priority: i32,
}

/// Read-only view over the brand/outlet relation
///
/// Every query filters to `is_available = true` links whose owning rows are
/// active; callers never see a link for a deactivated outlet or brand.
#[derive(Clone)]
pub struct AvailabilityIndex {
    pool: PgPool,
}

const LINK_COLUMNS: &str = "l.outlet_id, l.brand_id, l.is_available, \
     l.preparation_time_minutes, l.minimum_order_amount, l.delivery_fee, l.priority";

impl AvailabilityIndex {
    /// Create a new AvailabilityIndex
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All available links for a brand, across active outlets
    pub async fn links_for_brand(
        &self,
        brand_id: i32,
    ) -> Result<Vec<BrandOutletLink>, sqlx::Error> {
        let links = sqlx::query_as::<_, BrandOutletLink>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM brand_outlet_links l
            JOIN outlets o ON o.id = l.outlet_id
            WHERE l.brand_id = $1 AND l.is_available AND o.is_active
            ORDER BY l.priority, l.outlet_id
            "#
        ))
        .bind(brand_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(links)
    }

    /// All available links offered by one active outlet, for active brands
    pub async fn links_for_outlet(
        &self,
        outlet_id: i32,
    ) -> Result<Vec<BrandOutletLink>, sqlx::Error> {
        let links = sqlx::query_as::<_, BrandOutletLink>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM brand_outlet_links l
            JOIN outlets o ON o.id = l.outlet_id
            JOIN brands b ON b.id = l.brand_id
            WHERE l.outlet_id = $1 AND l.is_available AND o.is_active AND b.is_active
            ORDER BY l.priority, l.brand_id
            "#
        ))
        .bind(outlet_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(links)
    }

    /// Batch variant of [`links_for_outlet`] for the nearby-brands listing
    pub async fn links_for_outlets(
        &self,
        outlet_ids: &[i32],
    ) -> Result<Vec<BrandOutletLink>, sqlx::Error> {
        if outlet_ids.is_empty() {
            return Ok(Vec::new());
        }

        let links = sqlx::query_as::<_, BrandOutletLink>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM brand_outlet_links l
            JOIN outlets o ON o.id = l.outlet_id
            JOIN brands b ON b.id = l.brand_id
            WHERE l.outlet_id = ANY($1) AND l.is_available AND o.is_active AND b.is_active
            ORDER BY l.outlet_id, l.priority
            "#
        ))
        .bind(outlet_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(links)
    }

    /// The available link for one (outlet, brand) pair, if any
    ///
    /// Used to verify an explicitly supplied outlet id genuinely serves the
    /// requested brand before a checkout accepts it.
    pub async fn link_for_pair(
        &self,
        outlet_id: i32,
        brand_id: i32,
    ) -> Result<Option<BrandOutletLink>, sqlx::Error> {
        let link = sqlx::query_as::<_, BrandOutletLink>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM brand_outlet_links l
            JOIN outlets o ON o.id = l.outlet_id
            WHERE l.outlet_id = $1 AND l.brand_id = $2 AND l.is_available AND o.is_active
            "#
        ))
        .bind(outlet_id)
        .bind(brand_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(link)
    }
}
