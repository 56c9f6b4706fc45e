pub mod availability;
pub mod db;
pub mod discovery;
pub mod error;
pub mod geo;
pub mod models;
pub mod orders;
pub mod policy;
pub mod validation;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use availability::AvailabilityIndex;
use discovery::{BrandRepository, OutletLocator, OutletRepository, OutletSelector};
use orders::{
    AddressRepository, FulfillmentService, MenuItemRepository, OrderItemsRepository,
    OrdersRepository,
};
use policy::{PricingPolicy, ScoringPolicy};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        discovery::handlers::nearby_brands_handler,
        discovery::handlers::assign_outlet_handler,
    ),
    components(
        schemas(
            models::Outlet,
            models::Brand,
            discovery::models::NearbyBrandsResponse,
            discovery::models::NearbyBrand,
            discovery::models::NearbyOutletSummary,
            discovery::models::AssignOutletRequest,
            discovery::models::AssignItem,
            discovery::models::AssignedOutletResponse,
        )
    ),
    tags(
        (name = "discovery", description = "Location-based brand and outlet discovery")
    ),
    info(
        title = "Cloud Kitchen API",
        version = "1.0.0",
        description = "Outlet discovery and multi-brand order fulfillment"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub availability: AvailabilityIndex,
    pub brands: BrandRepository,
    pub locator: OutletLocator,
    pub selector: OutletSelector,
    pub fulfillment: FulfillmentService,
}

impl AppState {
    /// Wire up repositories, services, and policies over one pool
    pub fn new(db: PgPool) -> Self {
        let scoring = Arc::new(ScoringPolicy::default());
        let pricing = Arc::new(PricingPolicy::from_env());

        let availability = AvailabilityIndex::new(db.clone());
        let outlet_repo = OutletRepository::new(db.clone());
        let brand_repo = BrandRepository::new(db.clone());
        let locator = OutletLocator::new(outlet_repo.clone(), availability.clone());
        let selector = OutletSelector::new(locator.clone(), scoring);

        let fulfillment = FulfillmentService::new(
            OrdersRepository::new(db.clone()),
            OrderItemsRepository::new(db.clone()),
            AddressRepository::new(db.clone()),
            MenuItemRepository::new(db.clone()),
            outlet_repo,
            brand_repo.clone(),
            availability.clone(),
            selector.clone(),
            pricing,
        );

        Self {
            db,
            availability,
            brands: brand_repo,
            locator,
            selector,
            fulfillment,
        }
    }
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
pub fn create_router(db: PgPool) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let state = AppState::new(db);

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Discovery routes
        .route("/api/brands/nearby", get(discovery::nearby_brands_handler))
        .route("/api/outlets/assign", post(discovery::assign_outlet_handler))
        // Checkout routes
        .route("/api/orders", post(orders::create_order_handler))
        .route("/api/orders/:order_id", get(orders::get_order_by_id_handler))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Cloud Kitchen API - Starting...");

    // Get configuration from environment variables
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    // Create the application router
    let app = create_router(db_pool);

    // Start the Axum server
    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Cloud Kitchen API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}
