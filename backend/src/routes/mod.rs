//! Route definitions for the TrackNToms POS inventory core

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Ingredient catalog reads
        .nest("/ingredients", ingredient_routes())
        // Purchase orders
        .nest("/purchases", purchase_routes())
        // Pullout requests
        .nest("/inventory/pullouts", pullout_routes())
        // Consignments
        .nest("/consignments", consignment_routes())
}

/// Ingredient catalog routes
fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_ingredients))
        .route("/low-stock", get(handlers::list_low_stock))
        .route("/:ingredient_id", get(handlers::get_ingredient))
}

/// Purchase order routes
fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_purchases).post(handlers::create_purchase),
        )
        .route(
            "/:purchase_id",
            get(handlers::get_purchase)
                .put(handlers::update_purchase)
                .delete(handlers::delete_purchase),
        )
}

/// Pullout request routes
fn pullout_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_pullouts).post(handlers::create_pullout),
        )
        .route(
            "/:pullout_id",
            get(handlers::get_pullout)
                .put(handlers::update_pullout)
                .delete(handlers::delete_pullout),
        )
        .route("/:pullout_id/approve", post(handlers::approve_pullout))
        .route("/:pullout_id/reject", post(handlers::reject_pullout))
}

/// Consignment routes
fn consignment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_consignments).post(handlers::create_consignment),
        )
        .route(
            "/:consignment_id",
            get(handlers::get_consignment)
                .put(handlers::update_consignment)
                .delete(handlers::delete_consignment),
        )
}
