//! Route definitions for the AutoShop Manager API

use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected resources
        .nest("/customers", customer_routes(state.clone()))
        .nest("/vehicles", vehicle_routes(state.clone()))
        .nest("/jobs", job_routes(state.clone()))
        .nest("/invoices", invoice_routes(state.clone()))
        .nest("/inventory", inventory_routes(state.clone()))
        .nest("/suppliers", supplier_routes(state.clone()))
        .nest("/expenses", expense_routes(state.clone()))
        .nest("/technicians", technician_routes(state.clone()))
        .nest("/reports", report_routes(state.clone()))
        .nest("/notifications", notification_routes(state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
}

/// Customer routes (protected)
fn customer_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/:customer_id",
            put(handlers::update_customer).delete(handlers::delete_customer),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Vehicle routes (protected)
fn vehicle_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_vehicles).post(handlers::create_vehicle),
        )
        .route(
            "/:vehicle_id",
            put(handlers::update_vehicle).delete(handlers::delete_vehicle),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Job routes (protected)
fn job_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_jobs).post(handlers::create_job))
        .route(
            "/:job_id",
            put(handlers::update_job).delete(handlers::delete_job),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Invoice routes (protected)
fn invoice_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_invoices))
        .route(
            "/:invoice_id",
            get(handlers::get_invoice)
                .put(handlers::update_invoice)
                .delete(handlers::delete_invoice),
        )
        .route(
            "/:invoice_id/inventory-charge",
            post(handlers::add_inventory_charge),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Inventory routes (protected)
fn inventory_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_inventory).post(handlers::create_inventory_item),
        )
        .route(
            "/:item_id",
            put(handlers::update_inventory_item).delete(handlers::delete_inventory_item),
        )
        .route("/:item_id/deduct", post(handlers::deduct_inventory))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Supplier and purchase routes (protected)
fn supplier_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        // Static segments before the :supplier_id capture
        .route(
            "/purchases",
            get(handlers::list_purchases).post(handlers::create_purchase),
        )
        .route(
            "/purchases/:purchase_id",
            put(handlers::update_purchase).delete(handlers::delete_purchase),
        )
        .route(
            "/:supplier_id",
            put(handlers::update_supplier).delete(handlers::delete_supplier),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Expense routes (protected)
fn expense_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route(
            "/:expense_id",
            put(handlers::update_expense).delete(handlers::delete_expense),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Technician routes (protected, read-only)
fn technician_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_technicians))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Reporting routes (protected)
fn report_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/revenue", get(handlers::get_revenue_report))
        .route("/expenses", get(handlers::get_expense_report))
        .route("/jobs", get(handlers::get_job_report))
        .route("/inventory", get(handlers::get_inventory_report))
        .route("/:report_type/excel", get(handlers::export_report))
        .route("/:report_type/pdf", get(handlers::export_report_pdf))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Notification routes (protected)
fn notification_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_notifications))
        .route("/unread-count", get(handlers::unread_count))
        .route("/mark-all-read", patch(handlers::mark_all_read))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
