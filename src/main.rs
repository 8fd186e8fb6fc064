use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use intake_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::rate_limit::RpsLimiter,
    routes, AppState,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    // Drains queued verification emails and admin alerts. Delivery
    // failures are retried with backoff and never block a submission.
    {
        let state = app_state.clone();
        tokio::spawn(async move {
            loop {
                match state.notification_service.run_once().await {
                    Ok(true) => {}
                    Ok(false) => {
                        tokio::time::sleep(Duration::from_millis(1000)).await;
                    }
                    Err(e) => {
                        tracing::error!(error = ?e, "Notification worker error");
                        tokio::time::sleep(Duration::from_secs(2)).await;
                    }
                }
            }
        });
    }

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let public_api = Router::new()
        .route(
            "/api/applicants",
            post(routes::applicant_routes::submit_application),
        )
        .route(
            "/api/verify-email",
            get(routes::verification_routes::verify_email),
        )
        .route(
            "/api/preferences/:email",
            get(routes::applicant_routes::get_preferences)
                .patch(routes::applicant_routes::update_preferences),
        )
        .layer(axum::middleware::from_fn_with_state(
            RpsLimiter::new(config.public_rps),
            intake_backend::middleware::rate_limit::rps_middleware,
        ));

    let admin_api = Router::new()
        .route(
            "/api/admin/applicants",
            get(routes::admin_routes::list_applicants),
        )
        .route(
            "/api/admin/applicants/:id",
            get(routes::admin_routes::get_applicant),
        )
        .route(
            "/api/admin/applicants/:id/status",
            post(routes::admin_routes::update_applicant_status),
        )
        .layer(axum::middleware::from_fn(
            intake_backend::middleware::admin_auth::require_admin_key,
        ));

    info!("Serving uploads from: {}", config.uploads_dir);

    let app = base_routes
        .merge(public_api)
        .merge(admin_api)
        .nest_service(
            "/uploads",
            tower_http::services::ServeDir::new(&config.uploads_dir),
        )
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
