use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::dev::{fn_service, ServiceRequest, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpResponse, HttpServer};
use chrono::Utc;
use facdoc_core::{ListingId, ListingStore, NewListing, SearchParams};
use facdoc_similarity::{RecommendationResponse, Recommender};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::auth::{Authorized, PasswordGate, Session};
use crate::error::ApiError;

/// Shared state handed to every handler
pub struct AppState {
    pub store: Arc<dyn ListingStore>,
    pub gate: Arc<PasswordGate>,
    pub recommender: Recommender,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn ListingStore>, gate: Arc<PasswordGate>, recommender: Recommender) -> Self {
        Self {
            store,
            gate,
            recommender,
            started_at: Instant::now(),
        }
    }
}

/// Network settings for [`RestApi::start`]
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Frontend bundle served at `/`
    pub static_dir: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            static_dir: None,
        }
    }
}

#[derive(Deserialize)]
struct LoginRequest {
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    success: bool,
    token: String,
    expires_at: chrono::DateTime<Utc>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: chrono::DateTime<Utc>,
    /// Seconds since the server started
    uptime: f64,
}

#[derive(Serialize)]
struct CreatedResponse {
    id: ListingId,
    message: &'static str,
    price_per_sqm: f64,
}

#[derive(Serialize)]
struct DeletedResponse {
    message: &'static str,
    #[serde(rename = "deletedId")]
    deleted_id: ListingId,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(state: web::Data<AppState>, config: ApiConfig) -> std::io::Result<()> {
        let static_dir = config.static_dir.clone();
        info!(host = %config.host, port = config.port, "binding HTTP server");

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .wrap(Logger::default())
                .app_data(state.clone())
                .configure(routes)
                .configure(|cfg| {
                    if let Some(dir) = &static_dir {
                        cfg.service(frontend(dir.clone()));
                    }
                })
        })
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
    }
}

/// Register the `/api` routes and extractor error handlers
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| ApiError::BadRequest("Invalid listing id".to_string()).into()),
    )
    .route("/api/health", web::get().to(health))
    .route("/api/auth/password", web::post().to(login))
    .route("/api/auth/session", web::delete().to(logout))
    .route("/api/listings", web::post().to(create_listing))
    .route("/api/listings", web::get().to(search_listings))
    .route("/api/listings/{id}", web::get().to(get_listing))
    .route("/api/listings/{id}", web::delete().to(delete_listing))
    .route(
        "/api/listings/{id}/recommendations",
        web::get().to(get_recommendations),
    );
}

/// Static frontend with `index.html` served for unknown paths
fn frontend(dir: PathBuf) -> Files {
    let index = dir.join("index.html");
    Files::new("/", dir)
        .index_file("index.html")
        .default_handler(fn_service(move |req: ServiceRequest| {
            let index = index.clone();
            async move {
                let (req, _) = req.into_parts();
                let file = NamedFile::open_async(index).await?;
                let res = file.into_response(&req);
                Ok::<_, actix_web::Error>(ServiceResponse::new(req, res))
            }
        }))
}

async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let gate = state.gate.clone();
    let password = req.into_inner().password;
    // bcrypt verification is CPU-bound
    let Session { token, expires_at, .. } = web::block(move || gate.login(&password))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        token,
        expires_at,
    }))
}

async fn logout(state: web::Data<AppState>, auth: Authorized) -> HttpResponse {
    state.gate.revoke(&auth.session.token);
    HttpResponse::Ok().json(serde_json::json!({ "success": true }))
}

async fn create_listing(
    state: web::Data<AppState>,
    _auth: Authorized,
    req: web::Json<NewListing>,
) -> Result<HttpResponse, ApiError> {
    let listing = state.store.insert(req.into_inner())?;
    info!(id = listing.id, transaction_type = %listing.transaction_type, "listing created");

    Ok(HttpResponse::Created().json(CreatedResponse {
        id: listing.id,
        message: "Listing created successfully",
        price_per_sqm: listing.price_per_sqm,
    }))
}

async fn search_listings(
    state: web::Data<AppState>,
    _auth: Authorized,
    params: web::Query<SearchParams>,
) -> Result<HttpResponse, ApiError> {
    let listings = state.store.search(&params.to_filter())?;
    debug!(results = listings.len(), "listing search");
    Ok(HttpResponse::Ok().json(listings))
}

async fn get_listing(
    state: web::Data<AppState>,
    _auth: Authorized,
    path: web::Path<ListingId>,
) -> Result<HttpResponse, ApiError> {
    let listing = state.store.get_by_id(path.into_inner())?;
    Ok(HttpResponse::Ok().json(listing))
}

async fn delete_listing(
    state: web::Data<AppState>,
    _auth: Authorized,
    path: web::Path<ListingId>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    state.store.delete(id)?;
    info!(id, "listing deleted");

    Ok(HttpResponse::Ok().json(DeletedResponse {
        message: "Listing deleted successfully",
        deleted_id: id,
    }))
}

async fn get_recommendations(
    state: web::Data<AppState>,
    _auth: Authorized,
    path: web::Path<ListingId>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let base = state.store.get_by_id(id)?;
    let candidates = state.store.get_all_except(id)?;
    let candidates_count = candidates.len();

    let recommendations = state.recommender.recommend(&base, candidates);
    Ok(HttpResponse::Ok().json(RecommendationResponse::new(
        base,
        recommendations,
        candidates_count,
    )))
}
