// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use event_tickets::{
    AvailabilityReport, SaleConfig, UnavailableReason, evaluate, event_remaining_capacity,
};
use event_tickets_domain::{
    Buyable, BuyableKind, Capacity, DEFAULT_SALE_END_THRESHOLD, DEFAULT_SALE_START_THRESHOLD,
    Event,
};
use event_tickets_persistence::{Persistence, PersistenceError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Event Tickets Server - read-only availability API for event ticket sales
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Offset from the event start at which sales open
    #[arg(long, default_value = DEFAULT_SALE_START_THRESHOLD, allow_hyphen_values = true)]
    sale_start_threshold: String,

    /// Offset from the event start at which sales close
    #[arg(long, default_value = DEFAULT_SALE_END_THRESHOLD, allow_hyphen_values = true)]
    sale_end_threshold: String,

    /// IANA timezone in which stored dates are interpreted
    #[arg(long, default_value = "UTC")]
    timezone: String,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The catalog and reservation store.
    persistence: Arc<Mutex<Persistence>>,
    /// Sale thresholds and timezone, fixed at startup.
    config: Arc<SaleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Availability of a single buyable at the time of the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AvailabilityResponse {
    buyable_id: i64,
    available: bool,
    /// Why the buyable cannot be purchased, when it cannot.
    reason: Option<UnavailableReason>,
    #[serde(with = "time::serde::rfc3339::option")]
    sale_start: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    sale_end: Option<OffsetDateTime>,
    remaining_capacity: u64,
    sold: u64,
    capacity: u64,
    /// `sold/capacity`, for display.
    sold_status: String,
}

impl From<AvailabilityReport> for AvailabilityResponse {
    fn from(report: AvailabilityReport) -> Self {
        Self {
            buyable_id: report.buyable_id,
            available: report.available,
            reason: report.reason,
            sale_start: report.window.start,
            sale_end: report.window.end,
            remaining_capacity: report.remaining_capacity,
            sold: report.sold.sold,
            capacity: report.sold.capacity,
            sold_status: report.sold.to_string(),
        }
    }
}

/// A buyable as listed under its event.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BuyableResponse {
    buyable_id: i64,
    kind: BuyableKind,
    title: String,
    /// Decimal price as a string, e.g. `"42.50"`.
    price: String,
    order_min: u32,
    order_max: u32,
    capacity: Capacity,
    creates_attendees: bool,
    availability: AvailabilityResponse,
}

/// An event with its buyables in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EventBuyablesResponse {
    event_id: i64,
    title: String,
    #[serde(with = "time::serde::rfc3339::option")]
    start_date: Option<OffsetDateTime>,
    capacity: u32,
    /// Units left in the event's shared pool.
    remaining_capacity: u64,
    buyables: Vec<BuyableResponse>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::EventNotFound(_) | PersistenceError::BuyableNotFound(_) => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            _ => {
                error!(error = %err, "Persistence error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: format!("Persistence error: {err}"),
                }
            }
        }
    }
}

fn buyable_to_response(buyable: &Buyable, report: AvailabilityReport) -> BuyableResponse {
    BuyableResponse {
        buyable_id: buyable.buyable_id,
        kind: buyable.kind,
        title: buyable.title.clone(),
        price: buyable.price.to_string(),
        order_min: buyable.order_min,
        order_max: buyable.order_max,
        capacity: buyable.capacity,
        creates_attendees: buyable.creates_attendees(),
        availability: AvailabilityResponse::from(report),
    }
}

/// Handler for GET `/health` endpoint.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Handler for GET `/buyables/{buyable_id}/availability` endpoint.
///
/// Evaluates the buyable against the current instant. The buyable, its
/// event and every count are read in one transaction.
async fn handle_get_availability(
    AxumState(app_state): AxumState<AppState>,
    Path(buyable_id): Path<i64>,
) -> Result<Json<AvailabilityResponse>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    debug!(buyable_id, %now, "Handling availability request");

    let mut persistence = app_state.persistence.lock().await;
    let report: AvailabilityReport = persistence.consistent_read(|store| {
        let buyable: Buyable = store
            .get_buyable(buyable_id)?
            .ok_or(PersistenceError::BuyableNotFound(buyable_id))?;
        let event: Option<Event> = store.get_event(buyable.event_id)?;
        evaluate(
            store,
            &buyable,
            event.as_ref(),
            &app_state.config.thresholds,
            now,
        )
    })?;
    drop(persistence);

    Ok(Json(AvailabilityResponse::from(report)))
}

/// Handler for GET `/events/{event_id}/buyables` endpoint.
async fn handle_list_event_buyables(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<EventBuyablesResponse>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    debug!(event_id, %now, "Handling event buyables request");

    let mut persistence = app_state.persistence.lock().await;
    let response: EventBuyablesResponse = persistence.consistent_read(|store| {
        let event: Event = store
            .get_event(event_id)?
            .ok_or(PersistenceError::EventNotFound(event_id))?;
        let remaining_capacity: u64 = event_remaining_capacity(store, &event)?;

        let mut buyables: Vec<BuyableResponse> = Vec::new();
        for buyable in store.list_buyables_for_event(event_id)? {
            let report: AvailabilityReport = evaluate(
                store,
                &buyable,
                Some(&event),
                &app_state.config.thresholds,
                now,
            )?;
            buyables.push(buyable_to_response(&buyable, report));
        }

        Ok(EventBuyablesResponse {
            event_id: event.event_id,
            title: event.title,
            start_date: event.start_date,
            capacity: event.capacity,
            remaining_capacity,
            buyables,
        })
    })?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/events/{event_id}/buyables", get(handle_list_event_buyables))
        .route(
            "/buyables/{buyable_id}/availability",
            get(handle_get_availability),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Event Tickets Server");

    // Malformed thresholds or timezone are fatal here, never per request
    let config: SaleConfig = SaleConfig::from_settings(
        &args.sale_start_threshold,
        &args.sale_end_threshold,
        &args.timezone,
    )?;

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    }
    .with_timezone(config.timezone);

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        config: Arc::new(config),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use event_tickets_domain::ReservationStatus;
    use time::Duration;
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            config: Arc::new(SaleConfig::default()),
        }
    }

    /// Seeds an event starting in 30 days with one open and one closed buyable.
    async fn seed_catalog(app_state: &AppState) -> (Event, Buyable, Buyable) {
        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let mut persistence = app_state.persistence.lock().await;

        let event: Event = persistence
            .insert_event(&Event::new(0, "Summer Festival", Some(now + Duration::days(30)), 100))
            .unwrap();

        let open: Buyable = persistence
            .insert_buyable(&Buyable {
                available_from: Some(now - Duration::days(1)),
                available_till: Some(now + Duration::days(1)),
                capacity: Capacity::Limited(5),
                sort_order: 1,
                ..Buyable::new(0, event.event_id, BuyableKind::Ticket, "Regular")
            })
            .unwrap();

        // Derived window opens 21 days before the event, 9 days from now
        let closed: Buyable = persistence
            .insert_buyable(&Buyable {
                sort_order: 2,
                ..Buyable::new(0, event.event_id, BuyableKind::Product, "Parking")
            })
            .unwrap();

        (event, open, closed)
    }

    async fn get_json(app: Router, uri: &str) -> (HttpStatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status: HttpStatusCode = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let app: Router = build_router(create_test_app_state());
        let (status, body) = get_json(app, "/health").await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_open_buyable_is_available() {
        let app_state: AppState = create_test_app_state();
        let (_, open, _) = seed_catalog(&app_state).await;
        let app: Router = build_router(app_state);

        let (status, body) = get_json(
            app,
            &format!("/buyables/{}/availability", open.buyable_id),
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["available"], true);
        assert!(body["reason"].is_null());
        assert_eq!(body["remaining_capacity"], 5);
        assert_eq!(body["sold_status"], "0/5");
    }

    #[tokio::test]
    async fn test_sold_out_buyable_reports_reason() {
        let app_state: AppState = create_test_app_state();
        let (_, open, _) = seed_catalog(&app_state).await;
        {
            let mut persistence = app_state.persistence.lock().await;
            let reservation_id: i64 = persistence
                .insert_reservation(ReservationStatus::Pending)
                .unwrap();
            persistence
                .insert_order_item(reservation_id, open.buyable_id, 5)
                .unwrap();
        }
        let app: Router = build_router(app_state);

        let (status, body) = get_json(
            app,
            &format!("/buyables/{}/availability", open.buyable_id),
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["available"], false);
        assert_eq!(body["reason"], "sold_out");
        assert_eq!(body["remaining_capacity"], 0);
        // Pending reservations hold capacity but are not sold
        assert_eq!(body["sold"], 0);
    }

    #[tokio::test]
    async fn test_buyable_outside_derived_window() {
        let app_state: AppState = create_test_app_state();
        let (_, _, closed) = seed_catalog(&app_state).await;
        let app: Router = build_router(app_state);

        let (status, body) = get_json(
            app,
            &format!("/buyables/{}/availability", closed.buyable_id),
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["available"], false);
        assert_eq!(body["reason"], "outside_sale_window");
        assert!(body["sale_start"].is_string());
        assert!(body["sale_end"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_buyable_is_not_found() {
        let app: Router = build_router(create_test_app_state());
        let (status, body) = get_json(app, "/buyables/404/availability").await;
        assert_eq!(status, HttpStatusCode::NOT_FOUND);
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn test_list_event_buyables() {
        let app_state: AppState = create_test_app_state();
        let (event, open, closed) = seed_catalog(&app_state).await;
        let app: Router = build_router(app_state);

        let (status, body) =
            get_json(app, &format!("/events/{}/buyables", event.event_id)).await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["title"], "Summer Festival");
        assert_eq!(body["remaining_capacity"], 100);

        let buyables = body["buyables"].as_array().unwrap();
        assert_eq!(buyables.len(), 2);
        assert_eq!(buyables[0]["buyable_id"], open.buyable_id);
        assert_eq!(buyables[0]["kind"], "ticket");
        assert_eq!(buyables[0]["creates_attendees"], true);
        assert_eq!(buyables[0]["availability"]["available"], true);
        assert_eq!(buyables[1]["buyable_id"], closed.buyable_id);
        assert_eq!(buyables[1]["price"], "0");
        assert_eq!(buyables[1]["capacity"]["mode"], "inherit");
        assert_eq!(buyables[1]["availability"]["available"], false);
    }

    #[tokio::test]
    async fn test_unknown_event_is_not_found() {
        let app: Router = build_router(create_test_app_state());
        let (status, _) = get_json(app, "/events/404/buyables").await;
        assert_eq!(status, HttpStatusCode::NOT_FOUND);
    }

    #[test]
    fn test_args_accept_negative_thresholds() {
        let args: Args = Args::parse_from([
            "event-tickets-server",
            "--sale-start-threshold",
            "-1 month",
            "--sale-end-threshold",
            "-2 hours",
            "--timezone",
            "Europe/Amsterdam",
        ]);
        assert_eq!(args.sale_start_threshold, "-1 month");
        assert_eq!(args.sale_end_threshold, "-2 hours");
        assert!(
            SaleConfig::from_settings(
                &args.sale_start_threshold,
                &args.sale_end_threshold,
                &args.timezone
            )
            .is_ok()
        );
    }

    #[test]
    fn test_args_defaults() {
        let args: Args = Args::parse_from(["event-tickets-server"]);
        assert_eq!(args.port, 3000);
        assert_eq!(args.sale_start_threshold, "-3 weeks");
        assert_eq!(args.sale_end_threshold, "-12 hours");
        assert_eq!(args.timezone, "UTC");
        assert!(args.database.is_none());
    }
}
