//! Web dashboard: HTML monitoring view plus the JSON boundaries into the
//! store (login, logout, contact form, admin reads)

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use ventosa_store::{ContactForm, StoreError, StoreHandle};

use crate::state::TelemetryHandle;
use crate::telemetry::{is_operational, TelemetrySnapshot};

/// Dashboard application state
#[derive(Clone)]
pub struct DashboardState {
    pub store: StoreHandle,
    pub telemetry: TelemetryHandle,
}

/// Build the dashboard axum router
pub fn build_router(store: StoreHandle, telemetry: TelemetryHandle) -> Router {
    let dashboard_state = DashboardState { store, telemetry };

    Router::new()
        .route("/", get(index_handler))
        .route("/api/telemetry", get(telemetry_handler))
        .route("/api/login", post(login_handler))
        .route("/api/logout", post(logout_handler))
        .route("/api/contact", post(contact_handler))
        .route("/api/admin/users", get(admin_users_handler))
        .route("/api/admin/contacts", get(admin_contacts_handler))
        .route("/health", get(health_handler))
        .with_state(dashboard_state)
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

async fn login_handler(
    State(dashboard): State<DashboardState>,
    Json(request): Json<LoginRequest>,
) -> Response {
    // Form-level required-field checks happen before the credential lookup
    if request.email.trim().is_empty() {
        return error_json(StatusCode::UNPROCESSABLE_ENTITY, "Email is required");
    }
    if !request.email.contains('@') {
        return error_json(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Please enter a valid email address",
        );
    }
    if request.password.is_empty() {
        return error_json(StatusCode::UNPROCESSABLE_ENTITY, "Password is required");
    }

    // Simulated latency runs before the write lock is taken, so an in-flight
    // login never stalls other store requests.
    let delay = dashboard.store.read().await.login_delay();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    match dashboard
        .store
        .write()
        .await
        .login(&request.email, &request.password)
    {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => store_error_response(e),
    }
}

async fn logout_handler(State(dashboard): State<DashboardState>) -> Response {
    match dashboard.store.write().await.logout() {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => store_error_response(e),
    }
}

async fn contact_handler(
    State(dashboard): State<DashboardState>,
    Json(form): Json<ContactForm>,
) -> Response {
    match dashboard.store.write().await.add_contact_submission(form) {
        Ok(submission) => (StatusCode::CREATED, Json(submission)).into_response(),
        Err(e) => store_error_response(e),
    }
}

async fn admin_users_handler(State(dashboard): State<DashboardState>) -> Response {
    match dashboard.store.read().await.all_users() {
        Ok(users) => Json(users).into_response(),
        Err(e) => store_error_response(e),
    }
}

async fn admin_contacts_handler(State(dashboard): State<DashboardState>) -> Response {
    match dashboard.store.read().await.all_contacts() {
        Ok(contacts) => Json(contacts).into_response(),
        Err(e) => store_error_response(e),
    }
}

async fn telemetry_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.telemetry.read().await;
    Json(state.clone())
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

fn error_json(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// `Unauthorized` is a contract violation (the UI never sends admins here),
/// so it gets a terse status and no user-facing message. Credential and
/// validation failures surface their message to the submitting UI.
fn store_error_response(err: StoreError) -> Response {
    match err {
        StoreError::InvalidCredentials => {
            error_json(StatusCode::UNAUTHORIZED, "Incorrect email or password")
        }
        StoreError::Unauthorized => StatusCode::FORBIDDEN.into_response(),
        StoreError::Validation(message) => {
            error_json(StatusCode::UNPROCESSABLE_ENTITY, &message)
        }
        StoreError::Storage(message) => {
            tracing::error!("Storage failure: {}", message);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        StoreError::Serialization(e) => {
            tracing::error!("Serialization failure: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn index_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.telemetry.read().await;

    if state.loading {
        return Html(
            r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Turbine Monitor</title>
<meta http-equiv="refresh" content="2"></head>
<body style="font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem;">
<p>Loading monitoring data...</p>
</body>
</html>"#
                .to_string(),
        );
    }

    let banner = match &state.error {
        Some(message) => format!(
            r#"<div style="padding: 0.75rem; margin-bottom: 1rem; border: 1px solid #dc3545; border-radius: 0.25rem; color: #721c24; background-color: #f8d7da;">{}</div>"#,
            message
        ),
        None => String::new(),
    };

    let snapshot = state.snapshot.clone().unwrap_or_else(TelemetrySnapshot::baseline);
    drop(state);

    let turbine_rows: String = (1..=4)
        .map(|n| {
            let output = snapshot
                .turbines
                .get(n - 1)
                .map(|t| t.output)
                .unwrap_or(0.0);
            let (label, color, bg) = match snapshot.turbine_state(n) {
                Some(true) => ("Operational", "#155724", "#d4edda"),
                Some(false) => ("Offline", "#721c24", "#f8d7da"),
                None => ("Unknown", "#383d41", "#e2e3e5"),
            };
            format!(
                r#"<tr style="border-bottom: 1px solid #dee2e6;">
                    <td style="padding: 0.5rem;">Turbine {}</td>
                    <td style="padding: 0.5rem;">
                        <span style="display: inline-block; padding: 0.25em 0.6em; border-radius: 0.25rem; font-size: 0.85em; font-weight: 600; color: {}; background-color: {};">{}</span>
                    </td>
                    <td style="padding: 0.5rem; font-family: monospace;">{:.2} MW</td>
                </tr>"#,
                n, color, bg, label, output
            )
        })
        .collect();

    let subsystem_rows: String = [
        ("Substation", &snapshot.substation_state),
        ("Research Facility", &snapshot.research_state),
        ("Data Center", &snapshot.data_center_state),
        ("Residential Area", &snapshot.residential_state),
    ]
    .iter()
    .map(|(name, value)| {
        let label = value.as_deref().unwrap_or("Unknown");
        let (color, bg) = if is_operational(value) {
            ("#155724", "#d4edda")
        } else {
            ("#721c24", "#f8d7da")
        };
        format!(
            r#"<tr style="border-bottom: 1px solid #dee2e6;">
                <td style="padding: 0.5rem;">{}</td>
                <td style="padding: 0.5rem;">
                    <span style="display: inline-block; padding: 0.25em 0.6em; border-radius: 0.25rem; font-size: 0.85em; font-weight: 600; color: {}; background-color: {};">{}</span>
                </td>
            </tr>"#,
            name, color, bg, label
        )
    })
    .collect();

    let battery_state = snapshot
        .dc_battery_state
        .as_deref()
        .unwrap_or("Unknown")
        .to_string();
    let battery_charge = snapshot
        .dc_battery_charge
        .map(|c| format!("{}%", c))
        .unwrap_or_else(|| "Unknown".to_string());

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Turbine Monitor</title>
    <script>
        setInterval(function() {{ location.reload(); }}, 5000);
    </script>
</head>
<body style="font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem;">
    <h1>Turbine Monitor</h1>
    <p style="color: #6c757d;">Real-time wind farm monitoring dashboard</p>
    {banner}
    <section>
        <h2>Wind</h2>
        <p>Speed: <strong>{wind_speed} m/s</strong> &mdash; Direction: <strong>{wind_direction}&deg;</strong></p>
    </section>
    <section>
        <h2>Turbines</h2>
        <table style="width: 100%; border-collapse: collapse;">
            <thead>
                <tr style="border-bottom: 2px solid #dee2e6;">
                    <th style="padding: 0.5rem; text-align: left;">Turbine</th>
                    <th style="padding: 0.5rem; text-align: left;">State</th>
                    <th style="padding: 0.5rem; text-align: left;">Output</th>
                </tr>
            </thead>
            <tbody>{turbine_rows}</tbody>
        </table>
    </section>
    <section>
        <h2>System Status</h2>
        <table style="width: 100%; border-collapse: collapse;">
            <tbody>{subsystem_rows}</tbody>
        </table>
        <p>DC Battery: <strong>{battery_state}</strong> &mdash; Charge: <strong>{battery_charge}</strong></p>
    </section>
    <section>
        <h2>Transformer</h2>
        <table style="width: 100%; border-collapse: collapse;">
            <thead>
                <tr style="border-bottom: 2px solid #dee2e6;">
                    <th style="padding: 0.5rem; text-align: left;"></th>
                    <th style="padding: 0.5rem; text-align: left;">Voltage</th>
                    <th style="padding: 0.5rem; text-align: left;">Current</th>
                </tr>
            </thead>
            <tbody>
                <tr style="border-bottom: 1px solid #dee2e6;">
                    <td style="padding: 0.5rem;">Pre-Transformer</td>
                    <td style="padding: 0.5rem; font-family: monospace;">{pre_voltage:.2} V</td>
                    <td style="padding: 0.5rem; font-family: monospace;">{pre_current:.2} A</td>
                </tr>
                <tr style="border-bottom: 1px solid #dee2e6;">
                    <td style="padding: 0.5rem;">Post-Transformer</td>
                    <td style="padding: 0.5rem; font-family: monospace;">{post_voltage:.2} V</td>
                    <td style="padding: 0.5rem; font-family: monospace;">{post_current:.2} A</td>
                </tr>
            </tbody>
        </table>
    </section>
    <section>
        <h2>Total Generation</h2>
        <p style="font-family: monospace; font-size: 1.5rem;">{total_generation:.2} MW</p>
    </section>
</body>
</html>"#,
        banner = banner,
        wind_speed = snapshot.wind_speed,
        wind_direction = snapshot.wind_direction,
        turbine_rows = turbine_rows,
        subsystem_rows = subsystem_rows,
        battery_state = battery_state,
        battery_charge = battery_charge,
        pre_voltage = snapshot.transformer.pre_voltage,
        pre_current = snapshot.transformer.pre_current,
        post_voltage = snapshot.transformer.post_voltage,
        post_current = snapshot.transformer.post_current,
        total_generation = snapshot.total_generation,
    );

    Html(html)
}
