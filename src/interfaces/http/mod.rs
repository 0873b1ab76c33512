//! REST surface over [`LoanService`]: one command endpoint for submitting
//! payments and read endpoints for loans and their payments.

use crate::application::loan_service::LoanService;
use crate::domain::loan::{Loan, LoanFilter};
use crate::domain::pagination::Page;
use crate::domain::payment::{LoanPayment, LoanPaymentResponse};
use crate::error::LoanError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub const WELCOME: &str = "Welcome to the Loan Application API";

pub type SharedService = Arc<LoanService>;

pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/payment", post(add_loan_payment))
        .route("/loans", get(list_loans))
        .route("/loans/{id}", get(get_loan))
        .route("/loans/{id}/payments", get(list_loan_payments))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps service failures onto HTTP responses with an `{"error": ..}` body.
pub struct ApiError(LoanError);

impl From<LoanError> for ApiError {
    fn from(e: LoanError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!(error = %self.0, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

async fn home() -> &'static str {
    WELCOME
}

async fn add_loan_payment(
    State(service): State<SharedService>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<LoanPayment>), ApiError> {
    let Json(payload) = payload.map_err(|rejection| LoanError::Validation(rejection.body_text()))?;
    let input = service.validate_and_format_loan_payment_request(&payload)?;
    let payment = service.add_loan_payment(input).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

#[derive(Debug, Default, Deserialize)]
pub struct LoansQuery {
    pub cursor: Option<i64>,
    pub limit: Option<i64>,
    pub name: Option<String>,
    pub interest_rate: Option<Decimal>,
    pub principal: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
}

impl LoansQuery {
    fn filter(&self) -> LoanFilter {
        LoanFilter {
            name: self.name.clone(),
            interest_rate: self.interest_rate,
            principal: self.principal,
            due_date: self.due_date,
        }
    }
}

async fn list_loans(
    State(service): State<SharedService>,
    Query(query): Query<LoansQuery>,
) -> Result<Json<Page<Loan>>, ApiError> {
    let page = service
        .get_loans(query.cursor, query.limit, Some(query.filter()))
        .await?;
    Ok(Json(page))
}

async fn get_loan(
    State(service): State<SharedService>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let response = match service.get_loan_by_id(id).await? {
        Some(loan) => Json(loan).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: LoanError::NotFound { loan_id: id }.to_string(),
            }),
        )
            .into_response(),
    };
    Ok(response)
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub cursor: Option<i64>,
    pub limit: Option<i64>,
}

async fn list_loan_payments(
    State(service): State<SharedService>,
    Path(id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<LoanPaymentResponse>>, ApiError> {
    let page = service
        .get_loan_payments(id, query.cursor, query.limit)
        .await?;
    Ok(Json(page))
}
