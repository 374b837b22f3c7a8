//! # REST API for Revenue Reports

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use shared::{RevenuePeriod, RevenueReportRequest};
use tracing::{error, info};

use super::mappers::receipt_mapper::ReceiptMapper;
use super::{error_status, SessionContext};
use crate::backend::domain::commands::revenue::RevenueReportQuery;
use crate::backend::domain::models::receipt::RevenueQueryError;
use crate::backend::AppState;

// Query parameters for the revenue report API
#[derive(Debug, Default, Deserialize)]
pub struct RevenueQuery {
    /// day, week, month, year or all; defaults to all
    pub period: Option<String>,
    pub reference: Option<String>,
}

/// Revenue over the stored receipts export
pub async fn get_revenue_report(
    State(state): State<AppState>,
    session: SessionContext,
    Query(query): Query<RevenueQuery>,
) -> impl IntoResponse {
    info!("GET /api/revenue - query: {:?}, user: {:?}", query, session.user_id);

    let period = match query.period.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        Some(period) => match period.parse::<RevenuePeriod>() {
            Ok(period) => period,
            Err(_) => {
                let e = RevenueQueryError::UnknownPeriod(period.to_string());
                return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
            }
        },
        None => RevenuePeriod::All,
    };

    let report_query = RevenueReportQuery {
        period,
        reference: query.reference,
    };

    match state.revenue_service.report_for_period(report_query).await {
        Ok(summary) => (StatusCode::OK, Json(ReceiptMapper::to_report_dto(&summary))).into_response(),
        Err(e) => {
            error!("Failed to build revenue report: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Revenue over a table supplied in the request body
pub async fn aggregate_revenue(
    State(state): State<AppState>,
    session: SessionContext,
    Json(request): Json<RevenueReportRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/revenue/aggregate - period: {}, reference: {:?}, rows: {}, user: {:?}",
        request.period,
        request.reference,
        request.rows.len(),
        session.user_id
    );

    match state
        .revenue_service
        .report_for_table(request.period, request.reference.as_deref(), &request.rows)
    {
        Ok(summary) => (StatusCode::OK, Json(ReceiptMapper::to_report_dto(&summary))).into_response(),
        Err(e) => {
            error!("Failed to aggregate revenue: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}
