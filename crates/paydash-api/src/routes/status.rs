//! Order status lookup

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use paydash_core::{StatusTone, TransactionRecord, TransactionStatus};
use serde::Serialize;

use super::with_session;
use crate::routes::view::not_blank;
use crate::{ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct StatusReply {
    pub success: bool,
    pub order_id: String,
    pub status: TransactionStatus,
    /// Status text as reported upstream
    pub raw_status: String,
    pub tone: StatusTone,
    /// Matching row of the loaded overview, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<TransactionRecord>,
}

/// Ask the upstream for the live status of one order
pub async fn api_transaction_status(
    state: State<AppState>,
    headers: HeaderMap,
    Path(order_id): Path<String>,
) -> ApiResult<Json<StatusReply>> {
    let order_id = not_blank(&order_id, "order_id")?;
    let token = with_session(&state, &headers, |session| session.token.clone()).await?;

    let check = state.source.transaction_status(&token, &order_id).await?;

    let record = with_session(&state, &headers, |session| {
        session.overview.engine.find(&order_id).cloned()
    })
    .await?;

    Ok(Json(StatusReply {
        success: true,
        tone: check.status.tone(),
        order_id: check.order_id,
        status: check.status,
        raw_status: check.raw_status,
        record,
    }))
}
