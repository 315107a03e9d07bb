use std::convert::Infallible;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::error;

use wge_core::{errors::Error, export};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    link: Option<String>,
}

/// POST /api/extract — resolve an invite link and cache the contacts.
pub async fn extract_handler(
    State(state): State<AppState>,
    Json(req): Json<ExtractRequest>,
) -> Response {
    let link = match req.link.as_deref().map(str::trim) {
        Some(link) if !link.is_empty() => link.to_string(),
        _ => return error_response(StatusCode::BAD_REQUEST, "invite link required"),
    };

    // One resolution at a time; the bridge session is shared state.
    let Ok(_guard) = state.resolve_lock.try_lock() else {
        return error_response(StatusCode::CONFLICT, "extraction already in progress");
    };

    let resolved = tokio::time::timeout(state.resolve_timeout, state.extractor.resolve(&link)).await;

    match resolved {
        Ok(Ok(result)) => {
            let body = json!({
                "ok": true,
                "groupId": result.group_id,
                "groupName": result.group_name,
                "count": result.participants.len(),
                "participants": result.participants,
            });
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(Err(Error::InvalidLink(msg))) => error_response(StatusCode::BAD_REQUEST, &msg),
        Ok(Err(e)) => {
            error!(error = %e, "extraction failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
        Err(_) => {
            error!("extraction timed out");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "resolution timed out; try again",
            )
        }
    }
}

/// GET /api/export/csv — current cache as a CSV attachment. Never fails;
/// an empty cache yields a header-only document.
pub async fn export_csv_handler(State(state): State<AppState>) -> Response {
    let participants = state.cache.get().participants;
    download_response(
        export::to_csv(&participants),
        "text/csv; charset=utf-8",
        "whatsapp-group-contacts.csv",
    )
}

/// GET /api/export/vcf — current cache as a vCard attachment.
pub async fn export_vcf_handler(State(state): State<AppState>) -> Response {
    let participants = state.cache.get().participants;
    download_response(
        export::to_vcf(&participants),
        "text/vcard; charset=utf-8",
        "whatsapp-group-contacts.vcf",
    )
}

/// GET /api/events — session lifecycle events as SSE.
///
/// Named events mirror the bridge lifecycle (`qr`, `authenticated`, `ready`,
/// `auth_failure`, `disconnected`); a slow consumer sees a `lagged` event
/// for missed broadcasts.
pub async fn events_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();

    let connected =
        stream::once(async { Ok::<_, Infallible>(Event::default().event("connected").data("ok")) });

    let events = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(ev) => Event::default().event(ev.name()).json_data(&ev).ok().map(Ok),
            Err(BroadcastStreamRecvError::Lagged(n)) => Event::default()
                .event("lagged")
                .json_data(&json!({ "missed": n }))
                .ok()
                .map(Ok),
        }
    });

    Sse::new(connected.chain(events)).keep_alive(KeepAlive::default())
}

pub async fn health_handler() -> &'static str {
    "ok"
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn download_response(body: String, content_type: &str, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
        ],
        body,
    )
        .into_response()
}
