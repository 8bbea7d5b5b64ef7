use crate::catalog::ReviewCatalog;
use crate::error::EvalError;
use crate::models::wire::{CreateSessionRequest, ErrorBody, RatingRequest, SessionView};
use crate::session::{EvaluationSession, SessionRegistry};
use crate::store::CsvResultStore;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use leptos::logging::{error, log, warn};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

pub type SharedCatalog = web::Data<Arc<ReviewCatalog>>;
pub type SharedStore = web::Data<Arc<CsvResultStore>>;
pub type SharedSessions = web::Data<Arc<Mutex<SessionRegistry>>>;

/// Registers the `/api` routes. Shared state is expected in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/users", web::get().to(list_users))
            .route("/sessions", web::post().to(create_session))
            .route("/sessions/{session_id}/reload", web::post().to(reload_session))
            .route("/sessions/{session_id}/ratings", web::put().to(set_rating))
            .route("/sessions/{session_id}/submit", web::post().to(submit_session)),
    );
}

fn status_for(err: &EvalError) -> StatusCode {
    match err {
        EvalError::InvalidUser(_) | EvalError::UnknownReview(_) | EvalError::UnknownSession(_) => {
            StatusCode::NOT_FOUND
        }
        EvalError::InvalidRating(_) | EvalError::IncompleteSubmission { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EvalError::SessionSpent => StatusCode::CONFLICT,
        EvalError::StorageWrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: EvalError) -> HttpResponse {
    let status = status_for(&err);
    if status.is_server_error() {
        error!("[API] {}: {}", err.kind(), err);
    } else {
        log!("[API] Rejected request ({}): {}", err.kind(), err);
    }
    HttpResponse::build(status).json(ErrorBody {
        kind: err.kind().to_string(),
        message: err.to_string(),
    })
}

fn session_view(session_id: Uuid, session: &mut EvaluationSession, store: &CsvResultStore) -> SessionView {
    let prior_submissions = store.progress(&session.user().id).unwrap_or_else(|err| {
        warn!("[API] Could not read progress for {}: {}", session.user().id, err);
        0
    });
    let batch = session.load_batch().to_vec();
    SessionView {
        session_id,
        user_id: session.user().id.clone(),
        batch,
        ratings: session.ratings().clone(),
        prior_submissions,
    }
}

pub async fn list_users(catalog: SharedCatalog) -> HttpResponse {
    HttpResponse::Ok().json(catalog.user_ids())
}

pub async fn create_session(
    catalog: SharedCatalog,
    store: SharedStore,
    sessions: SharedSessions,
    request: web::Json<CreateSessionRequest>,
) -> HttpResponse {
    log!("[API] Session requested for user: {}", request.user_id);
    let session = match EvaluationSession::select_user(catalog.get_ref().as_ref(), &request.user_id) {
        Ok(session) => session,
        Err(err) => return error_response(err),
    };

    let (session_id, session) = {
        let mut registry = sessions.lock().await;
        let session_id = registry.insert(session);
        (session_id, registry.get(&session_id))
    };
    let session = match session {
        Ok(session) => session,
        Err(err) => return error_response(err),
    };
    let mut session = session.lock().await;
    let view = session_view(session_id, &mut session, &store);
    log!("[API] Session {} started for {}", session_id, view.user_id);
    HttpResponse::Ok().json(view)
}

pub async fn reload_session(
    store: SharedStore,
    sessions: SharedSessions,
    path: web::Path<Uuid>,
) -> HttpResponse {
    let session_id = path.into_inner();
    let session = match sessions.lock().await.get(&session_id) {
        Ok(session) => session,
        Err(err) => return error_response(err),
    };
    let mut session = session.lock().await;
    HttpResponse::Ok().json(session_view(session_id, &mut session, &store))
}

pub async fn set_rating(
    sessions: SharedSessions,
    path: web::Path<Uuid>,
    request: web::Json<RatingRequest>,
) -> HttpResponse {
    let session_id = path.into_inner();
    let RatingRequest {
        review_id,
        value,
        comment,
    } = request.into_inner();

    let session = match sessions.lock().await.get(&session_id) {
        Ok(session) => session,
        Err(err) => return error_response(err),
    };
    let result = session.lock().await.set_rating(&review_id, value, comment);
    match result {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}

/// The registry lock is released before the file write; only this
/// session stays locked while its rows are synced to disk.
pub async fn submit_session(
    store: SharedStore,
    sessions: SharedSessions,
    path: web::Path<Uuid>,
) -> HttpResponse {
    let session_id = path.into_inner();
    let session = match sessions.lock().await.get(&session_id) {
        Ok(session) => session,
        Err(err) => return error_response(err),
    };
    let result = session.lock().await.submit(store.get_ref().as_ref());
    match result {
        Ok(receipt) => {
            log!(
                "[API] Session {} stored {} rows for {}",
                session_id,
                receipt.rows_written,
                receipt.user_id
            );
            HttpResponse::Ok().json(receipt)
        }
        Err(err) => error_response(err),
    }
}
