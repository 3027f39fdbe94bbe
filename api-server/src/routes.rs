use actix_web::{error, web, HttpResponse, Responder};
use catch_core::{ErrorResponse, SubmitResponse};
use score_store::{submission_from_value, ScoreStore};
use serde_json::Value;

/// Request bodies are tiny; anything larger is not a score
const JSON_LIMIT: usize = 4096;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health)).service(
        web::resource("/api/high-scores")
            .route(web::get().to(list_scores))
            .route(web::post().to(submit_score)),
    );
}

/// JSON extractor settings: malformed bodies become `400 {error}`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            tracing::warn!("Rejected request body: {}", err);
            let response = HttpResponse::BadRequest().json(ErrorResponse::new(err.to_string()));
            error::InternalError::from_response(err, response).into()
        })
}

/// GET /api/high-scores
/// Top 10 scores, best first
async fn list_scores(store: web::Data<ScoreStore>) -> impl Responder {
    let store = store.into_inner();

    match web::block(move || store.leaderboard()).await {
        Ok(Ok(entries)) => {
            tracing::debug!("Serving {} high scores", entries.len());
            HttpResponse::Ok().json(entries)
        }
        Ok(Err(e)) => {
            tracing::error!("Failed to load high scores: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Failed to load high scores"))
        }
        Err(e) => {
            tracing::error!("Blocking task failed while loading high scores: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Failed to load high scores"))
        }
    }
}

/// POST /api/high-scores
/// Validate and record `{name, score}`
async fn submit_score(store: web::Data<ScoreStore>, body: web::Json<Value>) -> impl Responder {
    let submission = match submission_from_value(&body) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!("Rejected score submission: {}", e);
            return HttpResponse::BadRequest().json(ErrorResponse::new(e.to_string()));
        }
    };

    tracing::info!(
        "Received score submission: {} for {}",
        submission.score,
        submission.name
    );

    let store = store.into_inner();
    match web::block(move || store.submit(&submission.name, submission.score)).await {
        Ok(Ok(_)) => HttpResponse::Ok().json(SubmitResponse { success: true }),
        Ok(Err(e)) => {
            tracing::error!("Failed to save score: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Failed to save score"))
        }
        Err(e) => {
            tracing::error!("Blocking task failed while saving score: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Failed to save score"))
        }
    }
}

/// GET /health
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "catch-high-scores"
    }))
}
