use crate::api_json::{JobMessage, SearchJob, SearchJobRequest, decode_search_job};
use crate::error::EngineResult;
use crate::worker::spawn_job;
use actix_web::{HttpResponse, Responder, web};
use serde_json::{Value, json};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, warn};

fn decode_body(body: Value) -> EngineResult<SearchJob> {
    let request = serde_json::from_value::<SearchJobRequest>(body)?;
    decode_search_job(request)
}

async fn acquire(searches: web::Data<Semaphore>) -> Result<OwnedSemaphorePermit, HttpResponse> {
    searches
        .into_inner()
        .acquire_owned()
        .await
        .map_err(|_| HttpResponse::InternalServerError().json(json!({"error": "failed to acquire semaphore"})))
}

/// `POST /assignments/search`: streams NDJSON lines while the search runs.
/// The search is cancelled when the client goes away.
pub async fn search_handler(searches: web::Data<Semaphore>, body: web::Json<Value>) -> impl Responder {
    let job = match decode_body(body.into_inner()) {
        Ok(job) => job,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": format!("failed to parse input: {}", e)})),
    };
    let permit = match acquire(searches).await {
        Ok(p) => p,
        Err(response) => return response,
    };

    let handle = spawn_job(job, Some(permit));
    let lines = futures_util::stream::unfold(handle, |mut handle| async move {
        let message = handle.next_message().await?;
        match message.to_line() {
            Ok(line) => Some((Ok::<_, actix_web::Error>(web::Bytes::from(line)), handle)),
            Err(e) => {
                warn!(error = %e, "[search] failed to serialize message, closing stream");
                None
            }
        }
    });
    HttpResponse::Ok().content_type("application/x-ndjson").streaming(lines)
}

/// `POST /assignments/best`: waits for the search and returns the last batch.
pub async fn best_handler(searches: web::Data<Semaphore>, body: web::Json<Value>) -> impl Responder {
    let job = match decode_body(body.into_inner()) {
        Ok(job) => job,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": format!("failed to parse input: {}", e)})),
    };
    let permit = match acquire(searches).await {
        Ok(p) => p,
        Err(response) => return response,
    };

    let start = std::time::Instant::now();
    let mut handle = spawn_job(job, Some(permit));
    let mut best = Vec::new();
    while let Some(message) = handle.next_message().await {
        if let JobMessage::Batch { plans } = message {
            best = plans;
        }
    }
    let summary = match handle.finish().await {
        Ok(summary) => summary,
        Err(e) => return HttpResponse::InternalServerError().json(json!({"error": format!("task join error: {}", e)})),
    };
    debug!(elapsed_ms = start.elapsed().as_millis() as u64, plans = best.len(), "[best] search complete");

    HttpResponse::Ok().json(json!({
        "plans": best,
        "batches": summary.batches,
        "plansExamined": summary.plans_examined,
        "configurations": summary.configurations,
    }))
}
