use crate::api_json::{StatusRequest, decode_status_request};
use actix_web::{HttpResponse, Responder, web};
use serde_json::{Value, json};

/// `POST /requirements/status`: per-node status of the plan against the tree.
pub async fn status_handler(body: web::Json<Value>) -> impl Responder {
    let request = match serde_json::from_value::<StatusRequest>(body.into_inner()) {
        Ok(r) => r,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": format!("invalid JSON body: {}", e)})),
    };
    match decode_status_request(request) {
        Ok((tree, plan)) => HttpResponse::Ok().json(tree.status_report(&plan)),
        Err(e) => HttpResponse::BadRequest().json(json!({"error": format!("failed to parse input: {}", e)})),
    }
}
