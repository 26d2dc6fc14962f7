use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::state::AppState;

pub async fn handler(state: web::Data<AppState>) -> Result<HttpResponse> {
    let categories = state.storage.count().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "categories": categories
    })))
}
