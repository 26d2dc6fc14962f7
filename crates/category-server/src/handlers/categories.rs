use actix_web::{web, HttpRequest, HttpResponse};
use category_core::CategorySpec;

use crate::error::{AppError, Result};
use crate::middleware::extract_trace_id;
use crate::state::AppState;

/// `POST /categories/`: build the posted tree and answer with its root.
pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<CategorySpec>,
) -> Result<HttpResponse> {
    let spec = body.into_inner();
    let trace_id = extract_trace_id(&req);

    match state.storage.create_tree(spec).await {
        Ok(root) => {
            tracing::info!(
                trace_id = ?trace_id,
                category_id = root.id,
                "Category created"
            );
            Ok(HttpResponse::Created().json(root))
        }
        Err(error) => {
            tracing::warn!(trace_id = ?trace_id, error = %error, "Failed to create category");
            Err(error.into())
        }
    }
}

/// `GET /categories/{id}/`: the category with its children, parents and siblings.
pub async fn retrieve(state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let detail = state.storage.category_detail(id).await?;

    tracing::debug!(
        category_id = id,
        children = detail.children.len(),
        parents = detail.parents.len(),
        siblings = detail.siblings.len(),
        "Category retrieved"
    );
    Ok(HttpResponse::Ok().json(detail))
}

pub async fn method_not_allowed() -> Result<HttpResponse> {
    Err(AppError::MethodNotAllowed)
}
