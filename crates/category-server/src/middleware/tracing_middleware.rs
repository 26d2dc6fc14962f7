use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue},
    middleware::Next,
    Error, HttpMessage, HttpRequest,
};
use tracing::Instrument;
use uuid::Uuid;

pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Trace id of the current request, kept in request extensions.
#[derive(Clone, Debug)]
pub struct TraceId(pub String);

/// Runs the request inside an `http_request` span and echoes its trace id.
///
/// Install with `actix_web::middleware::from_fn(trace_requests)`. A client
/// supplied `X-Trace-Id` is reused; otherwise a UUID v4 is minted.
pub async fn trace_requests<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<B>, Error>
where
    B: MessageBody,
{
    let trace_id = incoming_trace_id(&req).unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(TraceId(trace_id.clone()));

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.path(),
    );

    async move {
        let mut res = next.call(req).await?;
        tracing::info!(status = res.status().as_u16(), "Request completed");

        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            res.headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        Ok(res)
    }
    .instrument(span)
    .await
}

fn incoming_trace_id(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub fn extract_trace_id(req: &HttpRequest) -> Option<String> {
    req.extensions().get::<TraceId>().map(|t| t.0.clone())
}
