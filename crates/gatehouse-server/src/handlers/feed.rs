//! Resource feed route

use crate::constants::CACHE_STATUS_HEADER;
use crate::error::ApiError;
use crate::handlers::admit;
use crate::identity::Caller;
use gatehouse_domain::value_objects::CacheOutcome;
use gatehouse_infrastructure::AppContext;
use rocket::http::Header;
use rocket::serde::json::Json;
use rocket::{Responder, State, get};
use std::sync::Arc;

/// Feed payload with its cache status header
#[derive(Responder)]
pub struct FeedResponse {
    inner: Json<serde_json::Value>,
    cache: Header<'static>,
}

/// `GET /resource-feed`
#[get("/resource-feed")]
pub async fn resource_feed(
    ctx: &State<Arc<AppContext>>,
    caller: Caller,
) -> Result<FeedResponse, ApiError> {
    admit(ctx, &caller.0).await?;

    let lookup = ctx.feed().feed().await?;
    let status = match lookup.outcome {
        CacheOutcome::Hit => "HIT",
        CacheOutcome::Miss => "MISS",
    };
    Ok(FeedResponse {
        inner: Json(lookup.value),
        cache: Header::new(CACHE_STATUS_HEADER, status),
    })
}
