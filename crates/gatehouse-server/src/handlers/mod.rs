//! Route handlers

pub mod feed;
pub mod health;
pub mod work_items;

use crate::error::ApiError;
use gatehouse_domain::value_objects::{AdmissionDecision, ClientIdentity};
use gatehouse_infrastructure::AppContext;
use tracing::debug;

/// Admit the caller or fail with 429
pub(crate) async fn admit(ctx: &AppContext, identity: &ClientIdentity) -> Result<(), ApiError> {
    match ctx.admission().admit(identity, ctx.window_policy()).await? {
        AdmissionDecision::Allowed { count, remaining } => {
            debug!(identity = identity.as_str(), count, remaining, "Request admitted");
            Ok(())
        }
        AdmissionDecision::Rejected { retry_after, .. } => {
            Err(ApiError::TooManyRequests { retry_after })
        }
    }
}
