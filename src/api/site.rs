//! Site resolution middleware.

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::domain::SiteId;
use crate::error::MenuError;

/// Header selecting the site a request is served for.
pub const SITE_HEADER: &str = "X-Site-Id";

/// Resolve the request's site and store it in the request extensions.
///
/// Uses the `X-Site-Id` header when present, otherwise the configured
/// default site.
pub async fn resolve_site(
    State(default_site): State<SiteId>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, MenuError> {
    let site = match request.headers().get(SITE_HEADER) {
        Some(value) => value
            .to_str()
            .map_err(|_| MenuError::BadRequest(format!("{} is not valid text", SITE_HEADER)))?
            .parse::<SiteId>()
            .map_err(MenuError::BadRequest)?,
        None => default_site,
    };

    request.extensions_mut().insert(site);

    Ok(next.run(request).await)
}
