//! Request extractors that reject with the JSON error body

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON request body; decoding failures become a 400 `{ "error": .. }` response
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Query string; decoding failures become a 400 `{ "error": .. }` response
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);
