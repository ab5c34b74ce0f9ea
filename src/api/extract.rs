//! Request extractors

use axum::extract::FromRequest;

use crate::error::ApiError;

/// `axum::Json`, but rejections are rendered as the service's error body
/// instead of axum's plain-text default.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ValidJson<T>(pub T);
