//! Request extractors whose rejections answer with the JSON envelope.
//!
//! axum's own `Json` and `Path` reply to a malformed body or path segment with
//! a plain-text body. These wrappers route the rejection through
//! [`ApiError`] instead.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// A JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

/// Typed path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);
