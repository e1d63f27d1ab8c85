//! Request extractors.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose rejections render as [`AppError`] JSON bodies.
///
/// A missing field becomes a 422, malformed JSON a 400 and a wrong content
/// type a 415, each with the usual `{status, detail}` body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
