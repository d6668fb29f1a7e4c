use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` whose rejections render through [`AppError`], so a malformed
/// or mistyped body gets the same JSON error envelope as every other failure.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
