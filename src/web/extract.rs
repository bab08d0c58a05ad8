use axum::extract::FromRequest;

use crate::web::AppError;

/// `Json` body extractor whose rejections go through [`AppError`], so a
/// malformed body gets the same `{"error": ...}` shape as every other failure.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
