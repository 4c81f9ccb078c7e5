// src/utils/link.rs

use url::Url;

use crate::{error::AppError, models::quiz::QuizId};

/// Builds the shareable join URL for a quiz: `<base>/join_quiz/<id>`.
///
/// This is the string a QR renderer encodes; rendering the image is left to
/// whoever consumes the link.
pub fn join_url(base: &Url, id: QuizId) -> Result<Url, AppError> {
    // A base without a trailing slash would have its last segment replaced.
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(&format!("join_quiz/{}", id))
        .map_err(|e| AppError::InternalServerError(format!("invalid join url: {}", e)))
}
