use actix_web::{web, HttpResponse};

use super::language;
use crate::error::ApiError;
use crate::services::i18n_service::Labels;

/*
    /api/labels/{lang}
*/
pub async fn get_labels(
    labels: web::Data<Labels>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let lang = language(Some(path.as_str()))?;
    Ok(HttpResponse::Ok().json(labels.for_language(lang)))
}
