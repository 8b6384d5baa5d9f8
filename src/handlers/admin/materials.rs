use axum::Json;
use std::collections::HashMap;

use crate::database::models::material::Material;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::catalog_service::NewMaterial;
use crate::services::CatalogService;

const MATERIAL_TYPES: &[&str] = &["pdf", "video", "notes"];

/// POST /api/admin/materials - Create a study material record
///
/// File and thumbnail URLs are plain strings pointing at already-uploaded
/// assets; the upload flow itself lives outside this API.
pub async fn create(Json(payload): Json<NewMaterial>) -> ApiResult<Material> {
    validate(&payload)?;

    let service = CatalogService::new().await?;
    let material = service.create_material(payload).await?;

    tracing::info!(material_id = %material.id, "material created");

    Ok(ApiResponse::created(material))
}

fn validate(payload: &NewMaterial) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();

    if payload.title.trim().is_empty() {
        field_errors.insert("title".to_string(), "Title is required".to_string());
    }
    if !MATERIAL_TYPES.contains(&payload.material_type.as_str()) {
        field_errors.insert(
            "material_type".to_string(),
            format!("Must be one of: {}", MATERIAL_TYPES.join(", ")),
        );
    }
    if payload.price_inr < 0 {
        field_errors.insert(
            "price_inr".to_string(),
            "Price cannot be negative".to_string(),
        );
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Invalid material input", Some(field_errors)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> NewMaterial {
        serde_json::from_value(serde_json::json!({
            "title": "Kinematics Notes",
            "material_type": "pdf",
            "price_inr": 99
        }))
        .unwrap()
    }

    #[test]
    fn accepts_well_formed_material() {
        assert!(validate(&payload()).is_ok());
    }

    #[test]
    fn rejects_unknown_material_type() {
        let mut p = payload();
        p.material_type = "podcast".to_string();
        assert!(validate(&p).is_err());
    }

    #[test]
    fn rejects_negative_price() {
        let mut p = payload();
        p.price_inr = -1;
        assert!(validate(&p).is_err());
    }
}
