use actix_web::{HttpResponse, Result};

use crate::models::HealthResponse;
use crate::utils::responses::ResponseBuilder;

/// Health check endpoint
///
/// # Errors
/// Returns an error if health status cannot be determined
pub async fn health() -> Result<HttpResponse> {
    let response = HealthResponse {
        status: "ok".to_string(),
        message: "Homebase auth callback service is running".to_string(),
    };
    Ok(ResponseBuilder::ok().json(&response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, http::StatusCode};

    #[actix_web::test]
    async fn test_health_reports_ok() {
        let response = health().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }
}
