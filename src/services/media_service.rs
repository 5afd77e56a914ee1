//! Cliente del media host
//!
//! Sube imágenes en base64 (data-URI) al endpoint de subida firmada de
//! Cloudinary y devuelve la URL segura resultante. Cada subida es
//! independiente: no hay rollback compensatorio entre ranuras.

use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::environment::EnvironmentConfig;
use crate::utils::errors::AppError;

const UPLOAD_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Clone)]
pub struct MediaService {
    client: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl MediaService {
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            cloud_name: config.cloudinary_cloud_name.clone(),
            api_key: config.cloudinary_api_key.clone(),
            api_secret: config.cloudinary_api_secret.clone(),
        }
    }

    /// Subir una imagen y devolver su URL segura
    pub async fn upload_image(&self, image_data: &str, folder: &str) -> Result<String, AppError> {
        let timestamp = chrono::Utc::now().timestamp();
        let signature = self.sign_upload(folder, timestamp);
        let url = format!("{}/{}/image/upload", UPLOAD_BASE_URL, self.cloud_name);

        let params = [
            ("file", image_data.to_string()),
            ("api_key", self.api_key.clone()),
            ("timestamp", timestamp.to_string()),
            ("folder", folder.to_string()),
            ("signature", signature),
        ];

        let response = self
            .client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Error contacting media host: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Media host returned {}: {}",
                status, body
            )));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Invalid media host response: {}", e)))?;

        Ok(upload.secure_url)
    }

    /// Firma de subida: SHA-256 hex de los parámetros ordenados más el
    /// api_secret, según el esquema de subida firmada del media host
    fn sign_upload(&self, folder: &str, timestamp: i64) -> String {
        let to_sign = format!("folder={}&timestamp={}{}", folder, timestamp, self.api_secret);
        let digest = Sha256::digest(to_sign.as_bytes());
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> MediaService {
        MediaService {
            client: reqwest::Client::new(),
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        }
    }

    #[test]
    fn test_signature_is_deterministic() {
        let service = test_service();
        let a = service.sign_upload("vehiculos/carga", 1700000000);
        let b = service.sign_upload("vehiculos/carga", 1700000000);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_signature_varies_with_inputs() {
        let service = test_service();
        let base = service.sign_upload("vehiculos/carga", 1700000000);
        assert_ne!(base, service.sign_upload("vehiculos/carga", 1700000001));
        assert_ne!(base, service.sign_upload("otra/carpeta", 1700000000));
    }
}
