//! Cliente HTTP para Supabase Storage
//!
//! Sube imágenes de vehículos a un bucket público y devuelve la URL
//! pública del objeto.

use async_trait::async_trait;
use reqwest::Client;

use crate::backend::ObjectStorage;
use crate::utils::errors::{AppError, AppResult};

pub struct SupabaseStorageClient {
    client: Client,
    base_url: String,
    api_key: String,
    bucket: String,
}

impl SupabaseStorageClient {
    pub fn new(base_url: String, api_key: String, bucket: String) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            bucket,
        })
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path)
    }

    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorageClient {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<String> {
        let size = bytes.len();
        let response = self
            .client
            .post(self.object_url(path))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "storage upload failed ({}): {}",
                status, body
            )));
        }

        log::info!("📤 Imagen subida a '{}' ({} bytes)", path, size);
        Ok(self.public_url(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = SupabaseStorageClient::new(
            "https://abc.supabase.co".into(),
            "key".into(),
            "vehicle-images".into(),
        )
        .unwrap();

        assert_eq!(
            client.object_url("vehicles/1_abc"),
            "https://abc.supabase.co/storage/v1/object/vehicle-images/vehicles/1_abc"
        );
        assert_eq!(
            client.public_url("vehicles/1_abc"),
            "https://abc.supabase.co/storage/v1/object/public/vehicle-images/vehicles/1_abc"
        );
    }
}
