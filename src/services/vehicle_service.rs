//! Servicio de vehículos
//!
//! Alta y edición del inventario. El formulario se valida por completo
//! antes de cualquier llamada al backend; la imagen nueva, si la hay, se
//! sube primero y su URL pública queda en la fila.

use std::sync::Arc;

use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use tracing::info;
use uuid::Uuid;

use crate::backend::{FleetStore, ObjectStorage};
use crate::dto::vehicle_dto::{ImageUpload, VehicleForm};
use crate::models::vehicle::{Vehicle, VehicleListResponse};
use crate::utils::errors::{not_found_error, AppResult};

/// Prefijo de las imágenes de vehículos en el bucket
pub const IMAGE_PREFIX: &str = "vehicles";

/// Nombre único para una imagen: `vehicles/<millis>_<aleatorio>`
pub fn image_object_path() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(7)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    format!("{}/{}_{}", IMAGE_PREFIX, Utc::now().timestamp_millis(), suffix)
}

pub struct VehicleService {
    store: Arc<dyn FleetStore>,
    storage: Arc<dyn ObjectStorage>,
}

impl VehicleService {
    pub fn new(store: Arc<dyn FleetStore>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { store, storage }
    }

    pub async fn list(&self) -> AppResult<VehicleListResponse> {
        let vehicles = self.store.list_vehicles().await?;
        Ok(VehicleListResponse::from(vehicles))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Vehicle> {
        self.store
            .get_vehicle(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }

    pub async fn create(&self, form: VehicleForm) -> AppResult<Vehicle> {
        let (mut draft, image) = form.into_parts()?;

        if let Some(image) = image {
            draft.image_url = Some(self.upload_image(image).await?);
        }

        let vehicle = draft.into_vehicle(Uuid::new_v4(), Utc::now());
        let created = self.store.insert_vehicle(&vehicle).await?;
        info!(
            "🚗 Vehículo creado: {} {} ({})",
            created.make, created.model, created.id
        );
        Ok(created)
    }

    pub async fn update(&self, id: Uuid, form: VehicleForm) -> AppResult<Vehicle> {
        let (mut draft, image) = form.into_parts()?;
        let current = self.get(id).await?;

        match image {
            Some(image) => draft.image_url = Some(self.upload_image(image).await?),
            None if draft.image_url.is_none() => draft.image_url = current.image_url.clone(),
            None => {}
        }

        let vehicle = draft.apply_to(&current, Utc::now());
        let updated = self.store.update_vehicle(&vehicle).await?;
        info!("✏️ Vehículo actualizado: {}", updated.id);
        Ok(updated)
    }

    async fn upload_image(&self, image: ImageUpload) -> AppResult<String> {
        let path = image_object_path();
        self.storage
            .upload(&path, image.bytes, &image.content_type)
            .await
    }
}
