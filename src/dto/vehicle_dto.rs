use base64::{engine::general_purpose::STANDARD, Engine};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use validator::Validate;

use crate::models::vehicle::{VehicleDraft, VEHICLE_TYPES};
use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::{
    validate_enum, validate_non_negative, validate_positive, validate_range,
};

const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";

// Request para crear o editar un vehículo.
//
// Los campos numéricos llegan como texto del formulario (o como número);
// se convierten y validan en `into_parts`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct VehicleForm {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub make: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub model: String,
    #[serde(default, deserialize_with = "form_text")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "form_text")]
    pub seats: Option<String>,
    #[serde(default, rename = "type", alias = "vehicle_type")]
    pub vehicle_type: Option<String>,
    #[serde(default, alias = "pricePerDay", deserialize_with = "form_text")]
    pub price_per_day: Option<String>,
    #[serde(default, deserialize_with = "form_text")]
    pub mileage: Option<String>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default, alias = "availableQuantity", deserialize_with = "form_text")]
    pub available_quantity: Option<String>,
    #[serde(default, alias = "totalQuantity", deserialize_with = "form_text")]
    pub total_quantity: Option<String>,
    /// URL de la imagen actual, se conserva si no llega imagen nueva
    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,
    /// Imagen nueva en base64, opcionalmente como data URL
    #[serde(default, alias = "imageBase64")]
    pub image_base64: Option<String>,
    #[serde(default, alias = "imageContentType")]
    pub image_content_type: Option<String>,
}

/// Imagen nueva a subir antes de guardar la fila
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl VehicleForm {
    /// Valida el formulario completo y separa la imagen pendiente de subir.
    /// Ningún error de aquí llega a tocar el backend.
    pub fn into_parts(self) -> AppResult<(VehicleDraft, Option<ImageUpload>)> {
        let make = self.make.trim().to_string();
        let model = self.model.trim().to_string();
        let year = present(&self.year);
        let seats = present(&self.seats);
        let price = present(&self.price_per_day);

        let (Some(year), Some(seats), Some(price)) = (year, seats, price) else {
            return Err(validation_error("form", "Please fill in all required fields"));
        };
        if make.is_empty() || model.is_empty() {
            return Err(validation_error("form", "Please fill in all required fields"));
        }

        self.validate()?;

        let seats: i32 = seats
            .parse()
            .ok()
            .filter(|s| validate_range(*s, 1, 50).is_ok())
            .ok_or_else(|| validation_error("seats", "Please enter a valid number of seats (1-50)"))?;

        let year: i32 = year
            .parse()
            .ok()
            .filter(|y| validate_range(*y, 1900, 2100).is_ok())
            .ok_or_else(|| validation_error("year", "Please enter a valid year (1900-2100)"))?;

        let price_per_day: Decimal = price
            .parse()
            .ok()
            .filter(|p: &Decimal| validate_positive(*p).is_ok())
            .ok_or_else(|| validation_error("price_per_day", "Please enter a valid price per day"))?;

        let mileage = match present(&self.mileage) {
            None => None,
            Some(raw) => Some(
                raw.parse::<i32>()
                    .ok()
                    .filter(|m| validate_non_negative(*m).is_ok())
                    .ok_or_else(|| validation_error("mileage", "Please enter a valid mileage"))?,
            ),
        };

        let vehicle_type = match self.vehicle_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                validate_enum(raw, &VEHICLE_TYPES)
                    .map_err(|_| validation_error("type", "Please select a valid vehicle type"))?;
                Some(raw.to_string())
            }
        };

        let available = self.available.unwrap_or(true);

        let total_quantity = match present(&self.total_quantity) {
            None => 1,
            Some(raw) => raw
                .parse::<i32>()
                .ok()
                .filter(|q| validate_non_negative(*q).is_ok())
                .ok_or_else(|| validation_error("total_quantity", "Please enter a valid quantity"))?,
        };
        let available_quantity = match present(&self.available_quantity) {
            None if available => total_quantity,
            None => 0,
            Some(raw) => raw
                .parse::<i32>()
                .ok()
                .filter(|q| validate_non_negative(*q).is_ok())
                .ok_or_else(|| {
                    validation_error("available_quantity", "Please enter a valid quantity")
                })?,
        };
        if available_quantity > total_quantity {
            return Err(validation_error(
                "available_quantity",
                "Available quantity cannot exceed total quantity",
            ));
        }

        let image = match present(&self.image_base64) {
            None => None,
            Some(raw) => Some(decode_image(raw, self.image_content_type.as_deref())?),
        };

        let draft = VehicleDraft {
            make,
            model,
            year,
            seats,
            vehicle_type,
            price_per_day,
            mileage,
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            available,
            available_quantity,
            total_quantity,
            image_url: self.image_url.filter(|u| !u.trim().is_empty()),
        };

        Ok((draft, image))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Acepta base64 plano o `data:image/png;base64,...`
fn decode_image(raw: &str, content_type: Option<&str>) -> AppResult<ImageUpload> {
    let (declared, payload) = match raw.strip_prefix("data:") {
        Some(rest) => match rest.split_once(";base64,") {
            Some((mime, payload)) => (Some(mime), payload),
            None => return Err(validation_error("image", "Image data is not valid base64")),
        },
        None => (None, raw),
    };

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|_| validation_error("image", "Image data is not valid base64"))?;
    if bytes.is_empty() {
        return Err(validation_error("image", "Image data is not valid base64"));
    }

    let content_type = content_type
        .or(declared)
        .filter(|ct| ct.starts_with("image/"))
        .unwrap_or(DEFAULT_IMAGE_TYPE)
        .to_string();

    Ok(ImageUpload {
        bytes,
        content_type,
    })
}

/// Campo del formulario como texto: acepta string, número o null
fn form_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected text or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::AppError;
    use serde_json::json;

    fn form(value: Value) -> VehicleForm {
        serde_json::from_value(value).unwrap()
    }

    fn base() -> Value {
        json!({
            "make": "Toyota",
            "model": "Vios",
            "year": "2022",
            "seats": "5",
            "type": "Sedan",
            "pricePerDay": "1500.50",
        })
    }

    fn with(field: &str, value: Value) -> Value {
        let mut body = base();
        body[field] = value;
        body
    }

    fn message_of(err: AppError) -> String {
        match err {
            AppError::Validation(errors) => errors
                .field_errors()
                .values()
                .flat_map(|errs| errs.iter())
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .next()
                .unwrap_or_default(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_form_defaults() {
        let (draft, image) = form(base()).into_parts().unwrap();
        assert_eq!(draft.make, "Toyota");
        assert_eq!(draft.year, 2022);
        assert_eq!(draft.seats, 5);
        assert_eq!(draft.price_per_day, "1500.50".parse::<Decimal>().unwrap());
        assert!(draft.available);
        assert_eq!(draft.total_quantity, 1);
        assert_eq!(draft.available_quantity, 1);
        assert_eq!(draft.mileage, None);
        assert!(image.is_none());
    }

    #[test]
    fn test_numbers_accepted_as_json_numbers() {
        let (draft, _) = form(with("seats", json!(7))).into_parts().unwrap();
        assert_eq!(draft.seats, 7);
    }

    #[test]
    fn test_missing_required_fields() {
        for field in ["make", "model", "year", "seats", "pricePerDay"] {
            let err = form(with(field, json!(""))).into_parts().unwrap_err();
            assert_eq!(message_of(err), "Please fill in all required fields", "{}", field);
        }
    }

    #[test]
    fn test_seats_range() {
        for seats in ["0", "51", "abc", "-3"] {
            let err = form(with("seats", json!(seats))).into_parts().unwrap_err();
            assert_eq!(message_of(err), "Please enter a valid number of seats (1-50)");
        }
        assert!(form(with("seats", json!("1"))).into_parts().is_ok());
        assert!(form(with("seats", json!("50"))).into_parts().is_ok());
    }

    #[test]
    fn test_year_price_mileage_and_type() {
        assert!(form(with("year", json!("1899"))).into_parts().is_err());
        assert!(form(with("year", json!("2101"))).into_parts().is_err());
        assert!(form(with("pricePerDay", json!("0"))).into_parts().is_err());
        assert!(form(with("pricePerDay", json!("-10"))).into_parts().is_err());
        assert!(form(with("mileage", json!("-1"))).into_parts().is_err());
        assert!(form(with("type", json!("Boat"))).into_parts().is_err());

        let (draft, _) = form(with("mileage", json!("0"))).into_parts().unwrap();
        assert_eq!(draft.mileage, Some(0));
        let (draft, _) = form(with("type", json!(""))).into_parts().unwrap();
        assert_eq!(draft.vehicle_type, None);
    }

    #[test]
    fn test_quantities() {
        let mut body = base();
        body["totalQuantity"] = json!("3");
        body["availableQuantity"] = json!("4");
        let err = form(body).into_parts().unwrap_err();
        assert_eq!(message_of(err), "Available quantity cannot exceed total quantity");

        let mut body = base();
        body["totalQuantity"] = json!(3);
        body["available"] = json!(false);
        let (draft, _) = form(body).into_parts().unwrap();
        assert_eq!(draft.available_quantity, 0);
        assert!(!draft.available);
    }

    #[test]
    fn test_image_payloads() {
        let (_, image) = form(with("imageBase64", json!("data:image/png;base64,aGVsbG8=")))
            .into_parts()
            .unwrap();
        let image = image.unwrap();
        assert_eq!(image.bytes, b"hello");
        assert_eq!(image.content_type, "image/png");

        let (_, image) = form(with("imageBase64", json!("aGVsbG8=")))
            .into_parts()
            .unwrap();
        assert_eq!(image.unwrap().content_type, DEFAULT_IMAGE_TYPE);

        assert!(form(with("imageBase64", json!("not base64!!")))
            .into_parts()
            .is_err());
    }
}
