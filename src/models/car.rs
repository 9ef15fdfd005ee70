use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;

/// A fleet vehicle. Image and documents are stored inline as text-encoded data.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(default)]
pub struct Car {
    pub id: u64,
    pub name: String,
    pub brand: String,
    pub price_per_day: i64,
    pub fuel_type: String,
    pub image: String,
    pub availability: bool,
    /// Registration certificate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rc_doc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_doc: Option<String>,
}

/// Full car record as submitted by the admin console. An absent (or zero) id means "new car".
#[derive(Deserialize, Debug, Clone, JsonSchema)]
pub struct CarRequest {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub brand: String,
    pub price_per_day: i64,
    pub fuel_type: String,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_availability")]
    pub availability: bool,
    #[serde(default)]
    pub rc_doc: Option<String>,
    #[serde(default)]
    pub insurance_doc: Option<String>,
}

fn default_availability() -> bool {
    true
}

impl CarRequest {
    /// The id the caller asked for, treating `0` like a missing id.
    pub fn requested_id(&self) -> Option<u64> {
        self.id.filter(|id| *id != 0)
    }

    pub fn into_car(self, id: u64) -> Car {
        Car {
            id,
            name: self.name,
            brand: self.brand,
            price_per_day: self.price_per_day,
            fuel_type: self.fuel_type,
            image: self.image,
            availability: self.availability,
            rc_doc: self.rc_doc,
            insurance_doc: self.insurance_doc,
        }
    }
}

/// Storefront filter; `None` or an empty string matches every value.
#[derive(Debug, Clone, Default)]
pub struct CarFilter {
    pub brand: Option<String>,
    pub fuel_type: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct CarFacets {
    pub brands: Vec<String>,
    pub fuel_types: Vec<String>,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct DeleteCarResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_id_counts_as_missing() {
        let request: CarRequest = serde_json::from_value(serde_json::json!({
            "id": 0,
            "name": "Nexon EV",
            "brand": "Tata",
            "price_per_day": 3000,
            "fuel_type": "Electric"
        }))
        .unwrap();

        assert_eq!(request.requested_id(), None);
        assert!(request.availability);
        assert!(request.image.is_empty());
    }

    #[test]
    fn optional_documents_are_omitted_when_absent() {
        let car = Car {
            id: 7,
            name: "XUV700".to_string(),
            ..Car::default()
        };

        let value = serde_json::to_value(&car).unwrap();
        assert!(value.get("rc_doc").is_none());
        assert!(value.get("insurance_doc").is_none());
        assert_eq!(value["id"], 7);
    }
}
