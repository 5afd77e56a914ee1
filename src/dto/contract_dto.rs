//! DTOs de contratos

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::contract::Contract;

/// Request para crear un contrato desde el formulario del portal
#[derive(Debug, Deserialize, Validate)]
pub struct CreateContractRequest {
    #[validate(custom = "crate::utils::validation::validate_phone")]
    pub phone_number: String,

    #[validate(custom = "crate::utils::validation::validate_lot_number")]
    pub lot_number: String,

    #[validate(length(min = 2, max = 150))]
    pub full_name: String,

    #[validate(length(min = 5, max = 300))]
    pub address: String,

    #[validate(custom = "crate::utils::validation::validate_gatepass")]
    pub gatepass: Option<String>,

    #[validate(length(min = 2, max = 150))]
    pub owner_name: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_phone")]
    pub owner_phone: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_signature_data")]
    pub signature_data: String,
}

/// Response de contrato para la API
#[derive(Debug, Clone, Serialize)]
pub struct ContractResponse {
    pub id: Uuid,
    pub phone_number: String,
    pub lot_number: String,
    pub full_name: String,
    pub address: String,
    pub gatepass: Option<String>,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    pub signature_data: String,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Contract> for ContractResponse {
    fn from(contract: Contract) -> Self {
        Self {
            id: contract.id,
            phone_number: contract.phone_number,
            lot_number: contract.lot_number,
            full_name: contract.full_name,
            address: contract.address,
            gatepass: contract.gatepass,
            owner_name: contract.owner_name,
            owner_phone: contract.owner_phone,
            signature_data: contract.signature_data,
            ip_address: contract.ip_address,
            created_at: contract.created_at,
        }
    }
}

/// Response del chequeo de unicidad de lote
#[derive(Debug, Serialize)]
pub struct LotCheckResponse {
    pub lot_number: String,
    pub exists: bool,
}

/// Response del chequeo de contratos previos por teléfono
#[derive(Debug, Serialize)]
pub struct PhoneCheckResponse {
    pub phone_number: String,
    pub exists: bool,
}

/// Historial agregado de contratos por teléfono
#[derive(Debug, Serialize)]
pub struct PhoneHistoryResponse {
    pub phone_number: String,
    pub total_contracts: i64,
    pub lot_numbers: Vec<String>,
    pub contracts: Vec<ContractResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateContractRequest {
        CreateContractRequest {
            phone_number: "5512345678".to_string(),
            lot_number: "ABC12345".to_string(),
            full_name: "Juan Pérez".to_string(),
            address: "Av. Siempre Viva 742".to_string(),
            gatepass: Some("X1Y2".to_string()),
            owner_name: Some("María López".to_string()),
            owner_phone: Some("5587654321".to_string()),
            signature_data: "data:image/png;base64,aGVsbG8=".to_string(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_short_lot_number_rejected() {
        let mut request = valid_request();
        request.lot_number = "ABC1234".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_long_lot_number_rejected() {
        let mut request = valid_request();
        request.lot_number = "ABC123456".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_invalid_gatepass_rejected() {
        let mut request = valid_request();
        request.gatepass = Some("x1y2".to_string());
        assert!(request.validate().is_err());

        request.gatepass = Some("ABCDEFG".to_string());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_empty_gatepass_allowed() {
        let mut request = valid_request();
        request.gatepass = Some(String::new());
        assert!(request.validate().is_ok());

        request.gatepass = None;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_bad_signature_data_rejected() {
        let mut request = valid_request();
        request.signature_data = "no-es-una-firma".to_string();
        assert!(request.validate().is_err());
    }
}
