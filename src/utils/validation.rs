//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! del portal de contratos y del sistema de logística.

use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;
use validator::ValidationError;

lazy_static! {
    /// Gatepass: código alfanumérico corto de acceso a la instalación
    pub static ref GATEPASS_RE: Regex = Regex::new(r"^[A-Z0-9]{0,6}$").unwrap();
}

/// Validar y convertir string a UUID
pub fn validate_uuid(value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value).map_err(|_| {
        let mut error = ValidationError::new("uuid");
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let clean_phone = value.chars().filter(|c| c.is_ascii_digit()).collect::<String>();
    if clean_phone.len() < 10 || clean_phone.len() > 15 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar número de lote: exactamente 8 caracteres
pub fn validate_lot_number(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() != 8 {
        let mut error = ValidationError::new("lot_number");
        error.add_param("value".into(), &value.to_string());
        error.add_param("length".into(), &"exactly 8 characters".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar gatepass: `[A-Z0-9]{0,6}`
pub fn validate_gatepass(value: &str) -> Result<(), ValidationError> {
    if !GATEPASS_RE.is_match(value) {
        let mut error = ValidationError::new("gatepass");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"uppercase letters and digits, max 6".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que signature_data sea un data-URI de imagen con payload base64
pub fn validate_signature_data(value: &str) -> Result<(), ValidationError> {
    use base64::Engine;

    let invalid = || {
        let mut error = ValidationError::new("signature_data");
        error.add_param("format".into(), &"data:image/...;base64,...".to_string());
        error
    };

    let payload = value
        .strip_prefix("data:image/")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
        .ok_or_else(invalid)?;

    if payload.is_empty() {
        return Err(invalid());
    }

    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map(|_| ())
        .map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_uuid() {
        let valid_uuid = "550e8400-e29b-41d4-a716-446655440000";
        assert!(validate_uuid(valid_uuid).is_ok());

        let invalid_uuid = "invalid-uuid";
        assert!(validate_uuid(invalid_uuid).is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("algo").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("1234567890").is_ok());
        assert!(validate_phone("+52 123 456 7890").is_ok());
        assert!(validate_phone("123").is_err());
        assert!(validate_phone("1234567890123456").is_err());
    }

    #[test]
    fn test_validate_lot_number() {
        assert!(validate_lot_number("ABC12345").is_ok());
        assert!(validate_lot_number("ABC1234").is_err());
        assert!(validate_lot_number("ABC123456").is_err());
        assert!(validate_lot_number("").is_err());
    }

    #[test]
    fn test_validate_gatepass() {
        assert!(validate_gatepass("").is_ok());
        assert!(validate_gatepass("X1Y2").is_ok());
        assert!(validate_gatepass("ABC123").is_ok());
        assert!(validate_gatepass("abc123").is_err());
        assert!(validate_gatepass("ABC1234").is_err());
        assert!(validate_gatepass("AB-12").is_err());
    }

    #[test]
    fn test_validate_signature_data() {
        assert!(validate_signature_data("data:image/png;base64,aGVsbG8=").is_ok());
        assert!(validate_signature_data("data:image/png;base64,").is_err());
        assert!(validate_signature_data("data:image/png;base64,!!notbase64!!").is_err());
        assert!(validate_signature_data("aGVsbG8=").is_err());
    }
}
