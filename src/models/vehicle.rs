//! Modelo de Vehicle
//!
//! Vehículo en el pipeline de entrega. El estado avanza de forma lineal:
//! pending → assigned → loading → in_transit → delivered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Pending,
    Assigned,
    Loading,
    InTransit,
    Delivered,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Pending => "pending",
            VehicleStatus::Assigned => "assigned",
            VehicleStatus::Loading => "loading",
            VehicleStatus::InTransit => "in_transit",
            VehicleStatus::Delivered => "delivered",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(VehicleStatus::Pending),
            "assigned" => Some(VehicleStatus::Assigned),
            "loading" => Some(VehicleStatus::Loading),
            "in_transit" => Some(VehicleStatus::InTransit),
            "delivered" => Some(VehicleStatus::Delivered),
            _ => None,
        }
    }

    /// Posición ordinal dentro del pipeline (coincide con la tabla states)
    pub fn position(&self) -> i16 {
        match self {
            VehicleStatus::Pending => 1,
            VehicleStatus::Assigned => 2,
            VehicleStatus::Loading => 3,
            VehicleStatus::InTransit => 4,
            VehicleStatus::Delivered => 5,
        }
    }

    /// Siguiente estado del pipeline; `delivered` es terminal
    pub fn next(&self) -> Option<VehicleStatus> {
        match self {
            VehicleStatus::Pending => Some(VehicleStatus::Assigned),
            VehicleStatus::Assigned => Some(VehicleStatus::Loading),
            VehicleStatus::Loading => Some(VehicleStatus::InTransit),
            VehicleStatus::InTransit => Some(VehicleStatus::Delivered),
            VehicleStatus::Delivered => None,
        }
    }

    /// Solo se permite avanzar un paso hacia adelante
    pub fn can_transition_to(&self, target: VehicleStatus) -> bool {
        self.next() == Some(target)
    }
}

/// Vehicle - mapea exactamente a la tabla vehicles.
/// Las cuatro columnas photo_slot_N son las ranuras de fotos de carga.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub client_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub lot: String,
    pub status: VehicleStatus,
    pub photo_slot_1: Option<String>,
    pub photo_slot_2: Option<String>,
    pub photo_slot_3: Option<String>,
    pub photo_slot_4: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    /// Ranuras de fotos de carga en orden
    pub fn loading_photos(&self) -> [Option<&str>; 4] {
        [
            self.photo_slot_1.as_deref(),
            self.photo_slot_2.as_deref(),
            self.photo_slot_3.as_deref(),
            self.photo_slot_4.as_deref(),
        ]
    }
}

/// Comentario de viaje - mapea a la tabla vehicle_comments (solo inserción)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleComment {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub author_id: Uuid,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_pipeline() {
        assert!(VehicleStatus::Pending.can_transition_to(VehicleStatus::Assigned));
        assert!(VehicleStatus::Assigned.can_transition_to(VehicleStatus::Loading));
        assert!(VehicleStatus::Loading.can_transition_to(VehicleStatus::InTransit));
        assert!(VehicleStatus::InTransit.can_transition_to(VehicleStatus::Delivered));
    }

    #[test]
    fn test_no_skipping_states() {
        assert!(!VehicleStatus::Pending.can_transition_to(VehicleStatus::Loading));
        assert!(!VehicleStatus::Pending.can_transition_to(VehicleStatus::Delivered));
        assert!(!VehicleStatus::Assigned.can_transition_to(VehicleStatus::InTransit));
    }

    #[test]
    fn test_no_going_backwards() {
        assert!(!VehicleStatus::Assigned.can_transition_to(VehicleStatus::Pending));
        assert!(!VehicleStatus::Delivered.can_transition_to(VehicleStatus::InTransit));
    }

    #[test]
    fn test_delivered_is_terminal() {
        assert_eq!(VehicleStatus::Delivered.next(), None);
    }

    #[test]
    fn test_positions_are_increasing() {
        let mut status = VehicleStatus::Pending;
        while let Some(next) = status.next() {
            assert_eq!(next.position(), status.position() + 1);
            status = next;
        }
    }
}
