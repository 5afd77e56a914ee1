//! Fan-out de notificaciones por SSE
//!
//! Registro en memoria, por proceso, de las conexiones SSE abiertas del
//! portal de contratos. Cada escritura de contrato empuja un evento a
//! todos los clientes registrados. Una conexión muerta se poda cuando un
//! envío hacia ella falla; el heartbeat de 30 segundos hace las veces de
//! pasada de limpieza. No hay pub/sub entre instancias: el registro no
//! sobrevive al reinicio del proceso ni escala a más de una instancia.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};

use axum::response::sse;
use futures::Stream;
use serde::Serialize;
use sqlx::PgPool;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::dto::contract_dto::ContractResponse;
use crate::repositories::contract_repository::ContractRepository;
use crate::utils::errors::AppError;

/// Mensaje del stream de contratos
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    /// Snapshot completo de contratos
    Contracts { contracts: Vec<ContractResponse> },
    /// Un contrato recién registrado
    NewContract { contract: ContractResponse },
    /// Latido periódico
    Heartbeat,
}

impl StreamMessage {
    pub fn into_sse_event(self) -> sse::Event {
        match sse::Event::default().json_data(&self) {
            Ok(event) => event,
            Err(e) => {
                tracing::error!("Error serializando evento SSE: {}", e);
                sse::Event::default().data("{\"type\":\"heartbeat\"}")
            }
        }
    }
}

/// Conexión registrada
struct StreamClient {
    id: Uuid,
    sender: mpsc::UnboundedSender<StreamMessage>,
}

/// Registro de clientes SSE del portal de contratos
pub struct ContractStream {
    clients: Mutex<Vec<StreamClient>>,
}

impl ContractStream {
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(Vec::new()),
        }
    }

    fn clients(&self) -> MutexGuard<'_, Vec<StreamClient>> {
        // Un lock envenenado solo significa que otro hilo entró en pánico
        // con la lista tomada; la lista sigue siendo usable
        self.clients.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Registrar una conexión; sin tope y sin dedup por id
    pub fn add_client(&self, sender: mpsc::UnboundedSender<StreamMessage>) -> Uuid {
        let id = Uuid::new_v4();
        let mut clients = self.clients();
        clients.push(StreamClient { id, sender });
        log::info!("Cliente SSE conectado: {} (total: {})", id, clients.len());
        id
    }

    /// Quitar una conexión por id
    pub fn remove_client(&self, id: Uuid) {
        let mut clients = self.clients();
        clients.retain(|c| c.id != id);
        log::info!("Cliente SSE desconectado: {} (total: {})", id, clients.len());
    }

    pub fn client_count(&self) -> usize {
        self.clients().len()
    }

    /// Enviar un mensaje a todos los clientes registrados. Los envíos
    /// fallidos (receptor caído) podan al cliente en el acto.
    fn broadcast(&self, message: StreamMessage) {
        let mut clients = self.clients();
        let before = clients.len();
        clients.retain(|c| match c.sender.send(message.clone()) {
            Ok(()) => true,
            Err(_) => {
                log::warn!("Cliente SSE {} sin receptor, se poda", c.id);
                false
            }
        });
        let pruned = before - clients.len();
        if pruned > 0 {
            log::info!("{} clientes SSE podados durante broadcast", pruned);
        }
    }

    /// Notificar un contrato recién creado a todos los clientes
    pub fn notify_new_contract(&self, contract: ContractResponse) {
        self.broadcast(StreamMessage::NewContract { contract });
    }

    /// Re-consultar todos los contratos y empujar el snapshot completo
    /// a todos los clientes
    pub async fn notify_clients(&self, pool: &PgPool) -> Result<(), AppError> {
        let contracts = ContractRepository::new(pool.clone())
            .find_all()
            .await?
            .into_iter()
            .map(ContractResponse::from)
            .collect();
        self.broadcast(StreamMessage::Contracts { contracts });
        Ok(())
    }

    /// Empujar el snapshot completo a una sola conexión (al conectar)
    pub async fn send_update(
        &self,
        sender: &mpsc::UnboundedSender<StreamMessage>,
        pool: &PgPool,
    ) -> Result<(), AppError> {
        let contracts = ContractRepository::new(pool.clone())
            .find_all()
            .await?
            .into_iter()
            .map(ContractResponse::from)
            .collect();
        sender
            .send(StreamMessage::Contracts { contracts })
            .map_err(|_| AppError::Internal("Cliente SSE cerrado antes del snapshot".to_string()))
    }

    /// Latido a todos los clientes; también poda conexiones muertas
    pub fn heartbeat(&self) {
        self.broadcast(StreamMessage::Heartbeat);
    }
}

impl Default for ContractStream {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream de eventos de una conexión SSE. Al soltarse (el cliente cerró
/// la conexión) se quita a sí mismo del registro.
pub struct ClientEventStream {
    id: Uuid,
    registry: Arc<ContractStream>,
    receiver: mpsc::UnboundedReceiver<StreamMessage>,
}

impl ClientEventStream {
    pub fn new(
        id: Uuid,
        registry: Arc<ContractStream>,
        receiver: mpsc::UnboundedReceiver<StreamMessage>,
    ) -> Self {
        Self { id, registry, receiver }
    }
}

impl Stream for ClientEventStream {
    type Item = Result<sse::Event, Infallible>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.receiver.poll_recv(cx) {
            Poll::Ready(Some(message)) => Poll::Ready(Some(Ok(message.into_sse_event()))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for ClientEventStream {
    fn drop(&mut self) {
        self.registry.remove_client(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_contract() -> ContractResponse {
        ContractResponse {
            id: Uuid::new_v4(),
            phone_number: "5512345678".to_string(),
            lot_number: "ABC12345".to_string(),
            full_name: "Juan Pérez".to_string(),
            address: "Av. Siempre Viva 742".to_string(),
            gatepass: Some("X1Y2".to_string()),
            owner_name: None,
            owner_phone: None,
            signature_data: "data:image/png;base64,aGVsbG8=".to_string(),
            ip_address: Some("127.0.0.1".to_string()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_notify_reaches_all_clients() {
        let stream = ContractStream::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        stream.add_client(tx1);
        stream.add_client(tx2);

        stream.notify_new_contract(sample_contract());

        for rx in [&mut rx1, &mut rx2] {
            match rx.recv().await {
                Some(StreamMessage::NewContract { contract }) => {
                    assert_eq!(contract.lot_number, "ABC12345");
                }
                other => panic!("expected NewContract, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_removed_client_receives_nothing() {
        let stream = ContractStream::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let id1 = stream.add_client(tx1);
        stream.add_client(tx2);

        stream.remove_client(id1);
        stream.notify_new_contract(sample_contract());

        assert!(rx2.recv().await.is_some());
        // El canal del cliente removido quedó sin emisor registrado
        assert!(rx1.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_dead_client_pruned_on_next_broadcast() {
        let stream = ContractStream::new();
        let (tx1, rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        stream.add_client(tx1);
        stream.add_client(tx2);
        assert_eq!(stream.client_count(), 2);

        // Receptor caído: la poda ocurre recién en el siguiente broadcast
        drop(rx1);
        assert_eq!(stream.client_count(), 2);

        stream.heartbeat();
        assert_eq!(stream.client_count(), 1);
        assert!(matches!(rx2.recv().await, Some(StreamMessage::Heartbeat)));
    }

    #[tokio::test]
    async fn test_no_dedup_on_add() {
        let stream = ContractStream::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        stream.add_client(tx.clone());
        stream.add_client(tx);
        assert_eq!(stream.client_count(), 2);

        stream.heartbeat();
        assert!(matches!(rx.recv().await, Some(StreamMessage::Heartbeat)));
        assert!(matches!(rx.recv().await, Some(StreamMessage::Heartbeat)));
    }

    #[tokio::test]
    async fn test_event_stream_drop_unregisters() {
        let registry = Arc::new(ContractStream::new());
        let (tx, rx) = mpsc::unbounded_channel();
        let id = registry.add_client(tx);
        let event_stream = ClientEventStream::new(id, registry.clone(), rx);
        assert_eq!(registry.client_count(), 1);

        drop(event_stream);
        assert_eq!(registry.client_count(), 0);
    }

    #[test]
    fn test_message_wire_format() {
        let json = serde_json::to_value(StreamMessage::Heartbeat).unwrap();
        assert_eq!(json["type"], "heartbeat");

        let json = serde_json::to_value(StreamMessage::NewContract {
            contract: sample_contract(),
        })
        .unwrap();
        assert_eq!(json["type"], "new_contract");
        assert_eq!(json["contract"]["lot_number"], "ABC12345");

        let json = serde_json::to_value(StreamMessage::Contracts { contracts: vec![] }).unwrap();
        assert_eq!(json["type"], "contracts");
    }
}
