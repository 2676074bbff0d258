//! The controller over real HTTP against the mock server.
//!
//! # Design
//! Each test starts its own mock server on a random port inside the test's
//! runtime and talks to it through `ReqwestTransport`, so request building,
//! transport, parsing and state handling are all exercised together.

use items_core::{ApiError, ClientConfig, ItemId, Notification, Operation, OperationStatus, SyncController, SyncError};
use mock_server::AppState;
use tokio::net::TcpListener;

async fn spawn_server() -> (String, AppState) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::default();
    tokio::spawn(mock_server::run_with_state(listener, state.clone()));
    (format!("http://{addr}/api"), state)
}

/// An address nothing listens on.
async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}

fn controller(base_url: &str) -> SyncController<items_core::ReqwestTransport> {
    SyncController::connect(ClientConfig::new(base_url)).unwrap()
}

#[tokio::test]
async fn full_lifecycle() {
    let (base_url, _state) = spawn_server().await;
    let controller = controller(&base_url);

    // Step 1: startup against an empty store.
    let report = controller.start().await;
    assert!(report.refresh.is_ok());
    assert!(report.health.is_ok());
    assert_eq!(controller.count(), 0);
    assert!(!controller.notification().unwrap().is_error());

    // Step 2: create two items; they append in creation order.
    let first = controller.create("  Widget ").await.unwrap();
    let second = controller.create("Gadget").await.unwrap();
    assert_eq!(first.name, "Widget");
    assert_ne!(first.id, second.id);
    assert_eq!(controller.snapshot(), vec![first.clone(), second.clone()]);

    // Step 3: a refresh adopts the server's order (newest first).
    controller.refresh().await.unwrap();
    assert_eq!(controller.snapshot(), vec![second.clone(), first.clone()]);

    // Step 4: delete the first.
    controller.remove(first.id).await.unwrap();
    assert_eq!(controller.snapshot(), vec![second.clone()]);
    assert_eq!(
        controller.notification(),
        Some(Notification::info("Item deleted successfully"))
    );

    // Step 5: deleting it again is a not-found failure and changes nothing.
    let err = controller.remove(first.id).await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Transport {
            operation: Operation::Remove,
            source: ApiError::NotFound { .. },
        }
    ));
    assert_eq!(controller.snapshot(), vec![second]);
    assert_eq!(
        controller.notification(),
        Some(Notification::error("Failed to delete item: Item not found"))
    );
    assert_eq!(controller.status(), OperationStatus::Idle);
}

#[tokio::test]
async fn health_follows_server_state() {
    let (base_url, state) = spawn_server().await;
    let controller = controller(&base_url);

    let report = controller.check_health().await.unwrap();
    assert_eq!(report.status.as_deref(), Some("healthy"));
    assert_eq!(report.database.as_deref(), Some("connected"));

    state.set_healthy(false);
    let err = controller.check_health().await.unwrap_err();
    assert!(matches!(err, SyncError::Connectivity(ApiError::Rejected { status: 503, .. })));
    assert_eq!(
        controller.notification(),
        Some(Notification::error("API Connection Failed"))
    );
    assert_eq!(controller.status(), OperationStatus::Idle);
}

#[tokio::test]
async fn deleting_unknown_id_reports_server_message() {
    let (base_url, _state) = spawn_server().await;
    let controller = controller(&base_url);

    let err = controller.remove(ItemId(999)).await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to delete item: Item not found");
    assert!(controller.snapshot().is_empty());
}

#[tokio::test]
async fn unreachable_endpoint_leaves_state_intact() {
    let base_url = unreachable_base_url().await;
    let controller = controller(&base_url);

    let report = controller.start().await;
    assert!(matches!(
        report.refresh,
        Err(SyncError::Transport {
            source: ApiError::Transport(_),
            ..
        })
    ));
    assert!(matches!(report.health, Err(SyncError::Connectivity(ApiError::Transport(_)))));

    let err = controller.create("X").await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Transport {
            operation: Operation::Create,
            source: ApiError::Transport(_),
        }
    ));
    assert!(controller.snapshot().is_empty());
    let notification = controller.notification().unwrap();
    assert!(notification.is_error());
    assert!(notification.message().starts_with("Failed to create item: "));
    assert_eq!(controller.status(), OperationStatus::Idle);
}
