mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use scrapyard_api::{
    commands::movements::record_movement_command::RecordMovementCommand,
    commands::requests::{
        approve_request_command::ApproveRequestCommand,
        create_request_command::{CreatePurchaseRequestCommand, RequestItemInput},
        receive_request_command::ReceiveRequestCommand,
    },
    entities::lot::LotStatus,
    entities::lot_movement::DEFAULT_LOCATION,
    errors::ServiceError,
};
use uuid::Uuid;

use common::{seed_catalog, setup, TestContext};

/// Runs a request through submit, approve and receive, returning the lot id.
async fn received_lot(ctx: &TestContext) -> Uuid {
    let seed = seed_catalog(ctx).await;
    let actor = Uuid::new_v4();

    let created = ctx
        .requests
        .create_request(CreatePurchaseRequestCommand {
            requester_id: actor,
            supplier_id: seed.supplier_id,
            items: vec![RequestItemInput {
                material_type_id: seed.material_type_id,
                weight_kg: 12.5,
                classification: "medium".to_string(),
                suggested_classification: None,
            }],
            notes: None,
            pickup_requested: false,
        })
        .await
        .expect("submission expected");

    ctx.requests
        .approve_request(ApproveRequestCommand {
            id: created.id,
            approver_id: actor,
        })
        .await
        .expect("approval expected");

    ctx.requests
        .receive_request(ReceiveRequestCommand {
            id: created.id,
            receiver_id: actor,
        })
        .await
        .expect("receive expected")
        .lot_id
}

fn movement(lot_id: Uuid, destination: &str) -> RecordMovementCommand {
    RecordMovementCommand {
        lot_id,
        movement_type: "transfer".to_string(),
        destination_location: destination.to_string(),
        performed_by: Uuid::new_v4(),
        weight_kg: None,
        notes: None,
        client_metadata: None,
    }
}

#[tokio::test]
async fn new_lots_sit_at_the_receiving_yard() {
    let ctx = setup("ledger_default_location").await;
    let lot_id = received_lot(&ctx).await;

    let location = ctx.lots.current_location(lot_id).await.unwrap();
    assert_eq!(location, DEFAULT_LOCATION);

    let history = ctx.lots.movement_history(lot_id).await.unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn first_movement_originates_from_the_yard() {
    let ctx = setup("ledger_first_move").await;
    let lot_id = received_lot(&ctx).await;

    let result = ctx
        .lots
        .record_movement(movement(lot_id, "dock-3"))
        .await
        .expect("movement expected");
    assert_eq!(result.origin_location, DEFAULT_LOCATION);
    assert_eq!(result.destination_location, "dock-3");

    assert_eq!(ctx.lots.current_location(lot_id).await.unwrap(), "dock-3");

    let history = ctx.lots.movement_history(lot_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].destination_location, "dock-3");
}

#[tokio::test]
async fn movements_chain_and_history_is_newest_first() {
    let ctx = setup("ledger_chain").await;
    let lot_id = received_lot(&ctx).await;

    for destination in ["dock-3", "bay-a", "smelter-queue"] {
        ctx.lots
            .record_movement(movement(lot_id, destination))
            .await
            .expect("movement expected");
    }

    let history = ctx.lots.movement_history(lot_id).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].destination_location, "smelter-queue");
    assert_eq!(history[0].origin_location, "bay-a");
    assert_eq!(history[1].destination_location, "bay-a");
    assert_eq!(history[1].origin_location, "dock-3");
    assert_eq!(history[2].origin_location, DEFAULT_LOCATION);

    // Current location always agrees with the newest history entry
    assert_eq!(
        ctx.lots.current_location(lot_id).await.unwrap(),
        history[0].destination_location
    );
}

#[tokio::test]
async fn entries_carry_snapshots_and_an_audit_trail() {
    let ctx = setup("ledger_snapshots").await;
    let lot_id = received_lot(&ctx).await;
    let actor = Uuid::new_v4();

    ctx.lots
        .record_movement(RecordMovementCommand {
            lot_id,
            movement_type: "transfer".to_string(),
            destination_location: "dock-3".to_string(),
            performed_by: actor,
            weight_kg: None,
            notes: Some("forklift 2".to_string()),
            client_metadata: Some(serde_json::json!({"terminal": "yard-kiosk-1"})),
        })
        .await
        .unwrap();

    let history = ctx.lots.movement_history(lot_id).await.unwrap();
    let entry = &history[0];

    // Weight defaults to the lot's aggregate weight
    assert_eq!(entry.weight_kg, dec!(12.5));
    assert_eq!(entry.performed_by, actor);
    assert_eq!(entry.notes.as_deref(), Some("forklift 2"));

    let before = &entry.before_snapshot;
    assert_eq!(before["location"], DEFAULT_LOCATION);
    assert_eq!(before["lot_id"], lot_id.to_string());
    let after = &entry.after_snapshot;
    assert_eq!(after["location"], "dock-3");

    let audit = entry
        .audit_trail
        .as_array()
        .expect("audit trail is an array");
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0]["action"], "movement.recorded");
    assert_eq!(audit[0]["actor_id"], actor.to_string());
    assert_eq!(audit[0]["client_metadata"]["terminal"], "yard-kiosk-1");
}

#[tokio::test]
async fn movement_weight_can_be_overridden() {
    let ctx = setup("ledger_weight_override").await;
    let lot_id = received_lot(&ctx).await;

    ctx.lots
        .record_movement(RecordMovementCommand {
            lot_id,
            movement_type: "dispatch".to_string(),
            destination_location: "outbound-truck".to_string(),
            performed_by: Uuid::new_v4(),
            weight_kg: Some(4.5),
            notes: None,
            client_metadata: None,
        })
        .await
        .unwrap();

    let history = ctx.lots.movement_history(lot_id).await.unwrap();
    assert_eq!(history[0].weight_kg, dec!(4.5));
}

#[tokio::test]
async fn movement_inputs_are_validated() {
    let ctx = setup("ledger_validation").await;
    let lot_id = received_lot(&ctx).await;

    let err = ctx
        .lots
        .record_movement(RecordMovementCommand {
            lot_id,
            movement_type: "teleport".to_string(),
            destination_location: "dock-3".to_string(),
            performed_by: Uuid::new_v4(),
            weight_kg: None,
            notes: None,
            client_metadata: None,
        })
        .await
        .expect_err("unknown movement type must fail");
    assert_matches!(err, ServiceError::ValidationError(_));

    let err = ctx
        .lots
        .record_movement(RecordMovementCommand {
            lot_id,
            movement_type: "transfer".to_string(),
            destination_location: "dock-3".to_string(),
            performed_by: Uuid::new_v4(),
            weight_kg: Some(-1.0),
            notes: None,
            client_metadata: None,
        })
        .await
        .expect_err("negative weight must fail");
    assert_matches!(err, ServiceError::ValidationError(_));

    let err = ctx
        .lots
        .record_movement(movement(Uuid::new_v4(), "dock-3"))
        .await
        .expect_err("unknown lot must fail");
    assert_matches!(err, ServiceError::NotFound(_));

    // Nothing was appended by the failed attempts
    assert!(ctx.lots.movement_history(lot_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_lots_have_no_location() {
    let ctx = setup("ledger_unknown_lot").await;
    seed_catalog(&ctx).await;

    let err = ctx
        .lots
        .current_location(Uuid::new_v4())
        .await
        .expect_err("unknown lot must fail");
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn open_lots_take_one_inspection_decision() {
    let ctx = setup("ledger_lot_status").await;
    let lot_id = received_lot(&ctx).await;

    let updated = ctx
        .lots
        .set_status(lot_id, LotStatus::Approved)
        .await
        .expect("decision expected");
    assert_eq!(updated.status, "approved");

    let err = ctx
        .lots
        .set_status(lot_id, LotStatus::Rejected)
        .await
        .expect_err("decided lots cannot change again");
    assert_matches!(err, ServiceError::InvalidTransition { .. });
}
