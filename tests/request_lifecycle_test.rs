mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use scrapyard_api::{
    commands::requests::{
        approve_request_command::ApproveRequestCommand,
        create_request_command::{CreatePurchaseRequestCommand, RequestItemInput},
        delete_request_command::DeleteRequestCommand,
        receive_request_command::ReceiveRequestCommand,
        reject_request_command::RejectRequestCommand,
    },
    entities::{lot, purchase_request, request_item, Classification},
    errors::ServiceError,
    services::catalog::RatingStars,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use common::{seed_catalog, seed_catalog_with_prices, setup, SeededCatalog, TestContext};

fn item(material_type_id: Uuid, weight_kg: f64, classification: &str) -> RequestItemInput {
    RequestItemInput {
        material_type_id,
        weight_kg,
        classification: classification.to_string(),
        suggested_classification: None,
    }
}

fn submit_command(
    seed: &SeededCatalog,
    requester_id: Uuid,
    items: Vec<RequestItemInput>,
) -> CreatePurchaseRequestCommand {
    CreatePurchaseRequestCommand {
        requester_id,
        supplier_id: seed.supplier_id,
        items,
        notes: None,
        pickup_requested: false,
    }
}

async fn request_count(ctx: &TestContext) -> u64 {
    purchase_request::Entity::find()
        .count(ctx.db.as_ref())
        .await
        .expect("count expected")
}

#[tokio::test]
async fn submit_snapshots_prices_onto_items() {
    let ctx = setup("lifecycle_submit").await;
    let seed = seed_catalog(&ctx).await;
    let requester = Uuid::new_v4();

    let result = ctx
        .requests
        .create_request(submit_command(
            &seed,
            requester,
            vec![item(seed.material_type_id, 10.0, "medium")],
        ))
        .await
        .expect("submission expected");

    assert_eq!(result.status, "pending");
    assert_eq!(result.item_count, 1);
    assert_eq!(result.total_value, dec!(50.00));

    let (request, items) = ctx.requests.get_request(result.id).await.unwrap();
    assert_eq!(request.requester_id, requester);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].stars, 3);
    assert_eq!(items[0].unit_price, dec!(5.00));
    assert_eq!(items[0].total_value, dec!(50.00));
    assert_eq!(items[0].classification, "medium");
    assert_eq!(items[0].lot_id, None);
}

#[tokio::test]
async fn snapshots_survive_catalog_changes() {
    let ctx = setup("lifecycle_snapshots").await;
    let seed = seed_catalog(&ctx).await;
    let admin = Uuid::new_v4();

    let result = ctx
        .requests
        .create_request(submit_command(
            &seed,
            Uuid::new_v4(),
            vec![item(seed.material_type_id, 10.0, "medium")],
        ))
        .await
        .unwrap();

    // Reprice the catalog after submission; the item must keep its snapshot
    ctx.catalog
        .upsert_price_configuration(
            seed.material_type_id,
            Classification::Medium,
            dec!(99.00),
            admin,
        )
        .await
        .unwrap();
    ctx.catalog
        .upsert_rating_configuration(
            seed.supplier_id,
            seed.material_type_id,
            RatingStars {
                light: 5,
                medium: 5,
                heavy: 5,
            },
            admin,
        )
        .await
        .unwrap();

    let (_, items) = ctx.requests.get_request(result.id).await.unwrap();
    assert_eq!(items[0].unit_price, dec!(5.00));
    assert_eq!(items[0].total_value, dec!(50.00));
    assert_eq!(items[0].stars, 3);
}

#[tokio::test]
async fn pricing_failure_aborts_the_whole_submission() {
    let ctx = setup("lifecycle_atomic").await;
    let admin = Uuid::new_v4();

    let supplier = ctx
        .catalog
        .create_supplier(common::new_supplier("Reciclagem Oeste"))
        .await
        .unwrap();
    let material = ctx
        .catalog
        .create_material_type(scrapyard_api::services::catalog::NewMaterialType {
            name: "Steel scrap".to_string(),
            code: format!("FE-{}", Uuid::new_v4().simple()),
            base_classification: None,
        })
        .await
        .unwrap();
    ctx.catalog
        .upsert_rating_configuration(
            supplier.id,
            material.id,
            RatingStars {
                light: 1,
                medium: 3,
                heavy: 5,
            },
            admin,
        )
        .await
        .unwrap();
    // No price for heavy
    ctx.catalog
        .upsert_price_configuration(material.id, Classification::Light, dec!(2.00), admin)
        .await
        .unwrap();
    ctx.catalog
        .upsert_price_configuration(material.id, Classification::Medium, dec!(5.00), admin)
        .await
        .unwrap();

    let command = CreatePurchaseRequestCommand {
        requester_id: Uuid::new_v4(),
        supplier_id: supplier.id,
        items: vec![
            item(material.id, 10.0, "medium"),
            item(material.id, 4.0, "heavy"),
        ],
        notes: None,
        pickup_requested: false,
    };

    let err = ctx
        .requests
        .create_request(command)
        .await
        .expect_err("submission must fail atomically");
    assert_matches!(err, ServiceError::MissingPriceConfig { .. });

    // Nothing persisted: neither the request nor the already-priced item
    assert_eq!(request_count(&ctx).await, 0);
    let item_count = request_item::Entity::find()
        .count(ctx.db.as_ref())
        .await
        .unwrap();
    assert_eq!(item_count, 0);
}

#[tokio::test]
async fn rejects_malformed_items_before_persistence() {
    let ctx = setup("lifecycle_validation").await;
    let seed = seed_catalog(&ctx).await;

    let err = ctx
        .requests
        .create_request(submit_command(
            &seed,
            Uuid::new_v4(),
            vec![item(seed.material_type_id, 0.0, "medium")],
        ))
        .await
        .expect_err("zero weight must fail");
    assert_matches!(err, ServiceError::ValidationError(_));

    let err = ctx
        .requests
        .create_request(submit_command(
            &seed,
            Uuid::new_v4(),
            vec![item(seed.material_type_id, 10.0, "extra-heavy")],
        ))
        .await
        .expect_err("unknown classification must fail");
    assert_matches!(err, ServiceError::ValidationError(_));

    let err = ctx
        .requests
        .create_request(submit_command(&seed, Uuid::new_v4(), vec![]))
        .await
        .expect_err("empty submissions must fail");
    assert_matches!(err, ServiceError::ValidationError(_));

    assert_eq!(request_count(&ctx).await, 0);
}

#[tokio::test]
async fn star_ratings_outside_range_are_rejected() {
    let ctx = setup("lifecycle_star_range").await;
    let seed = seed_catalog(&ctx).await;
    let admin = Uuid::new_v4();

    for bad in [0, 6] {
        let err = ctx
            .catalog
            .upsert_rating_configuration(
                seed.supplier_id,
                seed.material_type_id,
                RatingStars {
                    light: bad,
                    medium: 3,
                    heavy: 5,
                },
                admin,
            )
            .await
            .expect_err("out-of-range stars must fail");
        assert_matches!(err, ServiceError::ValidationError(_));
    }
}

#[tokio::test]
async fn approve_sets_approver_and_timestamp() {
    let ctx = setup("lifecycle_approve").await;
    let seed = seed_catalog(&ctx).await;
    let approver = Uuid::new_v4();

    let created = ctx
        .requests
        .create_request(submit_command(
            &seed,
            Uuid::new_v4(),
            vec![item(seed.material_type_id, 10.0, "medium")],
        ))
        .await
        .unwrap();

    let approved = ctx
        .requests
        .approve_request(ApproveRequestCommand {
            id: created.id,
            approver_id: approver,
        })
        .await
        .expect("approval expected");
    assert_eq!(approved.status, "approved");

    let (request, _) = ctx.requests.get_request(created.id).await.unwrap();
    assert_eq!(request.approved_by, Some(approver));
    assert!(request.confirmed_at.is_some());

    // A second decision on the same request is a state error
    let err = ctx
        .requests
        .approve_request(ApproveRequestCommand {
            id: created.id,
            approver_id: approver,
        })
        .await
        .expect_err("approve is pending-only");
    assert_matches!(err, ServiceError::InvalidTransition { .. });
}

#[tokio::test]
async fn reject_appends_reason_and_is_terminal() {
    let ctx = setup("lifecycle_reject").await;
    let seed = seed_catalog(&ctx).await;

    let created = ctx
        .requests
        .create_request(CreatePurchaseRequestCommand {
            requester_id: Uuid::new_v4(),
            supplier_id: seed.supplier_id,
            items: vec![item(seed.material_type_id, 10.0, "medium")],
            notes: Some("mixed load from yard gate".to_string()),
            pickup_requested: true,
        })
        .await
        .unwrap();

    ctx.requests
        .reject_request(RejectRequestCommand {
            id: created.id,
            approver_id: Uuid::new_v4(),
            reason: "supplier document expired".to_string(),
        })
        .await
        .expect("rejection expected");

    let (request, _) = ctx.requests.get_request(created.id).await.unwrap();
    assert_eq!(request.status, "rejected");
    assert_eq!(
        request.notes.as_deref(),
        Some("mixed load from yard gate\nRejected: supplier document expired")
    );

    // Terminal: no approve, no receive afterwards
    let err = ctx
        .requests
        .approve_request(ApproveRequestCommand {
            id: created.id,
            approver_id: Uuid::new_v4(),
        })
        .await
        .expect_err("rejected is terminal");
    assert_matches!(err, ServiceError::InvalidTransition { .. });

    let err = ctx
        .requests
        .receive_request(ReceiveRequestCommand {
            id: created.id,
            receiver_id: Uuid::new_v4(),
        })
        .await
        .expect_err("rejected requests cannot be received");
    assert_matches!(err, ServiceError::InvalidTransition { .. });
}

#[tokio::test]
async fn receive_requires_prior_approval() {
    let ctx = setup("lifecycle_receive_guard").await;
    let seed = seed_catalog(&ctx).await;

    let created = ctx
        .requests
        .create_request(submit_command(
            &seed,
            Uuid::new_v4(),
            vec![item(seed.material_type_id, 10.0, "medium")],
        ))
        .await
        .unwrap();

    let err = ctx
        .requests
        .receive_request(ReceiveRequestCommand {
            id: created.id,
            receiver_id: Uuid::new_v4(),
        })
        .await
        .expect_err("pending requests cannot be received");
    assert_matches!(err, ServiceError::InvalidTransition { .. });
}

#[tokio::test]
async fn receive_materializes_one_lot_with_summed_aggregates() {
    let ctx = setup("lifecycle_receive").await;
    // Prices chosen so the three items are worth 10.00, 20.50 and 5.25
    let seed = seed_catalog_with_prices(&ctx, dec!(2.00), dec!(8.20), dec!(2.10)).await;
    let approver = Uuid::new_v4();

    let created = ctx
        .requests
        .create_request(submit_command(
            &seed,
            Uuid::new_v4(),
            vec![
                item(seed.material_type_id, 5.0, "light"),
                item(seed.material_type_id, 2.5, "medium"),
                item(seed.material_type_id, 2.5, "heavy"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(created.total_value, dec!(35.75));

    ctx.requests
        .approve_request(ApproveRequestCommand {
            id: created.id,
            approver_id: approver,
        })
        .await
        .unwrap();

    let received = ctx
        .requests
        .receive_request(ReceiveRequestCommand {
            id: created.id,
            receiver_id: approver,
        })
        .await
        .expect("receive expected");

    assert_eq!(received.item_count, 3);
    assert_eq!(received.total_value, dec!(35.75));
    assert_eq!(received.total_weight_kg, dec!(10.0));

    // The lot carries the first item's material and classification and
    // starts its own lifecycle at open
    let lot = ctx.lots.get_lot(received.lot_id).await.unwrap();
    assert_eq!(lot.request_id, created.id);
    assert_eq!(lot.classification, "light");
    assert_eq!(lot.material_type_id, seed.material_type_id);
    assert_eq!(lot.status, "open");

    // Every item is back-linked to the lot
    let items = request_item::Entity::find()
        .filter(request_item::Column::RequestId.eq(created.id))
        .all(ctx.db.as_ref())
        .await
        .unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|i| i.lot_id == Some(received.lot_id)));

    let (request, _) = ctx.requests.get_request(created.id).await.unwrap();
    assert_eq!(request.status, "received");
}

#[tokio::test]
async fn receive_is_idempotent_per_request() {
    let ctx = setup("lifecycle_idempotent").await;
    let seed = seed_catalog(&ctx).await;
    let actor = Uuid::new_v4();

    let created = ctx
        .requests
        .create_request(submit_command(
            &seed,
            Uuid::new_v4(),
            vec![item(seed.material_type_id, 10.0, "medium")],
        ))
        .await
        .unwrap();
    ctx.requests
        .approve_request(ApproveRequestCommand {
            id: created.id,
            approver_id: actor,
        })
        .await
        .unwrap();

    ctx.requests
        .receive_request(ReceiveRequestCommand {
            id: created.id,
            receiver_id: actor,
        })
        .await
        .expect("first receive expected");

    let err = ctx
        .requests
        .receive_request(ReceiveRequestCommand {
            id: created.id,
            receiver_id: actor,
        })
        .await
        .expect_err("second receive must fail");
    assert_matches!(err, ServiceError::AlreadyReceived(id) if id == created.id);

    // Exactly one lot for the request
    let lot_count = lot::Entity::find()
        .filter(lot::Column::RequestId.eq(created.id))
        .count(ctx.db.as_ref())
        .await
        .unwrap();
    assert_eq!(lot_count, 1);
}

#[tokio::test]
async fn delete_is_pending_only_and_cascades() {
    let ctx = setup("lifecycle_delete").await;
    let seed = seed_catalog(&ctx).await;
    let actor = Uuid::new_v4();

    let created = ctx
        .requests
        .create_request(submit_command(
            &seed,
            actor,
            vec![
                item(seed.material_type_id, 10.0, "medium"),
                item(seed.material_type_id, 3.0, "light"),
            ],
        ))
        .await
        .unwrap();

    ctx.requests
        .delete_request(DeleteRequestCommand {
            id: created.id,
            actor_id: actor,
        })
        .await
        .expect("delete expected");

    assert_eq!(request_count(&ctx).await, 0);
    let orphaned_items = request_item::Entity::find()
        .filter(request_item::Column::RequestId.eq(created.id))
        .count(ctx.db.as_ref())
        .await
        .unwrap();
    assert_eq!(orphaned_items, 0);

    // Once a decision is recorded, delete is forbidden
    let decided = ctx
        .requests
        .create_request(submit_command(
            &seed,
            actor,
            vec![item(seed.material_type_id, 10.0, "medium")],
        ))
        .await
        .unwrap();
    ctx.requests
        .approve_request(ApproveRequestCommand {
            id: decided.id,
            approver_id: actor,
        })
        .await
        .unwrap();

    let err = ctx
        .requests
        .delete_request(DeleteRequestCommand {
            id: decided.id,
            actor_id: actor,
        })
        .await
        .expect_err("decided requests cannot be deleted");
    assert_matches!(err, ServiceError::InvalidTransition { .. });
}

#[tokio::test]
async fn unknown_ids_surface_not_found() {
    let ctx = setup("lifecycle_not_found").await;
    seed_catalog(&ctx).await;

    let err = ctx
        .requests
        .approve_request(ApproveRequestCommand {
            id: Uuid::new_v4(),
            approver_id: Uuid::new_v4(),
        })
        .await
        .expect_err("unknown request must fail");
    assert_matches!(err, ServiceError::NotFound(_));
}
