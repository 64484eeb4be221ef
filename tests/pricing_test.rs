mod common;

use assert_matches::assert_matches;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use scrapyard_api::{
    entities::Classification,
    errors::ServiceError,
    services::{catalog::RatingStars, pricing},
};
use uuid::Uuid;

use common::{seed_catalog, seed_catalog_with_prices, setup};

#[tokio::test]
async fn resolves_value_stars_and_unit_price() {
    let ctx = setup("pricing_resolves").await;
    let seed = seed_catalog(&ctx).await;

    // 10 kg of medium material at $5/kg with medium rated 3 stars
    let resolved = pricing::resolve(
        ctx.db.as_ref(),
        seed.supplier_id,
        seed.material_type_id,
        Classification::Medium,
        dec!(10),
    )
    .await
    .expect("resolution expected");

    assert_eq!(resolved.total_value, dec!(50.00));
    assert_eq!(resolved.stars, 3);
    assert_eq!(resolved.unit_price, dec!(5.00));
}

#[rstest]
#[case(Classification::Light, 1, dec!(1), dec!(2.00))]
#[case(Classification::Medium, 3, dec!(2), dec!(10.00))]
#[case(Classification::Heavy, 5, dec!(2), dec!(18.00))]
#[tokio::test]
async fn stars_follow_the_classification_bucket(
    #[case] classification: Classification,
    #[case] expected_stars: i16,
    #[case] weight: Decimal,
    #[case] expected_value: Decimal,
) {
    let ctx = setup(&format!("pricing_stars_{}", classification)).await;
    let seed = seed_catalog(&ctx).await;

    let resolved = pricing::resolve(
        ctx.db.as_ref(),
        seed.supplier_id,
        seed.material_type_id,
        classification,
        weight,
    )
    .await
    .expect("resolution expected");

    assert_eq!(resolved.stars, expected_stars);
    assert_eq!(resolved.total_value, expected_value);
}

#[tokio::test]
async fn value_is_rounded_to_cents() {
    let ctx = setup("pricing_rounding").await;
    let seed = seed_catalog_with_prices(&ctx, dec!(2.00), dec!(3.3333), dec!(9.00)).await;

    let resolved = pricing::resolve(
        ctx.db.as_ref(),
        seed.supplier_id,
        seed.material_type_id,
        Classification::Medium,
        dec!(3),
    )
    .await
    .expect("resolution expected");

    // 3.3333 * 3 = 9.9999, rounded to cents
    assert_eq!(resolved.total_value, dec!(10.00));
}

#[tokio::test]
async fn missing_rating_configuration_never_defaults() {
    let ctx = setup("pricing_missing_rating").await;
    let seed = seed_catalog(&ctx).await;
    let unconfigured_supplier = Uuid::new_v4();

    let err = pricing::resolve(
        ctx.db.as_ref(),
        unconfigured_supplier,
        seed.material_type_id,
        Classification::Medium,
        dec!(10),
    )
    .await
    .expect_err("missing rating configuration must fail");

    assert_matches!(
        err,
        ServiceError::MissingRatingConfig { supplier_id, material_type_id }
            if supplier_id == unconfigured_supplier && material_type_id == seed.material_type_id
    );
}

#[tokio::test]
async fn missing_price_configuration_names_the_pair() {
    let ctx = setup("pricing_missing_price").await;
    let admin = Uuid::new_v4();

    let supplier = ctx
        .catalog
        .create_supplier(common::new_supplier("Sucata Sul"))
        .await
        .unwrap();
    let material = ctx
        .catalog
        .create_material_type(scrapyard_api::services::catalog::NewMaterialType {
            name: "Aluminum scrap".to_string(),
            code: format!("AL-{}", Uuid::new_v4().simple()),
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
    // Prices configured for light and medium only
    ctx.catalog
        .upsert_price_configuration(material.id, Classification::Light, dec!(2.00), admin)
        .await
        .unwrap();
    ctx.catalog
        .upsert_price_configuration(material.id, Classification::Medium, dec!(5.00), admin)
        .await
        .unwrap();

    let err = pricing::resolve(
        ctx.db.as_ref(),
        supplier.id,
        material.id,
        Classification::Heavy,
        dec!(10),
    )
    .await
    .expect_err("missing price configuration must fail");

    assert_matches!(
        err,
        ServiceError::MissingPriceConfig { material_type_id, classification }
            if material_type_id == material.id && classification == "heavy"
    );
}

#[tokio::test]
async fn zero_configured_price_yields_a_valid_zero_value() {
    let ctx = setup("pricing_zero_price").await;
    let seed = seed_catalog_with_prices(&ctx, dec!(0), dec!(5.00), dec!(9.00)).await;

    let resolved = pricing::resolve(
        ctx.db.as_ref(),
        seed.supplier_id,
        seed.material_type_id,
        Classification::Light,
        dec!(10),
    )
    .await
    .expect("a configured zero price is a valid zero value");

    assert_eq!(resolved.total_value, dec!(0));
}

#[tokio::test]
async fn positive_inputs_rounding_to_zero_fail_resolution() {
    let ctx = setup("pricing_rounds_to_zero").await;
    let seed = seed_catalog_with_prices(&ctx, dec!(0.0001), dec!(5.00), dec!(9.00)).await;

    // 0.0001 * 10 = 0.001, which rounds to 0.00 despite positive inputs
    let err = pricing::resolve(
        ctx.db.as_ref(),
        seed.supplier_id,
        seed.material_type_id,
        Classification::Light,
        dec!(10),
    )
    .await
    .expect_err("a zero value from positive inputs is a misconfiguration");

    assert_matches!(err, ServiceError::InvalidComputedValue { .. });
}
