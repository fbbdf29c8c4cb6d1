use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post, put},
};
use tracing::{info, warn};

use crate::{
    application::usercases::entitlements::SharedEntitlements,
    domain::{
        clock::Clock,
        repositories::entitlement_slots::EntitlementSlotRepository,
        value_objects::{
            entitlements::{AccessCheckDto, EntitlementSnapshotDto, PaywallModel, PurchaseModel},
            enums::purchase_tiers::PurchaseTier,
        },
    },
    infrastructure::axum_http::error_responses::AppError,
};

pub fn routes<T, C>(entitlements: SharedEntitlements<T, C>) -> Router
where
    T: EntitlementSlotRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route("/", get(current::<T, C>))
        .route("/check", post(check_access::<T, C>))
        .route("/consume", post(consume_quota::<T, C>))
        .route("/purchase", post(purchase::<T, C>))
        .route("/paywall", put(set_paywall::<T, C>))
        .route("/reset", post(reset::<T, C>))
        .with_state(entitlements)
}

pub async fn current<T, C>(
    State(entitlements): State<SharedEntitlements<T, C>>,
) -> Json<EntitlementSnapshotDto>
where
    T: EntitlementSlotRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    Json(entitlements.lock().await.snapshot())
}

pub async fn check_access<T, C>(
    State(entitlements): State<SharedEntitlements<T, C>>,
) -> Json<AccessCheckDto>
where
    T: EntitlementSlotRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    let mut usecase = entitlements.lock().await;
    let allowed = usecase.check_access();

    Json(AccessCheckDto {
        allowed,
        snapshot: usecase.snapshot(),
    })
}

pub async fn consume_quota<T, C>(
    State(entitlements): State<SharedEntitlements<T, C>>,
) -> Json<EntitlementSnapshotDto>
where
    T: EntitlementSlotRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    let mut usecase = entitlements.lock().await;
    usecase.consume_quota();
    Json(usecase.snapshot())
}

pub async fn purchase<T, C>(
    State(entitlements): State<SharedEntitlements<T, C>>,
    payload: Result<Json<PurchaseModel>, JsonRejection>,
) -> Result<Json<EntitlementSnapshotDto>, AppError>
where
    T: EntitlementSlotRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    let Json(purchase_model) = payload.map_err(|rejection| {
        warn!(rejection = %rejection, "entitlements router: invalid purchase body");
        AppError::BadRequest(rejection.body_text())
    })?;

    let tier = PurchaseTier::from_str(&purchase_model.tier).ok_or_else(|| {
        warn!(tier = %purchase_model.tier, "entitlements router: unknown purchase tier");
        AppError::BadRequest(format!("unknown purchase tier: {}", purchase_model.tier))
    })?;

    let mut usecase = entitlements.lock().await;
    usecase.purchase(tier);
    Ok(Json(usecase.snapshot()))
}

pub async fn set_paywall<T, C>(
    State(entitlements): State<SharedEntitlements<T, C>>,
    payload: Result<Json<PaywallModel>, JsonRejection>,
) -> Result<Json<EntitlementSnapshotDto>, AppError>
where
    T: EntitlementSlotRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    let Json(paywall_model) =
        payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let mut usecase = entitlements.lock().await;
    usecase.set_show_paywall(paywall_model.visible);
    Ok(Json(usecase.snapshot()))
}

pub async fn reset<T, C>(
    State(entitlements): State<SharedEntitlements<T, C>>,
) -> Json<EntitlementSnapshotDto>
where
    T: EntitlementSlotRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    info!("entitlements router: reset requested");
    let mut usecase = entitlements.lock().await;
    usecase.reset();
    Json(usecase.snapshot())
}
