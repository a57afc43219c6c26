//! Delivery settings, delivery zones and customer support handlers.
//!
//! Zone edits are written straight through; there is no separate save step.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quickbite_core::{OrderType, ZoneId};

use crate::{
    db::SettingsRepository,
    error::AppError,
    models::{CustomerSupport, CustomerSupportDoc, DeliverySettings, DeliverySettingsDoc, DeliveryZone, ZoneDraft},
    services::{DeliveryTerms, ZoneOverlap, delivery_terms, format_support_phone, zone_overlaps},
    state::AppState,
};

/// Get delivery settings with defaults applied.
///
/// GET /api/settings/delivery
#[instrument(skip(state))]
pub async fn delivery(State(state): State<AppState>) -> Result<Json<DeliverySettings>, AppError> {
    let settings = SettingsRepository::new(state.store())
        .delivery_settings()
        .await?;
    Ok(Json(settings))
}

/// Overlay the submitted fields on the delivery settings.
///
/// PUT /api/settings/delivery
#[instrument(skip(state, changes))]
pub async fn update_delivery(
    State(state): State<AppState>,
    Json(changes): Json<DeliverySettingsDoc>,
) -> Result<Json<DeliverySettings>, AppError> {
    let settings = SettingsRepository::new(state.store())
        .update_delivery_settings(changes)
        .await?;
    Ok(Json(settings))
}

/// Add a delivery zone.
///
/// POST /api/settings/zones
#[instrument(skip(state, draft))]
pub async fn create_zone(
    State(state): State<AppState>,
    Json(draft): Json<ZoneDraft>,
) -> Result<(StatusCode, Json<DeliveryZone>), AppError> {
    let zone = SettingsRepository::new(state.store())
        .add_zone(draft)
        .await?;
    Ok((StatusCode::CREATED, Json(zone)))
}

/// Replace a zone's fields.
///
/// PUT /api/settings/zones/{id}
#[instrument(skip(state, draft))]
pub async fn update_zone(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<ZoneDraft>,
) -> Result<Json<DeliveryZone>, AppError> {
    let zone = SettingsRepository::new(state.store())
        .update_zone(&ZoneId::new(id), draft)
        .await?;
    Ok(Json(zone))
}

/// Remove a zone.
///
/// DELETE /api/settings/zones/{id}
#[instrument(skip(state))]
pub async fn delete_zone(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    SettingsRepository::new(state.store())
        .delete_zone(&ZoneId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Flip a zone's `isActive` flag.
///
/// POST /api/settings/zones/{id}/toggle-active
#[instrument(skip(state))]
pub async fn toggle_zone(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeliveryZone>, AppError> {
    let zone = SettingsRepository::new(state.store())
        .toggle_zone(&ZoneId::new(id))
        .await?;
    Ok(Json(zone))
}

/// Zone lookup query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneLookupQuery {
    pub zip: String,
    #[serde(default)]
    pub order_type: Option<String>,
}

/// Delivery terms for a ZIP code. `orderType` defaults to `food`.
///
/// GET /api/settings/zones/lookup?zip=10001&orderType=grocery
#[instrument(skip(state))]
pub async fn lookup_zone(
    State(state): State<AppState>,
    Query(query): Query<ZoneLookupQuery>,
) -> Result<Json<DeliveryTerms>, AppError> {
    if query.zip.trim().is_empty() {
        return Err(AppError::BadRequest("zip is required".to_string()));
    }
    let order_type = match query.order_type.as_deref().map(str::trim) {
        None | Some("") => OrderType::Food,
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::BadRequest(format!("unknown order type: {raw}")))?,
    };
    let settings = SettingsRepository::new(state.store())
        .delivery_settings()
        .await?;
    Ok(Json(delivery_terms(&settings, &query.zip, order_type)))
}

/// ZIP codes claimed by more than one active zone.
///
/// GET /api/settings/zones/overlaps
#[instrument(skip(state))]
pub async fn zone_overlap_report(
    State(state): State<AppState>,
) -> Result<Json<Vec<ZoneOverlap>>, AppError> {
    let settings = SettingsRepository::new(state.store())
        .delivery_settings()
        .await?;
    let overlaps = zone_overlaps(&settings);
    if !overlaps.is_empty() {
        tracing::warn!(count = overlaps.len(), "delivery zones share ZIP codes");
    }
    Ok(Json(overlaps))
}

/// Support details plus display-formatted numbers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportResponse {
    #[serde(flatten)]
    pub support: CustomerSupport,
    pub phone_display: String,
    pub whatsapp_display: String,
}

impl From<CustomerSupport> for SupportResponse {
    fn from(support: CustomerSupport) -> Self {
        Self {
            phone_display: format_support_phone(&support.phone),
            whatsapp_display: format_support_phone(&support.whatsapp),
            support,
        }
    }
}

/// Get customer support details.
///
/// GET /api/settings/support
#[instrument(skip(state))]
pub async fn support(State(state): State<AppState>) -> Result<Json<SupportResponse>, AppError> {
    let support = SettingsRepository::new(state.store())
        .customer_support()
        .await?;
    Ok(Json(support.into()))
}

/// Overlay the submitted fields on the customer support details.
///
/// PUT /api/settings/support
#[instrument(skip(state, changes))]
pub async fn update_support(
    State(state): State<AppState>,
    Json(changes): Json<CustomerSupportDoc>,
) -> Result<Json<SupportResponse>, AppError> {
    let support = SettingsRepository::new(state.store())
        .save_customer_support(changes)
        .await?;
    Ok(Json(support.into()))
}
