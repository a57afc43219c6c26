//! Settings repository.
//!
//! Delivery settings and customer support details are singleton documents in
//! the `appSettings` collection. Reads overlay stored fields on defaults, so a
//! missing document reads as the defaults.

use chrono::Utc;

use quickbite_core::ZoneId;

use super::{Collection, DocumentStore, StoreError, decode, to_document};
use crate::models::settings::{CUSTOMER_SUPPORT_DOC, DELIVERY_SETTINGS_DOC};
use crate::models::{
    CustomerSupport, CustomerSupportDoc, DeliverySettings, DeliverySettingsDoc, DeliveryZone,
    ValidationError, ZoneDraft,
};

/// Error from a settings write: either the store failed or the new settings
/// were rejected.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Repository for the settings singletons.
pub struct SettingsRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Current delivery settings with defaults applied.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read or the document is
    /// not an object.
    pub async fn delivery_settings(&self) -> Result<DeliverySettings, StoreError> {
        let doc = self
            .store
            .get(Collection::AppSettings, DELIVERY_SETTINGS_DOC)
            .await?;
        Ok(match doc {
            Some(doc) => decode::<DeliverySettingsDoc>(doc)?.into(),
            None => DeliverySettings::default(),
        })
    }

    /// Overlay the submitted fields on the current settings and save the
    /// result. Returns the saved settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Invalid` if the merged settings fail
    /// validation, or `SettingsError::Store` if the write fails. Zones are
    /// only checked when the changes replace the zone list.
    pub async fn update_delivery_settings(
        &self,
        changes: DeliverySettingsDoc,
    ) -> Result<DeliverySettings, SettingsError> {
        let replaces_zones = changes.delivery_zones.is_some();
        let merged = self.delivery_settings().await?.merged_with(changes);
        if replaces_zones {
            merged.validate_zones()?;
        }
        self.save_delivery_settings(&merged).await?;
        Ok(merged)
    }

    /// Validate the global amounts and persist the whole delivery settings
    /// document.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Invalid` if validation fails, or
    /// `SettingsError::Store` if the write fails.
    pub async fn save_delivery_settings(
        &self,
        settings: &DeliverySettings,
    ) -> Result<(), SettingsError> {
        settings.validate()?;
        self.store
            .set_merge(
                Collection::AppSettings,
                DELIVERY_SETTINGS_DOC,
                to_document(settings)?,
            )
            .await?;
        tracing::info!(
            zones = settings.delivery_zones.len(),
            "delivery settings saved"
        );
        Ok(())
    }

    /// Current customer support details with defaults applied.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read or the document is
    /// not an object.
    pub async fn customer_support(&self) -> Result<CustomerSupport, StoreError> {
        let doc = self
            .store
            .get(Collection::AppSettings, CUSTOMER_SUPPORT_DOC)
            .await?;
        Ok(match doc {
            Some(doc) => decode::<CustomerSupportDoc>(doc)?.into(),
            None => CustomerSupport::default(),
        })
    }

    /// Overlay the submitted fields on the current support details and save
    /// the result.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read or written.
    pub async fn save_customer_support(
        &self,
        changes: CustomerSupportDoc,
    ) -> Result<CustomerSupport, StoreError> {
        let merged = self.customer_support().await?.merged_with(changes);
        self.store
            .set_merge(
                Collection::AppSettings,
                CUSTOMER_SUPPORT_DOC,
                to_document(&merged)?,
            )
            .await?;
        tracing::info!("customer support settings saved");
        Ok(merged)
    }

    /// Append a zone built from `draft` and persist the settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Invalid` if the draft is invalid, or
    /// `SettingsError::Store` if the store fails.
    pub async fn add_zone(&self, draft: ZoneDraft) -> Result<DeliveryZone, SettingsError> {
        let mut settings = self.delivery_settings().await?;
        let mut id = ZoneId::from_millis(Utc::now().timestamp_millis());
        // Zone ids are unique within the list.
        while settings.zone(&id).is_some() {
            id = ZoneId::new(format!("{id}_1"));
        }
        let zone = draft.into_zone(id)?;
        settings.delivery_zones.push(zone.clone());
        self.save_delivery_settings(&settings).await?;
        tracing::info!(zone_id = %zone.id, name = %zone.name, "delivery zone added");
        Ok(zone)
    }

    /// Replace a zone's fields, keeping its id and position. An omitted
    /// `isActive` keeps the zone's current flag.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Store(StoreError::NotFound)` if no zone has
    /// this id, `SettingsError::Invalid` if the draft is invalid.
    pub async fn update_zone(
        &self,
        id: &ZoneId,
        draft: ZoneDraft,
    ) -> Result<DeliveryZone, SettingsError> {
        let mut settings = self.delivery_settings().await?;
        let slot = settings.zone_mut(id).ok_or(StoreError::NotFound)?;
        let draft = ZoneDraft {
            is_active: draft.is_active.or(Some(slot.is_active)),
            ..draft
        };
        let zone = draft.into_zone(id.clone())?;
        *slot = zone.clone();
        self.save_delivery_settings(&settings).await?;
        tracing::info!(zone_id = %id, "delivery zone updated");
        Ok(zone)
    }

    /// Remove a zone.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Store(StoreError::NotFound)` if no zone has
    /// this id.
    pub async fn delete_zone(&self, id: &ZoneId) -> Result<(), SettingsError> {
        let mut settings = self.delivery_settings().await?;
        let before = settings.delivery_zones.len();
        settings.delivery_zones.retain(|z| &z.id != id);
        if settings.delivery_zones.len() == before {
            return Err(StoreError::NotFound.into());
        }
        self.save_delivery_settings(&settings).await?;
        tracing::info!(zone_id = %id, "delivery zone deleted");
        Ok(())
    }

    /// Flip a zone's `isActive` flag.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Store(StoreError::NotFound)` if no zone has
    /// this id.
    pub async fn toggle_zone(&self, id: &ZoneId) -> Result<DeliveryZone, SettingsError> {
        let mut settings = self.delivery_settings().await?;
        let zone = settings.zone_mut(id).ok_or(StoreError::NotFound)?;
        zone.is_active = !zone.is_active;
        let zone = zone.clone();
        self.save_delivery_settings(&settings).await?;
        tracing::info!(zone_id = %id, active = zone.is_active, "delivery zone toggled");
        Ok(zone)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn draft(name: &str, zips: &str) -> ZoneDraft {
        serde_json::from_value(json!({
            "name": name,
            "zipCodes": zips,
            "deliveryFeeFood": 35,
            "minOrderFood": 60,
            "deliveryTime": "20-30 min"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_missing_documents_read_as_defaults() {
        let store = DocumentStore::memory();
        let repo = SettingsRepository::new(&store);

        assert_eq!(
            repo.delivery_settings().await.unwrap(),
            DeliverySettings::default()
        );
        assert_eq!(
            repo.customer_support().await.unwrap(),
            CustomerSupport::default()
        );
    }

    #[tokio::test]
    async fn test_partial_update_merges() {
        let store = DocumentStore::memory();
        let repo = SettingsRepository::new(&store);

        let changes: DeliverySettingsDoc =
            serde_json::from_value(json!({"deliveryFeeGrocery": 25})).unwrap();
        let saved = repo.update_delivery_settings(changes).await.unwrap();
        assert_eq!(saved.delivery_fee_grocery, Decimal::from(25));

        let changes: DeliverySettingsDoc =
            serde_json::from_value(json!({"taxPercentage": 12})).unwrap();
        let saved = repo.update_delivery_settings(changes).await.unwrap();
        assert_eq!(saved.delivery_fee_grocery, Decimal::from(25));
        assert_eq!(saved.tax_percentage, Decimal::from(12));
        assert_eq!(repo.delivery_settings().await.unwrap(), saved);
    }

    #[tokio::test]
    async fn test_negative_fee_rejected_and_not_saved() {
        let store = DocumentStore::memory();
        let repo = SettingsRepository::new(&store);

        let changes: DeliverySettingsDoc =
            serde_json::from_value(json!({"deliveryFeeFood": -5})).unwrap();
        assert!(matches!(
            repo.update_delivery_settings(changes).await,
            Err(SettingsError::Invalid(ValidationError::NegativeAmount(_)))
        ));
        assert_eq!(
            repo.delivery_settings().await.unwrap().delivery_fee_food,
            Decimal::from(30)
        );
    }

    #[tokio::test]
    async fn test_zone_lifecycle() {
        let store = DocumentStore::memory();
        let repo = SettingsRepository::new(&store);

        let zone = repo.add_zone(draft("Suburbs", "10007, 10008")).await.unwrap();
        assert!(zone.id.as_str().starts_with("zone_"));
        assert_eq!(repo.delivery_settings().await.unwrap().delivery_zones.len(), 3);

        let updated = repo
            .update_zone(&zone.id, draft("Outer Suburbs", "10009"))
            .await
            .unwrap();
        assert_eq!(updated.id, zone.id);
        assert_eq!(updated.zip_codes, vec!["10009"]);

        let toggled = repo.toggle_zone(&zone.id).await.unwrap();
        assert!(!toggled.is_active);

        repo.delete_zone(&zone.id).await.unwrap();
        let settings = repo.delivery_settings().await.unwrap();
        assert_eq!(settings.delivery_zones.len(), 2);
        assert!(matches!(
            repo.delete_zone(&zone.id).await,
            Err(SettingsError::Store(StoreError::NotFound))
        ));
    }

    #[tokio::test]
    async fn test_update_zone_keeps_active_flag_when_omitted() {
        let store = DocumentStore::memory();
        let repo = SettingsRepository::new(&store);
        let id = ZoneId::new("zone_1");

        repo.toggle_zone(&id).await.unwrap();
        let updated = repo
            .update_zone(&id, draft("City Center", "10001"))
            .await
            .unwrap();
        assert!(!updated.is_active);

        let mut reactivate = draft("City Center", "10001");
        reactivate.is_active = Some(true);
        assert!(repo.update_zone(&id, reactivate).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn test_legacy_zone_does_not_block_writes() {
        let store = DocumentStore::memory();
        store
            .set_merge(
                Collection::AppSettings,
                DELIVERY_SETTINGS_DOC,
                json!({
                    "deliveryZones": [
                        {"id": "zone_1", "name": "Center", "zipCodes": ["10001"]},
                        {"id": "zone_9", "name": "Legacy", "zipCodes": ["42"]}
                    ]
                })
                .as_object()
                .cloned()
                .unwrap(),
            )
            .await
            .unwrap();
        let repo = SettingsRepository::new(&store);

        let changes: DeliverySettingsDoc =
            serde_json::from_value(json!({"taxPercentage": 6})).unwrap();
        let saved = repo.update_delivery_settings(changes).await.unwrap();
        assert_eq!(saved.tax_percentage, Decimal::from(6));

        let toggled = repo.toggle_zone(&ZoneId::new("zone_1")).await.unwrap();
        assert!(!toggled.is_active);
        repo.add_zone(draft("Suburbs", "10007")).await.unwrap();
        repo.delete_zone(&ZoneId::new("zone_9")).await.unwrap();

        let replacement: DeliverySettingsDoc = serde_json::from_value(json!({
            "deliveryZones": [{"id": "zone_1", "name": "Center", "zipCodes": ["4"]}]
        }))
        .unwrap();
        assert!(matches!(
            repo.update_delivery_settings(replacement).await,
            Err(SettingsError::Invalid(ValidationError::InvalidZip { .. }))
        ));
    }

    #[tokio::test]
    async fn test_zone_ids_unique_within_a_millisecond() {
        let store = DocumentStore::memory();
        let repo = SettingsRepository::new(&store);

        let a = repo.add_zone(draft("A", "20001")).await.unwrap();
        let b = repo.add_zone(draft("B", "20002")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_invalid_zone_draft_rejected() {
        let store = DocumentStore::memory();
        let repo = SettingsRepository::new(&store);
        assert!(matches!(
            repo.add_zone(draft("Nowhere", " , ")).await,
            Err(SettingsError::Invalid(ValidationError::NoZipCodes))
        ));
    }

    #[tokio::test]
    async fn test_customer_support_merge() {
        let store = DocumentStore::memory();
        let repo = SettingsRepository::new(&store);

        let changes: CustomerSupportDoc =
            serde_json::from_value(json!({"email": "help@quickbite.in"})).unwrap();
        let saved = repo.save_customer_support(changes).await.unwrap();
        assert_eq!(saved.email, "help@quickbite.in");
        assert_eq!(saved.phone, "+91-9876543210");
        assert_eq!(repo.customer_support().await.unwrap(), saved);
    }
}
