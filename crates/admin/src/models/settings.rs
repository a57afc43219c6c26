//! Application settings: delivery pricing, delivery zones and customer support.
//!
//! Both settings documents are singletons in the `appSettings` collection.
//! Stored fields are overlaid on [`DeliverySettings::default`] and
//! [`CustomerSupport::default`] one field at a time, so a partially written
//! document still yields a complete configuration.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use quickbite_core::{OrderType, ZipCode, ZoneId};

use super::{ValidationError, lenient, require_name, require_non_negative};

/// Document id of the delivery settings singleton.
pub const DELIVERY_SETTINGS_DOC: &str = "deliverySettings";
/// Document id of the customer support singleton.
pub const CUSTOMER_SUPPORT_DOC: &str = "customerSupport";

// =============================================================================
// Delivery zones
// =============================================================================

/// An administrator-defined delivery area keyed by ZIP code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryZone {
    pub id: ZoneId,
    pub name: String,
    pub zip_codes: Vec<String>,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub delivery_fee_grocery: Decimal,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub delivery_fee_food: Decimal,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub min_order_grocery: Decimal,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub min_order_food: Decimal,
    /// Free-form estimate such as "15-25 min".
    pub delivery_time: String,
    pub is_active: bool,
}

impl DeliveryZone {
    /// Whether the zone lists `zip` (compared after trimming).
    #[must_use]
    pub fn covers(&self, zip: &str) -> bool {
        let zip = zip.trim();
        self.zip_codes.iter().any(|z| z.trim() == zip)
    }

    /// Delivery fee for an order type.
    #[must_use]
    pub const fn fee_for(&self, order_type: OrderType) -> Decimal {
        match order_type {
            OrderType::Food => self.delivery_fee_food,
            OrderType::Grocery => self.delivery_fee_grocery,
        }
    }

    /// Minimum order value for an order type.
    #[must_use]
    pub const fn min_order_for(&self, order_type: OrderType) -> Decimal {
        match order_type {
            OrderType::Food => self.min_order_food,
            OrderType::Grocery => self.min_order_grocery,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_name(&self.name, "zone")?;
        if self.zip_codes.is_empty() {
            return Err(ValidationError::NoZipCodes);
        }
        for zip in &self.zip_codes {
            ZipCode::parse(zip).map_err(|source| ValidationError::InvalidZip {
                zip: zip.clone(),
                source,
            })?;
        }
        require_non_negative(Some(self.delivery_fee_grocery), "grocery delivery fee")?;
        require_non_negative(Some(self.delivery_fee_food), "food delivery fee")?;
        require_non_negative(Some(self.min_order_grocery), "grocery minimum order")?;
        require_non_negative(Some(self.min_order_food), "food minimum order")
    }
}

/// A stored zone as read: every field optional and leniently parsed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryZoneDoc {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub zip_codes: Vec<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub delivery_fee_grocery: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub delivery_fee_food: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub min_order_grocery: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub min_order_food: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub delivery_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub is_active: Option<bool>,
}

impl DeliveryZoneDoc {
    fn stored_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }

    /// Normalize, calling `fallback_id` when the stored zone has no id.
    fn into_zone(self, fallback_id: impl FnOnce() -> ZoneId) -> DeliveryZone {
        DeliveryZone {
            id: self
                .id
                .filter(|id| !id.trim().is_empty())
                .map_or_else(fallback_id, ZoneId::new),
            name: self.name.unwrap_or_default(),
            zip_codes: self.zip_codes,
            delivery_fee_grocery: self.delivery_fee_grocery.unwrap_or_default(),
            delivery_fee_food: self.delivery_fee_food.unwrap_or_default(),
            min_order_grocery: self.min_order_grocery.unwrap_or_default(),
            min_order_food: self.min_order_food.unwrap_or_default(),
            delivery_time: self.delivery_time.unwrap_or_default(),
            is_active: self.is_active.unwrap_or(true),
        }
    }
}

/// Zone fields accepted when adding or editing a zone.
///
/// `zipCodes` may be a comma-separated string or an array.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub zip_codes: Vec<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub delivery_fee_grocery: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub delivery_fee_food: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub min_order_grocery: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub min_order_food: Option<Decimal>,
    #[serde(default)]
    pub delivery_time: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl ZoneDraft {
    /// Validate the draft and build a zone with the given id.
    ///
    /// ZIP codes are trimmed; unset amounts are zero and the zone is active
    /// unless stated otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the name is blank, no ZIP codes are
    /// given, a ZIP code is malformed, or an amount is negative.
    pub fn into_zone(self, id: ZoneId) -> Result<DeliveryZone, ValidationError> {
        let zip_codes = self
            .zip_codes
            .iter()
            .map(|zip| {
                ZipCode::parse(zip)
                    .map(ZipCode::into_inner)
                    .map_err(|source| ValidationError::InvalidZip {
                        zip: zip.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let zone = DeliveryZone {
            id,
            name: require_name(&self.name, "zone")?,
            zip_codes,
            delivery_fee_grocery: self.delivery_fee_grocery.unwrap_or_default(),
            delivery_fee_food: self.delivery_fee_food.unwrap_or_default(),
            min_order_grocery: self.min_order_grocery.unwrap_or_default(),
            min_order_food: self.min_order_food.unwrap_or_default(),
            delivery_time: self.delivery_time.unwrap_or_default().trim().to_string(),
            is_active: self.is_active.unwrap_or(true),
        };
        zone.validate()?;
        Ok(zone)
    }
}

// =============================================================================
// Delivery settings
// =============================================================================

/// Global delivery pricing plus the zone list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySettings {
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub grocery_min_order_value: Decimal,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub food_min_order_value: Decimal,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub delivery_fee_grocery: Decimal,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub delivery_fee_food: Decimal,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub tax_percentage: Decimal,
    pub is_grocery_min_order_enabled: bool,
    pub is_food_min_order_enabled: bool,
    pub delivery_zones: Vec<DeliveryZone>,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            grocery_min_order_value: Decimal::from(100),
            food_min_order_value: Decimal::from(50),
            delivery_fee_grocery: Decimal::from(20),
            delivery_fee_food: Decimal::from(30),
            tax_percentage: Decimal::from(5),
            is_grocery_min_order_enabled: true,
            is_food_min_order_enabled: true,
            delivery_zones: vec![
                DeliveryZone {
                    id: ZoneId::new("zone_1"),
                    name: "City Center".to_string(),
                    zip_codes: vec!["10001".into(), "10002".into(), "10003".into()],
                    delivery_fee_grocery: Decimal::from(20),
                    delivery_fee_food: Decimal::from(30),
                    min_order_grocery: Decimal::from(100),
                    min_order_food: Decimal::from(50),
                    delivery_time: "15-25 min".to_string(),
                    is_active: true,
                },
                DeliveryZone {
                    id: ZoneId::new("zone_2"),
                    name: "Metro Area".to_string(),
                    zip_codes: vec!["10004".into(), "10005".into(), "10006".into()],
                    delivery_fee_grocery: Decimal::from(30),
                    delivery_fee_food: Decimal::from(40),
                    min_order_grocery: Decimal::from(150),
                    min_order_food: Decimal::from(75),
                    delivery_time: "25-35 min".to_string(),
                    is_active: true,
                },
            ],
        }
    }
}

impl DeliverySettings {
    /// Overlay the fields present in `doc`.
    #[must_use]
    pub fn merged_with(self, doc: DeliverySettingsDoc) -> Self {
        Self {
            grocery_min_order_value: doc
                .grocery_min_order_value
                .unwrap_or(self.grocery_min_order_value),
            food_min_order_value: doc
                .food_min_order_value
                .unwrap_or(self.food_min_order_value),
            delivery_fee_grocery: doc
                .delivery_fee_grocery
                .unwrap_or(self.delivery_fee_grocery),
            delivery_fee_food: doc.delivery_fee_food.unwrap_or(self.delivery_fee_food),
            tax_percentage: doc.tax_percentage.unwrap_or(self.tax_percentage),
            is_grocery_min_order_enabled: doc
                .is_grocery_min_order_enabled
                .unwrap_or(self.is_grocery_min_order_enabled),
            is_food_min_order_enabled: doc
                .is_food_min_order_enabled
                .unwrap_or(self.is_food_min_order_enabled),
            delivery_zones: doc
                .delivery_zones
                .map_or(self.delivery_zones, zones_from_docs),
        }
    }

    /// Global delivery fee for an order type.
    #[must_use]
    pub const fn fee_for(&self, order_type: OrderType) -> Decimal {
        match order_type {
            OrderType::Food => self.delivery_fee_food,
            OrderType::Grocery => self.delivery_fee_grocery,
        }
    }

    /// Whether a minimum order value applies to an order type.
    #[must_use]
    pub const fn min_order_enabled(&self, order_type: OrderType) -> bool {
        match order_type {
            OrderType::Food => self.is_food_min_order_enabled,
            OrderType::Grocery => self.is_grocery_min_order_enabled,
        }
    }

    /// Global minimum order value, or `None` when disabled for the type.
    #[must_use]
    pub const fn min_order_for(&self, order_type: OrderType) -> Option<Decimal> {
        if !self.min_order_enabled(order_type) {
            return None;
        }
        Some(match order_type {
            OrderType::Food => self.food_min_order_value,
            OrderType::Grocery => self.grocery_min_order_value,
        })
    }

    /// Zone by id.
    #[must_use]
    pub fn zone(&self, id: &ZoneId) -> Option<&DeliveryZone> {
        self.delivery_zones.iter().find(|z| &z.id == id)
    }

    /// Mutable zone by id.
    pub fn zone_mut(&mut self, id: &ZoneId) -> Option<&mut DeliveryZone> {
        self.delivery_zones.iter_mut().find(|z| &z.id == id)
    }

    /// Validate the global amounts before saving.
    ///
    /// Stored zones are not checked here: a zone is validated when it is
    /// added or edited, so one legacy zone cannot block unrelated writes.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_negative(Some(self.grocery_min_order_value), "grocery minimum order")?;
        require_non_negative(Some(self.food_min_order_value), "food minimum order")?;
        require_non_negative(Some(self.delivery_fee_grocery), "grocery delivery fee")?;
        require_non_negative(Some(self.delivery_fee_food), "food delivery fee")?;
        require_non_negative(Some(self.tax_percentage), "tax percentage")
    }

    /// Validate every zone in the list.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn validate_zones(&self) -> Result<(), ValidationError> {
        self.delivery_zones.iter().try_for_each(DeliveryZone::validate)
    }
}

/// Normalize stored zones. Zones without an id get `zone_<position>`, or
/// the next free `zone_<n>` when that id is already taken.
fn zones_from_docs(docs: Vec<DeliveryZoneDoc>) -> Vec<DeliveryZone> {
    let mut taken: HashSet<String> = docs
        .iter()
        .filter_map(DeliveryZoneDoc::stored_id)
        .map(str::to_owned)
        .collect();
    docs.into_iter()
        .enumerate()
        .map(|(i, doc)| {
            doc.into_zone(|| {
                let mut n = i + 1;
                loop {
                    let id = format!("zone_{n}");
                    if taken.insert(id.clone()) {
                        return ZoneId::new(id);
                    }
                    n += 1;
                }
            })
        })
        .collect()
}

impl From<DeliverySettingsDoc> for DeliverySettings {
    fn from(doc: DeliverySettingsDoc) -> Self {
        Self::default().merged_with(doc)
    }
}

/// Delivery settings as stored or submitted: every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySettingsDoc {
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub grocery_min_order_value: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub food_min_order_value: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub delivery_fee_grocery: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub delivery_fee_food: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub tax_percentage: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub is_grocery_min_order_enabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub is_food_min_order_enabled: Option<bool>,
    #[serde(default, deserialize_with = "zone_list")]
    pub delivery_zones: Option<Vec<DeliveryZoneDoc>>,
}

fn zone_list<'de, D: serde::Deserializer<'de>>(
    d: D,
) -> Result<Option<Vec<DeliveryZoneDoc>>, D::Error> {
    match serde_json::Value::deserialize(d)? {
        serde_json::Value::Array(values) => Ok(Some(
            values
                .into_iter()
                .filter_map(|v| serde_json::from_value(v).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

// =============================================================================
// Customer support
// =============================================================================

/// Customer support contact details shown in the apps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSupport {
    pub phone: String,
    pub email: String,
    pub hours: String,
    pub whatsapp: String,
    pub is_active: bool,
    pub emergency_support: bool,
}

impl Default for CustomerSupport {
    fn default() -> Self {
        Self {
            phone: "+91-9876543210".to_string(),
            email: "support@quickbite.com".to_string(),
            hours: "9:00 AM - 9:00 PM".to_string(),
            whatsapp: "+91-9876543210".to_string(),
            is_active: true,
            emergency_support: true,
        }
    }
}

impl CustomerSupport {
    /// Overlay the fields present in `doc`.
    #[must_use]
    pub fn merged_with(self, doc: CustomerSupportDoc) -> Self {
        Self {
            phone: doc.phone.unwrap_or(self.phone),
            email: doc.email.unwrap_or(self.email),
            hours: doc.hours.unwrap_or(self.hours),
            whatsapp: doc.whatsapp.unwrap_or(self.whatsapp),
            is_active: doc.is_active.unwrap_or(self.is_active),
            emergency_support: doc.emergency_support.unwrap_or(self.emergency_support),
        }
    }
}

impl From<CustomerSupportDoc> for CustomerSupport {
    fn from(doc: CustomerSupportDoc) -> Self {
        Self::default().merged_with(doc)
    }
}

/// Customer support settings as stored or submitted: every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSupportDoc {
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub hours: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub whatsapp: Option<String>,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub emergency_support: Option<bool>,
}
