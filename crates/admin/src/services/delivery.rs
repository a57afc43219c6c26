//! Delivery zone lookup and delivery terms.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use quickbite_core::{OrderType, ZoneId};

use crate::models::{DeliverySettings, DeliveryZone, lenient};

/// First active zone, in list order, that lists `zip`.
///
/// The ZIP code is trimmed before comparison. Overlapping zones are not an
/// error; the earlier zone wins.
#[must_use]
pub fn find_zone<'a>(settings: &'a DeliverySettings, zip: &str) -> Option<&'a DeliveryZone> {
    let zip = zip.trim();
    if zip.is_empty() {
        return None;
    }
    settings
        .delivery_zones
        .iter()
        .find(|zone| zone.is_active && zone.covers(zip))
}

/// Fee, minimum and timing that apply to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryTerms {
    pub zip: String,
    pub order_type: OrderType,
    /// Matching zone, if any.
    pub zone_id: Option<ZoneId>,
    pub zone_name: Option<String>,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub delivery_fee: Decimal,
    /// Absent when minimum orders are disabled for this order type.
    #[serde(serialize_with = "lenient::serialize_decimal_opt")]
    pub min_order: Option<Decimal>,
    pub delivery_time: Option<String>,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub tax_percentage: Decimal,
}

/// Resolve delivery terms for a ZIP code and order type, falling back to the
/// global fee and minimum when no active zone covers the ZIP code.
#[must_use]
pub fn delivery_terms(
    settings: &DeliverySettings,
    zip: &str,
    order_type: OrderType,
) -> DeliveryTerms {
    let zone = find_zone(settings, zip);
    let min_enabled = settings.min_order_enabled(order_type);

    let (delivery_fee, min_order) = match zone {
        Some(zone) => (
            zone.fee_for(order_type),
            min_enabled.then(|| zone.min_order_for(order_type)),
        ),
        None => (
            settings.fee_for(order_type),
            settings.min_order_for(order_type),
        ),
    };

    DeliveryTerms {
        zip: zip.trim().to_string(),
        order_type,
        zone_id: zone.map(|z| z.id.clone()),
        zone_name: zone.map(|z| z.name.clone()),
        delivery_fee,
        min_order,
        delivery_time: zone
            .map(|z| z.delivery_time.clone())
            .filter(|t| !t.is_empty()),
        tax_percentage: settings.tax_percentage,
    }
}

/// A ZIP code claimed by more than one active zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneOverlap {
    pub zip: String,
    /// Zones in list order; the first one wins lookups.
    pub zone_ids: Vec<ZoneId>,
    pub zone_names: Vec<String>,
}

/// ZIP codes listed by two or more active zones, sorted by ZIP code.
#[must_use]
pub fn zone_overlaps(settings: &DeliverySettings) -> Vec<ZoneOverlap> {
    let mut claims: BTreeMap<&str, Vec<&DeliveryZone>> = BTreeMap::new();
    for zone in settings.delivery_zones.iter().filter(|z| z.is_active) {
        for zip in &zone.zip_codes {
            let owners = claims.entry(zip.trim()).or_default();
            if !owners.iter().any(|owner| owner.id == zone.id) {
                owners.push(zone);
            }
        }
    }

    claims
        .into_iter()
        .filter(|(_, owners)| owners.len() > 1)
        .map(|(zip, owners)| ZoneOverlap {
            zip: zip.to_string(),
            zone_ids: owners.iter().map(|z| z.id.clone()).collect(),
            zone_names: owners.iter().map(|z| z.name.clone()).collect(),
        })
        .collect()
}

/// Format a support phone number for display.
///
/// Non-digits are dropped and the first ten digits are grouped as
/// `NN-NNNN-NNNN`; any further digits follow unchanged. Numbers with fewer
/// than ten digits are returned as bare digits.
#[must_use]
pub fn format_support_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    match (digits.get(..2), digits.get(2..6), digits.get(6..10)) {
        (Some(a), Some(b), Some(c)) => {
            let rest = digits.get(10..).unwrap_or_default();
            format!("{a}-{b}-{c}{rest}")
        }
        _ => digits,
    }
}
