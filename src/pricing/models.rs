//! Price table for charter quotes.
//!
//! One authoritative table of destination rates, yacht multipliers and
//! amenity prices. The calculator, validator and display code all read from
//! the same `PriceTable`; nothing else carries prices.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pricing::requests::{Destination, YachtType};

/// A charter region with its base weekly rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationRate {
    pub name: String,
    pub region: String,
    pub description: String,
    /// Undiscounted weekly rate before yacht and duration adjustments
    pub base_price_weekly: Decimal,
    #[serde(default)]
    pub countries: Vec<String>,
}

impl DestinationRate {
    /// Snapshot of this destination for a selection
    pub fn to_selection(&self) -> Destination {
        Destination {
            name: self.name.clone(),
            region: self.region.clone(),
            base_price_weekly: self.base_price_weekly,
            countries: self.countries.clone(),
        }
    }
}

/// A yacht category with its price multiplier and guest capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YachtRate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_multiplier: Decimal,
    pub capacity: i32,
    /// Indicative weekly price band shown next to the yacht card
    pub min_weekly_price: Decimal,
    pub max_weekly_price: Decimal,
}

impl YachtRate {
    /// Snapshot of this yacht type for a selection
    pub fn to_selection(&self) -> YachtType {
        YachtType {
            id: self.id.clone(),
            name: self.name.clone(),
            price_multiplier: self.price_multiplier,
            capacity: self.capacity,
        }
    }

    pub fn fits_guests(&self, guests: i32) -> bool {
        self.capacity >= guests
    }
}

/// Amenity groupings used by the amenities step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmenityCategory {
    CulinaryAndDining,
    Entertainment,
    ComfortAndLuxury,
    Transportation,
}

/// An optional extra priced per charter day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmenityRate {
    pub name: String,
    pub category: AmenityCategory,
    pub daily_price: Decimal,
}

/// The price table. Keys are the identifiers the wizard sends back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    pub destinations: BTreeMap<String, DestinationRate>,
    pub yachts: BTreeMap<String, YachtRate>,
    pub amenities: BTreeMap<String, AmenityRate>,
}

static STANDARD_TABLE: OnceLock<PriceTable> = OnceLock::new();

impl PriceTable {
    /// The built-in table, constructed on first use
    pub fn standard() -> &'static PriceTable {
        STANDARD_TABLE.get_or_init(build_standard_table)
    }

    /// Parse and check a table from JSON
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let table: PriceTable = serde_json::from_str(raw)?;
        table.check()?;
        Ok(table)
    }

    /// Load a table from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn destination(&self, key: &str) -> Option<&DestinationRate> {
        self.destinations.get(key)
    }

    pub fn yacht(&self, id: &str) -> Option<&YachtRate> {
        self.yachts.get(id)
    }

    pub fn amenity(&self, id: &str) -> Option<&AmenityRate> {
        self.amenities.get(id)
    }

    pub fn amenity_daily_price(&self, id: &str) -> Option<Decimal> {
        self.amenities.get(id).map(|a| a.daily_price)
    }

    /// Yacht types large enough for the group, smallest multiplier first
    pub fn yachts_for_guests(&self, guests: i32) -> Vec<&YachtRate> {
        let mut fitting: Vec<&YachtRate> = self
            .yachts
            .values()
            .filter(|y| y.fits_guests(guests))
            .collect();
        fitting.sort_by(|a, b| a.price_multiplier.cmp(&b.price_multiplier));
        fitting
    }

    /// Reject tables that would produce negative or meaningless quotes
    fn check(&self) -> Result<(), ConfigError> {
        for (key, d) in &self.destinations {
            if d.base_price_weekly < Decimal::ZERO {
                return Err(table_error(format!("destination '{}' has a negative base price", key)));
            }
        }
        for (id, y) in &self.yachts {
            if y.price_multiplier <= Decimal::ZERO {
                return Err(table_error(format!("yacht '{}' multiplier must be positive", id)));
            }
            if y.capacity <= 0 {
                return Err(table_error(format!("yacht '{}' capacity must be positive", id)));
            }
            if y.min_weekly_price > y.max_weekly_price {
                return Err(table_error(format!("yacht '{}' has an inverted price band", id)));
            }
        }
        for (id, a) in &self.amenities {
            if a.daily_price < Decimal::ZERO {
                return Err(table_error(format!("amenity '{}' has a negative price", id)));
            }
        }
        Ok(())
    }
}

fn table_error(message: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: "price_table".to_string(),
        message,
    }
}

fn destination(
    name: &str,
    description: &str,
    base_price_weekly: Decimal,
    countries: &[&str],
) -> DestinationRate {
    DestinationRate {
        name: name.to_string(),
        region: name.to_string(),
        description: description.to_string(),
        base_price_weekly,
        countries: countries.iter().map(|c| c.to_string()).collect(),
    }
}

fn yacht(
    id: &str,
    name: &str,
    description: &str,
    price_multiplier: Decimal,
    capacity: i32,
    band: (Decimal, Decimal),
) -> (String, YachtRate) {
    (
        id.to_string(),
        YachtRate {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            price_multiplier,
            capacity,
            min_weekly_price: band.0,
            max_weekly_price: band.1,
        },
    )
}

fn build_standard_table() -> PriceTable {
    let destinations = BTreeMap::from([
        (
            "mediterranean".to_string(),
            destination(
                "Mediterranean",
                "Ancient history meets stunning coastlines",
                dec!(15000),
                &["Greece", "Italy", "Croatia", "Turkey", "France"],
            ),
        ),
        (
            "caribbean".to_string(),
            destination(
                "Caribbean",
                "Paradise islands with crystal-clear waters",
                dec!(18000),
                &[
                    "British Virgin Islands",
                    "US Virgin Islands",
                    "The Grenadines",
                    "Leeward Islands",
                ],
            ),
        ),
        (
            "bahamas".to_string(),
            destination(
                "Bahamas",
                "Pristine beaches and swimming pigs",
                dec!(16000),
                &["Nassau & Paradise Island", "Exuma Cays", "Eleuthera", "Abacos"],
            ),
        ),
        (
            "fjords".to_string(),
            destination(
                "Norwegian Fjords",
                "Dramatic landscapes, waterfalls and northern lights",
                dec!(22000),
                &["Norway"],
            ),
        ),
    ]);

    let yachts = BTreeMap::from([
        yacht(
            "sailing",
            "Sailing Yacht",
            "Traditional sailing experience with modern amenities",
            dec!(1.0),
            12,
            (dec!(10000), dec!(40000)),
        ),
        yacht(
            "catamaran",
            "Catamaran",
            "Stable, spacious, perfect for families and groups",
            dec!(1.2),
            10,
            (dec!(12000), dec!(35000)),
        ),
        yacht(
            "motor",
            "Motor Yacht",
            "Speed and luxury combined for ultimate comfort",
            dec!(1.5),
            16,
            (dec!(15000), dec!(80000)),
        ),
        yacht(
            "mega",
            "Mega Yacht",
            "Full crew and premium services on multiple decks",
            dec!(3.0),
            24,
            (dec!(50000), dec!(200000)),
        ),
    ]);

    use AmenityCategory::*;
    let amenities = [
        ("chef", "Private Chef", CulinaryAndDining, dec!(200)),
        ("gourmet", "Gourmet Provisions", CulinaryAndDining, dec!(150)),
        ("wine", "Wine Selection", CulinaryAndDining, dec!(100)),
        ("bbq", "BBQ Equipment", CulinaryAndDining, dec!(50)),
        ("sound", "Premium Sound System", Entertainment, dec!(75)),
        ("tv", "Entertainment System", Entertainment, dec!(100)),
        ("games", "Water Sports Equipment", Entertainment, dec!(300)),
        ("fishing", "Fishing Equipment", Entertainment, dec!(150)),
        ("ac", "Climate Control", ComfortAndLuxury, dec!(100)),
        ("wifi", "Starlink Internet", ComfortAndLuxury, dec!(50)),
        ("spa", "Spa Services", ComfortAndLuxury, dec!(400)),
        ("linens", "Premium Linens", ComfortAndLuxury, dec!(75)),
        ("tender", "Tender Boat", Transportation, dec!(200)),
        ("pickup", "Airport Pickup", Transportation, dec!(150)),
        ("helicopter", "Helicopter Tour", Transportation, dec!(1500)),
        ("concierge", "Concierge Service", Transportation, dec!(300)),
    ]
    .into_iter()
    .map(|(id, name, category, daily_price)| {
        (
            id.to_string(),
            AmenityRate {
                name: name.to_string(),
                category,
                daily_price,
            },
        )
    })
    .collect();

    PriceTable {
        destinations,
        yachts,
        amenities,
    }
}
