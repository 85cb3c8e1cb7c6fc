pub mod amenities;
pub mod document;
pub mod row;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub use amenities::{Amenities, Amenity};
pub use document::PropertyDocument;
pub use row::SourceRow;

/// Kind of structure being listed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    Apartment,
    Villa,
    House,
    Hotel,
    Farmhouse,
    Bungalow,
    Chalet,
    Studio,
    Attic,
    Loft,
}

impl StructureType {
    pub const ALL: [StructureType; 10] = [
        StructureType::Apartment,
        StructureType::Villa,
        StructureType::House,
        StructureType::Hotel,
        StructureType::Farmhouse,
        StructureType::Bungalow,
        StructureType::Chalet,
        StructureType::Studio,
        StructureType::Attic,
        StructureType::Loft,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StructureType::Apartment => "apartment",
            StructureType::Villa => "villa",
            StructureType::House => "house",
            StructureType::Hotel => "hotel",
            StructureType::Farmhouse => "farmhouse",
            StructureType::Bungalow => "bungalow",
            StructureType::Chalet => "chalet",
            StructureType::Studio => "studio",
            StructureType::Attic => "attic",
            StructureType::Loft => "loft",
        }
    }

    /// Italian name used by the local portals' dropdowns
    pub fn italian(&self) -> &'static str {
        match self {
            StructureType::Apartment => "Appartamento",
            StructureType::Villa => "Villa",
            StructureType::House => "Casa",
            StructureType::Hotel => "Hotel",
            StructureType::Farmhouse => "Agriturismo",
            StructureType::Bungalow => "Bungalow",
            StructureType::Chalet => "Chalet",
            StructureType::Studio => "Monolocale",
            StructureType::Attic => "Mansarda",
            StructureType::Loft => "Loft",
        }
    }

    /// English display name ("Apartment")
    pub fn title(&self) -> String {
        capitalize(self.as_str())
    }
}

impl FromStr for StructureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "apartment" | "appartamento" | "flat" => Ok(StructureType::Apartment),
            "villa" => Ok(StructureType::Villa),
            "house" | "casa" => Ok(StructureType::House),
            "hotel" => Ok(StructureType::Hotel),
            "farmhouse" | "agriturismo" => Ok(StructureType::Farmhouse),
            "bungalow" => Ok(StructureType::Bungalow),
            "chalet" => Ok(StructureType::Chalet),
            "studio" | "monolocale" => Ok(StructureType::Studio),
            "attic" | "mansarda" | "attico" => Ok(StructureType::Attic),
            "loft" => Ok(StructureType::Loft),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bed kinds found in the composition section
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BedType {
    Double,
    Single,
    SofaBed,
    BunkBed,
}

impl BedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BedType::Double => "double",
            BedType::Single => "single",
            BedType::SofaBed => "sofa_bed",
            BedType::BunkBed => "bunk_bed",
        }
    }
}

impl FromStr for BedType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "double" | "matrimoniale" => Ok(BedType::Double),
            "single" | "singolo" => Ok(BedType::Single),
            "sofa_bed" | "divano_letto" => Ok(BedType::SofaBed),
            "bunk_bed" | "letto_castello" => Ok(BedType::BunkBed),
            other => Err(other.to_string()),
        }
    }
}

/// One line of the bed configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BedConfig {
    pub bed_type: BedType,
    pub quantity: u32,
}

/// Identity information for a property
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub short_description: Option<String>,
    pub description: String,
    pub structure_type: Option<StructureType>,
    /// National registration code (CIN)
    pub national_code: Option<String>,
    /// Regional registration code (CIR)
    pub regional_code: Option<String>,
}

/// Location information for a property
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub city: String,
    pub province: String,
    pub region: String,
    pub postal_code: String,
    pub country_code: String,
    pub floor: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Capacity {
    pub max_guests: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area_sqm: f64,
    pub beds: Vec<BedConfig>,
}

impl Capacity {
    /// Sleeping places declared by the bed configuration, falling back to max guests
    pub fn sleeping_places(&self) -> u32 {
        let declared = self.beds.iter().fold(0u32, |total, bed| {
            let places = match bed.bed_type {
                BedType::Single => bed.quantity,
                _ => bed.quantity.saturating_mul(2),
            };
            total.saturating_add(places)
        });
        if declared == 0 {
            self.max_guests
        } else {
            declared
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommercialTerms {
    pub price_per_night: Decimal,
    pub weekly_price: Option<Decimal>,
    pub security_deposit: Option<Decimal>,
    pub cleaning_fee: Option<Decimal>,
    pub min_stay: Option<u32>,
    pub cancellation_policy: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub available_from: Option<NaiveDate>,
    pub available_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    pub phone: String,
}

/// Core property data model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyRecord {
    /// 1-based data row in the source (the header is not counted)
    pub row: usize,
    pub identity: Identity,
    pub location: Location,
    pub capacity: Capacity,
    pub terms: CommercialTerms,
    pub schedule: Schedule,
    pub amenities: Amenities,
    pub contact: Contact,
    pub photos: Vec<PathBuf>,
    pub errors: Vec<String>,
}

impl PropertyRecord {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn display_name(&self) -> &str {
        if self.identity.name.is_empty() {
            "(unnamed)"
        } else {
            &self.identity.name
        }
    }

    /// "Via Roma 1, 07040 Stintino (SS), Italia"
    pub fn full_address(&self) -> String {
        format!(
            "{}, {} {} ({}), Italia",
            self.location.address,
            self.location.postal_code,
            self.location.city,
            self.location.province
        )
    }

    pub fn structure_label(&self) -> &'static str {
        self.identity
            .structure_type
            .map(|t| t.as_str())
            .unwrap_or("")
    }
}

/// Money rendered as a plain decimal string with two fractional digits
pub fn money(value: Decimal) -> String {
    let mut value = value;
    value.rescale(2);
    value.to_string()
}

pub fn date(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn time(value: Option<NaiveTime>) -> String {
    value
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_default()
}

pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_type_accepts_italian_names() {
        assert_eq!("Appartamento".parse::<StructureType>(), Ok(StructureType::Apartment));
        assert_eq!("agriturismo".parse::<StructureType>(), Ok(StructureType::Farmhouse));
        assert_eq!("monolocale".parse::<StructureType>(), Ok(StructureType::Studio));
        assert!("castle".parse::<StructureType>().is_err());
    }

    #[test]
    fn money_always_has_two_decimals() {
        assert_eq!(money(Decimal::from(120)), "120.00");
        assert_eq!(money("89.5".parse().unwrap()), "89.50");
    }

    #[test]
    fn sleeping_places_counts_double_beds_twice() {
        let capacity = Capacity {
            max_guests: 6,
            beds: vec![
                BedConfig { bed_type: BedType::Double, quantity: 1 },
                BedConfig { bed_type: BedType::Single, quantity: 2 },
            ],
            ..Default::default()
        };
        assert_eq!(capacity.sleeping_places(), 4);
        assert_eq!(Capacity { max_guests: 3, ..Default::default() }.sleeping_places(), 3);
    }

    #[test]
    fn sleeping_places_saturate_instead_of_overflowing() {
        let capacity = Capacity {
            beds: vec![
                BedConfig { bed_type: BedType::Double, quantity: 3_000_000_000 },
                BedConfig { bed_type: BedType::Single, quantity: u32::MAX },
            ],
            ..Default::default()
        };
        assert_eq!(capacity.sleeping_places(), u32::MAX);
    }
}
