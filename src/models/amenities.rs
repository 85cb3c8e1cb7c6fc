use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Fixed amenity vocabulary
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Amenity {
    Tv,
    Stove,
    Fridge,
    Oven,
    Microwave,
    WashingMachine,
    Dishwasher,
    AirConditioning,
    Heating,
    Wifi,
    HairDryer,
    Iron,
    Terrace,
    Garden,
    Pool,
    OutdoorFurniture,
    Barbecue,
    Crib,
    HighChair,
    PetsAllowed,
    Parking,
}

impl Amenity {
    pub fn key(&self) -> &'static str {
        match self {
            Amenity::Tv => "tv",
            Amenity::Stove => "stove",
            Amenity::Fridge => "fridge",
            Amenity::Oven => "oven",
            Amenity::Microwave => "microwave",
            Amenity::WashingMachine => "washing_machine",
            Amenity::Dishwasher => "dishwasher",
            Amenity::AirConditioning => "air_conditioning",
            Amenity::Heating => "heating",
            Amenity::Wifi => "wifi",
            Amenity::HairDryer => "hair_dryer",
            Amenity::Iron => "iron",
            Amenity::Terrace => "terrace",
            Amenity::Garden => "garden",
            Amenity::Pool => "pool",
            Amenity::OutdoorFurniture => "outdoor_furniture",
            Amenity::Barbecue => "barbecue",
            Amenity::Crib => "crib",
            Amenity::HighChair => "high_chair",
            Amenity::PetsAllowed => "pets_allowed",
            Amenity::Parking => "parking",
        }
    }
}

impl FromStr for Amenity {
    type Err = String;

    /// Accepts the English keys and the Italian keys of the property sheets
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amenity = match s.trim().to_lowercase().as_str() {
            "tv" => Amenity::Tv,
            "stove" | "piano_cottura" => Amenity::Stove,
            "fridge" | "frigo_congelatore" => Amenity::Fridge,
            "oven" | "forno" => Amenity::Oven,
            "microwave" | "microonde" => Amenity::Microwave,
            "washing_machine" | "lavatrice" => Amenity::WashingMachine,
            "dishwasher" | "lavastoviglie" => Amenity::Dishwasher,
            "air_conditioning" | "aria_condizionata" => Amenity::AirConditioning,
            "heating" | "riscaldamento" => Amenity::Heating,
            "wifi" | "internet_wifi" => Amenity::Wifi,
            "hair_dryer" | "phon" => Amenity::HairDryer,
            "iron" | "ferro_stiro" => Amenity::Iron,
            "terrace" | "terrazza" => Amenity::Terrace,
            "garden" | "giardino" => Amenity::Garden,
            "pool" | "piscina" => Amenity::Pool,
            "outdoor_furniture" | "arredi_esterno" => Amenity::OutdoorFurniture,
            "barbecue" => Amenity::Barbecue,
            "crib" | "culla" => Amenity::Crib,
            "high_chair" | "seggiolone" => Amenity::HighChair,
            "pets_allowed" | "animali_ammessi" => Amenity::PetsAllowed,
            "parking" | "parcheggio_privato" => Amenity::Parking,
            other => return Err(other.to_string()),
        };
        Ok(amenity)
    }
}

/// Boolean amenity map plus the free-text "other amenities" field
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Amenities {
    pub flags: BTreeMap<Amenity, bool>,
    pub other: Option<String>,
}

impl Amenities {
    pub fn set(&mut self, amenity: Amenity, present: bool) {
        self.flags.insert(amenity, present);
    }

    /// Explicit presence; unknown keys count as absent
    pub fn has(&self, amenity: Amenity) -> bool {
        self.flags.get(&amenity).copied().unwrap_or(false)
    }

    /// Parking is present through the explicit flag or a mention in the free text
    pub fn has_parking(&self) -> bool {
        if self.has(Amenity::Parking) {
            return true;
        }
        self.other
            .as_deref()
            .map(|text| {
                let text = text.to_lowercase();
                text.contains("parcheggio") || text.contains("parking")
            })
            .unwrap_or(false)
    }

    /// Presence as used by checklists: parking is synthesized
    pub fn is_present(&self, amenity: Amenity) -> bool {
        match amenity {
            Amenity::Parking => self.has_parking(),
            other => self.has(other),
        }
    }

    /// Keys currently true, in vocabulary order
    pub fn present_keys(&self) -> Vec<&'static str> {
        self.flags
            .iter()
            .filter(|(_, present)| **present)
            .map(|(amenity, _)| amenity.key())
            .collect()
    }

    /// Parses a `key;key` list; returns the keys it did not recognise
    pub fn from_key_list(list: &str) -> (Self, Vec<String>) {
        let mut amenities = Amenities::default();
        let mut unknown = Vec::new();
        for key in list.split(';').map(str::trim).filter(|k| !k.is_empty()) {
            match key.parse::<Amenity>() {
                Ok(amenity) => amenities.set(amenity, true),
                Err(key) => unknown.push(key),
            }
        }
        (amenities, unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parking_from_flag_or_free_text() {
        let mut amenities = Amenities::default();
        assert!(!amenities.has_parking());

        amenities.other = Some("Posto auto, Parcheggio gratuito in strada".to_string());
        assert!(amenities.has_parking());

        let mut flagged = Amenities::default();
        flagged.set("parcheggio_privato".parse().unwrap(), true);
        assert!(flagged.has_parking());
    }

    #[test]
    fn key_list_reports_unknown_keys() {
        let (amenities, unknown) = Amenities::from_key_list("wifi; piscina;sauna");
        assert!(amenities.has(Amenity::Wifi));
        assert!(amenities.has(Amenity::Pool));
        assert_eq!(unknown, vec!["sauna".to_string()]);
        assert_eq!(amenities.present_keys(), vec!["wifi", "pool"]);
    }
}
