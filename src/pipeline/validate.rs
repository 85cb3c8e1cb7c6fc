use crate::models::{
    Amenities, BedConfig, BedType, Capacity, CommercialTerms, Contact, Identity, Location,
    PropertyRecord, Schedule, SourceRow, StructureType,
};
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Beds of one kind a single listing may declare
const MAX_BEDS_PER_TYPE: u32 = 50;

const REQUIRED_FIELDS: [&str; 14] = [
    "name",
    "description",
    "price_per_night",
    "address",
    "city",
    "province",
    "postal_code",
    "max_guests",
    "bathrooms",
    "area_sqm",
    "structure_type",
    "available_from",
    "available_to",
    "contact_email",
];

/// Domain rules for the target geography
#[derive(Debug, Clone)]
pub struct ValidationRules {
    pub provinces: BTreeSet<String>,
    /// Prefix used when a phone number starts with the national trunk `0`
    pub calling_code: String,
    pub country_code: String,
    pub region: String,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            provinces: ["CA", "NU", "OR", "SS", "SU"]
                .into_iter()
                .map(String::from)
                .collect(),
            calling_code: "+39".to_string(),
            country_code: "IT".to_string(),
            region: "Sardegna".to_string(),
        }
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

fn postal_code_pattern() -> &'static Regex {
    static POSTAL_CODE: OnceLock<Regex> = OnceLock::new();
    POSTAL_CODE.get_or_init(|| Regex::new(r"^\d{5}$").expect("valid postal code regex"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email.trim())
}

pub fn is_valid_postal_code(code: &str) -> bool {
    postal_code_pattern().is_match(code.trim())
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Collapses runs of whitespace (including newlines) into single spaces
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strips separators, turns `00` into `+`, and prefixes a bare national `0`
/// with the calling code (`079 123` -> `+39079123`).
pub fn normalize_phone(phone: &str, calling_code: &str) -> String {
    let mut phone: String = phone
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '.')
        .collect();
    if let Some(rest) = phone.strip_prefix("00") {
        phone = format!("+{rest}");
    }
    if phone.starts_with('0') {
        phone = format!("{calling_code}{phone}");
    }
    phone
}

/// Collects violations while a row is converted
struct Violations(Vec<String>);

impl Violations {
    fn push(&mut self, message: String) {
        self.0.push(message);
    }

    fn positive_decimal(&mut self, field: &str, raw: &str) -> Decimal {
        let raw = raw.trim();
        if raw.is_empty() {
            return Decimal::ZERO;
        }
        match Decimal::from_str(raw) {
            Ok(mut value) => {
                if value <= Decimal::ZERO {
                    self.push(format!("{field} must be greater than zero"));
                }
                value.rescale(2);
                value
            }
            Err(_) => {
                self.push(format!("{field} is not a valid number: '{raw}'"));
                Decimal::ZERO
            }
        }
    }

    fn optional_amount(&mut self, field: &str, raw: &str) -> Option<Decimal> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match Decimal::from_str(raw) {
            Ok(value) if value >= Decimal::ZERO => {
                let mut value = value;
                value.rescale(2);
                Some(value)
            }
            Ok(_) => {
                self.push(format!("{field} must not be negative"));
                None
            }
            Err(_) => {
                self.push(format!("{field} is not a valid amount: '{raw}'"));
                None
            }
        }
    }

    fn positive_count(&mut self, field: &str, raw: &str) -> u32 {
        let raw = raw.trim();
        if raw.is_empty() {
            return 0;
        }
        match raw.parse::<i64>() {
            Ok(value) if value > 0 => u32::try_from(value).unwrap_or(u32::MAX),
            Ok(_) => {
                self.push(format!("{field} must be greater than zero"));
                0
            }
            Err(_) => {
                self.push(format!("{field} is not a valid integer: '{raw}'"));
                0
            }
        }
    }

    fn optional_count(&mut self, field: &str, raw: &str) -> Option<u32> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let value = self.positive_count(field, raw);
        (value > 0).then_some(value)
    }

    fn positive_area(&mut self, field: &str, raw: &str) -> f64 {
        let raw = raw.trim();
        if raw.is_empty() {
            return 0.0;
        }
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => value,
            Ok(_) => {
                self.push(format!("{field} must be greater than zero"));
                0.0
            }
            Err(_) => {
                self.push(format!("{field} is not a valid number: '{raw}'"));
                0.0
            }
        }
    }

    fn date(&mut self, field: &str, raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let parsed = parse_date(raw);
        if parsed.is_none() {
            self.push(format!("{field} is not a YYYY-MM-DD date: '{raw}'"));
        }
        parsed
    }

    fn time(&mut self, field: &str, raw: &str) -> Option<NaiveTime> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match NaiveTime::parse_from_str(raw, "%H:%M") {
            Ok(time) => Some(time),
            Err(_) => {
                self.push(format!("{field} is not a HH:MM time: '{raw}'"));
                None
            }
        }
    }

    fn beds(&mut self, raw: &str) -> Vec<BedConfig> {
        let mut beds = Vec::new();
        for entry in raw.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let (kind, quantity) = entry.split_once(':').unwrap_or((entry, "1"));
            let bed_type = match kind.parse::<BedType>() {
                Ok(bed_type) => bed_type,
                Err(kind) => {
                    self.push(format!("unknown bed type '{kind}'"));
                    continue;
                }
            };
            match quantity.trim().parse::<u32>() {
                Ok(quantity) if quantity > MAX_BEDS_PER_TYPE => self.push(format!(
                    "bed quantity {quantity} for {} exceeds {MAX_BEDS_PER_TYPE}",
                    bed_type.as_str()
                )),
                Ok(quantity) if quantity > 0 => beds.push(BedConfig { bed_type, quantity }),
                _ => self.push(format!("invalid bed quantity '{}' for {}", quantity.trim(), bed_type.as_str())),
            }
        }
        beds
    }
}

fn optional_text(value: &str) -> Option<String> {
    let value = normalize_text(value);
    (!value.is_empty()).then_some(value)
}

fn required_value<'a>(row: &'a SourceRow, field: &str) -> &'a str {
    match field {
        "name" => &row.name,
        "description" => &row.description,
        "price_per_night" => &row.price_per_night,
        "address" => &row.address,
        "city" => &row.city,
        "province" => &row.province,
        "postal_code" => &row.postal_code,
        "max_guests" => &row.max_guests,
        "bathrooms" => &row.bathrooms,
        "area_sqm" => &row.area_sqm,
        "structure_type" => &row.structure_type,
        "available_from" => &row.available_from,
        "available_to" => &row.available_to,
        "contact_email" => &row.contact_email,
        _ => "",
    }
}

/// Converts one source row into a record, collecting every violation instead of stopping at the first
pub fn parse_row(row: SourceRow, index: usize, rules: &ValidationRules) -> PropertyRecord {
    let mut violations = Violations(Vec::new());

    for field in REQUIRED_FIELDS {
        if required_value(&row, field).trim().is_empty() {
            violations.push(format!("missing required field '{field}'"));
        }
    }

    let price_per_night = violations.positive_decimal("price_per_night", &row.price_per_night);
    let max_guests = violations.positive_count("max_guests", &row.max_guests);
    let bathrooms = violations.positive_count("bathrooms", &row.bathrooms);
    let area_sqm = violations.positive_area("area_sqm", &row.area_sqm);
    let bedrooms = violations
        .optional_count("bedrooms", &row.bedrooms)
        .unwrap_or_else(|| (max_guests / 2).max(1));

    let email = row.contact_email.trim().to_string();
    if !email.is_empty() && !is_valid_email(&email) {
        violations.push(format!("invalid email address: '{email}'"));
    }

    let postal_code = row.postal_code.trim().to_string();
    if !postal_code.is_empty() && !is_valid_postal_code(&postal_code) {
        violations.push(format!("postal code '{postal_code}' is not a 5-digit code"));
    }

    let province = row.province.trim().to_uppercase();
    if !province.is_empty() && !rules.provinces.contains(&province) {
        violations.push(format!(
            "province '{}' is not an allowed province (allowed: {})",
            province,
            rules.provinces.iter().cloned().collect::<Vec<_>>().join(", ")
        ));
    }

    let structure_type = match row.structure_type.trim() {
        "" => None,
        raw => match raw.parse::<StructureType>() {
            Ok(kind) => Some(kind),
            Err(kind) => {
                violations.push(format!(
                    "structure type '{}' not recognised (allowed: {})",
                    kind,
                    StructureType::ALL.map(|t| t.as_str()).join(", ")
                ));
                None
            }
        },
    };

    let available_from = violations.date("available_from", &row.available_from);
    let available_to = violations.date("available_to", &row.available_to);
    if let (Some(from), Some(to)) = (available_from, available_to) {
        if from >= to {
            violations.push("available_from must be before available_to".to_string());
        }
    }
    let check_in = violations.time("check_in", &row.check_in);
    let check_out = violations.time("check_out", &row.check_out);

    let weekly_price = violations.optional_amount("weekly_price", &row.weekly_price);
    let security_deposit = violations.optional_amount("security_deposit", &row.security_deposit);
    let cleaning_fee = violations.optional_amount("cleaning_fee", &row.cleaning_fee);
    let min_stay = violations.optional_count("min_stay", &row.min_stay);
    let beds = violations.beds(&row.beds);

    let (mut amenities, unknown) = Amenities::from_key_list(&row.amenities);
    for key in unknown {
        warn!("Row {}: ignoring unknown amenity '{}'", index, key);
    }
    amenities.other = optional_text(&row.other_amenities);

    let photos = row
        .photos
        .split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect();

    let country_code = match row.country_code.trim() {
        "" => rules.country_code.clone(),
        code => code.to_uppercase(),
    };

    let record = PropertyRecord {
        row: index,
        identity: Identity {
            name: normalize_text(&row.name),
            short_description: optional_text(&row.short_description),
            description: normalize_text(&row.description),
            structure_type,
            national_code: optional_text(&row.national_code),
            regional_code: optional_text(&row.regional_code),
        },
        location: Location {
            address: normalize_text(&row.address),
            city: normalize_text(&row.city),
            province,
            region: optional_text(&row.region).unwrap_or_else(|| rules.region.clone()),
            postal_code,
            country_code,
            floor: optional_text(&row.floor),
        },
        capacity: Capacity {
            max_guests,
            bedrooms,
            bathrooms,
            area_sqm,
            beds,
        },
        terms: CommercialTerms {
            price_per_night,
            weekly_price,
            security_deposit,
            cleaning_fee,
            min_stay,
            cancellation_policy: optional_text(&row.cancellation_policy),
        },
        schedule: Schedule {
            check_in,
            check_out,
            available_from,
            available_to,
        },
        amenities,
        contact: Contact {
            email,
            phone: normalize_phone(&row.contact_phone, &rules.calling_code),
        },
        photos,
        errors: violations.0,
    };

    debug!(
        "Row {} '{}': {} violation(s)",
        index,
        record.display_name(),
        record.errors.len()
    );
    record
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn valid_row() -> SourceRow {
        SourceRow {
            name: "Appartamento Test Stintino".to_string(),
            description: "Bilocale a 200 metri dalla spiaggia della Pelosa.".to_string(),
            structure_type: "appartamento".to_string(),
            address: "Via Sassari 12".to_string(),
            city: "Stintino".to_string(),
            province: "ss".to_string(),
            postal_code: "07040".to_string(),
            max_guests: "4".to_string(),
            bathrooms: "1".to_string(),
            area_sqm: "55".to_string(),
            price_per_night: "120".to_string(),
            available_from: "2026-06-01".to_string(),
            available_to: "2026-09-30".to_string(),
            check_in: "15:00".to_string(),
            check_out: "10:00".to_string(),
            contact_email: "host@example.it".to_string(),
            contact_phone: "079 523.456".to_string(),
            amenities: "wifi;aria_condizionata".to_string(),
            ..Default::default()
        }
    }

    fn parse(row: SourceRow) -> PropertyRecord {
        parse_row(row, 1, &ValidationRules::default())
    }

    #[test]
    fn valid_row_produces_valid_record() {
        let record = parse(valid_row());
        assert!(record.is_valid(), "unexpected errors: {:?}", record.errors);
        assert_eq!(record.location.province, "SS");
        assert_eq!(record.identity.structure_type, Some(StructureType::Apartment));
        assert_eq!(record.terms.price_per_night.to_string(), "120.00");
        assert_eq!(record.capacity.bedrooms, 2);
        assert_eq!(record.contact.phone, "+39079523456");
        assert_eq!(record.location.region, "Sardegna");
        assert_eq!(record.location.country_code, "IT");
    }

    #[test]
    fn province_outside_allow_list_is_rejected() {
        for province in ["MI", "RM", "XX", "Sassari"] {
            let record = parse(SourceRow {
                province: province.to_string(),
                ..valid_row()
            });
            assert!(!record.is_valid());
            assert!(
                record.errors.iter().any(|e| e.contains("province")
                    && e.contains(&province.to_uppercase())),
                "{:?}",
                record.errors
            );
        }
    }

    #[test]
    fn postal_code_must_have_five_digits() {
        for code in ["7040", "070400", "07O40", "0704 "] {
            let record = parse(SourceRow {
                postal_code: code.to_string(),
                ..valid_row()
            });
            let trimmed = code.trim();
            if trimmed.len() == 5 && trimmed.chars().all(|c| c.is_ascii_digit()) {
                assert!(record.is_valid());
            } else {
                assert!(record.errors.iter().any(|e| e.contains("postal code")), "{code}");
            }
        }

        for code in ["00000", "07040", "99999"] {
            let record = parse(SourceRow {
                postal_code: code.to_string(),
                ..valid_row()
            });
            assert!(!record.errors.iter().any(|e| e.contains("postal code")));
        }
    }

    #[test]
    fn availability_window_must_be_ordered() {
        for (from, to) in [("2026-09-30", "2026-06-01"), ("2026-06-01", "2026-06-01")] {
            let record = parse(SourceRow {
                available_from: from.to_string(),
                available_to: to.to_string(),
                ..valid_row()
            });
            assert!(!record.is_valid());
            assert!(record
                .errors
                .contains(&"available_from must be before available_to".to_string()));
        }
    }

    #[test]
    fn malformed_values_accumulate_errors() {
        let record = parse(SourceRow {
            price_per_night: "abc".to_string(),
            max_guests: "0".to_string(),
            area_sqm: "-3".to_string(),
            contact_email: "not-an-email".to_string(),
            structure_type: "castle".to_string(),
            available_from: "01/06/2026".to_string(),
            check_in: "3pm".to_string(),
            ..valid_row()
        });
        assert_eq!(record.errors.len(), 7, "{:?}", record.errors);
    }

    #[test]
    fn missing_required_fields_are_listed() {
        let record = parse(SourceRow::default());
        assert!(record.errors.contains(&"missing required field 'name'".to_string()));
        assert!(record
            .errors
            .contains(&"missing required field 'contact_email'".to_string()));
        assert_eq!(record.errors.len(), REQUIRED_FIELDS.len());
    }

    #[test]
    fn phone_normalization() {
        assert_eq!(normalize_phone("0039 333-123.4567", "+39"), "+393331234567");
        assert_eq!(normalize_phone("079 123456", "+39"), "+39079123456");
        assert_eq!(normalize_phone("+39 333 1234567", "+39"), "+393331234567");
        assert_eq!(normalize_phone("", "+39"), "");
    }

    #[test]
    fn beds_and_text_are_normalized() {
        let record = parse(SourceRow {
            name: "  Villa   Le\nDune ".to_string(),
            beds: "matrimoniale:1; single:2".to_string(),
            ..valid_row()
        });
        assert_eq!(record.identity.name, "Villa Le Dune");
        assert_eq!(record.capacity.beds.len(), 2);
        assert_eq!(record.capacity.beds[1].bed_type, BedType::Single);
    }

    #[test]
    fn oversized_bed_quantity_is_rejected() {
        let record = parse(SourceRow {
            beds: "matrimoniale:3000000000; single:2".to_string(),
            ..valid_row()
        });
        assert!(!record.is_valid());
        assert!(record.errors.iter().any(|e| e.contains("bed quantity 3000000000")));

        let record = parse(SourceRow {
            beds: "matrimoniale:51".to_string(),
            ..valid_row()
        });
        assert!(record.errors.iter().any(|e| e.contains("exceeds 50")));
        assert!(record.capacity.beds.is_empty());

        let record = parse(SourceRow {
            beds: "matrimoniale:50".to_string(),
            ..valid_row()
        });
        assert!(record.is_valid(), "{:?}", record.errors);
        assert_eq!(record.capacity.sleeping_places(), 100);
    }
}
