//! Immobiliare.it import payload.

use crate::config::FeedSettings;
use crate::models::{self, Amenity, BedType, PropertyRecord, StructureType};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Amenities without a dedicated element, mentioned in the description text instead
const DESCRIBED_AMENITIES: [(Amenity, &str); 11] = [
    (Amenity::Tv, "TV"),
    (Amenity::WashingMachine, "lavatrice"),
    (Amenity::Dishwasher, "lavastoviglie"),
    (Amenity::Microwave, "microonde"),
    (Amenity::Oven, "forno"),
    (Amenity::Wifi, "WiFi"),
    (Amenity::HairDryer, "asciugacapelli"),
    (Amenity::Iron, "ferro da stiro"),
    (Amenity::Barbecue, "barbecue"),
    (Amenity::Crib, "culla"),
    (Amenity::HighChair, "seggiolone"),
];

/// Building type id of the feed's building-types table
fn building_type(structure: Option<StructureType>) -> &'static str {
    match structure {
        Some(StructureType::Villa) => "23",
        Some(StructureType::Attic) => "15",
        Some(StructureType::House) => "21",
        _ => "7",
    }
}

fn bed_label(bed_type: BedType) -> &'static str {
    match bed_type {
        BedType::Double => "letto matrimoniale",
        BedType::Single => "letto singolo",
        BedType::SofaBed => "divano letto",
        BedType::BunkBed => "letto a castello",
    }
}

/// Feed identifier: the CIN when present, else a slug of the name
pub fn listing_id(record: &PropertyRecord) -> String {
    if let Some(cin) = record.identity.national_code.as_deref() {
        return cin.to_string();
    }
    record
        .identity
        .name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// Long description plus a "Dotazioni: …." line for the minor amenities
fn description_text(record: &PropertyRecord) -> String {
    let mut text = record.identity.description.clone();
    let minor: Vec<&str> = DESCRIBED_AMENITIES
        .iter()
        .filter(|(amenity, _)| record.amenities.has(*amenity))
        .map(|(_, label)| *label)
        .collect();
    if !minor.is_empty() {
        text.push_str(&format!("\n\nDotazioni: {}.", minor.join(", ")));
    }
    text
}

struct XmlBuilder {
    writer: Writer<Vec<u8>>,
}

impl XmlBuilder {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn declaration(&mut self) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Element with text content; empty text gives a self-closing element
    fn leaf(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        if text.is_empty() {
            let empty = BytesStart::new(name).with_attributes(attrs.iter().copied());
            self.writer.write_event(Event::Empty(empty))?;
            return Ok(());
        }
        self.open(name, attrs)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner()).context("Feed payload is not valid UTF-8")
    }
}

/// Renders one record as a `<property operation="write">` document
pub fn build_property_xml(
    record: &PropertyRecord,
    settings: &FeedSettings,
    now: NaiveDateTime,
) -> Result<String> {
    let identity = &record.identity;
    let location = &record.location;
    let capacity = &record.capacity;
    let terms = &record.terms;
    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();

    let mut xml = XmlBuilder::new();
    xml.declaration()?;
    xml.open("property", &[("operation", "write")])?;

    xml.leaf("unique-id", &[], &listing_id(record))?;
    xml.leaf("published-on", &[], &timestamp)?;
    xml.leaf("date-updated", &[], &timestamp)?;
    xml.leaf(
        "reference-code",
        &[],
        identity.regional_code.as_deref().unwrap_or(""),
    )?;
    xml.leaf(
        "building",
        &[
            ("IDType", building_type(identity.structure_type)),
            ("status", "buono"),
        ],
        "",
    )?;

    xml.open("transactions", &[])?;
    xml.open("transaction", &[("type", "R")])?;
    xml.leaf(
        "price",
        &[("currency", "EUR"), ("reserved", "false")],
        &models::money(terms.price_per_night),
    )?;
    xml.close("transaction")?;
    xml.close("transactions")?;

    xml.open("agent", &[])?;
    xml.leaf("office-name", &[], &settings.office_name)?;
    xml.leaf("email", &[], &settings.email)?;
    xml.close("agent")?;

    xml.open("location", &[])?;
    xml.leaf("country-code", &[], &location.country_code)?;
    xml.leaf("region", &[], &location.region)?;
    xml.leaf("province", &[], &location.province)?;
    xml.leaf("city", &[], &location.city)?;
    xml.leaf("postal-code", &[], &location.postal_code)?;
    xml.leaf("address", &[], &location.address)?;
    xml.close("location")?;

    xml.open("descriptions", &[])?;
    xml.open("description", &[("language", "it")])?;
    xml.leaf(
        "title",
        &[],
        identity
            .short_description
            .as_deref()
            .unwrap_or(&identity.name),
    )?;
    xml.leaf("content", &[], &description_text(record))?;
    xml.close("description")?;
    xml.close("descriptions")?;

    xml.open("features", &[])?;
    xml.leaf("rooms", &[], &capacity.bedrooms.to_string())?;
    xml.leaf("bathrooms", &[], &capacity.bathrooms.to_string())?;
    if capacity.area_sqm > 0.0 {
        xml.leaf("size", &[], &format!("{}", capacity.area_sqm))?;
    }
    xml.leaf("floor", &[], location.floor.as_deref().unwrap_or(""))?;
    xml.leaf("max-guests", &[], &capacity.max_guests.to_string())?;
    xml.leaf("beds", &[], &capacity.sleeping_places().to_string())?;
    if !capacity.beds.is_empty() {
        let beds = capacity
            .beds
            .iter()
            .map(|bed| format!("{}x {}", bed.quantity, bed_label(bed.bed_type)))
            .collect::<Vec<_>>()
            .join(", ");
        xml.leaf("beds-description", &[], &beds)?;
    }
    xml.close("features")?;

    let amenities = &record.amenities;
    xml.open("extra-features", &[])?;
    xml.leaf("furniture", &[], "Arredato")?;
    xml.leaf("rent-contract", &[], "Transitorio")?;
    if let Some(nights) = terms.min_stay {
        xml.leaf("minimum-stay", &[], &nights.to_string())?;
    }
    xml.open("ambience", &[])?;
    if amenities.has(Amenity::AirConditioning) {
        xml.leaf(
            "air-conditioning",
            &[("type", "Autonomo"), ("present", "true")],
            "",
        )?;
    }
    if amenities.has(Amenity::Heating) {
        xml.leaf("heating", &[("type", "Autonomo")], "")?;
    }
    xml.close("ambience")?;
    if amenities.has(Amenity::Garden) {
        xml.leaf("garden", &[], "Privato")?;
    }
    if amenities.has(Amenity::Terrace) {
        xml.leaf("terrace", &[], "1")?;
    }
    if amenities.has(Amenity::Pool) {
        xml.leaf("pool", &[], "Comune")?;
    }
    if amenities.has_parking() {
        xml.leaf("garage", &[("type", "PostoAuto")], "1")?;
    }
    if let Some(floor) = location.floor.as_deref() {
        xml.leaf("floor", &[("type", "Intermedio")], floor)?;
    }
    if let Some(deposit) = terms.security_deposit {
        xml.open("costs", &[])?;
        xml.leaf("deposit", &[("currency", "EUR")], &models::money(deposit))?;
        xml.close("costs")?;
    }
    xml.close("extra-features")?;

    xml.close("property")?;
    xml.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::validate::tests::valid_row;
    use crate::pipeline::{parse_row, ValidationRules};
    use chrono::NaiveDate;

    fn settings(endpoint: &str) -> FeedSettings {
        FeedSettings {
            endpoint: endpoint.to_string(),
            email: "agency@example.it".to_string(),
            password: "pw".to_string(),
            source: "affittasardegna".to_string(),
            office_name: "AffittaSardegna".to_string(),
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, 1)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .unwrap()
    }

    #[test]
    fn listing_id_prefers_the_cin() {
        let mut record = parse_row(valid_row(), 1, &ValidationRules::default());
        assert_eq!(listing_id(&record), "appartamento_test_stintino");

        record.identity.name = "Casa  L'Oleandro (Badesi)".to_string();
        assert_eq!(listing_id(&record), "casa_loleandro_badesi");

        record.identity.national_code = Some("IT090064C2000012345".to_string());
        assert_eq!(listing_id(&record), "IT090064C2000012345");
    }

    #[test]
    fn payload_carries_identity_price_and_location() {
        let record = parse_row(valid_row(), 1, &ValidationRules::default());
        let xml = build_property_xml(&record, &settings("https://feed.test"), now()).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<property operation=\"write\">"));
        assert!(xml.contains("<unique-id>appartamento_test_stintino</unique-id>"));
        assert!(xml.contains("<published-on>2026-05-01T09:30:00</published-on>"));
        assert!(xml.contains("<building IDType=\"7\" status=\"buono\"/>"));
        assert!(xml.contains("<price currency=\"EUR\" reserved=\"false\">120.00</price>"));
        assert!(xml.contains("<postal-code>07040</postal-code>"));
        assert!(xml.contains("<province>SS</province>"));
        assert!(xml.contains("<office-name>AffittaSardegna</office-name>"));
    }

    #[test]
    fn minor_amenities_go_to_the_description_and_major_ones_to_elements() {
        let mut record = parse_row(valid_row(), 1, &ValidationRules::default());
        record.amenities.set(Amenity::Tv, true);
        record.amenities.other = Some("Parcheggio gratuito in strada".to_string());
        let xml = build_property_xml(&record, &settings("https://feed.test"), now()).unwrap();

        assert!(xml.contains("Dotazioni: TV, WiFi."));
        assert!(xml.contains("<air-conditioning type=\"Autonomo\" present=\"true\"/>"));
        assert!(xml.contains("<garage type=\"PostoAuto\">1</garage>"));
        assert!(!xml.contains("<pool>"));
        assert!(!xml.contains("<costs>"));
    }

    #[test]
    fn text_is_escaped() {
        let mut record = parse_row(valid_row(), 1, &ValidationRules::default());
        record.identity.description = "Vista mare & <giardino>".to_string();
        let xml = build_property_xml(&record, &settings("https://feed.test"), now()).unwrap();
        assert!(xml.contains("Vista mare &amp; &lt;giardino&gt;"));
    }
}
