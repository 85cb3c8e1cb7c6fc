use crate::models::{self, PropertyRecord};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A portal-native flat schema projected from a record
pub trait PortalRow: Serialize + Sized {
    /// File stem of the export (`booking` -> `booking.csv`, `booking.json`)
    const PORTAL: &'static str;

    fn project(record: &PropertyRecord) -> Self;
}

fn area(value: f64) -> String {
    format!("{}", value)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn optional_money(value: Option<rust_decimal::Decimal>) -> String {
    value.map(models::money).unwrap_or_default()
}

/// Booking.com bulk schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRow {
    pub property_name: String,
    pub property_type: String,
    pub description_it: String,
    pub price_per_night_eur: String,
    pub max_guests: String,
    pub bathrooms: String,
    pub size_sqm: String,
    pub address_line1: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub check_in_from: String,
    pub check_out_until: String,
    pub contact_email: String,
    pub contact_phone: String,
}

impl PortalRow for BookingRow {
    const PORTAL: &'static str = "booking";

    fn project(record: &PropertyRecord) -> Self {
        Self {
            property_name: record.identity.name.clone(),
            property_type: record.structure_label().to_string(),
            description_it: record.identity.description.clone(),
            price_per_night_eur: models::money(record.terms.price_per_night),
            max_guests: record.capacity.max_guests.to_string(),
            bathrooms: record.capacity.bathrooms.to_string(),
            size_sqm: area(record.capacity.area_sqm),
            address_line1: record.location.address.clone(),
            city: record.location.city.clone(),
            postal_code: record.location.postal_code.clone(),
            country: record.location.country_code.clone(),
            check_in_from: models::date(record.schedule.available_from),
            check_out_until: models::date(record.schedule.available_to),
            contact_email: record.contact.email.clone(),
            contact_phone: record.contact.phone.clone(),
        }
    }
}

/// CaseVacanza.it host import, Italian column names
#[derive(Debug, Clone, Serialize)]
pub struct CasevacanzaRow {
    pub titolo: String,
    pub tipologia: String,
    pub descrizione: String,
    pub prezzo_notte: String,
    pub prezzo_settimana: String,
    pub cauzione: String,
    pub ospiti: u32,
    pub camere: u32,
    pub bagni: u32,
    pub mq: String,
    pub indirizzo: String,
    pub comune: String,
    pub provincia: String,
    pub cap: String,
    pub check_in: String,
    pub check_out: String,
    pub email: String,
    pub telefono: String,
    pub cin: String,
}

impl PortalRow for CasevacanzaRow {
    const PORTAL: &'static str = "casevacanza";

    fn project(record: &PropertyRecord) -> Self {
        Self {
            titolo: record.identity.name.clone(),
            tipologia: record
                .identity
                .structure_type
                .map(|t| t.italian().to_string())
                .unwrap_or_default(),
            descrizione: record.identity.description.clone(),
            prezzo_notte: models::money(record.terms.price_per_night),
            prezzo_settimana: optional_money(record.terms.weekly_price),
            cauzione: optional_money(record.terms.security_deposit),
            ospiti: record.capacity.max_guests,
            camere: record.capacity.bedrooms,
            bagni: record.capacity.bathrooms,
            mq: area(record.capacity.area_sqm),
            indirizzo: record.location.address.clone(),
            comune: record.location.city.clone(),
            provincia: record.location.province.clone(),
            cap: record.location.postal_code.clone(),
            check_in: models::time(record.schedule.check_in),
            check_out: models::time(record.schedule.check_out),
            email: record.contact.email.clone(),
            telefono: record.contact.phone.clone(),
            cin: record.identity.national_code.clone().unwrap_or_default(),
        }
    }
}

/// KrossBooking PMS room-type import
#[derive(Debug, Clone, Serialize)]
pub struct KrossbookingRow {
    pub name: String,
    pub r#type: String,
    pub rooms: u32,
    pub max_occupancy: u32,
    pub bathrooms: u32,
    pub size_sqm: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    pub province: String,
    pub country: String,
    pub base_price: String,
    pub cleaning_fee: String,
    pub min_stay: String,
    pub cin: String,
    pub cir: String,
    pub email: String,
    pub phone: String,
}

impl PortalRow for KrossbookingRow {
    const PORTAL: &'static str = "krossbooking";

    fn project(record: &PropertyRecord) -> Self {
        Self {
            name: record.identity.name.clone(),
            r#type: record.structure_label().to_string(),
            rooms: record.capacity.bedrooms,
            max_occupancy: record.capacity.max_guests,
            bathrooms: record.capacity.bathrooms,
            size_sqm: area(record.capacity.area_sqm),
            address: record.location.address.clone(),
            city: record.location.city.clone(),
            zip: record.location.postal_code.clone(),
            province: record.location.province.clone(),
            country: record.location.country_code.clone(),
            base_price: models::money(record.terms.price_per_night),
            cleaning_fee: optional_money(record.terms.cleaning_fee),
            min_stay: record
                .terms
                .min_stay
                .map(|n| n.to_string())
                .unwrap_or_default(),
            cin: record.identity.national_code.clone().unwrap_or_default(),
            cir: record.identity.regional_code.clone().unwrap_or_default(),
            email: record.contact.email.clone(),
            phone: record.contact.phone.clone(),
        }
    }
}

/// Airbnb bulk listing import
#[derive(Debug, Clone, Serialize)]
pub struct AirbnbRow {
    pub listing_name: String,
    pub summary: String,
    pub space: String,
    pub nightly_price: String,
    pub currency: &'static str,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub accommodates: u32,
    pub property_type: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub country_code: String,
    pub availability_start: String,
    pub availability_end: String,
    pub contact_email: String,
}

impl PortalRow for AirbnbRow {
    const PORTAL: &'static str = "airbnb";

    fn project(record: &PropertyRecord) -> Self {
        let kind = models::capitalize(record.structure_label());
        Self {
            // listing titles are capped at 50 characters
            listing_name: truncate(&record.identity.name, 50),
            summary: truncate(&record.identity.description, 500),
            space: format!(
                "Type: {}. Area: {} m².",
                kind,
                area(record.capacity.area_sqm)
            ),
            nightly_price: models::money(record.terms.price_per_night),
            currency: "EUR",
            bedrooms: record.capacity.bedrooms,
            bathrooms: record.capacity.bathrooms,
            accommodates: record.capacity.max_guests,
            property_type: kind,
            street: record.location.address.clone(),
            city: record.location.city.clone(),
            state: record.location.region.clone(),
            zipcode: record.location.postal_code.clone(),
            country_code: record.location.country_code.clone(),
            availability_start: models::date(record.schedule.available_from),
            availability_end: models::date(record.schedule.available_to),
            contact_email: record.contact.email.clone(),
        }
    }
}

/// HomeAway / Vrbo listing import
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HomeawayRow {
    pub property_name: String,
    pub property_type: String,
    pub headline: String,
    pub description: String,
    pub nightly_rate: String,
    pub currency: &'static str,
    pub max_sleeps: u32,
    pub bathrooms: u32,
    pub square_meters: String,
    pub full_address: String,
    pub city: String,
    pub state_province: String,
    pub postal_code: String,
    pub country: &'static str,
    pub available_from: String,
    pub available_to: String,
    pub contact_email: String,
    pub contact_phone: String,
}

impl PortalRow for HomeawayRow {
    const PORTAL: &'static str = "homeaway";

    fn project(record: &PropertyRecord) -> Self {
        Self {
            property_name: record.identity.name.clone(),
            property_type: models::capitalize(record.structure_label()),
            headline: record.identity.name.clone(),
            description: record.identity.description.clone(),
            nightly_rate: models::money(record.terms.price_per_night),
            currency: "EUR",
            max_sleeps: record.capacity.max_guests,
            bathrooms: record.capacity.bathrooms,
            square_meters: area(record.capacity.area_sqm),
            full_address: record.full_address(),
            city: record.location.city.clone(),
            state_province: record.location.region.clone(),
            postal_code: record.location.postal_code.clone(),
            country: "Italy",
            available_from: models::date(record.schedule.available_from),
            available_to: models::date(record.schedule.available_to),
            contact_email: record.contact.email.clone(),
            contact_phone: record.contact.phone.clone(),
        }
    }
}

/// Immobiliare.it Vacanze flat feed
#[derive(Debug, Clone, Serialize)]
pub struct ImmobiliareRow {
    pub titolo: String,
    pub tipologia: String,
    pub descrizione: String,
    pub prezzo_notte: String,
    pub ospiti_max: u32,
    pub bagni: u32,
    pub superficie: String,
    pub indirizzo: String,
    pub comune: String,
    pub provincia: String,
    pub cap: String,
    pub nazione: String,
    pub data_inizio: String,
    pub data_fine: String,
    pub email_contatto: String,
    pub telefono_contatto: String,
}

impl PortalRow for ImmobiliareRow {
    const PORTAL: &'static str = "immobiliare";

    fn project(record: &PropertyRecord) -> Self {
        Self {
            titolo: record.identity.name.clone(),
            tipologia: record.structure_label().to_string(),
            descrizione: record.identity.description.clone(),
            prezzo_notte: models::money(record.terms.price_per_night),
            ospiti_max: record.capacity.max_guests,
            bagni: record.capacity.bathrooms,
            superficie: area(record.capacity.area_sqm),
            indirizzo: record.location.address.clone(),
            comune: record.location.city.clone(),
            provincia: record.location.province.clone(),
            cap: record.location.postal_code.clone(),
            nazione: record.location.country_code.clone(),
            data_inizio: models::date(record.schedule.available_from),
            data_fine: models::date(record.schedule.available_to),
            email_contatto: record.contact.email.clone(),
            telefono_contatto: record.contact.phone.clone(),
        }
    }
}

/// What `write_exports` produced
#[derive(Debug, Default)]
pub struct ExportSummary {
    /// (csv path, row count) per written portal
    pub written: Vec<(PathBuf, usize)>,
    /// Portals skipped for lack of valid records
    pub skipped: Vec<&'static str>,
}

/// Projects the valid records into one portal schema and writes `<portal>.csv` and `<portal>.json`
pub fn export_portal<R: PortalRow>(
    records: &[PropertyRecord],
    out_dir: &Path,
    summary: &mut ExportSummary,
) -> Result<()> {
    let rows: Vec<R> = records
        .iter()
        .filter(|r| r.is_valid())
        .map(R::project)
        .collect();

    if rows.is_empty() {
        warn!("No valid records for {}, nothing written", R::PORTAL);
        summary.skipped.push(R::PORTAL);
        return Ok(());
    }

    let csv_path = out_dir.join(format!("{}.csv", R::PORTAL));
    let mut writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("Failed to create {}", csv_path.display()))?;
    for row in &rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row to {}", csv_path.display()))?;
    }
    writer.flush().context("Failed to flush CSV writer")?;
    info!("  -> CSV: {} ({} properties)", csv_path.display(), rows.len());

    let json_path = out_dir.join(format!("{}.json", R::PORTAL));
    let json = serde_json::to_string_pretty(&rows).context("Failed to serialize JSON export")?;
    fs::write(&json_path, json)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;
    info!("  -> JSON: {} ({} properties)", json_path.display(), rows.len());

    summary.written.push((csv_path, rows.len()));
    Ok(())
}

/// Writes every portal schema into `out_dir`
pub fn write_exports(records: &[PropertyRecord], out_dir: &Path) -> Result<ExportSummary> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let mut summary = ExportSummary::default();
    export_portal::<BookingRow>(records, out_dir, &mut summary)?;
    export_portal::<CasevacanzaRow>(records, out_dir, &mut summary)?;
    export_portal::<KrossbookingRow>(records, out_dir, &mut summary)?;
    export_portal::<AirbnbRow>(records, out_dir, &mut summary)?;
    export_portal::<HomeawayRow>(records, out_dir, &mut summary)?;
    export_portal::<ImmobiliareRow>(records, out_dir, &mut summary)?;
    Ok(summary)
}

/// Reads a booking export back
pub fn read_booking_csv(path: &Path) -> Result<Vec<BookingRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    reader
        .deserialize()
        .collect::<Result<Vec<BookingRow>, _>>()
        .with_context(|| format!("Failed to parse booking rows from {}", path.display()))
}
