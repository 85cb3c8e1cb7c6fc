use serde::{Deserialize, Serialize};

/// Flat row of the source sheet, every cell still raw text.
///
/// English headers are canonical; the Italian headers of the agency
/// property sheets are accepted as aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceRow {
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(alias = "descrizione_breve")]
    pub short_description: String,
    #[serde(alias = "descrizione")]
    pub description: String,
    #[serde(alias = "tipo_proprieta")]
    pub structure_type: String,
    #[serde(alias = "cin")]
    pub national_code: String,
    #[serde(alias = "cir")]
    pub regional_code: String,
    #[serde(alias = "indirizzo")]
    pub address: String,
    #[serde(alias = "citta")]
    pub city: String,
    #[serde(alias = "provincia")]
    pub province: String,
    #[serde(alias = "regione")]
    pub region: String,
    #[serde(alias = "cap")]
    pub postal_code: String,
    #[serde(alias = "nazione")]
    pub country_code: String,
    #[serde(alias = "piano")]
    pub floor: String,
    #[serde(alias = "posti_letto")]
    pub max_guests: String,
    #[serde(alias = "camere")]
    pub bedrooms: String,
    #[serde(alias = "bagni")]
    pub bathrooms: String,
    #[serde(alias = "metri_quadri")]
    pub area_sqm: String,
    #[serde(alias = "letti")]
    pub beds: String,
    #[serde(alias = "prezzo_notte")]
    pub price_per_night: String,
    #[serde(alias = "prezzo_settimana")]
    pub weekly_price: String,
    #[serde(alias = "cauzione")]
    pub security_deposit: String,
    #[serde(alias = "pulizie")]
    pub cleaning_fee: String,
    #[serde(alias = "soggiorno_minimo")]
    pub min_stay: String,
    #[serde(alias = "politica_cancellazione")]
    pub cancellation_policy: String,
    pub check_in: String,
    pub check_out: String,
    #[serde(alias = "disponibile_da")]
    pub available_from: String,
    #[serde(alias = "disponibile_a")]
    pub available_to: String,
    #[serde(alias = "dotazioni")]
    pub amenities: String,
    #[serde(alias = "altro_dotazioni")]
    pub other_amenities: String,
    #[serde(alias = "contatto_email")]
    pub contact_email: String,
    #[serde(alias = "contatto_telefono")]
    pub contact_phone: String,
    #[serde(alias = "foto")]
    pub photos: String,
}
