use super::row::SourceRow;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Nested property document, one property per file.
///
/// Section and field names follow the English layout; the Italian layout of
/// the agency property sheets (`identificativi`, `composizione`,
/// `dotazioni`, `condizioni`, `marketing`) is accepted as well.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyDocument {
    #[serde(alias = "identificativi")]
    pub identity: IdentitySection,
    #[serde(alias = "composizione")]
    pub composition: CompositionSection,
    #[serde(alias = "dotazioni")]
    pub amenities: BTreeMap<String, Value>,
    #[serde(alias = "condizioni")]
    pub terms: TermsSection,
    pub marketing: MarketingSection,
    #[serde(alias = "contatti")]
    pub contact: ContactSection,
    #[serde(alias = "foto")]
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentitySection {
    #[serde(alias = "nome_struttura")]
    pub name: Option<String>,
    #[serde(alias = "tipo_struttura")]
    pub structure_type: Option<String>,
    #[serde(alias = "indirizzo")]
    pub address: Option<String>,
    #[serde(alias = "comune")]
    pub city: Option<String>,
    #[serde(alias = "cap")]
    pub postal_code: Option<Value>,
    #[serde(alias = "provincia")]
    pub province: Option<String>,
    #[serde(alias = "regione")]
    pub region: Option<String>,
    #[serde(alias = "cin")]
    pub national_code: Option<String>,
    #[serde(alias = "cir")]
    pub regional_code: Option<String>,
    #[serde(alias = "piano")]
    pub floor: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionSection {
    #[serde(alias = "max_ospiti")]
    pub max_guests: Option<Value>,
    #[serde(alias = "camere")]
    pub bedrooms: Option<Value>,
    #[serde(alias = "bagni")]
    pub bathrooms: Option<Value>,
    #[serde(alias = "metri_quadri")]
    pub area_sqm: Option<Value>,
    #[serde(alias = "letti")]
    pub beds: Vec<BedEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BedEntry {
    #[serde(alias = "tipo")]
    pub bed_type: String,
    #[serde(alias = "quantita")]
    pub quantity: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TermsSection {
    #[serde(alias = "prezzo_notte")]
    pub price_per_night: Option<Value>,
    #[serde(alias = "prezzo_settimana")]
    pub weekly_price: Option<Value>,
    #[serde(alias = "cauzione_euro")]
    pub security_deposit: Option<Value>,
    #[serde(alias = "pulizie")]
    pub cleaning_fee: Option<Value>,
    /// Plain number of nights, or `{"notti": n}` as the seasonal sheets store it
    #[serde(alias = "soggiorno_minimo", alias = "soggiorno_minimo_bassa")]
    pub min_stay: Option<Value>,
    #[serde(alias = "politica_cancellazione")]
    pub cancellation_policy: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    #[serde(alias = "disponibile_da")]
    pub available_from: Option<String>,
    #[serde(alias = "disponibile_a")]
    pub available_to: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketingSection {
    #[serde(alias = "descrizione_breve")]
    pub short_description: Option<String>,
    #[serde(alias = "descrizione_lunga")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSection {
    pub email: Option<String>,
    #[serde(alias = "telefono")]
    pub phone: Option<String>,
}

impl PropertyDocument {
    /// Flattens the document into the source-row shape so both inputs share one validation path
    pub fn into_row(self) -> SourceRow {
        let mut amenity_keys = Vec::new();
        let mut other_amenities = String::new();
        for (key, value) in &self.amenities {
            match (key.as_str(), value) {
                ("other" | "altro_dotazioni", Value::String(text)) => {
                    other_amenities = text.clone();
                }
                (_, Value::Bool(true)) => amenity_keys.push(key.clone()),
                _ => {}
            }
        }

        let beds = self
            .composition
            .beds
            .iter()
            .map(|bed| format!("{}:{}", bed.bed_type, scalar(&bed.quantity)))
            .collect::<Vec<_>>()
            .join(";");

        let min_stay = match &self.terms.min_stay {
            Some(Value::Object(map)) => map
                .get("notti")
                .or_else(|| map.get("nights"))
                .map(scalar)
                .unwrap_or_default(),
            Some(other) => scalar(other),
            None => String::new(),
        };

        let name = self.identity.name.unwrap_or_default();
        let short_description = self.marketing.short_description.unwrap_or_default();
        let description = self
            .marketing
            .description
            .unwrap_or_else(|| short_description.clone());

        SourceRow {
            name,
            short_description,
            description,
            structure_type: self.identity.structure_type.unwrap_or_default(),
            national_code: self.identity.national_code.unwrap_or_default(),
            regional_code: self.identity.regional_code.unwrap_or_default(),
            address: self.identity.address.unwrap_or_default(),
            city: self.identity.city.unwrap_or_default(),
            province: self.identity.province.unwrap_or_default(),
            region: self.identity.region.unwrap_or_default(),
            postal_code: opt_scalar(&self.identity.postal_code),
            country_code: String::new(),
            floor: opt_scalar(&self.identity.floor),
            max_guests: opt_scalar(&self.composition.max_guests),
            bedrooms: opt_scalar(&self.composition.bedrooms),
            bathrooms: opt_scalar(&self.composition.bathrooms),
            area_sqm: opt_scalar(&self.composition.area_sqm),
            beds,
            price_per_night: opt_scalar(&self.terms.price_per_night),
            weekly_price: opt_scalar(&self.terms.weekly_price),
            security_deposit: opt_scalar(&self.terms.security_deposit),
            cleaning_fee: opt_scalar(&self.terms.cleaning_fee),
            min_stay,
            cancellation_policy: self.terms.cancellation_policy.unwrap_or_default(),
            check_in: self.terms.check_in.unwrap_or_default(),
            check_out: self.terms.check_out.unwrap_or_default(),
            available_from: self.terms.available_from.unwrap_or_default(),
            available_to: self.terms.available_to.unwrap_or_default(),
            amenities: amenity_keys.join(";"),
            other_amenities,
            contact_email: self.contact.email.unwrap_or_default(),
            contact_phone: self.contact.phone.unwrap_or_default(),
            photos: self.photos.join(";"),
        }
    }
}

/// Renders a JSON scalar as the text a spreadsheet cell would hold
fn scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    }
}

fn opt_scalar(value: &Option<Value>) -> String {
    value.as_ref().map(scalar).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn italian_document_flattens_into_row() {
        let document: PropertyDocument = serde_json::from_value(json!({
            "identificativi": {
                "nome_struttura": "Il Faro",
                "tipo_struttura": "Appartamento",
                "indirizzo": "Via del Faro 3",
                "comune": "Badesi",
                "cap": "07030",
                "provincia": "SS",
                "cin": "IT090081C2000001"
            },
            "composizione": {
                "max_ospiti": 4,
                "camere": 2,
                "bagni": 1,
                "metri_quadri": 65.5,
                "letti": [{"tipo": "matrimoniale", "quantita": 1}, {"tipo": "singolo", "quantita": 2}]
            },
            "dotazioni": {
                "internet_wifi": true,
                "piscina": false,
                "parcheggio_privato": true,
                "altro_dotazioni": "Doccia esterna"
            },
            "condizioni": {
                "prezzo_notte": 120,
                "cauzione_euro": 200,
                "soggiorno_minimo_bassa": {"notti": 3}
            },
            "marketing": {
                "descrizione_breve": "Vista mare",
                "descrizione_lunga": "Appartamento con vista mare."
            }
        }))
        .unwrap();

        let row = document.into_row();
        assert_eq!(row.name, "Il Faro");
        assert_eq!(row.postal_code, "07030");
        assert_eq!(row.max_guests, "4");
        assert_eq!(row.area_sqm, "65.5");
        assert_eq!(row.beds, "matrimoniale:1;singolo:2");
        assert_eq!(row.price_per_night, "120");
        assert_eq!(row.min_stay, "3");
        assert_eq!(row.amenities, "internet_wifi;parcheggio_privato");
        assert_eq!(row.other_amenities, "Doccia esterna");
        assert_eq!(row.national_code, "IT090081C2000001");
    }
}
