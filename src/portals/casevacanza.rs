use super::{area, count, money, photos, Portal, PortalProfile};
use crate::automation::{
    checklist_targets, css_all, text_all, AmenityLabels, FieldTarget, Locator, LoginFlow,
    SubmitControls, WizardEntry, WizardStep,
};
use crate::models::{self, Amenity, PropertyRecord};
use std::time::Duration;

pub const BASE_URL: &str = "https://www.casevacanza.it";

pub const AMENITY_LABELS: AmenityLabels = &[
    (Amenity::Tv, &["TV", "Televisione"]),
    (Amenity::Stove, &["Piano cottura"]),
    (Amenity::Fridge, &["Frigorifero", "Frigo"]),
    (Amenity::Oven, &["Forno"]),
    (Amenity::Microwave, &["Microonde", "Forno a microonde"]),
    (Amenity::WashingMachine, &["Lavatrice"]),
    (Amenity::Dishwasher, &["Lavastoviglie"]),
    (Amenity::AirConditioning, &["Aria condizionata", "Climatizzatore"]),
    (Amenity::Heating, &["Riscaldamento"]),
    (Amenity::Wifi, &["WiFi", "Wi-Fi", "Internet"]),
    (Amenity::HairDryer, &["Asciugacapelli", "Phon"]),
    (Amenity::Iron, &["Ferro da stiro"]),
    (Amenity::Terrace, &["Terrazza", "Balcone"]),
    (Amenity::Garden, &["Giardino"]),
    (Amenity::Pool, &["Piscina"]),
    (Amenity::OutdoorFurniture, &["Arredi da esterno", "Mobili da giardino"]),
    (Amenity::Barbecue, &["Barbecue"]),
    (Amenity::Crib, &["Culla", "Lettino"]),
    (Amenity::HighChair, &["Seggiolone"]),
    (Amenity::PetsAllowed, &["Animali ammessi"]),
    (Amenity::Parking, &["Parcheggio", "Posto auto"]),
];

const SUCCESS: &[&str] = &["salvato", "pubblicato", "inserito", "successo", "grazie"];
const FAILURE: &[&str] = &["errore", "error", "obbligatorio", "required"];

pub fn profile() -> PortalProfile {
    PortalProfile {
        portal: Portal::CaseVacanza,
        login: LoginFlow {
            url: format!("{BASE_URL}/login"),
            email: css_all(&["input[name=\"email\"]", "input[type=\"email\"]"]),
            continue_after_email: Vec::new(),
            password: css_all(&["input[name=\"password\"]", "input[type=\"password\"]"]),
            submit: css_all(&["button[type=\"submit\"]", "input[type=\"submit\"]"]),
            failure_markers: &["login", "errore"],
            settle: Duration::from_secs(3),
        },
        entry: WizardEntry {
            home: Some(format!("{BASE_URL}/proprietario/annunci")),
            links: text_all(&["Inserisci", "Nuovo annuncio", "Aggiungi proprietà"]),
            urls: vec![
                format!("{BASE_URL}/proprietario/annunci/nuovo"),
                format!("{BASE_URL}/inserisci-annuncio"),
                format!("{BASE_URL}/nuovo-annuncio"),
            ],
            probe: css_all(&["input[name=\"titolo\"]", "input[name=\"title\"]"]),
            settle: Duration::from_secs(3),
        },
        amenity_labels: AMENITY_LABELS,
        submit: SubmitControls {
            save: vec![
                Locator::text("Salva"),
                Locator::text("Pubblica"),
                Locator::text("Inserisci"),
                Locator::css("button[type=\"submit\"]"),
                Locator::css("input[type=\"submit\"]"),
            ],
            success: SUCCESS,
            failure: FAILURE,
            settle: Duration::from_secs(4),
        },
        allows_submit: true,
        steps,
    }
}

/// Single-page form: one step for the fields, then amenities and photos
fn steps(record: &PropertyRecord) -> Vec<WizardStep> {
    let identity = &record.identity;
    let location = &record.location;
    let capacity = &record.capacity;
    let terms = &record.terms;

    let form = WizardStep::new("form")
        .target(FieldTarget::text(
            "titolo",
            css_all(&[
                "input[name=\"titolo\"]",
                "input[name=\"title\"]",
                "input[id*=\"titolo\"]",
            ]),
            identity.name.clone(),
        ))
        .target(FieldTarget::select(
            "tipo_immobile",
            css_all(&[
                "select[name=\"tipo\"]",
                "select[name=\"tipologia\"]",
                "select[id*=\"tipo\"]",
            ]),
            identity
                .structure_type
                .map(|t| t.italian())
                .unwrap_or_default(),
        ))
        .target(FieldTarget::optional(
            "descrizione_breve",
            css_all(&["textarea[name=\"descrizione_breve\"]", "textarea[id*=\"breve\"]"]),
            identity.short_description.clone(),
        ))
        .target(FieldTarget::text(
            "descrizione",
            css_all(&[
                "textarea[name=\"descrizione\"]",
                "textarea[id*=\"descrizione\"]",
                "textarea[name=\"description\"]",
            ]),
            identity.description.clone(),
        ))
        .target(FieldTarget::text(
            "prezzo_notte",
            css_all(&[
                "input[name=\"prezzo_notte\"]",
                "input[name=\"prezzo\"]",
                "input[id*=\"prezzo\"]",
            ]),
            models::money(terms.price_per_night),
        ))
        .target(FieldTarget::optional(
            "prezzo_settimana",
            css_all(&["input[name=\"prezzo_settimana\"]", "input[id*=\"settimana\"]"]),
            money(terms.weekly_price),
        ))
        .target(FieldTarget::optional(
            "cauzione",
            css_all(&["input[name=\"cauzione\"]", "input[id*=\"cauzione\"]"]),
            money(terms.security_deposit),
        ))
        .target(FieldTarget::optional(
            "soggiorno_minimo",
            css_all(&[
                "input[name=\"soggiorno_minimo\"]",
                "input[name=\"min_stay\"]",
                "input[id*=\"soggiorno\"]",
            ]),
            terms.min_stay.map(|n| n.to_string()),
        ))
        .target(FieldTarget::text(
            "ospiti",
            css_all(&[
                "input[name=\"ospiti\"]",
                "input[name=\"ospiti_max\"]",
                "input[name=\"max_ospiti\"]",
                "input[id*=\"ospiti\"]",
            ]),
            count(capacity.max_guests),
        ))
        .target(FieldTarget::text(
            "camere",
            css_all(&[
                "input[name=\"camere\"]",
                "input[name=\"num_camere\"]",
                "input[id*=\"camere\"]",
            ]),
            count(capacity.bedrooms),
        ))
        .target(FieldTarget::text(
            "bagni",
            css_all(&[
                "input[name=\"bagni\"]",
                "input[name=\"num_bagni\"]",
                "input[id*=\"bagni\"]",
            ]),
            count(capacity.bathrooms),
        ))
        .target(FieldTarget::text(
            "superficie",
            css_all(&[
                "input[name=\"superficie\"]",
                "input[name=\"mq\"]",
                "input[id*=\"mq\"]",
            ]),
            area(capacity.area_sqm),
        ))
        .target(FieldTarget::text(
            "indirizzo",
            css_all(&[
                "input[name=\"indirizzo\"]",
                "input[name=\"via\"]",
                "input[id*=\"indirizzo\"]",
            ]),
            location.address.clone(),
        ))
        .target(FieldTarget::text(
            "localita",
            css_all(&[
                "input[name=\"localita\"]",
                "input[name=\"citta\"]",
                "input[id*=\"localita\"]",
            ]),
            location.city.clone(),
        ))
        .target(FieldTarget::text(
            "cap",
            css_all(&["input[name=\"cap\"]", "input[name=\"postal_code\"]"]),
            location.postal_code.clone(),
        ))
        .target(FieldTarget::text(
            "provincia",
            css_all(&["select[name=\"provincia\"]", "input[name=\"provincia\"]"]),
            location.province.clone(),
        ))
        .target(FieldTarget::text(
            "disponibile_dal",
            css_all(&["input[name=\"disponibile_dal\"]", "input[name=\"data_inizio\"]"]),
            models::date(record.schedule.available_from),
        ))
        .target(FieldTarget::text(
            "disponibile_al",
            css_all(&["input[name=\"disponibile_al\"]", "input[name=\"data_fine\"]"]),
            models::date(record.schedule.available_to),
        ))
        .target(FieldTarget::text(
            "contatto_email",
            css_all(&["input[name=\"contatto_email\"]", "input[name=\"email_contatto\"]"]),
            record.contact.email.clone(),
        ))
        .target(FieldTarget::text(
            "contatto_telefono",
            css_all(&["input[name=\"telefono\"]", "input[name=\"contatto_telefono\"]"]),
            record.contact.phone.clone(),
        ));

    vec![
        form,
        WizardStep::new("amenities").targets(checklist_targets(&record.amenities, AMENITY_LABELS)),
        WizardStep::new("photos").target(photos(record)),
    ]
}
