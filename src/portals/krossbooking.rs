use super::{area, count, money, photos, Portal, PortalProfile};
use crate::automation::{
    checklist_targets, css_all, text_all, AmenityLabels, FieldTarget, Locator, LoginFlow,
    SubmitControls, WizardEntry, WizardStep,
};
use crate::models::{self, Amenity, PropertyRecord};
use std::time::Duration;

pub const BASE_URL: &str = "https://app.krossbooking.com";

pub const AMENITY_LABELS: AmenityLabels = &[
    (Amenity::Tv, &["TV", "Televisore"]),
    (Amenity::Stove, &["Piano cottura", "Cucina"]),
    (Amenity::Fridge, &["Frigorifero"]),
    (Amenity::Oven, &["Forno"]),
    (Amenity::Microwave, &["Microonde"]),
    (Amenity::WashingMachine, &["Lavatrice"]),
    (Amenity::Dishwasher, &["Lavastoviglie"]),
    (Amenity::AirConditioning, &["Aria condizionata", "Climatizzazione"]),
    (Amenity::Heating, &["Riscaldamento"]),
    (Amenity::Wifi, &["WiFi", "Wi-Fi gratuito", "Internet"]),
    (Amenity::HairDryer, &["Asciugacapelli"]),
    (Amenity::Iron, &["Ferro da stiro"]),
    (Amenity::Terrace, &["Terrazza"]),
    (Amenity::Garden, &["Giardino"]),
    (Amenity::Pool, &["Piscina"]),
    (Amenity::OutdoorFurniture, &["Arredo esterno"]),
    (Amenity::Barbecue, &["Barbecue"]),
    (Amenity::Crib, &["Culla"]),
    (Amenity::HighChair, &["Seggiolone"]),
    (Amenity::PetsAllowed, &["Animali ammessi"]),
    (Amenity::Parking, &["Parcheggio privato", "Parcheggio"]),
];

const SUCCESS: &[&str] = &[
    "salvata",
    "salvato",
    "creata",
    "inserita",
    "successo",
    "success",
    "pubblicata",
    "grazie",
];
const FAILURE: &[&str] = &["errore", "error", "obbligatorio", "required", "campo mancante"];

fn advance() -> Vec<Locator> {
    text_all(&["Avanti", "Prossimo", "Next"])
}

/// Tab header of the multi-tab structure form
fn tab(key: &str, title: &str) -> FieldTarget {
    FieldTarget::click(
        format!("tab_{key}"),
        vec![
            Locator::css(format!("[data-tab=\"{key}\"]")),
            Locator::text(title),
        ],
    )
}

pub fn profile() -> PortalProfile {
    PortalProfile {
        portal: Portal::KrossBooking,
        login: LoginFlow {
            url: format!("{BASE_URL}/login"),
            email: css_all(&[
                "input[name=\"email\"]",
                "input[type=\"email\"]",
                "input[id*=\"email\"]",
            ]),
            continue_after_email: Vec::new(),
            password: css_all(&[
                "input[name=\"password\"]",
                "input[type=\"password\"]",
                "input[id*=\"password\"]",
            ]),
            submit: vec![
                Locator::css("button[type=\"submit\"]"),
                Locator::css("input[type=\"submit\"]"),
                Locator::text("Accedi"),
                Locator::text("Login"),
                Locator::text("Entra"),
            ],
            failure_markers: &["login"],
            settle: Duration::from_secs(3),
        },
        entry: WizardEntry {
            home: Some(format!("{BASE_URL}/strutture")),
            links: vec![
                Locator::text("Nuova struttura"),
                Locator::text("Aggiungi struttura"),
                Locator::text("Aggiungi"),
                Locator::css("a[href*=\"nuova\"]"),
            ],
            urls: vec![
                format!("{BASE_URL}/strutture/nuova"),
                format!("{BASE_URL}/struttura/nuova"),
                format!("{BASE_URL}/properties/new"),
                format!("{BASE_URL}/property/new"),
            ],
            probe: css_all(&[
                "input[name=\"nome\"]",
                "input[name=\"nome_struttura\"]",
                "input[name=\"title\"]",
            ]),
            settle: Duration::from_secs(3),
        },
        amenity_labels: AMENITY_LABELS,
        submit: SubmitControls {
            save: vec![
                Locator::text("Salva e pubblica"),
                Locator::text("Crea struttura"),
                Locator::text("Salva"),
                Locator::text("Pubblica"),
                Locator::text("Inserisci"),
                Locator::css("input[type=\"submit\"]"),
                Locator::css("button[type=\"submit\"]"),
            ],
            success: SUCCESS,
            failure: FAILURE,
            settle: Duration::from_secs(4),
        },
        allows_submit: true,
        steps,
    }
}

fn steps(record: &PropertyRecord) -> Vec<WizardStep> {
    let identity = &record.identity;
    let location = &record.location;
    let capacity = &record.capacity;
    let terms = &record.terms;
    let schedule = &record.schedule;

    vec![
        WizardStep::new("general")
            .reveal(tab("generale", "Dati Generali"))
            .target(FieldTarget::optional(
                "codice",
                css_all(&[
                    "input[name=\"codice\"]",
                    "input[name=\"codice_struttura\"]",
                    "input[id*=\"codice\"]",
                ]),
                identity
                    .regional_code
                    .clone()
                    .or_else(|| identity.national_code.clone()),
            ))
            .target(FieldTarget::text(
                "nome",
                css_all(&[
                    "input[name=\"nome\"]",
                    "input[name=\"nome_struttura\"]",
                    "input[name=\"title\"]",
                ]),
                identity.name.clone(),
            ))
            .target(FieldTarget::select(
                "tipo",
                css_all(&[
                    "select[name=\"tipo\"]",
                    "select[name=\"tipo_struttura\"]",
                    "select[id*=\"tipo\"]",
                ]),
                identity
                    .structure_type
                    .map(|t| t.italian())
                    .unwrap_or_default(),
            ))
            .target(FieldTarget::text(
                "max_ospiti",
                css_all(&[
                    "input[name=\"max_ospiti\"]",
                    "input[name=\"ospiti\"]",
                    "input[name=\"capacita\"]",
                ]),
                count(capacity.max_guests),
            ))
            .target(FieldTarget::text(
                "letti",
                css_all(&[
                    "input[name=\"letti\"]",
                    "input[name=\"num_letti\"]",
                    "input[name=\"posti_letto\"]",
                ]),
                count(capacity.sleeping_places()),
            ))
            .target(FieldTarget::text(
                "bagni",
                css_all(&["input[name=\"bagni\"]", "input[name=\"num_bagni\"]"]),
                count(capacity.bathrooms),
            ))
            .target(FieldTarget::text(
                "superficie",
                css_all(&[
                    "input[name=\"superficie\"]",
                    "input[name=\"mq\"]",
                    "input[id*=\"superficie\"]",
                ]),
                area(capacity.area_sqm),
            ))
            .target(FieldTarget::text(
                "check_in",
                css_all(&[
                    "input[name=\"check_in\"]",
                    "input[name=\"ora_checkin\"]",
                    "input[name=\"checkin_time\"]",
                ]),
                models::time(schedule.check_in),
            ))
            .target(FieldTarget::text(
                "check_out",
                css_all(&[
                    "input[name=\"check_out\"]",
                    "input[name=\"ora_checkout\"]",
                    "input[name=\"checkout_time\"]",
                ]),
                models::time(schedule.check_out),
            ))
            .target(FieldTarget::optional(
                "politica_cancellazione",
                css_all(&[
                    "select[name=\"politica_cancellazione\"]",
                    "select[name=\"cancellation_policy\"]",
                ]),
                terms.cancellation_policy.clone(),
            ))
            .advance(advance()),
        WizardStep::new("location")
            .reveal(tab("ubicazione", "Ubicazione"))
            .target(FieldTarget::text(
                "indirizzo",
                css_all(&[
                    "input[name=\"indirizzo\"]",
                    "input[name=\"via\"]",
                    "input[name=\"address\"]",
                ]),
                location.address.clone(),
            ))
            .target(FieldTarget::text(
                "citta",
                css_all(&["input[name=\"citta\"]", "input[name=\"city\"]"]),
                location.city.clone(),
            ))
            .target(FieldTarget::text(
                "provincia",
                css_all(&["select[name=\"provincia\"]", "input[name=\"provincia\"]"]),
                location.province.clone(),
            ))
            .target(FieldTarget::text(
                "cap",
                css_all(&["input[name=\"cap\"]", "input[name=\"postal_code\"]"]),
                location.postal_code.clone(),
            ))
            .target(FieldTarget::select(
                "nazione",
                css_all(&["select[name=\"nazione\"]", "select[name=\"country\"]"]),
                location.country_code.clone(),
            ))
            .advance(advance()),
        WizardStep::new("description")
            .reveal(tab("descrizione", "Descrizione"))
            .target(FieldTarget::text(
                "descrizione",
                css_all(&[
                    "textarea[name=\"descrizione\"]",
                    "textarea[name=\"description\"]",
                    "textarea[id*=\"descrizione\"]",
                ]),
                identity.description.clone(),
            ))
            .advance(advance()),
        WizardStep::new("rates")
            .reveal(tab("tariffe", "Tariffe"))
            .target(FieldTarget::text(
                "prezzo_notte",
                css_all(&[
                    "input[name=\"prezzo_notte\"]",
                    "input[name=\"prezzo_base\"]",
                    "input[name=\"tariffa_notte\"]",
                ]),
                models::money(terms.price_per_night),
            ))
            .target(FieldTarget::optional(
                "prezzo_settimana",
                css_all(&[
                    "input[name=\"prezzo_settimana\"]",
                    "input[name=\"tariffa_settimanale\"]",
                ]),
                money(terms.weekly_price),
            ))
            .target(FieldTarget::optional(
                "cauzione",
                css_all(&["input[name=\"cauzione\"]", "input[name=\"deposito\"]"]),
                money(terms.security_deposit),
            ))
            .target(FieldTarget::optional(
                "pulizie",
                css_all(&["input[name=\"pulizie\"]", "input[name=\"tariffa_pulizie\"]"]),
                money(terms.cleaning_fee),
            ))
            .advance(advance()),
        WizardStep::new("availability")
            .reveal(tab("disponibilita", "Disponibilità"))
            .target(FieldTarget::text(
                "disponibile_dal",
                css_all(&[
                    "input[name=\"disponibile_dal\"]",
                    "input[name=\"data_inizio\"]",
                    "input[name=\"available_from\"]",
                ]),
                models::date(schedule.available_from),
            ))
            .target(FieldTarget::text(
                "disponibile_al",
                css_all(&[
                    "input[name=\"disponibile_al\"]",
                    "input[name=\"data_fine\"]",
                    "input[name=\"available_to\"]",
                ]),
                models::date(schedule.available_to),
            ))
            .target(FieldTarget::optional(
                "soggiorno_minimo",
                css_all(&["input[name=\"soggiorno_minimo\"]", "input[name=\"min_stay\"]"]),
                terms.min_stay.map(|n| n.to_string()),
            ))
            .advance(advance()),
        WizardStep::new("contacts")
            .reveal(tab("contatti", "Contatti"))
            .target(FieldTarget::text(
                "email_contatto",
                css_all(&[
                    "input[name=\"email_contatto\"]",
                    "input[name=\"contatto_email\"]",
                    "input[name=\"contact_email\"]",
                ]),
                record.contact.email.clone(),
            ))
            .target(FieldTarget::text(
                "telefono",
                css_all(&[
                    "input[name=\"telefono\"]",
                    "input[name=\"contatto_telefono\"]",
                    "input[name=\"phone\"]",
                ]),
                record.contact.phone.clone(),
            ))
            .advance(advance()),
        WizardStep::new("amenities")
            .reveal(tab("servizi", "Servizi"))
            .targets(checklist_targets(&record.amenities, AMENITY_LABELS)),
        WizardStep::new("photos")
            .reveal(tab("foto", "Foto"))
            .target(photos(record)),
    ]
}
