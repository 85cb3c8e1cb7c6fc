use super::{count, money, photos, Portal, PortalProfile};
use crate::automation::{
    checklist_targets, css_all, text_all, AmenityLabels, FieldTarget, FollowUp, Locator,
    LoginFlow, SubmitControls, WizardEntry, WizardStep,
};
use crate::models::{self, Amenity, BedType, PropertyRecord};
use std::time::Duration;

pub const LOGIN_URL: &str = "https://www.vrbo.com/login";
pub const NEW_LISTING_URL: &str = "https://www.vrbo.com/list-your-property";

/// English labels first, Italian fallbacks after
pub const AMENITY_LABELS: AmenityLabels = &[
    (Amenity::Tv, &["TV"]),
    (Amenity::Stove, &["Stove", "Piano cottura"]),
    (Amenity::Fridge, &["Refrigerator", "Frigorifero"]),
    (Amenity::Oven, &["Oven", "Forno"]),
    (Amenity::Microwave, &["Microwave", "Microonde"]),
    (Amenity::WashingMachine, &["Washing machine", "Lavatrice"]),
    (Amenity::Dishwasher, &["Dishwasher", "Lavastoviglie"]),
    (Amenity::AirConditioning, &["Air conditioning", "Aria condizionata"]),
    (Amenity::Heating, &["Heating", "Riscaldamento"]),
    (Amenity::Wifi, &["Internet/Wi-Fi", "WiFi"]),
    (Amenity::HairDryer, &["Hair dryer", "Asciugacapelli"]),
    (Amenity::Iron, &["Iron", "Ferro da stiro"]),
    (Amenity::Terrace, &["Terrace", "Terrazza"]),
    (Amenity::Garden, &["Garden", "Giardino"]),
    (Amenity::Pool, &["Pool", "Piscina"]),
    (Amenity::OutdoorFurniture, &["Outdoor furniture", "Arredi da esterno"]),
    (Amenity::Barbecue, &["Barbecue grill", "Barbecue"]),
    (Amenity::Crib, &["Crib", "Culla"]),
    (Amenity::HighChair, &["High chair", "Seggiolone"]),
    (Amenity::PetsAllowed, &["Pets allowed", "Animali ammessi"]),
    (Amenity::Parking, &["Parking", "Parcheggio"]),
];

fn bed_labels(bed_type: BedType) -> &'static [&'static str] {
    match bed_type {
        BedType::Double => &["Double bed", "Queen bed", "King bed", "Letto matrimoniale"],
        BedType::Single => &["Single bed", "Twin bed", "Letto singolo"],
        BedType::SofaBed => &["Sofa bed", "Divano letto"],
        BedType::BunkBed => &["Bunk bed", "Letto a castello"],
    }
}

fn advance() -> Vec<Locator> {
    text_all(&["Next", "Continue", "Avanti", "Continua"])
}

fn manual_address() -> FieldTarget {
    FieldTarget::click(
        "manual_address",
        text_all(&[
            "Enter address manually",
            "Enter it manually",
            "Inserisci l'indirizzo manualmente",
            "Inserisci manualmente",
        ]),
    )
}

/// Property-type tiles to try: the record's own type first, apartment wording last
fn property_kinds(record: &PropertyRecord) -> Vec<Locator> {
    let mut kinds: Vec<String> = record
        .identity
        .structure_type
        .map(|t| vec![t.title(), t.italian().to_string()])
        .unwrap_or_default();
    for fallback in ["Apartment", "Appartamento", "Flat", "Condo"] {
        kinds.push(fallback.to_string());
    }

    let mut seen = Vec::with_capacity(kinds.len());
    for kind in kinds {
        if !seen.contains(&kind) {
            seen.push(kind);
        }
    }
    seen.into_iter().map(Locator::text).collect()
}

/// Number input named `name`, or a select, or the `numName` variant
fn counter(name: &str, value: u32) -> FieldTarget {
    let mut camel = name.to_string();
    if let Some(first) = camel.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    FieldTarget::text(
        name,
        vec![
            Locator::css(format!("input[name=\"{name}\"]")),
            Locator::css(format!("select[name=\"{name}\"]")),
            Locator::css(format!("input[name=\"num{camel}\"]")),
        ],
        count(value),
    )
}

pub fn profile() -> PortalProfile {
    PortalProfile {
        portal: Portal::Vrbo,
        login: LoginFlow {
            url: LOGIN_URL.to_string(),
            email: css_all(&[
                "input[name=\"email\"]",
                "input[type=\"email\"]",
                "#loginFormEmailInput",
                "input[name=\"username\"]",
            ]),
            continue_after_email: text_all(&["Continue", "Next", "Avanti", "Continua"]),
            password: css_all(&["input[name=\"password\"]", "input[type=\"password\"]", "#password"]),
            submit: text_all(&["Sign in", "Log in", "Accedi", "Entra"]),
            failure_markers: &["login", "signin"],
            settle: Duration::from_secs(5),
        },
        entry: WizardEntry {
            home: None,
            links: Vec::new(),
            urls: vec![NEW_LISTING_URL.to_string()],
            probe: Vec::new(),
            settle: Duration::from_secs(3),
        },
        amenity_labels: AMENITY_LABELS,
        submit: SubmitControls {
            save: text_all(&["Publish", "Submit"]),
            success: &["published", "congratulations"],
            failure: &["error", "required"],
            settle: Duration::from_secs(4),
        },
        // Reconnaissance only: the listing is reviewed and published by hand
        allows_submit: false,
        steps,
    }
}

fn steps(record: &PropertyRecord) -> Vec<WizardStep> {
    let identity = &record.identity;
    let location = &record.location;
    let capacity = &record.capacity;

    let beds = capacity.beds.iter().map(|bed| {
        FieldTarget::text(
            format!("beds:{}", bed.bed_type.as_str()),
            bed_labels(bed.bed_type)
                .iter()
                .map(|l| Locator::label(*l))
                .collect(),
            bed.quantity.to_string(),
        )
    });

    vec![
        WizardStep::new("property_type")
            .target(FieldTarget::click("property_type", property_kinds(record)))
            .advance(advance()),
        WizardStep::new("name")
            .target(FieldTarget::text(
                "property_name",
                css_all(&[
                    "input[name=\"propertyName\"]",
                    "input[name=\"name\"]",
                    "input[name=\"title\"]",
                    "#propertyName",
                ]),
                identity.name.clone(),
            ))
            .advance(advance()),
        WizardStep::new("address")
            .reveal(manual_address())
            .target(FieldTarget::text(
                "address",
                css_all(&[
                    "input[name=\"address\"]",
                    "input[name=\"streetAddress\"]",
                    "input[placeholder*=\"address\"]",
                    "#address",
                ]),
                format!(
                    "{}, {}, {}",
                    location.address, location.city, location.postal_code
                ),
            ))
            .follow_up(FollowUp::PickSuggestion(css_all(&[
                ".autocomplete-suggestion",
                ".suggestion",
                "li[role='option']",
            ])))
            .advance(advance()),
        WizardStep::new("composition")
            .target(counter("guests", capacity.max_guests))
            .target(counter("bedrooms", capacity.bedrooms))
            .target(counter("bathrooms", capacity.bathrooms))
            .advance(advance()),
        WizardStep::new("beds").targets(beds).advance(advance()),
        WizardStep::new("amenities")
            .targets(checklist_targets(&record.amenities, AMENITY_LABELS))
            .advance(advance()),
        WizardStep::new("photos").target(photos(record)).advance(advance()),
        WizardStep::new("description")
            .target(FieldTarget::text(
                "description",
                css_all(&[
                    "textarea[name=\"description\"]",
                    "textarea[name=\"propertyDescription\"]",
                    "#description",
                    "textarea",
                ]),
                identity.description.clone(),
            ))
            .advance(advance()),
        WizardStep::new("pricing")
            .target(FieldTarget::text(
                "price",
                css_all(&[
                    "input[name=\"price\"]",
                    "input[name=\"nightlyRate\"]",
                    "input[name=\"baseRate\"]",
                ]),
                models::money(record.terms.price_per_night),
            ))
            .target(FieldTarget::optional(
                "deposit",
                css_all(&["input[name=\"deposit\"]", "input[name=\"securityDeposit\"]"]),
                money(record.terms.security_deposit),
            )),
    ]
}
