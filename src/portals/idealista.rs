use super::{area, count, money, photos, Portal, PortalProfile};
use crate::automation::{
    checklist_targets, css_all, text_all, AmenityLabels, FieldTarget, FollowUp, Locator,
    LoginFlow, SubmitControls, WizardEntry, WizardStep,
};
use crate::models::{self, Amenity, PropertyRecord};
use std::time::Duration;

pub const LOGIN_URL: &str = "https://www.idealista.it/login";
pub const NEW_LISTING_URL: &str = "https://www.idealista.it/inserisci-annuncio/";

pub const AMENITY_LABELS: AmenityLabels = &[
    (Amenity::Tv, &["Televisione"]),
    (Amenity::Stove, &["Piano cottura"]),
    (Amenity::Fridge, &["Frigorifero"]),
    (Amenity::Oven, &["Forno"]),
    (Amenity::Microwave, &["Microonde"]),
    (Amenity::WashingMachine, &["Lavatrice"]),
    (Amenity::Dishwasher, &["Lavastoviglie"]),
    (Amenity::AirConditioning, &["Aria condizionata"]),
    (Amenity::Heating, &["Riscaldamento"]),
    (Amenity::Wifi, &["Internet / Wi-Fi", "WiFi"]),
    (Amenity::HairDryer, &["Asciugacapelli"]),
    (Amenity::Iron, &["Ferro da stiro"]),
    (Amenity::Terrace, &["Terrazza"]),
    (Amenity::Garden, &["Giardino"]),
    (Amenity::Pool, &["Piscina"]),
    (Amenity::OutdoorFurniture, &["Arredato"]),
    (Amenity::Barbecue, &["Barbecue"]),
    (Amenity::Crib, &["Culla"]),
    (Amenity::HighChair, &["Seggiolone"]),
    (Amenity::PetsAllowed, &["Animali ammessi"]),
    (Amenity::Parking, &["Posto auto", "Parcheggio"]),
];

fn advance() -> Vec<Locator> {
    text_all(&["Continua", "Avanti", "Successivo"])
}

fn manual_address() -> FieldTarget {
    FieldTarget::click(
        "manual_address",
        text_all(&[
            "Inserisci l'indirizzo manualmente",
            "Inserisci manualmente",
            "Non trovi l'indirizzo?",
        ]),
    )
}

fn suggestions() -> Vec<Locator> {
    css_all(&[".autocomplete-suggestion", ".suggestion", "li[role='option']"])
}

pub fn profile() -> PortalProfile {
    PortalProfile {
        portal: Portal::Idealista,
        login: LoginFlow {
            url: LOGIN_URL.to_string(),
            email: css_all(&[
                "input[name=\"email\"]",
                "input[type=\"email\"]",
                "#email",
                "input[name=\"username\"]",
            ]),
            continue_after_email: Vec::new(),
            password: css_all(&["input[name=\"password\"]", "input[type=\"password\"]", "#password"]),
            submit: text_all(&["Accedi", "Log in", "Entra", "Accesso"]),
            failure_markers: &["login"],
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
            save: text_all(&["Pubblica annuncio", "Pubblica"]),
            success: &["pubblicato", "grazie"],
            failure: &["errore", "obbligatorio"],
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

    let structure = identity
        .structure_type
        .map(|t| t.italian())
        .unwrap_or("Appartamento");
    let mut structure_texts = vec![structure, "Appartamento", "Flat"];
    structure_texts.dedup();

    let title = identity
        .short_description
        .clone()
        .unwrap_or_else(|| identity.name.clone());

    vec![
        WizardStep::new("operation")
            .target(FieldTarget::click(
                "operation",
                text_all(&["Affitto", "Affittare", "In affitto"]),
            ))
            .advance(advance()),
        WizardStep::new("structure_type")
            .target(FieldTarget::click("structure_type", text_all(&structure_texts)))
            .advance(advance()),
        WizardStep::new("address")
            .reveal(manual_address())
            .target(FieldTarget::text(
                "address",
                css_all(&[
                    "input[name=\"address\"]",
                    "input[placeholder*=\"indirizzo\"]",
                    "input[placeholder*=\"Indirizzo\"]",
                ]),
                format!("{}, {}", location.address, location.city),
            ))
            .follow_up(FollowUp::PickSuggestion(suggestions())),
        WizardStep::new("postal_code")
            .target(FieldTarget::text(
                "zipcode",
                css_all(&[
                    "input[name=\"zipcode\"]",
                    "input[name=\"postalCode\"]",
                    "input[placeholder*=\"CAP\"]",
                ]),
                location.postal_code.clone(),
            ))
            .advance(advance()),
        WizardStep::new("composition")
            .target(FieldTarget::text(
                "rooms",
                css_all(&["input[name=\"rooms\"]", "select[name=\"rooms\"]"]),
                count(capacity.bedrooms),
            ))
            .target(FieldTarget::text(
                "bathrooms",
                css_all(&["input[name=\"bathrooms\"]", "select[name=\"bathrooms\"]"]),
                count(capacity.bathrooms),
            ))
            .target(FieldTarget::text(
                "size",
                css_all(&[
                    "input[name=\"size\"]",
                    "input[name=\"area\"]",
                    "input[name=\"surface\"]",
                ]),
                area(capacity.area_sqm),
            ))
            .target(FieldTarget::optional(
                "floor",
                css_all(&["input[name=\"floor\"]", "select[name=\"floor\"]"]),
                location.floor.clone(),
            ))
            .advance(advance()),
        WizardStep::new("title_description")
            .target(FieldTarget::text(
                "title",
                css_all(&["input[name=\"title\"]", "input[name=\"adTitle\"]"]),
                title,
            ))
            .target(FieldTarget::text(
                "description",
                css_all(&[
                    "textarea[name=\"description\"]",
                    "textarea[name=\"adDescription\"]",
                    "textarea",
                ]),
                identity.description.clone(),
            ))
            .advance(advance()),
        WizardStep::new("price")
            .target(FieldTarget::text(
                "price",
                css_all(&["input[name=\"price\"]", "input[name=\"rent\"]", "#price"]),
                models::money(record.terms.price_per_night),
            ))
            .target(FieldTarget::optional(
                "deposit",
                css_all(&["input[name=\"deposit\"]", "input[name=\"cauzione\"]"]),
                money(record.terms.security_deposit),
            ))
            .advance(advance()),
        WizardStep::new("amenities")
            .targets(checklist_targets(&record.amenities, AMENITY_LABELS))
            .advance(advance()),
        WizardStep::new("photos").target(photos(record)).advance(advance()),
        WizardStep::new("cin").target(FieldTarget::optional(
            "cin",
            css_all(&[
                "input[name=\"cin\"]",
                "input[placeholder*=\"CIN\"]",
                "input[name=\"touristCode\"]",
            ]),
            identity.national_code.clone(),
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::validate::tests::valid_row;
    use crate::pipeline::{parse_row, ValidationRules};

    #[test]
    fn address_combines_street_and_city_and_picks_a_suggestion() {
        let record = parse_row(valid_row(), 1, &ValidationRules::default());
        let steps = steps(&record);
        let address = steps.iter().find(|s| s.name == "address").unwrap();

        assert_eq!(
            address.targets[0].value.as_deref(),
            Some("Via Sassari 12, Stintino")
        );
        assert!(matches!(address.follow_up, Some(FollowUp::PickSuggestion(_))));
        assert_eq!(
            address.reveal.as_ref().map(|r| r.name.as_str()),
            Some("manual_address")
        );
    }

    #[test]
    fn title_falls_back_to_the_property_name() {
        let record = parse_row(valid_row(), 1, &ValidationRules::default());
        let steps = steps(&record);
        let title = steps
            .iter()
            .flat_map(|s| s.targets.iter())
            .find(|t| t.name == "title")
            .unwrap();
        assert_eq!(title.value.as_deref(), Some("Appartamento Test Stintino"));
    }
}
