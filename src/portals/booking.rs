use super::{area, count, photos, Portal, PortalProfile};
use crate::automation::{
    checklist_targets, css_all, text_all, AmenityLabels, FieldTarget, FillMode, Locator, LoginFlow,
    SubmitControls, WizardEntry, WizardStep,
};
use crate::models::{self, Amenity, PropertyRecord};
use crate::pipeline::export::{BookingRow, PortalRow};
use std::time::Duration;

pub const LOGIN_URL: &str = "https://account.booking.com/sign-in";
pub const EXTRANET_URL: &str = "https://admin.booking.com/";
pub const NEW_PROPERTY_URLS: [&str; 3] = [
    "https://admin.booking.com/hotel/hoteladmin/overview/create/",
    "https://partner.booking.com/",
    "https://join.booking.com/",
];

pub const AMENITY_LABELS: AmenityLabels = &[
    (Amenity::Tv, &["Flat-screen TV", "TV"]),
    (Amenity::Stove, &["Stovetop", "Piano cottura"]),
    (Amenity::Fridge, &["Refrigerator", "Frigorifero"]),
    (Amenity::Oven, &["Oven", "Forno"]),
    (Amenity::Microwave, &["Microwave", "Microonde"]),
    (Amenity::WashingMachine, &["Washing machine", "Lavatrice"]),
    (Amenity::Dishwasher, &["Dishwasher", "Lavastoviglie"]),
    (Amenity::AirConditioning, &["Air conditioning", "Aria condizionata"]),
    (Amenity::Heating, &["Heating", "Riscaldamento"]),
    (Amenity::Wifi, &["Free WiFi", "WiFi", "Wi-Fi"]),
    (Amenity::HairDryer, &["Hairdryer", "Asciugacapelli"]),
    (Amenity::Iron, &["Iron", "Ferro da stiro"]),
    (Amenity::Terrace, &["Terrace", "Terrazza"]),
    (Amenity::Garden, &["Garden", "Giardino"]),
    (Amenity::Pool, &["Swimming pool", "Piscina"]),
    (Amenity::OutdoorFurniture, &["Outdoor furniture", "Mobili da esterno"]),
    (Amenity::Barbecue, &["BBQ facilities", "Barbecue"]),
    (Amenity::Crib, &["Cot", "Culla"]),
    (Amenity::HighChair, &["High chair", "Seggiolone"]),
    (Amenity::PetsAllowed, &["Pets allowed", "Animali ammessi"]),
    (Amenity::Parking, &["Free parking", "Parking", "Parcheggio"]),
];

const SUCCESS: &[&str] = &["success", "submitted", "complete", "thank you", "grazie"];
const FAILURE: &[&str] = &["error", "errore", "required", "obbligatorio"];

fn advance() -> Vec<Locator> {
    text_all(&["Next", "Continua", "Avanti"])
}

pub fn profile() -> PortalProfile {
    PortalProfile {
        portal: Portal::Booking,
        login: LoginFlow {
            url: LOGIN_URL.to_string(),
            email: css_all(&[
                "input#loginname",
                "input[name=\"loginname\"]",
                "input[name=\"username\"]",
                "input[type=\"email\"]",
            ]),
            continue_after_email: Vec::new(),
            password: css_all(&[
                "input#password",
                "input[name=\"password\"]",
                "input[type=\"password\"]",
            ]),
            submit: vec![
                Locator::css("button[type=\"submit\"]"),
                Locator::css(".bui-button--primary"),
                Locator::text("Sign in"),
                Locator::text("Accedi"),
                Locator::css("input[type=\"submit\"]"),
            ],
            failure_markers: &["sign-in", "login", "signin"],
            settle: Duration::from_secs(4),
        },
        entry: WizardEntry {
            home: Some(EXTRANET_URL.to_string()),
            links: vec![
                Locator::text("List your property"),
                Locator::text("Add property"),
                Locator::text("Aggiungi proprietà"),
                Locator::text("Register a new property"),
                Locator::css("a[href*=\"create\"]"),
            ],
            urls: NEW_PROPERTY_URLS.iter().map(|u| u.to_string()).collect(),
            probe: css_all(&[
                "input[name=\"property_name\"]",
                "input[name=\"property_type\"]",
                "form select",
            ]),
            settle: Duration::from_secs(3),
        },
        amenity_labels: AMENITY_LABELS,
        submit: SubmitControls {
            save: vec![
                Locator::css("button[type=\"submit\"]"),
                Locator::text("Save and continue"),
                Locator::text("Salva e continua"),
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

fn steps(record: &PropertyRecord) -> Vec<WizardStep> {
    // Field values follow the bulk export schema so a filled wizard matches booking.csv
    let row = BookingRow::project(record);

    let property_type = record.identity.structure_type.map(|t| {
        FieldTarget::new(
            "property_type",
            vec![
                Locator::css(format!(
                    "input[name=\"property_type\"][value=\"{}\"]",
                    t.as_str()
                )),
                Locator::label(t.title()),
                Locator::text(t.title()),
            ],
            Some(String::new()),
            FillMode::Check,
        )
    });

    vec![
        WizardStep::new("property_type")
            .targets(property_type)
            .advance(advance()),
        WizardStep::new("details")
            .target(FieldTarget::text(
                "property_name",
                vec![
                    Locator::css("input[name=\"property_name\"]"),
                    Locator::css("input[name=\"name\"]"),
                    Locator::label("Property name"),
                ],
                row.property_name,
            ))
            .target(FieldTarget::text(
                "description",
                vec![
                    Locator::css("textarea[name=\"description\"]"),
                    Locator::css("textarea[name=\"description_it\"]"),
                    Locator::label("Description"),
                ],
                row.description_it,
            ))
            .advance(advance()),
        WizardStep::new("location")
            .target(FieldTarget::text(
                "address",
                vec![
                    Locator::css("input[name=\"address\"]"),
                    Locator::css("input[name=\"address_line1\"]"),
                    Locator::label("Street address"),
                ],
                row.address_line1,
            ))
            .target(FieldTarget::text(
                "city",
                vec![Locator::css("input[name=\"city\"]"), Locator::label("City")],
                row.city,
            ))
            .target(FieldTarget::text(
                "postcode",
                vec![
                    Locator::css("input[name=\"postcode\"]"),
                    Locator::css("input[name=\"zip\"]"),
                    Locator::label("Postcode"),
                ],
                row.postal_code,
            ))
            .target(FieldTarget::select(
                "country",
                vec![
                    Locator::css("select[name=\"country\"]"),
                    Locator::css("select[name=\"cc1\"]"),
                ],
                row.country,
            ))
            .advance(advance()),
        WizardStep::new("capacity")
            .target(FieldTarget::text(
                "max_guests",
                css_all(&["input[name=\"max_guests\"]", "input[name=\"guests\"]"]),
                row.max_guests,
            ))
            .target(FieldTarget::text(
                "bathrooms",
                css_all(&["input[name=\"bathrooms\"]"]),
                count(record.capacity.bathrooms),
            ))
            .target(FieldTarget::text(
                "size",
                css_all(&["input[name=\"size\"]", "input[name=\"room_size\"]"]),
                area(record.capacity.area_sqm),
            ))
            .advance(advance()),
        WizardStep::new("pricing")
            .target(FieldTarget::text(
                "price",
                css_all(&["input[name=\"price\"]", "input[name=\"price_per_night\"]"]),
                row.price_per_night_eur,
            ))
            .advance(advance()),
        WizardStep::new("house_rules")
            .target(FieldTarget::text(
                "check_in",
                css_all(&["input[name=\"check_in\"]", "input[name=\"checkin_from\"]"]),
                models::time(record.schedule.check_in),
            ))
            .target(FieldTarget::text(
                "check_out",
                css_all(&["input[name=\"check_out\"]", "input[name=\"checkout_until\"]"]),
                models::time(record.schedule.check_out),
            ))
            .advance(advance()),
        WizardStep::new("contact")
            .target(FieldTarget::text(
                "contact_email",
                css_all(&["input[name=\"contact_email\"]", "input[name=\"email\"]"]),
                row.contact_email,
            ))
            .target(FieldTarget::text(
                "phone",
                css_all(&["input[name=\"phone\"]", "input[type=\"tel\"]"]),
                row.contact_phone,
            ))
            .advance(advance()),
        WizardStep::new("amenities")
            .reveal(FieldTarget::click(
                "show_all_amenities",
                text_all(&["Show all facilities", "Mostra tutti"]),
            ))
            .targets(checklist_targets(&record.amenities, AMENITY_LABELS))
            .advance(advance()),
        WizardStep::new("photos").target(photos(record)).advance(advance()),
    ]
}
