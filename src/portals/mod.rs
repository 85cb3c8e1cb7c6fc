//! Declarative descriptions of the supported listing portals.
//!
//! Each portal contributes a login flow, a way into its "add property"
//! wizard, an amenity label table, its save controls and a step table built
//! from a record. The generic sequencer does the rest.

pub mod booking;
pub mod casevacanza;
pub mod idealista;
pub mod krossbooking;
pub mod vrbo;

use crate::automation::{
    css_all, AmenityLabels, FieldTarget, LoginFlow, SubmitControls, SubmitPolicy, WizardEntry,
    WizardStep,
};
use crate::models::{self, PropertyRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Portal {
    #[value(name = "booking")]
    Booking,
    #[value(name = "casevacanza")]
    CaseVacanza,
    #[value(name = "krossbooking")]
    KrossBooking,
    #[value(name = "idealista")]
    Idealista,
    #[value(name = "vrbo", alias = "expedia")]
    Vrbo,
}

impl Portal {
    pub const ALL: [Portal; 5] = [
        Portal::Booking,
        Portal::CaseVacanza,
        Portal::KrossBooking,
        Portal::Idealista,
        Portal::Vrbo,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Portal::Booking => "booking",
            Portal::CaseVacanza => "casevacanza",
            Portal::KrossBooking => "krossbooking",
            Portal::Idealista => "idealista",
            Portal::Vrbo => "vrbo",
        }
    }

    /// Environment variables holding the account for this portal
    pub fn credential_vars(&self) -> (&'static str, &'static str) {
        match self {
            Portal::Booking => ("BK_EMAIL", "BK_PASSWORD"),
            Portal::CaseVacanza => ("CV_EMAIL", "CV_PASSWORD"),
            Portal::KrossBooking => ("KB_EMAIL", "KB_PASSWORD"),
            Portal::Idealista => ("IDEALISTA_EMAIL", "IDEALISTA_PASSWORD"),
            Portal::Vrbo => ("EXPEDIA_EMAIL", "EXPEDIA_PASSWORD"),
        }
    }

    pub fn profile(&self) -> PortalProfile {
        match self {
            Portal::Booking => booking::profile(),
            Portal::CaseVacanza => casevacanza::profile(),
            Portal::KrossBooking => krossbooking::profile(),
            Portal::Idealista => idealista::profile(),
            Portal::Vrbo => vrbo::profile(),
        }
    }
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Portal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "booking" => Ok(Portal::Booking),
            "casevacanza" => Ok(Portal::CaseVacanza),
            "krossbooking" => Ok(Portal::KrossBooking),
            "idealista" => Ok(Portal::Idealista),
            "vrbo" | "expedia" => Ok(Portal::Vrbo),
            other => Err(format!("unknown portal '{other}'")),
        }
    }
}

/// Everything the sequencer needs to drive one portal
#[derive(Debug, Clone)]
pub struct PortalProfile {
    pub portal: Portal,
    pub login: LoginFlow,
    pub entry: WizardEntry,
    pub amenity_labels: AmenityLabels,
    pub submit: SubmitControls,
    /// Reconnaissance-only portals never click their final save control
    pub allows_submit: bool,
    pub steps: fn(&PropertyRecord) -> Vec<WizardStep>,
}

impl PortalProfile {
    pub fn steps_for(&self, record: &PropertyRecord) -> Vec<WizardStep> {
        (self.steps)(record)
    }

    pub fn submit_policy(&self, requested: bool) -> SubmitPolicy {
        if requested && self.allows_submit {
            SubmitPolicy::SubmitAndVerify
        } else {
            SubmitPolicy::Withhold
        }
    }
}

/// Counts render empty when zero so the field is skipped
pub(crate) fn count(value: u32) -> String {
    if value == 0 {
        String::new()
    } else {
        value.to_string()
    }
}

pub(crate) fn area(value: f64) -> String {
    if value > 0.0 {
        format!("{}", value)
    } else {
        String::new()
    }
}

pub(crate) fn money(value: Option<Decimal>) -> Option<String> {
    value.map(models::money)
}

pub(crate) fn photos(record: &PropertyRecord) -> FieldTarget {
    FieldTarget::files(
        "photos",
        css_all(&["input[type=\"file\"][multiple]", "input[type=\"file\"]"]),
        &record.photos,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::amenity_checklist;
    use crate::models::{Amenities, Amenity};

    #[test]
    fn every_table_ticks_wifi_and_synthesized_parking_only() {
        let mut amenities = Amenities::default();
        amenities.set(Amenity::Wifi, true);
        amenities.set(Amenity::Pool, false);
        amenities.set("parcheggio_privato".parse().unwrap(), true);

        for portal in Portal::ALL {
            let profile = portal.profile();
            let entries = amenity_checklist(&amenities, profile.amenity_labels);
            let ticked: Vec<_> = entries.iter().map(|e| e.amenity).collect();
            assert!(ticked.contains(&Amenity::Wifi), "{portal}: wifi missing");
            assert!(ticked.contains(&Amenity::Parking), "{portal}: parking missing");
            assert!(!ticked.contains(&Amenity::Pool), "{portal}: pool ticked");
            assert!(entries.iter().all(|e| !e.labels.is_empty()));
        }
    }

    #[test]
    fn portal_names_parse_with_aliases() {
        assert_eq!("Booking".parse::<Portal>(), Ok(Portal::Booking));
        assert_eq!("expedia".parse::<Portal>(), Ok(Portal::Vrbo));
        assert!("airbnb".parse::<Portal>().is_err());
        assert_eq!(Portal::KrossBooking.to_string(), "krossbooking");
    }

    #[test]
    fn submission_only_where_the_portal_allows_it() {
        assert_eq!(
            Portal::CaseVacanza.profile().submit_policy(true),
            SubmitPolicy::SubmitAndVerify
        );
        assert_eq!(
            Portal::Booking.profile().submit_policy(false),
            SubmitPolicy::Withhold
        );
        assert_eq!(
            Portal::Idealista.profile().submit_policy(true),
            SubmitPolicy::Withhold
        );
        assert_eq!(Portal::Vrbo.profile().submit_policy(true), SubmitPolicy::Withhold);
    }

    #[test]
    fn every_portal_builds_named_steps_for_a_valid_record() {
        let record = crate::pipeline::parse_row(
            crate::pipeline::validate::tests::valid_row(),
            1,
            &crate::pipeline::ValidationRules::default(),
        );
        assert!(record.is_valid(), "{:?}", record.errors);

        for portal in Portal::ALL {
            let steps = portal.profile().steps_for(&record);
            assert!(!steps.is_empty());
            let names: Vec<_> = steps.iter().map(|s| s.name).collect();
            assert!(names.contains(&"amenities"), "{portal}: {names:?}");
            assert!(names.contains(&"photos"), "{portal}: {names:?}");
        }
    }
}
