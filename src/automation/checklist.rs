use super::locator::Locator;
use super::resolver::FieldTarget;
use crate::models::{Amenities, Amenity};

/// Portal label table: each amenity with its alternative checkbox labels, preferred first
pub type AmenityLabels = &'static [(Amenity, &'static [&'static str])];

/// One amenity to tick on a portal
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistEntry {
    pub amenity: Amenity,
    pub labels: Vec<&'static str>,
}

impl ChecklistEntry {
    /// Label matches for every alternative, then visible-text matches
    pub fn target(&self) -> FieldTarget {
        let candidates = self
            .labels
            .iter()
            .map(|l| Locator::label(*l))
            .chain(self.labels.iter().map(|l| Locator::text(*l)))
            .collect();
        FieldTarget::check(format!("amenity:{}", self.amenity.key()), candidates)
    }
}

/// Renders the amenity map through a portal table.
///
/// Only present amenities produce entries; parking is present through its
/// flag or a mention in the free-text field.
pub fn amenity_checklist(amenities: &Amenities, table: AmenityLabels) -> Vec<ChecklistEntry> {
    table
        .iter()
        .filter(|(amenity, _)| amenities.is_present(*amenity))
        .map(|(amenity, labels)| ChecklistEntry {
            amenity: *amenity,
            labels: labels.to_vec(),
        })
        .collect()
}

/// Check targets for the whole checklist
pub fn checklist_targets(amenities: &Amenities, table: AmenityLabels) -> Vec<FieldTarget> {
    amenity_checklist(amenities, table)
        .iter()
        .map(ChecklistEntry::target)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: AmenityLabels = &[
        (Amenity::Wifi, &["Wi-Fi", "WiFi"]),
        (Amenity::Pool, &["Pool"]),
        (Amenity::Parking, &["Parking"]),
    ];

    #[test]
    fn parking_is_synthesized_from_free_text() {
        let mut amenities = Amenities::default();
        amenities.set(Amenity::Wifi, true);
        amenities.other = Some("Parcheggio in cortile".to_string());

        let entries = amenity_checklist(&amenities, TABLE);
        let keys: Vec<_> = entries.iter().map(|e| e.amenity).collect();
        assert_eq!(keys, vec![Amenity::Wifi, Amenity::Parking]);
    }

    #[test]
    fn target_tries_labels_before_texts() {
        let entry = ChecklistEntry {
            amenity: Amenity::Wifi,
            labels: vec!["Wi-Fi", "WiFi"],
        };
        let target = entry.target();
        assert_eq!(target.name, "amenity:wifi");
        assert_eq!(
            target.candidates,
            vec![
                Locator::label("Wi-Fi"),
                Locator::label("WiFi"),
                Locator::text("Wi-Fi"),
                Locator::text("WiFi"),
            ]
        );
    }
}
