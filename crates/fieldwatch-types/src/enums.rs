//! Closed vocabularies used by observation records.
//!
//! Every enumeration here serializes to the exact display string the mobile
//! client sends (`"Bird of Prey"`, `"Waste & Pollution"`, ...). Values
//! outside a vocabulary are rejected at the validation boundary, so a
//! stored record can only ever carry one of these variants.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Error returned when a string is not a member of a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{value:?} is not a valid {vocabulary}")]
pub struct UnknownVariant {
    /// Name of the vocabulary that rejected the value.
    pub vocabulary: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Generates a closed vocabulary enum whose variants map 1:1 to wire strings.
macro_rules! define_vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every member of the vocabulary, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Human-readable name of the vocabulary, used in error messages.
            pub const LABEL: &'static str = $label;

            /// The wire string for this variant.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl core::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(UnknownVariant {
                        vocabulary: $label,
                        value: s.to_owned(),
                    }),
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Record kinds
// ---------------------------------------------------------------------------

/// The four independent record families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum RecordKind {
    /// Plant sightings.
    Plant,
    /// Animal sightings.
    Animal,
    /// Human-impact activity reports.
    HumanActivity,
    /// Photo-usage consent submissions.
    PhotoConsent,
}

impl RecordKind {
    /// Message used when a lookup by identifier finds nothing.
    pub const fn not_found_message(self) -> &'static str {
        match self {
            Self::Plant => "Plant not found",
            Self::Animal => "Animal observation not found",
            Self::HumanActivity => "Human activity not found",
            Self::PhotoConsent => "Photo information not found",
        }
    }

    /// Message returned alongside a freshly created record.
    pub const fn created_message(self) -> &'static str {
        match self {
            Self::Plant => "Plant observation created successfully",
            Self::Animal => "Animal observation created successfully",
            Self::HumanActivity => "Human activity observation created successfully",
            Self::PhotoConsent => "Photo information submitted successfully!",
        }
    }

    /// Short lowercase name for log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plant => "plant",
            Self::Animal => "animal",
            Self::HumanActivity => "human_activity",
            Self::PhotoConsent => "photo_consent",
        }
    }
}

define_vocabulary! {
    /// The constant `category` label carried by each observation record.
    Category ("category") {
        /// Carried by every plant observation.
        Plant => "Plant",
        /// Carried by every animal observation.
        Animal => "Animal",
        /// Carried by every human-activity observation.
        HumanActivity => "Human Activity",
    }
}

// ---------------------------------------------------------------------------
// Shared observation fields
// ---------------------------------------------------------------------------

define_vocabulary! {
    /// Coarse time of day at which a sighting was made.
    TimeOfDay ("time of day") {
        /// Early in the day.
        Morning => "Morning",
        /// Midday.
        Noon => "Noon",
        /// Late afternoon into dusk.
        Evening => "Evening",
        /// After dark.
        Night => "Night",
    }
}

define_vocabulary! {
    /// Moderation status of a submitted sighting.
    ///
    /// Records start as [`ObservationStatus::Pending`]. Nothing in the
    /// backend transitions the status; clients may overwrite it through a
    /// regular update.
    #[derive(Default)]
    ObservationStatus ("status") {
        /// Awaiting review (default).
        #[default]
        Pending => "pending",
        /// Accepted by a reviewer.
        Approved => "approved",
        /// Rejected by a reviewer.
        Rejected => "rejected",
    }
}

define_vocabulary! {
    /// Whether the submitter allows their photo to be reused.
    #[derive(Default)]
    PhotoPermission ("photo permission") {
        /// Reuse allowed (default).
        #[default]
        Yes => "Yes",
        /// Reuse not allowed.
        No => "No",
    }
}

// ---------------------------------------------------------------------------
// Animal types
// ---------------------------------------------------------------------------

define_vocabulary! {
    /// Kind of animal sighted.
    AnimalType ("animal type") {
        // --- Mammals ---
        /// Deer.
        Deer => "Deer",
        /// Fox.
        Fox => "Fox",
        /// Rabbit or hare.
        Rabbit => "Rabbit",
        /// Squirrel.
        Squirrel => "Squirrel",
        /// Bat.
        Bat => "Bat",
        /// Any other mammal.
        OtherMammal => "Other Mammal",

        // --- Birds ---
        /// Small perching bird.
        Songbird => "Songbird",
        /// Raptor.
        BirdOfPrey => "Bird of Prey",
        /// Ducks, geese, swans.
        Waterfowl => "Waterfowl",
        /// Herons, egrets, storks.
        WadingBird => "Wading Bird",
        /// Any other bird.
        OtherBird => "Other Bird",

        // --- Reptiles & amphibians ---
        /// Snake.
        Snake => "Snake",
        /// Lizard.
        Lizard => "Lizard",
        /// Turtle or tortoise.
        Turtle => "Turtle",
        /// Frog or toad.
        Frog => "Frog",
        /// Any other reptile or amphibian.
        OtherReptileAmphibian => "Other Reptile/Amphibian",
    }
}

// ---------------------------------------------------------------------------
// Human activity types
// ---------------------------------------------------------------------------

define_vocabulary! {
    /// Kind of human activity reported.
    ActivityType ("activity type") {
        /// Fire or burning.
        Fire => "Fire",
        /// Tree clearing.
        Deforestation => "Deforestation",
        /// Quarrying or mining.
        Mining => "Mining",
        /// General waste and pollution.
        WasteAndPollution => "Waste & Pollution",
        /// Dumped waste.
        WasteDisposal => "Waste disposal",
        /// Plastic and polythene litter.
        PlasticAndPolythene => "Plastic and polythene",
        /// Building work.
        Constructions => "Constructions",
        /// Domestic animals in the habitat.
        DomesticAnimal => "Domestic Animal",
        /// Hunting or trapping.
        Hunting => "Hunting",
        /// Other illegal behaviour.
        IllegalBehaviour => "Illegal behaviour",
        /// Anything else.
        Other => "Other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_sizes() {
        assert_eq!(AnimalType::ALL.len(), 16);
        assert_eq!(ActivityType::ALL.len(), 11);
        assert_eq!(TimeOfDay::ALL.len(), 4);
        assert_eq!(ObservationStatus::ALL.len(), 3);
        assert_eq!(PhotoPermission::ALL.len(), 2);
    }

    #[test]
    fn wire_strings_roundtrip_through_from_str() {
        for animal in AnimalType::ALL {
            assert_eq!(animal.as_str().parse::<AnimalType>().ok(), Some(*animal));
        }
        for activity in ActivityType::ALL {
            assert_eq!(
                activity.as_str().parse::<ActivityType>().ok(),
                Some(*activity)
            );
        }
    }

    #[test]
    fn serde_uses_wire_strings() {
        let json = serde_json::to_string(&AnimalType::BirdOfPrey).ok();
        assert_eq!(json.as_deref(), Some("\"Bird of Prey\""));

        let parsed: Result<ActivityType, _> = serde_json::from_str("\"Waste & Pollution\"");
        assert_eq!(parsed.ok(), Some(ActivityType::WasteAndPollution));

        let category = serde_json::to_string(&Category::HumanActivity).ok();
        assert_eq!(category.as_deref(), Some("\"Human Activity\""));
    }

    #[test]
    fn membership_is_case_sensitive() {
        assert!("deer".parse::<AnimalType>().is_err());
        assert!("morning".parse::<TimeOfDay>().is_err());
        assert!("Pending".parse::<ObservationStatus>().is_err());
    }

    #[test]
    fn unknown_variant_names_vocabulary() {
        let err = "Dragon".parse::<AnimalType>().err();
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("\"Dragon\" is not a valid animal type")
        );
    }

    #[test]
    fn defaults() {
        assert_eq!(ObservationStatus::default(), ObservationStatus::Pending);
        assert_eq!(PhotoPermission::default(), PhotoPermission::Yes);
    }
}
