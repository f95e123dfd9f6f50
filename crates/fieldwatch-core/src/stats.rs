//! Statistics over animal and human-activity sightings.
//!
//! The report is assembled from three independent store reads: the total
//! count, the per-type counts, and the newest records. Category buckets
//! are derived from the per-type counts, so they always agree with
//! `byExactType` but may disagree with `total` when writes race with the
//! request.

use std::collections::BTreeMap;
use std::str::FromStr;

use fieldwatch_types::{
    ActivityType, AnimalObservation, AnimalType, CountEntry, HumanActivityObservation,
    RecentActivity, RecentAnimal,
};
use serde::Serialize;

use crate::schema::Record;

/// Number of records shown in the `recent` feed.
pub const RECENT_LIMIT: usize = 5;

/// A named group of discriminator values.
#[derive(Debug, Clone, Copy)]
pub struct Bucket<D: 'static> {
    /// Bucket label as reported to clients.
    pub name: &'static str,
    /// Discriminator values classified into this bucket.
    pub members: &'static [D],
}

/// A record kind that reports statistics.
pub trait Sighting: Record {
    /// The discriminator vocabulary.
    type Discriminator: FromStr + PartialEq + 'static;

    /// Projection used in the `recent` feed.
    type Recent: Serialize + Send;

    /// Ordered bucket table; the first bucket listing a value wins.
    const BUCKETS: &'static [Bucket<Self::Discriminator>];

    /// Bucket for values no table entry lists.
    const CATCH_ALL: &'static str;

    /// Project a record for the `recent` feed.
    fn recent_entry(&self) -> Self::Recent;
}

/// Animal buckets.
pub const ANIMAL_BUCKETS: &[Bucket<AnimalType>] = &[
    Bucket {
        name: "Mammals",
        members: &[
            AnimalType::Deer,
            AnimalType::Fox,
            AnimalType::Rabbit,
            AnimalType::Squirrel,
            AnimalType::Bat,
            AnimalType::OtherMammal,
        ],
    },
    Bucket {
        name: "Birds",
        members: &[
            AnimalType::Songbird,
            AnimalType::BirdOfPrey,
            AnimalType::Waterfowl,
            AnimalType::WadingBird,
            AnimalType::OtherBird,
        ],
    },
    Bucket {
        name: "Reptiles & Amphibians",
        members: &[
            AnimalType::Snake,
            AnimalType::Lizard,
            AnimalType::Turtle,
            AnimalType::Frog,
            AnimalType::OtherReptileAmphibian,
        ],
    },
];

/// Human-activity buckets.
pub const ACTIVITY_BUCKETS: &[Bucket<ActivityType>] = &[
    Bucket {
        name: "Environmental Impacts",
        members: &[
            ActivityType::Fire,
            ActivityType::Deforestation,
            ActivityType::Mining,
            ActivityType::WasteAndPollution,
            ActivityType::WasteDisposal,
            ActivityType::PlasticAndPolythene,
        ],
    },
    Bucket {
        name: "Development Activities",
        members: &[ActivityType::Constructions],
    },
    Bucket {
        name: "Wildlife Related",
        members: &[ActivityType::DomesticAnimal, ActivityType::Hunting],
    },
    Bucket {
        name: "Illegal or Other Activities",
        members: &[ActivityType::IllegalBehaviour, ActivityType::Other],
    },
];

impl Sighting for AnimalObservation {
    type Discriminator = AnimalType;
    type Recent = RecentAnimal;

    const BUCKETS: &'static [Bucket<AnimalType>] = ANIMAL_BUCKETS;
    const CATCH_ALL: &'static str = "Other";

    fn recent_entry(&self) -> RecentAnimal {
        RecentAnimal {
            id: self.stamps.id,
            animal_type: self.animal_type,
            date: self.date,
            created_at: self.stamps.created_at,
        }
    }
}

impl Sighting for HumanActivityObservation {
    type Discriminator = ActivityType;
    type Recent = RecentActivity;

    const BUCKETS: &'static [Bucket<ActivityType>] = ACTIVITY_BUCKETS;
    const CATCH_ALL: &'static str = "Uncategorized";

    fn recent_entry(&self) -> RecentActivity {
        RecentActivity {
            id: self.stamps.id,
            activity_type: self.activity_type,
            date: self.date,
            created_at: self.stamps.created_at,
        }
    }
}

/// Bucket name for one exact-type label.
pub fn classify<S: Sighting>(label: &str) -> &'static str {
    let Ok(value) = label.parse::<S::Discriminator>() else {
        return S::CATCH_ALL;
    };
    S::BUCKETS
        .iter()
        .find(|bucket| bucket.members.contains(&value))
        .map_or(S::CATCH_ALL, |bucket| bucket.name)
}

/// Sort counts largest first, ties by label ascending.
pub fn sort_desc(entries: &mut [CountEntry]) {
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
}

/// Turn raw per-type counts into sorted `byExactType` entries.
///
/// Groups with a zero count are dropped.
pub fn exact_counts(groups: Vec<(String, u64)>) -> Vec<CountEntry> {
    let mut entries: Vec<CountEntry> = groups
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| CountEntry { label, count })
        .collect();
    sort_desc(&mut entries);
    entries
}

/// Fold exact-type counts into category buckets.
///
/// Only buckets with a non-zero count are emitted.
pub fn bucket_counts<S: Sighting>(exact: &[CountEntry]) -> Vec<CountEntry> {
    let mut buckets: BTreeMap<&'static str, u64> = BTreeMap::new();
    for entry in exact {
        let total = buckets.entry(classify::<S>(&entry.label)).or_insert(0);
        *total = total.saturating_add(entry.count);
    }
    let mut entries: Vec<CountEntry> = buckets
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(name, count)| CountEntry {
            label: name.to_owned(),
            count,
        })
        .collect();
    sort_desc(&mut entries);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, count: u64) -> CountEntry {
        CountEntry {
            label: label.to_owned(),
            count,
        }
    }

    #[test]
    fn tables_cover_every_vocabulary_member_once() {
        for animal in AnimalType::ALL {
            let hits = ANIMAL_BUCKETS
                .iter()
                .filter(|b| b.members.contains(animal))
                .count();
            assert_eq!(hits, 1, "{animal}");
        }
        for activity in ActivityType::ALL {
            let hits = ACTIVITY_BUCKETS
                .iter()
                .filter(|b| b.members.contains(activity))
                .count();
            assert_eq!(hits, 1, "{activity}");
        }
    }

    #[test]
    fn classify_uses_table_then_catch_all() {
        assert_eq!(classify::<AnimalObservation>("Deer"), "Mammals");
        assert_eq!(classify::<AnimalObservation>("Bird of Prey"), "Birds");
        assert_eq!(classify::<AnimalObservation>("Unicorn"), "Other");
        assert_eq!(
            classify::<HumanActivityObservation>("Hunting"),
            "Wildlife Related"
        );
        assert_eq!(
            classify::<HumanActivityObservation>("Picnic"),
            "Uncategorized"
        );
    }

    #[test]
    fn exact_counts_sort_by_count_then_label() {
        let sorted = exact_counts(vec![
            ("Fox".to_owned(), 2),
            ("Bat".to_owned(), 2),
            ("Deer".to_owned(), 5),
            ("Frog".to_owned(), 0),
        ]);
        assert_eq!(
            sorted,
            vec![entry("Deer", 5), entry("Bat", 2), entry("Fox", 2)]
        );
    }

    #[test]
    fn buckets_sum_members_and_skip_empty() {
        let exact = vec![entry("Deer", 3), entry("Fox", 1), entry("Snake", 2)];
        assert_eq!(
            bucket_counts::<AnimalObservation>(&exact),
            vec![entry("Mammals", 4), entry("Reptiles & Amphibians", 2)]
        );
    }

    #[test]
    fn activity_buckets() {
        let exact = vec![
            entry("Fire", 1),
            entry("Mining", 1),
            entry("Constructions", 3),
            entry("Other", 1),
        ];
        assert_eq!(
            bucket_counts::<HumanActivityObservation>(&exact),
            vec![
                entry("Development Activities", 3),
                entry("Environmental Impacts", 2),
                entry("Illegal or Other Activities", 1),
            ]
        );
    }
}
