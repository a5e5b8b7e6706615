//! Dashboard aggregation helpers over the merged view.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Registration, Status};

/// Headline counters for the admin overview tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub verified: usize,
    pub pending: usize,
}

/// Count registrations by verification status.
#[must_use]
pub fn status_counts(records: &[Registration]) -> StatusCounts {
    let mut counts = StatusCounts {
        total: records.len(),
        ..StatusCounts::default()
    };

    for record in records {
        match record.status {
            Status::Verified => counts.verified += 1,
            Status::Pending => counts.pending += 1,
            Status::Canceled => {}
        }
    }

    counts
}

/// Registrations per destination, busiest first.
///
/// Destination names are normalized by dropping the `"Gunung "` prefix; ties
/// break alphabetically so the output is deterministic.
#[must_use]
pub fn destination_counts(records: &[Registration]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        let name = record
            .data
            .mountain
            .strip_prefix("Gunung ")
            .unwrap_or(&record.data.mountain)
            .to_string();
        *counts.entry(name).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{PersonalData, RegistrationId};

    fn record(id: i64, mountain: &str, status: Status) -> Registration {
        Registration {
            id: RegistrationId::from_millis(id),
            data: PersonalData {
                full_name: format!("Climber {id}"),
                whatsapp: "0812".to_string(),
                mountain: mountain.to_string(),
                package_category: "OPEN TRIP".to_string(),
                trip_package: "REGULER".to_string(),
                start_date: "2026-09-01".to_string(),
                ..PersonalData::default()
            },
            status,
            synced: false,
        }
    }

    #[test]
    fn status_counts_tallies_each_bucket() {
        let records = vec![
            record(1, "Gunung Semeru", Status::Pending),
            record(2, "Gunung Semeru", Status::Verified),
            record(3, "Gunung Prau", Status::Verified),
            record(4, "Gunung Lawu", Status::Canceled),
        ];

        let counts = status_counts(&records);
        assert_eq!(counts.total, 4);
        assert_eq!(counts.verified, 2);
        assert_eq!(counts.pending, 1);
    }

    #[test]
    fn destination_counts_normalizes_and_ranks() {
        let records = vec![
            record(1, "Gunung Semeru", Status::Pending),
            record(2, "Gunung Semeru", Status::Verified),
            record(3, "Prau", Status::Pending),
            record(4, "Gunung Lawu", Status::Pending),
        ];

        let ranked = destination_counts(&records);
        assert_eq!(
            ranked,
            vec![
                ("Semeru".to_string(), 2),
                ("Lawu".to_string(), 1),
                ("Prau".to_string(), 1),
            ]
        );
    }

    #[test]
    fn empty_input_yields_empty_aggregates() {
        assert_eq!(status_counts(&[]), StatusCounts::default());
        assert!(destination_counts(&[]).is_empty());
    }
}
