use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{BuyerProspect, ProspectStatus, ResearchResult};

/// Headline numbers over a discovered-buyer list.
///
/// Derived on demand, never stored, so they cannot drift from the list they
/// describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverySummary {
    pub total_buyers: usize,
    pub high_priority: usize,
    /// Mean opportunity score rounded to the nearest integer; an empty list
    /// reads as zero.
    pub average_opportunity_score: u32,
    pub distinct_countries: usize,
}

impl DiscoverySummary {
    pub fn from_buyers(buyers: &[BuyerProspect]) -> Self {
        let total_buyers = buyers.len();
        let high_priority = buyers
            .iter()
            .filter(|b| b.status == ProspectStatus::HighPriority)
            .count();
        let average_opportunity_score = if buyers.is_empty() {
            0
        } else {
            let sum: u32 = buyers.iter().map(|b| u32::from(b.opportunity_score)).sum();
            (f64::from(sum) / total_buyers as f64).round() as u32
        };
        let distinct_countries = buyers
            .iter()
            .map(|b| b.country.as_str())
            .collect::<HashSet<_>>()
            .len();
        Self {
            total_buyers,
            high_priority,
            average_opportunity_score,
            distinct_countries,
        }
    }
}

impl ResearchResult {
    /// Headline numbers for this result's buyer list.
    pub fn summary(&self) -> DiscoverySummary {
        DiscoverySummary::from_buyers(&self.discovered_buyers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BuyerId;

    fn buyer(id: i64, country: &str, score: u8, status: ProspectStatus) -> BuyerProspect {
        BuyerProspect {
            id: BuyerId::from(id),
            name: format!("Buyer {id}"),
            website: String::new(),
            country: country.to_string(),
            region: None,
            target_segment: "Hospital pharmacy".to_string(),
            key_contacts: vec![],
            reason_for_recommendation: String::new(),
            opportunity_score: score,
            status,
        }
    }

    #[test]
    fn aggregates_totals_priorities_scores_and_countries() {
        let buyers = vec![
            buyer(1, "Germany", 88, ProspectStatus::HighPriority),
            buyer(2, "Germany", 71, ProspectStatus::MediumPriority),
            buyer(3, "France", 64, ProspectStatus::HighPriority),
        ];
        let summary = DiscoverySummary::from_buyers(&buyers);
        assert_eq!(summary.total_buyers, 3);
        assert_eq!(summary.high_priority, 2);
        // (88 + 71 + 64) / 3 = 74.33
        assert_eq!(summary.average_opportunity_score, 74);
        assert_eq!(summary.distinct_countries, 2);
    }

    #[test]
    fn average_rounds_to_nearest_integer() {
        let buyers = vec![
            buyer(1, "Germany", 85, ProspectStatus::LowPriority),
            buyer(2, "France", 90, ProspectStatus::LowPriority),
        ];
        let summary = DiscoverySummary::from_buyers(&buyers);
        assert_eq!(summary.average_opportunity_score, 88);
    }

    #[test]
    fn cohort_average_and_country_count() {
        let buyers = vec![
            buyer(1, "US", 92, ProspectStatus::HighPriority),
            buyer(2, "US", 88, ProspectStatus::HighPriority),
            buyer(3, "CA", 85, ProspectStatus::MediumPriority),
            buyer(4, "US", 82, ProspectStatus::LowPriority),
            buyer(5, "CA", 78, ProspectStatus::LowPriority),
        ];
        let summary = DiscoverySummary::from_buyers(&buyers);
        assert_eq!(summary.average_opportunity_score, 85);
        assert_eq!(summary.distinct_countries, 2);
    }

    #[test]
    fn empty_list_reads_as_all_zero() {
        let summary = DiscoverySummary::from_buyers(&[]);
        assert_eq!(summary.total_buyers, 0);
        assert_eq!(summary.high_priority, 0);
        assert_eq!(summary.average_opportunity_score, 0);
        assert_eq!(summary.distinct_countries, 0);
    }

    #[test]
    fn unknown_statuses_do_not_count_as_high_priority() {
        let buyers = vec![
            buyer(1, "Spain", 50, ProspectStatus::Unknown),
            buyer(2, "Spain", 50, ProspectStatus::HighPriority),
        ];
        assert_eq!(DiscoverySummary::from_buyers(&buyers).high_priority, 1);
    }
}
