use crate::domain::model::LocationRecord;
use std::collections::{HashMap, HashSet};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub interview_count: u64,
    pub percentage: f64,
}

/// 單一時間區間資料集的統計
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_interviews: u64,
    pub unique_locations: usize,
    pub total_rows: usize,
    pub categories: Vec<CategoryShare>,
}

impl Summary {
    pub fn from_records(records: &[LocationRecord]) -> Self {
        // 極端輸入下飽和在 u64::MAX，不溢位
        let total_interviews = records
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.interview_count));
        let unique_locations = records
            .iter()
            .map(|r| (r.city.as_str(), r.state.as_str()))
            .collect::<HashSet<_>>()
            .len();

        // 依首次出現順序累計，排序穩定，同數量時保留原順序
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut totals: Vec<(&str, u64)> = Vec::new();
        for record in records {
            let i = *index.entry(record.category.as_str()).or_insert_with(|| {
                totals.push((record.category.as_str(), 0));
                totals.len() - 1
            });
            totals[i].1 = totals[i].1.saturating_add(record.interview_count);
        }
        totals.sort_by(|a, b| b.1.cmp(&a.1));

        let categories = totals
            .into_iter()
            .map(|(category, count)| CategoryShare {
                category: category.to_string(),
                interview_count: count,
                percentage: if total_interviews > 0 {
                    count as f64 / total_interviews as f64 * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        Self {
            total_interviews,
            unique_locations,
            total_rows: records.len(),
            categories,
        }
    }

    pub fn render(&self, range_name: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\nSummary for {}:", range_name);
        let _ = writeln!(out, "  Unique Locations: {}", self.unique_locations);
        let _ = writeln!(out, "  Total Rows: {}", self.total_rows);
        let _ = writeln!(
            out,
            "  Total Interviews: {}",
            format_thousands(self.total_interviews)
        );
        let _ = writeln!(out, "\nBy Category:");
        for share in &self.categories {
            let _ = writeln!(
                out,
                "  {}: {} ({:.1}%)",
                share.category,
                format_thousands(share.interview_count),
                share.percentage
            );
        }
        out
    }
}

pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(city: &str, state: &str, category: &str, count: u64) -> LocationRecord {
        LocationRecord {
            city: city.to_string(),
            state: state.to_string(),
            category: category.to_string(),
            lat: 1.0,
            lon: 1.0,
            interview_count: count,
        }
    }

    #[test]
    fn test_summary_totals() {
        let records = vec![
            record("Austin", "TX", "Signature", 10),
            record("Austin", "TX", "User Generated", 30),
            record("Portland", "OR", "User Generated", 50),
            record("Portland", "ME", "Signature", 10),
        ];

        let summary = Summary::from_records(&records);

        assert_eq!(summary.total_interviews, 100);
        assert_eq!(summary.unique_locations, 3);
        assert_eq!(summary.total_rows, 4);
        assert_eq!(summary.categories.len(), 2);
        assert_eq!(summary.categories[0].category, "User Generated");
        assert_eq!(summary.categories[0].interview_count, 80);
        assert_eq!(summary.categories[0].percentage, 80.0);
        assert_eq!(summary.categories[1].category, "Signature");
        assert_eq!(summary.categories[1].percentage, 20.0);
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let records = vec![
            record("A", "X", "one", 1),
            record("B", "X", "two", 1),
            record("C", "X", "three", 1),
        ];

        let summary = Summary::from_records(&records);
        let sum: f64 = summary.categories.iter().map(|c| c.percentage).sum();

        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_yields_zero_percentages() {
        let records = vec![record("A", "X", "one", 0), record("B", "X", "two", 0)];

        let summary = Summary::from_records(&records);

        assert_eq!(summary.total_interviews, 0);
        assert!(summary.categories.iter().all(|c| c.percentage == 0.0));
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let records = vec![
            record("A", "X", "beta", 5),
            record("B", "X", "alpha", 5),
            record("C", "X", "gamma", 9),
        ];

        let summary = Summary::from_records(&records);
        let order: Vec<&str> = summary.categories.iter().map(|c| c.category.as_str()).collect();

        assert_eq!(order, vec!["gamma", "beta", "alpha"]);
    }

    #[test]
    fn test_render() {
        let records = vec![
            record("Austin", "TX", "Signature", 1500),
            record("Austin", "TX", "User Generated", 500),
        ];

        let text = Summary::from_records(&records).render("Past 12 Months");

        assert!(text.contains("Summary for Past 12 Months:"));
        assert!(text.contains("  Unique Locations: 1"));
        assert!(text.contains("  Total Rows: 2"));
        assert!(text.contains("  Total Interviews: 2,000"));
        assert!(text.contains("  Signature: 1,500 (75.0%)"));
        assert!(text.contains("  User Generated: 500 (25.0%)"));
    }

    #[test]
    fn test_huge_counts_saturate() {
        let records = vec![
            record("A", "X", "one", u64::MAX),
            record("B", "X", "one", 1),
        ];

        let summary = Summary::from_records(&records);

        assert_eq!(summary.total_interviews, u64::MAX);
        assert_eq!(summary.categories[0].interview_count, u64::MAX);
        assert_eq!(summary.categories[0].percentage, 100.0);
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }
}
