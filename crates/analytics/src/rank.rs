//! Top-N ranking of grouped results.

use core::cmp::Ordering;

use crate::aggregate::{GroupResult, Metrics};

/// Metric a ranking sorts on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankMetric {
    #[default]
    Revenue,
    TransactionCount,
    UnitsSold,
    AverageOrderValue,
}

impl RankMetric {
    fn compare(&self, a: &Metrics, b: &Metrics) -> Ordering {
        match self {
            RankMetric::Revenue => a.revenue.cmp(&b.revenue),
            RankMetric::TransactionCount => a.transaction_count.cmp(&b.transaction_count),
            RankMetric::UnitsSold => a.units_sold.cmp(&b.units_sold),
            RankMetric::AverageOrderValue => a.average_order_value().cmp(&b.average_order_value()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    #[default]
    Descending,
}

/// How many ranked entries a caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopN(usize);

impl TopN {
    pub const DEFAULT: TopN = TopN(10);

    pub const fn new(n: usize) -> Self {
        Self(n)
    }

    /// Interpret a request parameter: absent means 10, zero or negative means
    /// nothing. There is no upper bound.
    pub fn from_param(param: Option<i64>) -> Self {
        match param {
            None => Self::DEFAULT,
            Some(n) if n <= 0 => Self(0),
            Some(n) => Self(usize::try_from(n).unwrap_or(usize::MAX)),
        }
    }

    pub const fn get(&self) -> usize {
        self.0
    }
}

impl Default for TopN {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Stable sort of `groups` by `metric`, truncated to `top` entries.
///
/// Ties keep their incoming relative order.
pub fn rank(
    mut groups: Vec<GroupResult>,
    metric: RankMetric,
    direction: Direction,
    top: TopN,
) -> Vec<GroupResult> {
    groups.sort_by(|a, b| {
        let ord = metric.compare(&a.metrics, &b.metrics);
        match direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    });
    groups.truncate(top.get());
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate, Dimension, GroupKey};
    use crate::fixtures::{dec, ymd_hms, SaleBuilder};
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn customers(amounts: &[(&str, &str)]) -> Vec<GroupResult> {
        let at = ymd_hms(2024, 5, 1, 10, 0, 0);
        let records: Vec<_> = amounts
            .iter()
            .map(|(code, amount)| SaleBuilder::new(code, amount, at).build())
            .collect();
        aggregate(&records, Dimension::CustomerCode)
    }

    fn codes(groups: &[GroupResult]) -> Vec<String> {
        groups
            .iter()
            .map(|g| match &g.key {
                GroupKey::Customer(code) => code.clone(),
                other => panic!("unexpected key {other:?}"),
            })
            .collect()
    }

    #[test]
    fn ranks_descending_by_revenue_and_truncates() {
        let groups = customers(&[("C1", "5.00"), ("C2", "50.00"), ("C3", "20.00"), ("C2", "1.00")]);
        let ranked = rank(groups, RankMetric::Revenue, Direction::Descending, TopN::new(2));
        assert_eq!(codes(&ranked), vec!["C2", "C3"]);
        assert_eq!(ranked[0].metrics.revenue, dec("51.00"));
    }

    #[test]
    fn ascending_direction_reverses_order() {
        let groups = customers(&[("C1", "5.00"), ("C2", "50.00"), ("C3", "20.00")]);
        let ranked = rank(groups, RankMetric::Revenue, Direction::Ascending, TopN::DEFAULT);
        assert_eq!(codes(&ranked), vec!["C1", "C3", "C2"]);
    }

    #[test]
    fn ties_keep_group_order_and_both_appear() {
        let groups = customers(&[("C7", "30.00"), ("C8", "30.00"), ("C9", "1.00")]);
        let ranked = rank(groups, RankMetric::Revenue, Direction::Descending, TopN::new(2));
        assert_eq!(codes(&ranked), vec!["C7", "C8"]);
    }

    #[test]
    fn can_rank_on_count() {
        let groups = customers(&[("C1", "100.00"), ("C2", "1.00"), ("C2", "1.00")]);
        let ranked = rank(
            groups,
            RankMetric::TransactionCount,
            Direction::Descending,
            TopN::new(1),
        );
        assert_eq!(codes(&ranked), vec!["C2"]);
    }

    #[test]
    fn top_param_defaults_and_clamps() {
        assert_eq!(TopN::from_param(None).get(), 10);
        assert_eq!(TopN::from_param(Some(0)).get(), 0);
        assert_eq!(TopN::from_param(Some(-3)).get(), 0);
        assert_eq!(TopN::from_param(Some(10_000)).get(), 10_000);
    }

    proptest! {
        /// Property: rank returns at most N entries, sorted descending, all
        /// drawn from the input groups.
        #[test]
        fn rank_is_bounded_sorted_subset(
            cents in prop::collection::vec((0u32..20, 0i64..1_000_000), 0..40),
            top in 0usize..25,
        ) {
            let at = ymd_hms(2024, 5, 1, 10, 0, 0);
            let records: Vec<_> = cents
                .iter()
                .map(|(c, v)| {
                    let amount = Decimal::new(*v, 2).to_string();
                    SaleBuilder::new(&format!("C{c}"), &amount, at).build()
                })
                .collect();
            let groups = aggregate(&records, Dimension::CustomerCode);
            let ranked = rank(
                groups.clone(),
                RankMetric::Revenue,
                Direction::Descending,
                TopN::new(top),
            );

            prop_assert!(ranked.len() <= top);
            prop_assert_eq!(ranked.len(), top.min(groups.len()));
            prop_assert!(ranked.windows(2).all(|w| w[0].metrics.revenue >= w[1].metrics.revenue));
            prop_assert!(ranked.iter().all(|r| groups.contains(r)));
        }
    }
}
