//! FILENAME: core/dashboard-engine/src/definition.rs
//! Dashboard Definition - The request configuration.
//!
//! This module contains all the types needed to DESCRIBE a dashboard pass.
//! These structures are designed to be:
//! - Serializable (sent by the presentation layer)
//! - Hashable (a request is the recompute cache key)
//! - Immutable snapshots of user intent

use chrono::NaiveDate;
use engine::{Dataset, Dimension, EngineError, FilterSelection, KpiKind, TimeBucket};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Number of products in the ranking chart when the caller does not say.
pub const DEFAULT_TOP_N: usize = 10;

// ============================================================================
// DIMENSION CHAIN
// ============================================================================

/// One dropdown in the cascade: its dimension and the dimension whose
/// selection narrows its options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainLink {
    pub dimension: Dimension,
    pub depends_on: Option<Dimension>,
}

impl ChainLink {
    pub fn root(dimension: Dimension) -> Self {
        ChainLink {
            dimension,
            depends_on: None,
        }
    }

    pub fn dependent(dimension: Dimension, depends_on: Dimension) -> Self {
        ChainLink {
            dimension,
            depends_on: Some(depends_on),
        }
    }
}

/// Ordered list of `(dimension, dependsOn)` links.
///
/// Invariants, checked by `new`:
/// - each dimension appears at most once
/// - a link only depends on a dimension that appears earlier in the chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DimensionChain {
    links: SmallVec<[ChainLink; 5]>,
}

impl DimensionChain {
    pub fn new(links: impl IntoIterator<Item = ChainLink>) -> Result<Self, EngineError> {
        let links: SmallVec<[ChainLink; 5]> = links.into_iter().collect();

        for (i, link) in links.iter().enumerate() {
            let earlier = &links[..i];
            if earlier.iter().any(|l| l.dimension == link.dimension) {
                return Err(EngineError::InvalidChain(format!(
                    "{} appears more than once",
                    link.dimension
                )));
            }
            if let Some(parent) = link.depends_on {
                if !earlier.iter().any(|l| l.dimension == parent) {
                    return Err(EngineError::InvalidChain(format!(
                        "{} depends on {}, which does not precede it",
                        link.dimension, parent
                    )));
                }
            }
        }

        Ok(DimensionChain { links })
    }

    /// Strictly linear chain: every dimension depends on its predecessor.
    pub fn linear(order: &[Dimension]) -> Result<Self, EngineError> {
        let links = order.iter().enumerate().map(|(i, &dimension)| ChainLink {
            dimension,
            depends_on: i.checked_sub(1).map(|p| order[p]),
        });
        Self::new(links)
    }

    /// Region, State, City, Category, Sub-Category, each narrowed by the
    /// dimension before it.
    pub fn cascade() -> Self {
        DimensionChain {
            links: SmallVec::from_buf([
                ChainLink::root(Dimension::Region),
                ChainLink::dependent(Dimension::State, Dimension::Region),
                ChainLink::dependent(Dimension::City, Dimension::State),
                ChainLink::dependent(Dimension::Category, Dimension::City),
                ChainLink::dependent(Dimension::SubCategory, Dimension::Category),
            ]),
        }
    }

    /// Geography and product as two separate trees: State narrows by Region,
    /// City by State, Sub-Category by Category. Category itself is a root.
    pub fn split() -> Self {
        DimensionChain {
            links: SmallVec::from_buf([
                ChainLink::root(Dimension::Region),
                ChainLink::dependent(Dimension::State, Dimension::Region),
                ChainLink::dependent(Dimension::City, Dimension::State),
                ChainLink::root(Dimension::Category),
                ChainLink::dependent(Dimension::SubCategory, Dimension::Category),
            ]),
        }
    }

    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl Default for DimensionChain {
    fn default() -> Self {
        Self::cascade()
    }
}

// ============================================================================
// RANKING METRIC
// ============================================================================

/// Metric used to rank products (and plotted on both charts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RankingMetric {
    #[default]
    Sales,
    Quantity,
    Profit,
    MarginRate,
}

impl RankingMetric {
    pub fn from_name(name: &str) -> Option<RankingMetric> {
        match name.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "sales" => Some(RankingMetric::Sales),
            "quantity" => Some(RankingMetric::Quantity),
            "profit" => Some(RankingMetric::Profit),
            "marginrate" | "margin" => Some(RankingMetric::MarginRate),
            _ => None,
        }
    }

    /// Display format for values of this metric.
    pub fn kpi_kind(self) -> KpiKind {
        match self {
            RankingMetric::Sales | RankingMetric::Profit => KpiKind::Currency,
            RankingMetric::Quantity => KpiKind::Count,
            RankingMetric::MarginRate => KpiKind::Percentage,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RankingMetric::Sales => "Sales",
            RankingMetric::Quantity => "Quantity",
            RankingMetric::Profit => "Profit",
            RankingMetric::MarginRate => "Margin Rate",
        }
    }
}

// ============================================================================
// REQUEST
// ============================================================================

/// Everything one recompute pass depends on.
///
/// The dates are kept raw so a reversed range can be reported by the
/// pipeline instead of being impossible to express.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRequest {
    pub selection: FilterSelection,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub bucket: TimeBucket,
    pub metric: RankingMetric,
    pub top_n: usize,
}

impl DashboardRequest {
    /// Initial state of the dashboard: nothing selected, the full date span,
    /// monthly trend, ranked by sales.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        let (from, to) = dataset.date_span();
        DashboardRequest {
            selection: FilterSelection::new(),
            from,
            to,
            bucket: TimeBucket::default(),
            metric: RankingMetric::default(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_chain_is_valid() {
        let chain = DimensionChain::split();
        assert_eq!(DimensionChain::new(chain.links().iter().copied()).unwrap(), chain);
        assert_eq!(chain.len(), 5);
        assert_eq!(chain.links()[3].depends_on, None);
    }

    #[test]
    fn test_linear_chain() {
        let chain = DimensionChain::linear(&Dimension::ALL).unwrap();
        assert_eq!(chain.links()[0], ChainLink::root(Dimension::Region));
        assert_eq!(
            chain.links()[3],
            ChainLink::dependent(Dimension::Category, Dimension::City)
        );
    }

    #[test]
    fn test_default_chain_is_linear() {
        let chain = DimensionChain::default();
        assert_eq!(chain, DimensionChain::linear(&Dimension::ALL).unwrap());
        assert_eq!(chain.links()[3].depends_on, Some(Dimension::City));
    }

    #[test]
    fn test_chain_rejects_forward_dependency() {
        let err = DimensionChain::new([
            ChainLink::dependent(Dimension::State, Dimension::Region),
            ChainLink::root(Dimension::Region),
        ])
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidChain(_)));
    }

    #[test]
    fn test_chain_rejects_duplicates() {
        let err = DimensionChain::linear(&[Dimension::Region, Dimension::Region]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidChain(_)));
    }

    #[test]
    fn test_metric_names() {
        assert_eq!(RankingMetric::from_name("Margin Rate"), Some(RankingMetric::MarginRate));
        assert_eq!(RankingMetric::from_name("margin_rate"), Some(RankingMetric::MarginRate));
        assert_eq!(RankingMetric::from_name("QUANTITY"), Some(RankingMetric::Quantity));
        assert_eq!(RankingMetric::from_name("orders"), None);
        assert_eq!(RankingMetric::MarginRate.kpi_kind(), KpiKind::Percentage);
    }
}
