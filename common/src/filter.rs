//! Catalog browsing filter

use crate::catalog::Catalog;
use crate::types::{PriceTier, WineColor, WineRecord, WineStyle};
use serde::{Deserialize, Serialize};

/// Multi-select filter. An empty list in a dimension accepts every value;
/// a wine passes when it passes every dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    #[serde(default)]
    pub colors: Vec<WineColor>,
    #[serde(default)]
    pub styles: Vec<WineStyle>,
    #[serde(default)]
    pub prices: Vec<PriceTier>,
}

impl CatalogFilter {
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.styles.is_empty() && self.prices.is_empty()
    }

    pub fn accepts(&self, wine: &WineRecord) -> bool {
        fn dimension<T: PartialEq>(selected: &[T], value: &T) -> bool {
            selected.is_empty() || selected.contains(value)
        }

        dimension(&self.colors, &wine.color)
            && dimension(&self.styles, &wine.style)
            && dimension(&self.prices, &wine.price)
    }

    /// Accepted wines in catalog order
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a WineRecord> {
        catalog.iter().filter(|w| self.accepts(w)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_accepts_all() {
        let catalog = Catalog::builtin().unwrap();
        let filter = CatalogFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&catalog).len(), catalog.len());
    }

    #[test]
    fn test_dimensions_combine() {
        let catalog = Catalog::builtin().unwrap();
        let filter = CatalogFilter {
            colors: vec![WineColor::White],
            styles: vec![WineStyle::Sparkling],
            prices: Vec::new(),
        };
        let hits = filter.apply(&catalog);
        assert!(!hits.is_empty());
        assert!(hits
            .iter()
            .all(|w| w.color == WineColor::White && w.style == WineStyle::Sparkling));
    }

    #[test]
    fn test_multi_select_within_dimension() {
        let catalog = Catalog::builtin().unwrap();
        let filter = CatalogFilter {
            prices: vec![PriceTier::Budget, PriceTier::Premium],
            ..CatalogFilter::default()
        };
        assert!(filter
            .apply(&catalog)
            .iter()
            .all(|w| w.price != PriceTier::Mid));
    }
}
