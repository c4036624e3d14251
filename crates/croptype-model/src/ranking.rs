//! Probability ranking over every known crop.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCrop {
    pub crop: String,
    pub probability: f64,
}

/// Crops ordered by descending probability.
///
/// Ties keep the classifier's native class order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ranking {
    entries: Vec<RankedCrop>,
}

impl Ranking {
    /// Rank `(crop, probability)` pairs given in native class order.
    pub fn new(pairs: impl IntoIterator<Item = (String, f64)>) -> Self {
        let mut entries: Vec<RankedCrop> = pairs
            .into_iter()
            .map(|(crop, probability)| RankedCrop { crop, probability })
            .collect();
        // Stable: equal probabilities stay in encounter order.
        entries.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedCrop> {
        self.entries.iter()
    }

    /// The `n` most likely crops (fewer if there are fewer classes).
    pub fn top(&self, n: usize) -> &[RankedCrop] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn first(&self) -> Option<&RankedCrop> {
        self.entries.first()
    }

    pub fn get(&self, crop: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.crop == crop)
            .map(|e| e.probability)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all probabilities (1 within rounding for a well-formed model).
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.probability).sum()
    }
}

impl<'a> IntoIterator for &'a Ranking {
    type Item = &'a RankedCrop;
    type IntoIter = std::slice::Iter<'a, RankedCrop>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, f64)]) -> Vec<(String, f64)> {
        items.iter().map(|(c, p)| (c.to_string(), *p)).collect()
    }

    #[test]
    fn sorts_descending() {
        let r = Ranking::new(pairs(&[("Maize", 0.2), ("Rice", 0.5), ("Wheat", 0.3)]));
        let order: Vec<&str> = r.iter().map(|e| e.crop.as_str()).collect();
        assert_eq!(order, vec!["Rice", "Wheat", "Maize"]);
    }

    #[test]
    fn ties_keep_encounter_order() {
        let r = Ranking::new(pairs(&[
            ("Wheat", 0.25),
            ("Maize", 0.5),
            ("Rice", 0.25),
            ("Barley", 0.0),
        ]));
        let order: Vec<&str> = r.iter().map(|e| e.crop.as_str()).collect();
        assert_eq!(order, vec!["Maize", "Wheat", "Rice", "Barley"]);
    }

    #[test]
    fn top_is_capped_by_length() {
        let r = Ranking::new(pairs(&[("Maize", 0.6), ("Rice", 0.4)]));
        assert_eq!(r.top(3).len(), 2);
        assert_eq!(r.top(1)[0].crop, "Maize");
        assert!(Ranking::default().top(3).is_empty());
    }

    #[test]
    fn lookup_and_total() {
        let r = Ranking::new(pairs(&[("Maize", 0.6), ("Rice", 0.4)]));
        assert_eq!(r.get("Rice"), Some(0.4));
        assert_eq!(r.get("Cotton"), None);
        assert!((r.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn serializes_as_ordered_list() {
        let r = Ranking::new(pairs(&[("Maize", 0.25), ("Rice", 0.75)]));
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json[0]["crop"], "Rice");
        assert_eq!(json[1]["probability"], 0.25);
    }
}
