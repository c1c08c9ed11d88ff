// src/analysis/model.rs
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One period of the revenue/expense time series. The service sends these
/// already sorted along the time axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    #[serde(deserialize_with = "date_label")]
    pub date: String,
    pub revenue: f64,
    pub expense: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DateLabel {
    Text(String),
    Whole(i64),
    Number(f64),
}

// A numeric date column (e.g. `202401`) arrives as a JSON number.
fn date_label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match DateLabel::deserialize(deserializer)? {
        DateLabel::Text(text) => text,
        DateLabel::Whole(value) => value.to_string(),
        DateLabel::Number(value) => value.to_string(),
    })
}

/// The service compares `industry` against either a label ("Above industry
/// average") or a plain number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Benchmark {
    Label(String),
    Value(f64),
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Benchmark::Label(label) => f.write_str(label),
            Benchmark::Value(value) => write!(f, "{}", value),
        }
    }
}

/// Expense totals keyed by category, kept in the order the service sent them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseCategories(Vec<(String, f64)>);

impl ExpenseCategories {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Inserts or updates a category. An existing name keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, amount: f64) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = amount,
            None => self.0.push((name, amount)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, amount)| (name.as_str(), *amount))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ExpenseCategories {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut categories = ExpenseCategories::new();
        for (name, amount) in iter {
            categories.insert(name, amount);
        }
        categories
    }
}

impl Serialize for ExpenseCategories {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, amount) in &self.0 {
            map.serialize_entry(name, amount)?;
        }
        map.end()
    }
}

struct CategoriesVisitor;

impl<'de> Visitor<'de> for CategoriesVisitor {
    type Value = ExpenseCategories;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of expense category names to amounts")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut categories = ExpenseCategories::new();
        while let Some((name, amount)) = access.next_entry::<String, f64>()? {
            categories.insert(name, amount);
        }
        Ok(categories)
    }
}

impl<'de> Deserialize<'de> for ExpenseCategories {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CategoriesVisitor)
    }
}

/// The structured reply of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub revenue: f64,
    pub expense: f64,
    pub profit: f64,
    pub health_score: i32,
    pub credit_score: i32,
    pub forecast: f64,
    pub industry: String,
    pub benchmark: Benchmark,
    pub risk_level: String,
    pub chart_data: Vec<ChartPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_categories: Option<ExpenseCategories>,
    pub ai_insights: String,

    // Reported by the service alongside the core metrics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub risks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receivable: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payable: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gst_collected: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gst_paid: Option<f64>,
}
