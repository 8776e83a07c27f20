//! Parking premise models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 当前支持预订的城市
pub const SUPPORTED_CITIES: [&str; 2] = ["Ahmedabad", "Vadodara"];

/// Parking premise as served by `/premises/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Premise {
    pub id: i64,
    pub name: String,
    pub location: String,
    /// 价格文本，例如 "₹150/hr"
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub available: i64,
    #[serde(default)]
    pub total: i64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl Premise {
    /// 根据地址推断城市
    pub fn city(&self) -> &'static str {
        let location = self.location.to_lowercase();
        if location.contains("ahmedabad") {
            "Ahmedabad"
        } else if location.contains("vadodara") {
            "Vadodara"
        } else {
            "Other"
        }
    }

    /// 名称、地址或任一设施包含搜索词（不区分大小写）
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.location.to_lowercase().contains(&term)
            || self
                .features
                .iter()
                .any(|feature| feature.to_lowercase().contains(&term))
    }

    pub fn is_full(&self) -> bool {
        self.available <= 0
    }

    /// 列表展示：车场字段加上城市和满位标记
    pub fn listing(&self) -> PremiseListing<'_> {
        PremiseListing {
            premise: self,
            city: self.city(),
            full: self.is_full(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PremiseListing<'a> {
    #[serde(flatten)]
    pub premise: &'a Premise,
    pub city: &'static str,
    pub full: bool,
}

/// 按城市分组，只保留支持的城市
pub fn group_by_city(premises: Vec<Premise>) -> BTreeMap<String, Vec<Premise>> {
    let mut grouped: BTreeMap<String, Vec<Premise>> = BTreeMap::new();
    for premise in premises {
        let city = premise.city();
        if SUPPORTED_CITIES.contains(&city) {
            grouped.entry(city.to_string()).or_default().push(premise);
        }
    }
    grouped
}

/// 按城市和搜索词过滤
pub fn filter_premises<'a>(
    grouped: &'a BTreeMap<String, Vec<Premise>>,
    city: Option<&str>,
    search: &str,
) -> Vec<&'a Premise> {
    let candidates: Vec<&Premise> = match city {
        Some(city) => grouped.get(city).map(|p| p.iter().collect()).unwrap_or_default(),
        None => grouped.values().flatten().collect(),
    };

    candidates
        .into_iter()
        .filter(|premise| premise.matches(search))
        .collect()
}
