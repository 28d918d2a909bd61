//! Component D: package-organization style detection (spec §4.D).

use crate::graph::TypeNode;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum PackageOrganizationStyle {
    Hexagonal,
    ByLayer,
    ByFeature,
    Flat,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum StyleConfidence {
    Explicit,
    High,
    Medium,
    Low,
}

const HEXAGONAL_MARKERS: &[&str] = &[
    ".ports.in.",
    ".ports.out.",
    ".adapter.",
    ".adapters.",
    ".driving.",
    ".driven.",
    ".primary.",
    ".secondary.",
    ".hexagonal.",
];

const BY_LAYER_MARKERS: &[&str] = &[
    ".controller.",
    ".service.",
    ".repository.",
    ".dao.",
    ".web.",
    ".persistence.",
];

pub struct StyleResult {
    pub style: PackageOrganizationStyle,
    pub confidence: StyleConfidence,
    pub pattern_matches: BTreeMap<String, u32>,
}

pub struct StyleDetector;

impl StyleDetector {
    pub fn detect(types: &[&TypeNode], base_package: &str) -> StyleResult {
        let mut pattern_matches: BTreeMap<String, u32> = BTreeMap::new();

        let mut hexagonal = 0u32;
        let mut by_layer = 0u32;
        let mut flat = 0u32;

        for t in types {
            let bounded_pkg = format!(".{}.", t.package);
            for marker in HEXAGONAL_MARKERS {
                if bounded_pkg.contains(marker) {
                    hexagonal += 1;
                    *pattern_matches.entry(marker.to_string()).or_insert(0) += 1;
                }
            }
            for marker in BY_LAYER_MARKERS {
                if bounded_pkg.contains(marker) {
                    by_layer += 1;
                    *pattern_matches.entry(marker.to_string()).or_insert(0) += 1;
                }
            }
            if t.package == base_package {
                flat += 1;
            }
        }
        if flat != types.len() as u32 {
            flat = 0;
        }
        if flat > 0 {
            pattern_matches.insert("<flat>".to_string(), flat);
        }

        let by_feature = Self::detect_by_feature(types, base_package, &mut pattern_matches);

        let counts = [
            (PackageOrganizationStyle::Hexagonal, hexagonal),
            (PackageOrganizationStyle::ByFeature, by_feature),
            (PackageOrganizationStyle::ByLayer, by_layer),
            (PackageOrganizationStyle::Flat, flat),
        ];

        // `Iterator::max_by_key` keeps the *last* maximum on a tie, but the
        // fixed precedence order (HEXAGONAL > BY_FEATURE > BY_LAYER > FLAT)
        // requires the *first*. Fold manually instead.
        let (mut dominant_style, mut dominant_count) = counts[0];
        for (style, count) in counts.into_iter().skip(1) {
            if count > dominant_count {
                dominant_style = style;
                dominant_count = count;
            }
        }

        if dominant_count == 0 {
            return StyleResult {
                style: PackageOrganizationStyle::Unknown,
                confidence: StyleConfidence::Low,
                pattern_matches,
            };
        }

        let second_highest = counts
            .iter()
            .filter(|(style, _)| *style != dominant_style)
            .map(|(_, count)| *count)
            .max()
            .unwrap_or(0);

        let confidence = if second_highest == 0 || dominant_count as f64 >= second_highest as f64 * 3.0 {
            StyleConfidence::Explicit
        } else if dominant_count as f64 >= second_highest as f64 * 2.0 {
            StyleConfidence::High
        } else if dominant_count as f64 >= second_highest as f64 * 1.3 {
            StyleConfidence::Medium
        } else {
            StyleConfidence::Low
        };

        StyleResult {
            style: dominant_style,
            confidence,
            pattern_matches,
        }
    }

    /// A "feature" is the first package segment below `base_package`. It
    /// counts toward BY_FEATURE when it is repeated by at least two types
    /// and owns its own `.domain.` or `.api.` subtree.
    fn detect_by_feature(
        types: &[&TypeNode],
        base_package: &str,
        pattern_matches: &mut BTreeMap<String, u32>,
    ) -> u32 {
        let prefix = format!("{}.", base_package);
        let mut per_feature: BTreeMap<String, Vec<&TypeNode>> = BTreeMap::new();
        for t in types {
            if let Some(rest) = t.package.strip_prefix(&prefix) {
                if let Some(feature) = rest.split('.').next() {
                    per_feature.entry(feature.to_string()).or_default().push(t);
                }
            }
        }

        let mut total = 0u32;
        for (feature, members) in per_feature {
            if members.len() < 2 {
                continue;
            }
            let has_domain_or_api_subtree = members.iter().any(|t| {
                let bounded = format!(".{}.", t.package);
                bounded.contains(".domain.") || bounded.contains(".api.")
            });
            if has_domain_or_api_subtree {
                total += members.len() as u32;
                pattern_matches.insert(format!("<feature:{feature}>"), members.len() as u32);
            }
        }
        total
    }
}
