// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::answers::VisualizationPurpose;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    Histogram,
    DensityPlot,
    Boxplot,
    ViolinPlot,
    RidgeLine,
    Scatter,
    ScatterWithMarginals,
    ConnectedScatter,
    TwoDimensionalDensity,
    BubblePlot,
    GroupedScatter,
    Correlogram,
    Heatmap,
    LinePlot,
    AreaPlot,
    Barplot,
    GroupedBarplot,
    StackedBarplot,
    Lollipop,
    ParallelPlot,
    Wordcloud,
    Doughnut,
    Waffle,
    Treemap,
    CircularPacking,
    Dendrogram,
    VennDiagram,
    SankeyDiagram,
    ChordDiagram,
    ArcDiagram,
    Network,
}
impl ChartKind {
    pub const ALL: [ChartKind; 31] = [
        ChartKind::Histogram,
        ChartKind::DensityPlot,
        ChartKind::Boxplot,
        ChartKind::ViolinPlot,
        ChartKind::RidgeLine,
        ChartKind::Scatter,
        ChartKind::ScatterWithMarginals,
        ChartKind::ConnectedScatter,
        ChartKind::TwoDimensionalDensity,
        ChartKind::BubblePlot,
        ChartKind::GroupedScatter,
        ChartKind::Correlogram,
        ChartKind::Heatmap,
        ChartKind::LinePlot,
        ChartKind::AreaPlot,
        ChartKind::Barplot,
        ChartKind::GroupedBarplot,
        ChartKind::StackedBarplot,
        ChartKind::Lollipop,
        ChartKind::ParallelPlot,
        ChartKind::Wordcloud,
        ChartKind::Doughnut,
        ChartKind::Waffle,
        ChartKind::Treemap,
        ChartKind::CircularPacking,
        ChartKind::Dendrogram,
        ChartKind::VennDiagram,
        ChartKind::SankeyDiagram,
        ChartKind::ChordDiagram,
        ChartKind::ArcDiagram,
        ChartKind::Network,
    ];
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Histogram => "Histogram",
            ChartKind::DensityPlot => "Density plot",
            ChartKind::Boxplot => "Boxplot",
            ChartKind::ViolinPlot => "Violin plot",
            ChartKind::RidgeLine => "Ridge line",
            ChartKind::Scatter => "Scatterplot",
            ChartKind::ScatterWithMarginals => "Scatterplot with marginal distributions",
            ChartKind::ConnectedScatter => "Connected scatterplot",
            ChartKind::TwoDimensionalDensity => "2D density plot",
            ChartKind::BubblePlot => "Bubble plot",
            ChartKind::GroupedScatter => "Grouped scatterplot",
            ChartKind::Correlogram => "Correlogram",
            ChartKind::Heatmap => "Heatmap",
            ChartKind::LinePlot => "Line plot",
            ChartKind::AreaPlot => "Area plot",
            ChartKind::Barplot => "Barplot",
            ChartKind::GroupedBarplot => "Grouped barplot",
            ChartKind::StackedBarplot => "Stacked barplot",
            ChartKind::Lollipop => "Lollipop",
            ChartKind::ParallelPlot => "Parallel coordinates plot",
            ChartKind::Wordcloud => "Wordcloud",
            ChartKind::Doughnut => "Doughnut",
            ChartKind::Waffle => "Waffle",
            ChartKind::Treemap => "Treemap",
            ChartKind::CircularPacking => "Circular packing",
            ChartKind::Dendrogram => "Dendrogram",
            ChartKind::VennDiagram => "Venn diagram",
            ChartKind::SankeyDiagram => "Sankey diagram",
            ChartKind::ChordDiagram => "Chord diagram",
            ChartKind::ArcDiagram => "Arc diagram",
            ChartKind::Network => "Network diagram",
        }
    }
}
impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartEntry {
    pub kind: ChartKind,
    pub description: String,
    pub purposes: Vec<VisualizationPurpose>,
    #[serde(default)]
    pub tags: Vec<String>,
}
impl ChartEntry {
    pub fn serves(&self, purpose: VisualizationPurpose) -> bool {
        self.purposes.contains(&purpose)
    }
    pub fn has_any_tag(&self, tags: &[&str]) -> bool {
        tags.iter().any(|tag| self.tags.iter().any(|t| t == tag))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogConfig {
    charts: Vec<ChartEntry>,
}

#[derive(Debug)]
pub struct ChartCatalog {
    entries: Vec<ChartEntry>,
    by_kind: HashMap<ChartKind, usize>,
    by_purpose: HashMap<VisualizationPurpose, Vec<usize>>,
    by_tag: HashMap<String, Vec<usize>>,
}
impl ChartCatalog {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read chart catalog file: {}",
                path.as_ref().display()
            )
        })?;
        Self::from_yaml_string(&content)
    }
    pub fn from_yaml_string(yaml_content: &str) -> Result<Self> {
        let config: CatalogConfig =
            serde_yaml::from_str(yaml_content).context("Failed to parse chart catalog YAML")?;
        let mut by_kind = HashMap::new();
        let mut by_purpose: HashMap<VisualizationPurpose, Vec<usize>> = HashMap::new();
        let mut by_tag: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, entry) in config.charts.iter().enumerate() {
            if by_kind.insert(entry.kind, idx).is_some() {
                anyhow::bail!("Duplicate chart entry found: {}", entry.kind);
            }
            for purpose in &entry.purposes {
                by_purpose.entry(*purpose).or_default().push(idx);
            }
            for tag in &entry.tags {
                by_tag.entry(tag.clone()).or_default().push(idx);
            }
        }
        tracing::debug!(charts = config.charts.len(), "chart catalog loaded");
        Ok(ChartCatalog {
            entries: config.charts,
            by_kind,
            by_purpose,
            by_tag,
        })
    }
    pub fn entries(&self) -> &[ChartEntry] {
        &self.entries
    }
    pub fn get(&self, kind: ChartKind) -> Option<&ChartEntry> {
        self.by_kind.get(&kind).map(|&idx| &self.entries[idx])
    }
    pub fn charts_for_purpose(&self, purpose: VisualizationPurpose) -> Vec<&ChartEntry> {
        self.by_purpose
            .get(&purpose)
            .map(|indices| indices.iter().map(|&idx| &self.entries[idx]).collect())
            .unwrap_or_default()
    }
    pub fn charts_with_tag(&self, tag: &str) -> Vec<&ChartEntry> {
        self.by_tag
            .get(tag)
            .map(|indices| indices.iter().map(|&idx| &self.entries[idx]).collect())
            .unwrap_or_default()
    }
    pub fn search(&self, query: &str) -> Vec<&ChartEntry> {
        let query_lower = query.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| {
                entry.kind.label().to_lowercase().contains(&query_lower)
                    || entry.description.to_lowercase().contains(&query_lower)
                    || entry
                        .tags
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(&query_lower))
            })
            .collect()
    }
    /// Structural checks over the loaded data; a catalog that fails here
    /// would let the recommender hand out a kind it cannot describe.
    pub fn validate(&self) -> Result<(), String> {
        if self.entries.is_empty() {
            return Err("Chart catalog is empty".to_string());
        }
        for entry in &self.entries {
            if entry.description.is_empty() {
                return Err(format!("Chart '{}' has an empty description", entry.kind));
            }
            if entry.purposes.is_empty() {
                return Err(format!("Chart '{}' serves no purpose", entry.kind));
            }
        }
        for kind in ChartKind::ALL {
            if !self.by_kind.contains_key(&kind) {
                return Err(format!("Chart '{kind}' is missing from the catalog"));
            }
        }
        Ok(())
    }
    pub fn stats(&self) -> CatalogStats {
        let mut all_tags = std::collections::HashSet::new();
        let mut purposes_covered = std::collections::HashSet::new();
        for entry in &self.entries {
            all_tags.extend(entry.tags.iter().cloned());
            purposes_covered.extend(entry.purposes.iter().copied());
        }
        CatalogStats {
            total_charts: self.entries.len(),
            unique_tags: all_tags.len(),
            purposes_covered: purposes_covered.len(),
            avg_purposes_per_chart: if self.entries.is_empty() {
                0.0
            } else {
                self.entries.iter().map(|e| e.purposes.len()).sum::<usize>() as f64
                    / self.entries.len() as f64
            },
        }
    }
}

#[derive(Debug)]
pub struct CatalogStats {
    pub total_charts: usize,
    pub unique_tags: usize,
    pub purposes_covered: usize,
    pub avg_purposes_per_chart: f64,
}
impl CatalogStats {
    pub fn summary(&self) -> String {
        format!(
            "Catalog Summary:\n\
            - Total Charts: {}\n\
            - Unique Tags: {}\n\
            - Purposes Covered: {}/6\n\
            - Average Purposes per Chart: {:.1}",
            self.total_charts, self.unique_tags, self.purposes_covered, self.avg_purposes_per_chart
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_entries_are_rejected() {
        let yaml = r#"
charts:
  - kind: histogram
    description: Binned frequency of a numeric variable.
    purposes: [Distribution]
  - kind: histogram
    description: Same chart twice.
    purposes: [Distribution]
"#;
        let err = ChartCatalog::from_yaml_string(yaml).unwrap_err();
        assert!(err.to_string().contains("Duplicate chart entry"));
    }

    #[test]
    fn purpose_index_returns_serving_charts() {
        let yaml = r#"
charts:
  - kind: sankey-diagram
    description: Weighted flows between stages.
    purposes: [Flow]
    tags: [flow, weighted]
  - kind: barplot
    description: Category magnitudes as bars.
    purposes: [Ranking]
"#;
        let catalog = ChartCatalog::from_yaml_string(yaml).unwrap();
        let flows = catalog.charts_for_purpose(VisualizationPurpose::Flow);
        assert_eq!(flows.len(), 1);
        assert_eq!(flows[0].kind, ChartKind::SankeyDiagram);
        assert!(catalog
            .charts_for_purpose(VisualizationPurpose::Evolution)
            .is_empty());
        assert_eq!(catalog.charts_with_tag("weighted").len(), 1);
    }
}
