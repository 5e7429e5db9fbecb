use crate::domain::expertise::{Condition, ExpertiseReport, Panel};
use serde::Serialize;

/// Display color for a region. Graphics-agnostic; diagrams map it to whatever they draw with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorToken {
    Neutral,
    LightAmber,
    Amber,
    Red,
}

impl ColorToken {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Neutral => "fill-gray-100",
            Self::LightAmber => "fill-amber-200",
            Self::Amber => "fill-yellow-400",
            Self::Red => "fill-red-500",
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            Self::Neutral => "#f3f4f6",
            Self::LightAmber => "#fde68a",
            Self::Amber => "#facc15",
            Self::Red => "#ef4444",
        }
    }

    pub fn for_condition(condition: Condition) -> Self {
        match condition {
            Condition::Original => Self::Neutral,
            Condition::LocallyPainted => Self::LightAmber,
            Condition::Painted => Self::Amber,
            Condition::Replaced => Self::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderableRegion {
    pub panel: Panel,
    pub condition: Condition,
    pub color: ColorToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub panel_label: &'static str,
    pub condition_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub condition: Condition,
    pub color: ColorToken,
    pub label: &'static str,
}

/// Everything a detail view needs, in one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedReport {
    pub fully_original: bool,
    pub regions: Vec<RenderableRegion>,
    pub summary: Vec<SummaryLine>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExpertiseRenderer;

impl ExpertiseRenderer {
    pub fn new() -> Self {
        Self
    }

    /// One region per panel, in canonical order.
    pub fn regions_for(&self, report: &ExpertiseReport) -> Vec<RenderableRegion> {
        report
            .iter()
            .map(|(panel, condition)| RenderableRegion {
                panel,
                condition,
                color: ColorToken::for_condition(condition),
            })
            .collect()
    }

    /// Non-original panels with display labels, in canonical order.
    pub fn summary_lines(&self, report: &ExpertiseReport) -> Vec<SummaryLine> {
        report
            .non_original_panels()
            .into_iter()
            .map(|(panel, condition)| SummaryLine {
                panel_label: panel.label(),
                condition_label: condition.label(),
            })
            .collect()
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        Condition::ALL
            .iter()
            .map(|&condition| LegendEntry {
                condition,
                color: ColorToken::for_condition(condition),
                label: condition.label(),
            })
            .collect()
    }

    pub fn render(&self, report: &ExpertiseReport) -> RenderedReport {
        RenderedReport {
            fully_original: report.is_fully_original(),
            regions: self.regions_for(report),
            summary: self.summary_lines(report),
        }
    }
}
