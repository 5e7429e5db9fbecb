//! Panel-by-panel expertise (paint/damage) report.
//!
//! Stored rows keep the legacy wire format: a flat object of Turkish panel
//! names to Turkish status strings. `ExpertiseReport::normalize` is the only
//! way in, and it never fails.

use crate::utils::error::GaleriError;
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

/// Body parts tracked by an expertise report, in canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Panel {
    Hood,
    Roof,
    Trunk,
    FrontRightFender,
    FrontRightDoor,
    RearRightDoor,
    RearRightFender,
    FrontLeftFender,
    FrontLeftDoor,
    RearLeftDoor,
    RearLeftFender,
    FrontBumper,
    RearBumper,
}

impl Panel {
    pub const COUNT: usize = 13;

    pub const ALL: [Panel; Panel::COUNT] = [
        Panel::Hood,
        Panel::Roof,
        Panel::Trunk,
        Panel::FrontRightFender,
        Panel::FrontRightDoor,
        Panel::RearRightDoor,
        Panel::RearRightFender,
        Panel::FrontLeftFender,
        Panel::FrontLeftDoor,
        Panel::RearLeftDoor,
        Panel::RearLeftFender,
        Panel::FrontBumper,
        Panel::RearBumper,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Key used in stored rows. Must not change: existing data depends on it.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Hood => "Kaput",
            Self::Roof => "Tavan",
            Self::Trunk => "Bagaj",
            Self::FrontRightFender => "Sağ Ön Çamurluk",
            Self::FrontRightDoor => "Sağ Ön Kapı",
            Self::RearRightDoor => "Sağ Arka Kapı",
            Self::RearRightFender => "Sağ Arka Çamurluk",
            Self::FrontLeftFender => "Sol Ön Çamurluk",
            Self::FrontLeftDoor => "Sol Ön Kapı",
            Self::RearLeftDoor => "Sol Arka Kapı",
            Self::RearLeftFender => "Sol Arka Çamurluk",
            Self::FrontBumper => "Ön Tampon",
            Self::RearBumper => "Arka Tampon",
        }
    }

    pub fn from_storage_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.storage_key() == key)
    }

    /// Element id used by body diagrams.
    pub fn diagram_id(self) -> &'static str {
        match self {
            Self::Hood => "hood",
            Self::Roof => "roof",
            Self::Trunk => "trunk",
            Self::FrontRightFender => "front-fender-right",
            Self::FrontRightDoor => "front-door-right",
            Self::RearRightDoor => "rear-door-right",
            Self::RearRightFender => "rear-fender-right",
            Self::FrontLeftFender => "front-fender-left",
            Self::FrontLeftDoor => "front-door-left",
            Self::RearLeftDoor => "rear-door-left",
            Self::RearLeftFender => "rear-fender-left",
            Self::FrontBumper => "front-bumper",
            Self::RearBumper => "rear-bumper",
        }
    }

    /// Human-facing label. The showroom is Turkish, so this is the storage key.
    pub fn label(self) -> &'static str {
        self.storage_key()
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Panel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.diagram_id())
    }
}

/// Inspected state of a panel. Ordering is severity, for display emphasis only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    Original,
    LocallyPainted,
    Painted,
    Replaced,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Condition::Original,
        Condition::LocallyPainted,
        Condition::Painted,
        Condition::Replaced,
    ];

    /// Status string used in stored rows.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Original => "Orijinal",
            Self::LocallyPainted => "Lokal Boyalı",
            Self::Painted => "Boyalı",
            Self::Replaced => "Değişen",
        }
    }

    /// Strict parse of a stored status; surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.iter().copied().find(|c| c.as_str() == value)
    }

    /// Unrecognized statuses read as `Original`.
    pub fn from_str_loose(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        self.as_str()
    }

    pub fn is_original(self) -> bool {
        self == Self::Original
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Total mapping of every [`Panel`] to a [`Condition`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ExpertiseReport {
    conditions: [Condition; Panel::COUNT],
}

/// Result of [`ExpertiseReport::normalize_with_diagnostics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub report: ExpertiseReport,
    /// Keys that are not a known panel, sorted.
    pub ignored_keys: Vec<String>,
    /// Panels whose stored status was not recognized and was read as `Original`.
    pub coerced: Vec<(Panel, String)>,
}

impl Normalized {
    pub fn is_clean(&self) -> bool {
        self.ignored_keys.is_empty() && self.coerced.is_empty()
    }
}

impl ExpertiseReport {
    /// A report with every panel `Original`.
    pub fn original() -> Self {
        Self::default()
    }

    /// Builds a report from stored key/status pairs.
    ///
    /// Missing panels and unrecognized statuses become `Original`; keys that
    /// are not a known panel are ignored. Keys and statuses are trimmed first.
    /// When the same key appears twice, the last pair wins.
    pub fn normalize<I, K, V>(raw: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::normalize_with_diagnostics(raw).report
    }

    /// Same as [`normalize`](Self::normalize), and also reports what was dropped or coerced.
    pub fn normalize_with_diagnostics<I, K, V>(raw: I) -> Normalized
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut report = Self::original();
        let mut ignored_keys = Vec::new();
        let mut coerced: Vec<(Panel, String)> = Vec::new();

        for (key, value) in raw {
            let key = key.as_ref();
            let value = value.as_ref();

            let Some(panel) = Panel::from_storage_key(key.trim()) else {
                ignored_keys.push(key.to_string());
                continue;
            };

            coerced.retain(|(p, _)| *p != panel);
            report.conditions[panel.index()] = match Condition::parse(value) {
                Some(condition) => condition,
                None => {
                    coerced.push((panel, value.to_string()));
                    Condition::Original
                }
            };
        }

        ignored_keys.sort();
        ignored_keys.dedup();
        coerced.sort_by_key(|(panel, _)| *panel);

        for key in &ignored_keys {
            tracing::warn!("Ignoring unknown expertise panel key: {:?}", key);
        }
        for (panel, value) in &coerced {
            tracing::warn!(
                "Unrecognized status {:?} for panel {}, reading as {}",
                value,
                panel,
                Condition::Original
            );
        }

        Normalized {
            report,
            ignored_keys,
            coerced,
        }
    }

    /// Normalizes a stored JSON object. Legacy rows may hold non-string
    /// values; those are treated as unrecognized statuses.
    pub fn normalize_json(raw: HashMap<String, serde_json::Value>) -> Normalized {
        let pairs = raw.into_iter().map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        });
        Self::normalize_with_diagnostics(pairs)
    }

    pub fn condition(&self, panel: Panel) -> Condition {
        self.conditions[panel.index()]
    }

    /// All panels with their condition, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Panel, Condition)> + '_ {
        Panel::ALL.iter().map(move |&panel| (panel, self.condition(panel)))
    }

    /// Panels that are not `Original`, in canonical order.
    pub fn non_original_panels(&self) -> Vec<(Panel, Condition)> {
        self.iter().filter(|(_, c)| !c.is_original()).collect()
    }

    pub fn is_fully_original(&self) -> bool {
        self.conditions.iter().all(|c| c.is_original())
    }

    /// Returns a copy with one panel changed. `self` is left as it was.
    pub fn with_panel(&self, panel: Panel, condition: Condition) -> Self {
        let mut next = *self;
        next.conditions[panel.index()] = condition;
        next
    }

    pub fn count(&self, condition: Condition) -> usize {
        self.conditions.iter().filter(|c| **c == condition).count()
    }

    pub fn worst_condition(&self) -> Condition {
        self.conditions.iter().copied().max().unwrap_or_default()
    }

    /// Storage representation with all panels present.
    pub fn to_storage(&self) -> BTreeMap<String, String> {
        self.iter()
            .map(|(panel, condition)| {
                (panel.storage_key().to_string(), condition.as_str().to_string())
            })
            .collect()
    }
}

impl Index<Panel> for ExpertiseReport {
    type Output = Condition;

    fn index(&self, panel: Panel) -> &Condition {
        &self.conditions[panel.index()]
    }
}

impl Serialize for ExpertiseReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Panel::COUNT))?;
        for (panel, condition) in self.iter() {
            map.serialize_entry(panel.storage_key(), condition.as_str())?;
        }
        map.end()
    }
}

/// Any stored shape is accepted. Objects are normalized; anything else
/// (string, array, number) reads as a fully original report.
impl<'de> Deserialize<'de> for ExpertiseReport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Object(map) => {
                Ok(Self::normalize_json(map.into_iter().collect()).report)
            }
            serde_json::Value::Null => Ok(Self::original()),
            other => {
                tracing::warn!(
                    "Expertise report is not an object ({}), reading every panel as {}",
                    other,
                    Condition::Original
                );
                Ok(Self::original())
            }
        }
    }
}

/// One admin edit of the form `Kaput=Boyalı`.
///
/// Unlike stored data, admin input is parsed strictly: an unknown panel or
/// status is an error, not a silent `Original`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelEdit {
    pub panel: Panel,
    pub condition: Condition,
}

impl FromStr for PanelEdit {
    type Err = GaleriError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = |message: String| GaleriError::ValidationError {
            field: "expertise_report".to_string(),
            message,
        };

        let (key, status) = value
            .split_once('=')
            .ok_or_else(|| invalid(format!("expected PANEL=STATUS, got {:?}", value)))?;
        let panel = Panel::from_storage_key(key.trim())
            .ok_or_else(|| invalid(format!("unknown panel {:?}", key.trim())))?;
        let condition = Condition::parse(status)
            .ok_or_else(|| invalid(format!("unknown status {:?}", status.trim())))?;

        Ok(Self { panel, condition })
    }
}

impl ExpertiseReport {
    /// Applies admin edits in order; later edits of the same panel win.
    pub fn with_edits<'a>(&self, edits: impl IntoIterator<Item = &'a PanelEdit>) -> Self {
        edits
            .into_iter()
            .fold(*self, |report, edit| report.with_panel(edit.panel, edit.condition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys_round_trip() {
        for panel in Panel::ALL {
            assert_eq!(Panel::from_storage_key(panel.storage_key()), Some(panel));
        }
        assert_eq!(Panel::from_storage_key("Ayna"), None);
    }

    #[test]
    fn test_canonical_order_matches_discriminants() {
        for (i, panel) in Panel::ALL.iter().enumerate() {
            assert_eq!(panel.index(), i);
        }
    }

    #[test]
    fn test_condition_parse_trims() {
        assert_eq!(Condition::parse(" Boyalı "), Some(Condition::Painted));
        assert_eq!(Condition::parse("boyali"), None);
        assert_eq!(Condition::from_str_loose("???"), Condition::Original);
    }

    #[test]
    fn test_severity_order() {
        assert!(Condition::Original < Condition::LocallyPainted);
        assert!(Condition::LocallyPainted < Condition::Painted);
        assert!(Condition::Painted < Condition::Replaced);
    }

    #[test]
    fn test_diagnostics_report_coerced_and_ignored() {
        let normalized = ExpertiseReport::normalize_with_diagnostics([
            ("Kaput", "Çizik"),
            ("Ayna", "Değişen"),
            ("Tavan", "Boyalı"),
        ]);

        assert_eq!(normalized.report[Panel::Hood], Condition::Original);
        assert_eq!(normalized.report[Panel::Roof], Condition::Painted);
        assert_eq!(normalized.ignored_keys, vec!["Ayna".to_string()]);
        assert_eq!(normalized.coerced, vec![(Panel::Hood, "Çizik".to_string())]);
        assert!(!normalized.is_clean());
    }

    #[test]
    fn test_later_pair_overrides_coercion() {
        let normalized =
            ExpertiseReport::normalize_with_diagnostics([("Kaput", "xx"), ("Kaput", "Değişen")]);
        assert_eq!(normalized.report[Panel::Hood], Condition::Replaced);
        assert!(normalized.coerced.is_empty());
    }

    #[test]
    fn test_non_object_report_reads_as_original() {
        for json in [r#""Kaput""#, "[]", "3", "true"] {
            let report: ExpertiseReport = serde_json::from_str(json).unwrap();
            assert_eq!(report, ExpertiseReport::original());
        }
    }

    #[test]
    fn test_panel_edit_parsing() {
        let edit: PanelEdit = " Sol Ön Kapı = Değişen".parse().unwrap();
        assert_eq!(edit.panel, Panel::FrontLeftDoor);
        assert_eq!(edit.condition, Condition::Replaced);

        assert!("Kaput".parse::<PanelEdit>().is_err());
        assert!("Ayna=Boyalı".parse::<PanelEdit>().is_err());
        assert!(matches!(
            "Kaput=boyali".parse::<PanelEdit>(),
            Err(GaleriError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_with_edits_applies_in_order() {
        let edits: Vec<PanelEdit> = ["Kaput=Boyalı", "Tavan=Değişen", "Kaput=Orijinal"]
            .iter()
            .map(|e| e.parse().unwrap())
            .collect();
        let report = ExpertiseReport::original()
            .with_panel(Panel::Trunk, Condition::Painted)
            .with_edits(&edits);

        assert_eq!(report[Panel::Hood], Condition::Original);
        assert_eq!(report[Panel::Roof], Condition::Replaced);
        assert_eq!(report[Panel::Trunk], Condition::Painted);
    }

    #[test]
    fn test_keys_are_trimmed() {
        let report = ExpertiseReport::normalize([(" Kaput ", "Değişen ")]);
        assert_eq!(report[Panel::Hood], Condition::Replaced);
    }

    #[test]
    fn test_deserialize_tolerates_non_string_values() {
        let json = r#"{"Kaput": "Boyalı", "Tavan": null, "Bagaj": 3}"#;
        let report: ExpertiseReport = serde_json::from_str(json).unwrap();
        assert_eq!(report[Panel::Hood], Condition::Painted);
        assert_eq!(report[Panel::Roof], Condition::Original);
        assert_eq!(report[Panel::Trunk], Condition::Original);
    }

    #[test]
    fn test_serialize_writes_every_panel() {
        let report = ExpertiseReport::original().with_panel(Panel::RearBumper, Condition::Replaced);
        let value = serde_json::to_value(report).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), Panel::COUNT);
        assert_eq!(object["Arka Tampon"], "Değişen");
        assert_eq!(object["Kaput"], "Orijinal");
    }

    #[test]
    fn test_worst_condition() {
        let report = ExpertiseReport::original()
            .with_panel(Panel::Roof, Condition::LocallyPainted)
            .with_panel(Panel::Trunk, Condition::Painted);
        assert_eq!(report.worst_condition(), Condition::Painted);
        assert_eq!(report.count(Condition::Original), Panel::COUNT - 2);
    }
}
