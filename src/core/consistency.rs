use crate::domain::model::{ConsistencyDecision, Listing, ListingChange};
use crate::domain::ports::ConsistencyChecker;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsistencyRules {
    /// Relative price move, in percent, below which a change is noise.
    pub price_change_percent: f64,
    /// Share of current listings that may disappear in one scrape before the
    /// scrape itself is treated as broken.
    pub max_removed_ratio: f64,
}

impl Default for ConsistencyRules {
    fn default() -> Self {
        Self {
            price_change_percent: 1.0,
            max_removed_ratio: 0.5,
        }
    }
}

/// Deterministic stand-in for a model-backed checker.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedChecker {
    rules: ConsistencyRules,
}

fn same_text(a: &str, b: &str) -> bool {
    let squash = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    squash(a) == squash(b)
}

impl RuleBasedChecker {
    pub fn new(rules: ConsistencyRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ConsistencyRules {
        &self.rules
    }

    fn price_moved(&self, from: i64, to: i64) -> bool {
        if from == to {
            return false;
        }
        // Stored prices are unchecked; a non-positive base has no meaningful ratio.
        if from <= 0 {
            return true;
        }
        let percent = (to as f64 - from as f64).abs() / from as f64 * 100.0;
        percent >= self.rules.price_change_percent
    }

    fn compare(&self, before: &Listing, after: &Listing, changes: &mut Vec<ListingChange>) {
        let id = before.id.clone();

        if self.price_moved(before.price, after.price) {
            changes.push(ListingChange::Price {
                id: id.clone(),
                from: before.price,
                to: after.price,
            });
        } else if before.price != after.price {
            changes.push(ListingChange::Cosmetic {
                id: id.clone(),
                field: "price".to_string(),
            });
        }

        let specs = [
            ("brand", before.brand != after.brand),
            ("model", before.model != after.model),
            ("year", before.year != after.year),
            ("km", before.km != after.km),
        ];
        for (field, changed) in specs {
            if changed {
                changes.push(ListingChange::Specs {
                    id: id.clone(),
                    field: field.to_string(),
                });
            }
        }

        // A scrape without a report says nothing about the car.
        if let (Some(old), Some(new)) = (&before.expertise_report, &after.expertise_report) {
            if old != new {
                changes.push(ListingChange::Expertise { id: id.clone() });
            }
        }

        if before.title != after.title {
            if same_text(&before.title, &after.title) {
                changes.push(ListingChange::Cosmetic {
                    id: id.clone(),
                    field: "title".to_string(),
                });
            } else {
                changes.push(ListingChange::Specs {
                    id: id.clone(),
                    field: "title".to_string(),
                });
            }
        }

        if before.image_urls != after.image_urls {
            changes.push(ListingChange::Cosmetic {
                id,
                field: "image_urls".to_string(),
            });
        }
    }

    /// Synchronous core of [`ConsistencyChecker::check`].
    pub fn decide(&self, current: &[Listing], fresh: &[Listing]) -> ConsistencyDecision {
        if fresh.is_empty() && !current.is_empty() {
            return ConsistencyDecision {
                should_update: false,
                reason: "Scrape returned no listings; likely a temporary website issue".to_string(),
                changes: Vec::new(),
            };
        }

        let fresh_by_id: HashMap<&str, &Listing> =
            fresh.iter().map(|l| (l.id.as_str(), l)).collect();
        let current_by_id: HashMap<&str, &Listing> =
            current.iter().map(|l| (l.id.as_str(), l)).collect();

        let mut changes = Vec::new();
        for before in current {
            match fresh_by_id.get(before.id.as_str()) {
                Some(after) => self.compare(before, after, &mut changes),
                None => changes.push(ListingChange::Removed {
                    id: before.id.clone(),
                }),
            }
        }
        for after in fresh {
            if !current_by_id.contains_key(after.id.as_str()) {
                changes.push(ListingChange::Added {
                    id: after.id.clone(),
                });
            }
        }

        let removed = changes
            .iter()
            .filter(|c| matches!(c, ListingChange::Removed { .. }))
            .count();
        if !current.is_empty() {
            let ratio = removed as f64 / current.len() as f64;
            if ratio > self.rules.max_removed_ratio {
                return ConsistencyDecision {
                    should_update: false,
                    reason: format!(
                        "{} of {} listings vanished in one scrape; treating it as a glitch",
                        removed,
                        current.len()
                    ),
                    changes,
                };
            }
        }

        let meaningful = changes.iter().filter(|c| c.is_meaningful()).count();
        let reason = if meaningful == 0 {
            if changes.is_empty() {
                "No changes detected".to_string()
            } else {
                format!("Only cosmetic changes ({})", changes.len())
            }
        } else {
            let count = |pred: fn(&ListingChange) -> bool| changes.iter().filter(|c| pred(c)).count();
            format!(
                "{} meaningful change(s): {} price, {} spec, {} expertise, {} added, {} removed",
                meaningful,
                count(|c| matches!(c, ListingChange::Price { .. })),
                count(|c| matches!(c, ListingChange::Specs { .. })),
                count(|c| matches!(c, ListingChange::Expertise { .. })),
                count(|c| matches!(c, ListingChange::Added { .. })),
                removed
            )
        };

        ConsistencyDecision {
            should_update: meaningful > 0,
            reason,
            changes,
        }
    }
}

#[async_trait]
impl ConsistencyChecker for RuleBasedChecker {
    async fn check(&self, current: &[Listing], fresh: &[Listing]) -> Result<ConsistencyDecision> {
        let decision = self.decide(current, fresh);
        tracing::debug!("Consistency decision: {:?}", decision);
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_threshold() {
        let checker = RuleBasedChecker::default();
        assert!(!checker.price_moved(1_000_000, 1_000_000));
        assert!(!checker.price_moved(1_000_000, 995_000));
        assert!(checker.price_moved(1_000_000, 990_000));
        assert!(checker.price_moved(0, 5));
    }

    #[test]
    fn test_extreme_prices_do_not_overflow() {
        let checker = RuleBasedChecker::default();
        assert!(checker.price_moved(-1, i64::MAX));
        assert!(checker.price_moved(i64::MIN, i64::MAX));
        assert!(checker.price_moved(i64::MAX, 1));
        assert!(!checker.price_moved(i64::MAX, i64::MAX));
    }

    #[test]
    fn test_same_text_ignores_case_and_spacing() {
        assert!(same_text("Temiz  Passat", "temiz passat "));
        assert!(!same_text("Temiz Passat", "Hasarlı Passat"));
    }
}
