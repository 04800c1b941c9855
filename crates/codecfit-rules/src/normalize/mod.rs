//! Conversion config normalization.
//!
//! [`Normalizer`] repairs a [`ConversionConfig`] until it satisfies every
//! rule in its [`RuleTable`]. Repairs run as a fixed sequence of
//! [`RepairStep`]s over a working copy; each step only narrows what earlier
//! steps decided, so one forward pass is enough and running the pass again
//! changes nothing.

mod steps;

pub use steps::RepairStep;

use std::sync::Arc;

use codecfit_common::{ConversionConfig, SourceMetadata};
use serde::Serialize;
use serde_json::Value;

use crate::table::RuleTable;

/// A single field rewritten by a repair step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Adjustment {
    pub step: RepairStep,
    /// JSON name of the field.
    pub field: &'static str,
    pub from: Value,
    pub to: Value,
}

/// Normalized configuration plus the adjustments that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizeReport {
    pub config: ConversionConfig,
    pub adjustments: Vec<Adjustment>,
}

impl NormalizeReport {
    /// Whether the input already satisfied every rule.
    pub fn is_unchanged(&self) -> bool {
        self.adjustments.is_empty()
    }

    /// Adjustments made by one step.
    pub fn adjustments_for(&self, step: RepairStep) -> impl Iterator<Item = &Adjustment> {
        self.adjustments.iter().filter(move |adj| adj.step == step)
    }
}

/// Applies the repair pipeline against a shared rule table.
#[derive(Debug, Clone)]
pub struct Normalizer {
    rules: Arc<RuleTable>,
}

impl Normalizer {
    pub fn new(rules: Arc<RuleTable>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Return a copy of `config` that satisfies every rule.
    pub fn normalize(
        &self,
        config: &ConversionConfig,
        metadata: Option<&SourceMetadata>,
    ) -> ConversionConfig {
        self.normalize_with_report(config, metadata).config
    }

    /// Like [`Normalizer::normalize`], also returning every adjustment made.
    pub fn normalize_with_report(
        &self,
        config: &ConversionConfig,
        metadata: Option<&SourceMetadata>,
    ) -> NormalizeReport {
        self.run(config, metadata, &RepairStep::ORDER)
    }

    /// Apply a single repair step in isolation.
    pub fn apply_step(
        &self,
        step: RepairStep,
        config: &ConversionConfig,
        metadata: Option<&SourceMetadata>,
    ) -> NormalizeReport {
        self.run(config, metadata, &[step])
    }

    fn run(
        &self,
        config: &ConversionConfig,
        metadata: Option<&SourceMetadata>,
        steps: &[RepairStep],
    ) -> NormalizeReport {
        let mut pass = Pass {
            rules: &self.rules,
            metadata,
            config: config.clone(),
            step: RepairStep::ORDER[0],
            adjustments: Vec::new(),
        };

        for &step in steps {
            pass.step = step;
            step.apply(&mut pass);
        }

        if !pass.adjustments.is_empty() {
            tracing::debug!(
                "Normalized conversion config for container {} ({} adjustments)",
                pass.config.container,
                pass.adjustments.len()
            );
        }

        NormalizeReport {
            config: pass.config,
            adjustments: pass.adjustments,
        }
    }
}

/// Working state threaded through the repair steps.
pub(crate) struct Pass<'a> {
    pub rules: &'a RuleTable,
    pub metadata: Option<&'a SourceMetadata>,
    pub config: ConversionConfig,
    step: RepairStep,
    adjustments: Vec<Adjustment>,
}

impl Pass<'_> {
    /// Assign `value` to the field selected by `slot`, recording the change.
    pub fn set<T, F>(&mut self, field: &'static str, slot: F, value: T)
    where
        T: PartialEq + Serialize,
        F: FnOnce(&mut ConversionConfig) -> &mut T,
    {
        let current = slot(&mut self.config);
        if *current == value {
            return;
        }

        let from = serde_json::to_value(&*current).unwrap_or(Value::Null);
        let to = serde_json::to_value(&value).unwrap_or(Value::Null);
        *current = value;

        tracing::debug!(step = %self.step, field, %from, %to, "repaired field");
        self.adjustments.push(Adjustment {
            step: self.step,
            field,
            from,
            to,
        });
    }
}
