//! Global export rules evaluated after the cascade.
//!
//! Unlike per-entity issues, a rule violation is fatal: the export stops and
//! no manifest is produced.

use tracing::warn;

use crate::error::{IntegrityError, IntegrityResult};
use crate::validate::Partition;

/// Consent document template type.
pub const DOCUMENT_TEMPLATE_TYPE: &str = "ec__document_template";

/// Styling resource every consent template export needs.
pub const DEFAULT_DOCUMENT_CSS_TYPE: &str = "ec__default_document_css";

/// A constraint over the final kept/removed split.
pub trait ExportRule: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Returns `Err(IntegrityError::ExportBlocked)` if the export must stop.
    fn check(&self, partition: &Partition) -> IntegrityResult<()>;
}

/// If any entity of `dependent_type` is kept, one of `companion_type` must be
/// kept as well.
#[derive(Debug, Clone)]
pub struct CompanionRule {
    pub dependent_type: String,
    pub companion_type: String,
    pub reason: String,
}

impl CompanionRule {
    pub fn new(dependent_type: &str, companion_type: &str) -> Self {
        Self {
            dependent_type: dependent_type.into(),
            companion_type: companion_type.into(),
            reason: format!(
                "Exports that contain {dependent_type} must also contain {companion_type}"
            ),
        }
    }

    /// Consent templates are unusable without the default document css.
    pub fn document_css() -> Self {
        Self {
            reason: "Exports that contain EC templates must also contain an EC default document CSS"
                .into(),
            ..Self::new(DOCUMENT_TEMPLATE_TYPE, DEFAULT_DOCUMENT_CSS_TYPE)
        }
    }
}

impl ExportRule for CompanionRule {
    fn name(&self) -> &str {
        "companion"
    }

    fn check(&self, partition: &Partition) -> IntegrityResult<()> {
        if partition.keeps_type(&self.dependent_type) && !partition.keeps_type(&self.companion_type) {
            return Err(IntegrityError::ExportBlocked {
                message: format!(
                    "Export cannot be completed because there is no {}",
                    self.companion_type
                ),
                reason: self.reason.clone(),
            });
        }
        Ok(())
    }
}

/// The root entity of an export can never be dropped silently.
#[derive(Debug, Clone)]
pub struct RootRetainedRule {
    pub root_type: String,
    /// Name used in the blocking message.
    pub label: String,
}

impl RootRetainedRule {
    /// A study root is reported as "Study"; any other root by its type name.
    pub fn new(root_type: &str) -> Self {
        let label = if root_type == "c_study" { "Study" } else { root_type };
        Self {
            root_type: root_type.into(),
            label: label.into(),
        }
    }
}

impl ExportRule for RootRetainedRule {
    fn name(&self) -> &str {
        "root-retained"
    }

    fn check(&self, partition: &Partition) -> IntegrityResult<()> {
        match partition.removed_of_type(&self.root_type).next() {
            Some(record) => Err(IntegrityError::ExportBlocked {
                message: format!(
                    "{} cannot be exported due to referential integrity issues",
                    self.label
                ),
                reason: serde_json::to_string(&record.issues)?,
            }),
            None => Ok(()),
        }
    }
}

/// Ordered list of rules; the first failure wins.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn ExportRule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The companion css rule followed by the root rule for `root_type`.
    pub fn standard(root_type: &str) -> Self {
        Self::new()
            .with_rule(CompanionRule::document_css())
            .with_rule(RootRetainedRule::new(root_type))
    }

    pub fn with_rule(mut self, rule: impl ExportRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn check(&self, partition: &Partition) -> IntegrityResult<()> {
        for rule in &self.rules {
            if let Err(e) = rule.check(partition) {
                warn!("Export rule '{}' failed: {}", rule.name(), e);
                return Err(e);
            }
        }
        Ok(())
    }
}
