//! Export configuration.

use serde::Deserialize;
use studypack_integrity::{
    CompanionRule, DEFAULT_DOCUMENT_CSS_TYPE, DOCUMENT_TEMPLATE_TYPE, RootRetainedRule, RuleSet,
};
use studypack_manifest::{AssemblyOptions, IncludePolicy, STUDY_DEFER_PATHS, STUDY_TYPE};

/// A pair of types that must travel together.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompanionPair {
    pub dependent: String,
    pub companion: String,
}

/// Configuration for an export run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Type whose removal blocks the export and which carries the defer list.
    pub root_type: String,
    /// Paths the importer resolves after the root is created.
    pub defer_paths: Vec<String>,
    pub include_policy: IncludePolicy,
    /// Companion constraints checked after the cascade.
    pub companions: Vec<CompanionPair>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            root_type: STUDY_TYPE.to_string(),
            defer_paths: STUDY_DEFER_PATHS.iter().map(|p| p.to_string()).collect(),
            include_policy: IncludePolicy::default(),
            companions: vec![CompanionPair {
                dependent: DOCUMENT_TEMPLATE_TYPE.to_string(),
                companion: DEFAULT_DOCUMENT_CSS_TYPE.to_string(),
            }],
        }
    }
}

impl ExportConfig {
    /// Companion rules in configured order, then the root rule.
    pub fn rules(&self) -> RuleSet {
        let mut rules = RuleSet::new();
        for pair in &self.companions {
            let rule = if pair.dependent == DOCUMENT_TEMPLATE_TYPE
                && pair.companion == DEFAULT_DOCUMENT_CSS_TYPE
            {
                CompanionRule::document_css()
            } else {
                CompanionRule::new(&pair.dependent, &pair.companion)
            };
            rules = rules.with_rule(rule);
        }
        rules.with_rule(RootRetainedRule::new(&self.root_type))
    }

    pub fn assembly_options(&self) -> AssemblyOptions {
        AssemblyOptions {
            root_type: self.root_type.clone(),
            defer_paths: self.defer_paths.clone(),
            include_policy: self.include_policy,
        }
    }
}
