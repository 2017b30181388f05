//! One-stop plan building over several feature texts.

use bdd_plan_gherkin::Parser;
use tracing::{debug, debug_span};

use crate::compiler::PlanCompiler;
use crate::config::PlanConfig;
use crate::error::PlanError;
use crate::node::{Plan, PlanNode};
use crate::redefinition::Redefiner;

/// Parses and compiles feature texts, then merges redefined scenarios into
/// a single [`Plan`].
///
/// Features keep the order in which their sources were added.
///
/// # Examples
///
/// ```
/// use bdd_plan::{PlanBuilder, PlanConfig};
///
/// let mut builder = PlanBuilder::new(PlanConfig::default()).unwrap();
/// builder
///     .add_source(
///         "business.feature",
///         "@definition\nFeature: Pay\n  @ID-1\n  Scenario: Card\n    Given a card\n",
///     )
///     .unwrap()
///     .add_source(
///         "technical.feature",
///         "@implementation\nFeature: Pay\n  @ID-1\n  Scenario: Card\n    Given a card number\n",
///     )
///     .unwrap();
/// let plan = builder.build().unwrap();
/// assert_eq!(plan.len(), 1);
/// let step = plan.find(|node| node.name == "a card").unwrap();
/// assert_eq!(step.children.len(), 1);
/// ```
#[derive(Debug)]
pub struct PlanBuilder {
    parser: Parser,
    compiler: PlanCompiler,
    redefiner: Redefiner,
    features: Vec<PlanNode>,
}

impl PlanBuilder {
    /// Builder applying `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidConfig`] for an unknown default language,
    /// and the errors of [`PlanCompiler::new`] for an invalid id pattern or
    /// tag filter.
    pub fn new(config: PlanConfig) -> Result<Self, PlanError> {
        let parser = Parser::new()
            .with_default_language(&config.default_language)
            .map_err(|err| PlanError::InvalidConfig(err.to_string()))?;
        let compiler = PlanCompiler::new(&config)?;
        Ok(Self {
            parser,
            compiler,
            redefiner: Redefiner::new(config.redefinition),
            features: Vec::new(),
        })
    }

    /// Parse and compile `text`, read from `resource`.
    ///
    /// Documents without a feature, or whose scenarios are all filtered out,
    /// add nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Parse`] on the first syntax or structural error
    /// and [`PlanError::AmbiguousId`] from compilation.
    pub fn add_source(&mut self, resource: &str, text: &str) -> Result<&mut Self, PlanError> {
        let _span = debug_span!("add_source", resource).entered();
        let document = self
            .parser
            .parse(text)
            .map_err(|error| PlanError::Parse {
                resource: resource.to_string(),
                error,
            })?;
        match self.compiler.compile(resource, &document)? {
            Some(feature) => self.features.push(feature),
            None => debug!(resource, "source contributes no feature"),
        }
        Ok(self)
    }

    /// Number of features compiled so far.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Merge redefined scenarios and return the finished plan.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Redefinition`] when merging fails.
    pub fn build(self) -> Result<Plan, PlanError> {
        let mut plan = Plan {
            features: self.features,
        };
        self.redefiner.redefine(&mut plan)?;
        debug!(features = plan.features.len(), "built plan");
        Ok(plan)
    }
}
