//! Executable plans compiled from Gherkin feature files.
//!
//! Feature texts are parsed with [`bdd_plan_gherkin`] and compiled into a
//! tree of [`PlanNode`]s: features, scenarios (one per outline example row),
//! steps and synthetic virtual steps. Scenarios tagged as definitions can be
//! redefined by implementation scenarios sharing their id; the
//! [`Redefiner`] nests implementation steps under the definition steps they
//! realise and removes the implementations from the plan.
//!
//! [`PlanBuilder`] wires parsing, compilation and redefinition together:
//!
//! ```
//! use bdd_plan::{NodeType, PlanBuilder, PlanConfig};
//!
//! let mut builder = PlanBuilder::new(PlanConfig::default()).unwrap();
//! builder
//!     .add_source(
//!         "orders.feature",
//!         "\
//! Feature: Orders
//!   Scenario Outline: Order
//!     Given I order <item>
//!     Examples:
//!       | item  |
//!       | tea   |
//!       | bread |
//! ",
//!     )
//!     .unwrap();
//! let plan = builder.build().unwrap();
//! let outline = plan.find(|node| node.node_type == NodeType::ScenarioOutline).unwrap();
//! assert_eq!(outline.children.len(), 2);
//! let step = plan.find(|node| node.name == "I order bread").unwrap();
//! assert_eq!(step.node_type, NodeType::Step);
//! ```

mod builder;
mod compiler;
pub mod config;
mod error;
#[cfg(feature = "json")]
pub mod json;
pub mod logging;
mod node;
mod placeholder;
mod redefinition;
mod tags;
#[cfg(test)]
mod test_support;

pub use builder::PlanBuilder;
pub use compiler::{LANGUAGE_PROPERTY, PlanCompiler};
pub use config::{LogLevel, PlanConfig, RedefinitionConfig};
pub use error::{PlanError, RedefinitionError};
pub use node::{ExamplesTable, NodeType, OutlineTemplate, Plan, PlanNode, Source, StepData};
pub use redefinition::{BACKGROUND_STEP_NAME, Redefiner, VOID_STEP_NAME};
pub use tags::{TagExprError, TagExpression};
