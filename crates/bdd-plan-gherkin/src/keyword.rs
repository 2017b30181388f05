//! Semantic step categories.
//!
//! Dialects map every localised step keyword onto one [`StepKeyword`], so the
//! rest of the pipeline never needs to know which language a feature used.

use std::fmt;

/// Category of a step, independent of the dialect it was written in.
///
/// Conjunctions (`And`, `But` and the `*` bullet) are classified as such by
/// the dialect; the document builder then replaces them with the category of
/// the preceding primary step through [`resolve`](Self::resolve).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKeyword {
    /// Precondition.
    Given,
    /// Action.
    When,
    /// Expected outcome.
    Then,
    /// Continues the previous step.
    And,
    /// Contrasts with the previous step.
    But,
}

impl StepKeyword {
    /// English name of the category.
    ///
    /// # Examples
    ///
    /// ```
    /// use bdd_plan_gherkin::StepKeyword;
    ///
    /// assert_eq!(StepKeyword::Then.as_str(), "Then");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
            Self::But => "But",
        }
    }

    /// Whether this is `And` or `But`.
    #[must_use]
    pub const fn is_conjunction(&self) -> bool {
        matches!(self, Self::And | Self::But)
    }

    /// Category this step takes within a block.
    ///
    /// Primary categories are returned unchanged and remembered in
    /// `previous`; conjunctions take the remembered category, or `Given` at
    /// the start of a block.
    ///
    /// # Examples
    ///
    /// ```
    /// use bdd_plan_gherkin::StepKeyword;
    ///
    /// let mut previous = None;
    /// assert_eq!(StepKeyword::But.resolve(&mut previous), StepKeyword::Given);
    /// assert_eq!(StepKeyword::When.resolve(&mut previous), StepKeyword::When);
    /// assert_eq!(StepKeyword::And.resolve(&mut previous), StepKeyword::When);
    /// ```
    #[must_use]
    pub fn resolve(self, previous: &mut Option<Self>) -> Self {
        if self.is_conjunction() {
            return previous.unwrap_or(Self::Given);
        }
        *previous = Some(self);
        self
    }
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
