//! Localised keyword tables.
//!
//! Every supported language is registered once in a static, read-only map
//! keyed by its language code. Keyword lists are stored longest first so the
//! token matcher can stop at the first prefix that matches.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::keyword::StepKeyword;

/// Language used when a document does not declare one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Keyword used in every dialect for bullet-style steps.
const BULLET: &[&str] = &["* "];

/// Keyword set for one language.
#[derive(Debug)]
pub struct Dialect {
    code: &'static str,
    name: &'static str,
    feature: Vec<&'static str>,
    background: Vec<&'static str>,
    scenario: Vec<&'static str>,
    scenario_outline: Vec<&'static str>,
    examples: Vec<&'static str>,
    given: Vec<&'static str>,
    when: Vec<&'static str>,
    then: Vec<&'static str>,
    but: Vec<&'static str>,
    steps: Vec<&'static str>,
}

struct Keywords {
    code: &'static str,
    name: &'static str,
    feature: &'static [&'static str],
    background: &'static [&'static str],
    scenario: &'static [&'static str],
    scenario_outline: &'static [&'static str],
    examples: &'static [&'static str],
    given: &'static [&'static str],
    when: &'static [&'static str],
    then: &'static [&'static str],
    and: &'static [&'static str],
    but: &'static [&'static str],
}

const KEYWORDS: &[Keywords] = &[
    Keywords {
        code: "en",
        name: "English",
        feature: &["Feature", "Business Need", "Ability"],
        background: &["Background"],
        scenario: &["Example", "Scenario"],
        scenario_outline: &["Scenario Outline", "Scenario Template"],
        examples: &["Examples", "Scenarios"],
        given: &["Given "],
        when: &["When "],
        then: &["Then "],
        and: &["And "],
        but: &["But "],
    },
    Keywords {
        code: "es",
        name: "Spanish",
        feature: &["Característica", "Necesidad del negocio", "Requisito"],
        background: &["Antecedentes"],
        scenario: &["Ejemplo", "Escenario"],
        scenario_outline: &["Esquema del escenario"],
        examples: &["Ejemplos"],
        given: &["Dado ", "Dada ", "Dados ", "Dadas "],
        when: &["Cuando "],
        then: &["Entonces "],
        and: &["Y ", "E "],
        but: &["Pero "],
    },
    Keywords {
        code: "fr",
        name: "French",
        feature: &["Fonctionnalité"],
        background: &["Contexte"],
        scenario: &["Exemple", "Scénario"],
        scenario_outline: &["Plan du scénario", "Plan du Scénario"],
        examples: &["Exemples"],
        given: &[
            "Soit ",
            "Sachant que ",
            "Sachant qu'",
            "Sachant ",
            "Etant donné que ",
            "Etant donné qu'",
            "Etant donné ",
            "Etant donnée ",
            "Etant donnés ",
            "Etant données ",
            "Étant donné que ",
            "Étant donné qu'",
            "Étant donné ",
            "Étant donnée ",
            "Étant donnés ",
            "Étant données ",
        ],
        when: &["Quand ", "Lorsque ", "Lorsqu'"],
        then: &["Alors ", "Donc "],
        and: &["Et que ", "Et qu'", "Et "],
        but: &["Mais que ", "Mais qu'", "Mais "],
    },
    Keywords {
        code: "de",
        name: "German",
        feature: &["Funktionalität", "Funktion"],
        background: &["Grundlage", "Hintergrund", "Voraussetzungen", "Vorbedingungen"],
        scenario: &["Beispiel", "Szenario"],
        scenario_outline: &["Szenariogrundriss", "Szenarien"],
        examples: &["Beispiele"],
        given: &["Angenommen ", "Gegeben sei ", "Gegeben seien "],
        when: &["Wenn "],
        then: &["Dann "],
        and: &["Und "],
        but: &["Aber "],
    },
    Keywords {
        code: "it",
        name: "Italian",
        feature: &["Funzionalità", "Esigenza di Business", "Abilità"],
        background: &["Contesto"],
        scenario: &["Esempio", "Scenario"],
        scenario_outline: &["Schema dello scenario"],
        examples: &["Esempi"],
        given: &["Dato ", "Data ", "Dati ", "Date "],
        when: &["Quando "],
        then: &["Allora "],
        and: &["E "],
        but: &["Ma "],
    },
    Keywords {
        code: "pt",
        name: "Portuguese",
        feature: &["Funcionalidade", "Característica", "Caracteristica"],
        background: &["Contexto", "Cenário de Fundo", "Cenario de Fundo", "Fundo"],
        scenario: &["Exemplo", "Cenário", "Cenario"],
        scenario_outline: &[
            "Esquema do Cenário",
            "Esquema do Cenario",
            "Delineação do Cenário",
            "Delineacao do Cenario",
        ],
        examples: &["Exemplos", "Cenários", "Cenarios"],
        given: &["Dado ", "Dada ", "Dados ", "Dadas "],
        when: &["Quando "],
        then: &["Então ", "Entao "],
        and: &["E "],
        but: &["Mas "],
    },
];

static DIALECTS: LazyLock<HashMap<&'static str, Dialect>> = LazyLock::new(|| {
    KEYWORDS
        .iter()
        .map(|keywords| (keywords.code, Dialect::from_keywords(keywords)))
        .collect()
});

fn longest_first(keywords: &[&'static str]) -> Vec<&'static str> {
    let mut sorted = keywords.to_vec();
    sorted.sort_by_key(|keyword| std::cmp::Reverse(keyword.chars().count()));
    sorted
}

impl Dialect {
    fn from_keywords(keywords: &Keywords) -> Self {
        let mut steps: Vec<&'static str> = [
            keywords.given,
            keywords.when,
            keywords.then,
            keywords.and,
            keywords.but,
            BULLET,
        ]
        .concat();
        let mut seen = HashSet::new();
        steps.retain(|keyword| seen.insert(*keyword));
        Self {
            code: keywords.code,
            name: keywords.name,
            feature: longest_first(keywords.feature),
            background: longest_first(keywords.background),
            scenario: longest_first(keywords.scenario),
            scenario_outline: longest_first(keywords.scenario_outline),
            examples: longest_first(keywords.examples),
            given: keywords.given.to_vec(),
            when: keywords.when.to_vec(),
            then: keywords.then.to_vec(),
            but: keywords.but.to_vec(),
            steps: longest_first(&steps),
        }
    }

    /// Look up the dialect registered for `code`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bdd_plan_gherkin::Dialect;
    ///
    /// assert_eq!(Dialect::get("es").map(Dialect::name), Some("Spanish"));
    /// assert!(Dialect::get("tlh").is_none());
    /// ```
    #[must_use]
    pub fn get(code: &str) -> Option<&'static Self> {
        DIALECTS.get(code)
    }

    /// The dialect used when a document does not declare its language.
    #[must_use]
    pub fn english() -> &'static Self {
        Self::get(DEFAULT_LANGUAGE)
            .unwrap_or_else(|| unreachable!("the default dialect is always registered"))
    }

    /// Codes of every registered dialect, sorted.
    #[must_use]
    pub fn available() -> Vec<&'static str> {
        let mut codes: Vec<_> = DIALECTS.keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    /// Language code, for example `en`.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// English name of the language.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Keywords introducing a feature.
    #[must_use]
    pub fn feature_keywords(&self) -> &[&'static str] {
        &self.feature
    }

    /// Keywords introducing a background.
    #[must_use]
    pub fn background_keywords(&self) -> &[&'static str] {
        &self.background
    }

    /// Keywords introducing a scenario.
    #[must_use]
    pub fn scenario_keywords(&self) -> &[&'static str] {
        &self.scenario
    }

    /// Keywords introducing a scenario outline.
    #[must_use]
    pub fn scenario_outline_keywords(&self) -> &[&'static str] {
        &self.scenario_outline
    }

    /// Keywords introducing an examples block.
    #[must_use]
    pub fn examples_keywords(&self) -> &[&'static str] {
        &self.examples
    }

    /// Every step keyword, trailing space included, longest first.
    #[must_use]
    pub fn step_keywords(&self) -> &[&'static str] {
        &self.steps
    }

    /// Classify a matched step keyword.
    ///
    /// The bullet keyword and unknown keywords are treated as conjunctions so
    /// they inherit the category of the preceding step.
    ///
    /// # Examples
    ///
    /// ```
    /// use bdd_plan_gherkin::{Dialect, StepKeyword};
    ///
    /// let es = Dialect::get("es").unwrap();
    /// assert_eq!(es.step_keyword_type("Cuando "), StepKeyword::When);
    /// assert_eq!(es.step_keyword_type("* "), StepKeyword::And);
    /// ```
    #[must_use]
    pub fn step_keyword_type(&self, keyword: &str) -> StepKeyword {
        let tables = [
            (&self.given, StepKeyword::Given),
            (&self.when, StepKeyword::When),
            (&self.then, StepKeyword::Then),
            (&self.but, StepKeyword::But),
        ];
        tables
            .into_iter()
            .find(|(keywords, _)| keywords.iter().any(|candidate| *candidate == keyword))
            .map_or(StepKeyword::And, |(_, kind)| kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn registers_every_language() {
        assert_eq!(Dialect::available(), vec!["de", "en", "es", "fr", "it", "pt"]);
    }

    #[test]
    fn english_is_the_default() {
        assert_eq!(Dialect::english().code(), DEFAULT_LANGUAGE);
    }

    #[test]
    fn orders_step_keywords_longest_first() {
        let fr = Dialect::get("fr").unwrap_or_else(|| panic!("french dialect"));
        let position = |keyword: &str| {
            fr.step_keywords()
                .iter()
                .position(|candidate| *candidate == keyword)
                .unwrap_or_else(|| panic!("missing keyword {keyword}"))
        };
        assert!(position("Et que ") < position("Et "));
        assert!(position("Sachant que ") < position("Sachant "));
    }

    #[rstest]
    #[case("en", "Given ", StepKeyword::Given)]
    #[case("en", "And ", StepKeyword::And)]
    #[case("de", "Gegeben sei ", StepKeyword::Given)]
    #[case("fr", "Lorsqu'", StepKeyword::When)]
    #[case("it", "Allora ", StepKeyword::Then)]
    #[case("pt", "Mas ", StepKeyword::But)]
    #[case("es", "* ", StepKeyword::And)]
    fn classifies_step_keywords(
        #[case] code: &str,
        #[case] keyword: &str,
        #[case] expected: StepKeyword,
    ) {
        let dialect = Dialect::get(code).unwrap_or_else(|| panic!("dialect {code}"));
        assert_eq!(dialect.step_keyword_type(keyword), expected);
    }
}
