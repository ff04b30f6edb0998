//! Glossary provider: term/definition pairs plus the difficulty table.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::{GlossaryError, SessionError};
use crate::parser;
use crate::types::{Difficulty, Pair};

/// Pair count and label for one difficulty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyLevel {
    pub pairs: usize,
    pub description: String,
}

impl DifficultyLevel {
    pub fn new(pairs: usize, description: impl Into<String>) -> Self {
        Self {
            pairs,
            description: description.into(),
        }
    }
}

/// Difficulty to pair-count table.
///
/// Deserialization goes through [`DifficultyTable::new`], so a loaded table is
/// checked the same way as one built in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<Difficulty, DifficultyLevel>",
    into = "BTreeMap<Difficulty, DifficultyLevel>"
)]
pub struct DifficultyTable {
    levels: BTreeMap<Difficulty, DifficultyLevel>,
}

impl DifficultyTable {
    /// Build a table; every supported difficulty must deal at least one pair.
    pub fn new(
        levels: impl IntoIterator<Item = (Difficulty, DifficultyLevel)>,
    ) -> Result<Self, GlossaryError> {
        let levels: BTreeMap<Difficulty, DifficultyLevel> = levels.into_iter().collect();

        for difficulty in Difficulty::ALL {
            let level = levels
                .get(&difficulty)
                .ok_or(GlossaryError::MissingLevel(difficulty))?;
            // An empty deck could never reach completion
            if level.pairs == 0 {
                return Err(GlossaryError::EmptyLevel(difficulty));
            }
        }
        Ok(Self { levels })
    }

    pub fn level(&self, difficulty: Difficulty) -> Option<&DifficultyLevel> {
        self.levels.get(&difficulty)
    }

    /// Number of pairs dealt for a difficulty.
    pub fn pair_count(&self, difficulty: Difficulty) -> Option<usize> {
        self.level(difficulty).map(|level| level.pairs)
    }

    /// Levels in easy, medium, hard order.
    pub fn iter(&self) -> impl Iterator<Item = (Difficulty, &DifficultyLevel)> {
        self.levels.iter().map(|(d, level)| (*d, level))
    }
}

impl TryFrom<BTreeMap<Difficulty, DifficultyLevel>> for DifficultyTable {
    type Error = GlossaryError;

    fn try_from(levels: BTreeMap<Difficulty, DifficultyLevel>) -> Result<Self, Self::Error> {
        Self::new(levels)
    }
}

impl From<DifficultyTable> for BTreeMap<Difficulty, DifficultyLevel> {
    fn from(table: DifficultyTable) -> Self {
        table.levels
    }
}

impl Default for DifficultyTable {
    fn default() -> Self {
        let levels = [
            (Difficulty::Easy, DifficultyLevel::new(6, "6 paires - Facile")),
            (Difficulty::Medium, DifficultyLevel::new(8, "8 paires - Moyen")),
            (Difficulty::Hard, DifficultyLevel::new(10, "10 paires - Difficile")),
        ];
        Self {
            levels: levels.into_iter().collect(),
        }
    }
}

/// Ordered pairs and the table that says how many of them each difficulty uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glossary {
    pairs: Vec<Pair>,
    levels: DifficultyTable,
}

impl Glossary {
    /// Create a glossary, rejecting empty input and duplicate pair ids.
    pub fn new(pairs: Vec<Pair>, levels: DifficultyTable) -> Result<Self, GlossaryError> {
        if pairs.is_empty() {
            return Err(GlossaryError::Empty);
        }

        let mut seen = HashSet::new();
        for (idx, pair) in pairs.iter().enumerate() {
            if !seen.insert(pair.id) {
                return Err(GlossaryError::DuplicatePairId {
                    id: pair.id,
                    position: idx,
                });
            }
        }

        Ok(Self { pairs, levels })
    }

    /// Parse a markdown glossary and pair it with the default difficulty table.
    pub fn from_markdown(content: &str) -> Result<Self, GlossaryError> {
        Self::new(parser::parse(content)?, DifficultyTable::default())
    }

    /// The ISO 13485 glossary shipped with the game.
    pub fn builtin() -> Self {
        let pairs = BUILTIN_PAIRS
            .iter()
            .map(|&(id, term, definition)| Pair {
                id,
                term: term.to_string(),
                definition: definition.to_string(),
            })
            .collect();

        Self {
            pairs,
            levels: DifficultyTable::default(),
        }
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn levels(&self) -> &DifficultyTable {
        &self.levels
    }

    /// The first `pair_count(difficulty)` pairs, in glossary order.
    pub fn pairs_for(&self, difficulty: Difficulty) -> Result<&[Pair], SessionError> {
        let required = self
            .levels
            .pair_count(difficulty)
            .ok_or_else(|| SessionError::UnsupportedDifficulty(difficulty.to_string()))?;

        if self.pairs.len() < required {
            return Err(SessionError::GlossaryTooShort {
                difficulty,
                required,
                available: self.pairs.len(),
            });
        }
        Ok(&self.pairs[..required])
    }
}

const BUILTIN_PAIRS: [(i64, &str, &str); 10] = [
    (
        1,
        "ISO 13485",
        "Norme internationale pour les systèmes de management de la qualité des dispositifs médicaux",
    ),
    (
        2,
        "Dispositif médical",
        "Instrument, appareil ou équipement destiné à être utilisé chez l'homme à des fins médicales",
    ),
    (
        3,
        "Gestion des risques",
        "Application systématique de politiques, procédures et pratiques de management aux tâches d'analyse, d'évaluation et de maîtrise du risque",
    ),
    (
        4,
        "Surveillance post-commercialisation",
        "Activités entreprises par le fabricant pour collecter et examiner l'expérience acquise avec un dispositif médical",
    ),
    (
        5,
        "Organisme notifié",
        "Organisme désigné par l'autorité compétente pour effectuer l'évaluation de la conformité",
    ),
    (
        6,
        "DHF (Design History File)",
        "Compilation de documents qui décrit l'historique de conception d'un dispositif médical fini",
    ),
    (
        7,
        "DMR (Device Master Record)",
        "Compilation de documents contenant les procédures et spécifications pour un dispositif médical fini",
    ),
    (
        8,
        "CAPA",
        "Actions correctives et préventives - Processus pour éliminer les causes des non-conformités",
    ),
    (
        9,
        "Validation",
        "Confirmation par examen et apport de preuves objectives que les exigences pour une utilisation spécifique prévue sont satisfaites",
    ),
    (
        10,
        "Traçabilité",
        "Aptitude à retrouver l'historique, l'utilisation ou la localisation d'un article ou d'une activité",
    ),
];
