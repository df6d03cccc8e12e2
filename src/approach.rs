// Therapeutic approach selection
//
// The approach is carried per conversation (see companion::ChatSession) and
// passed into every generation call.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Therapeutic lens or persona the companion answers with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Approach {
    /// Plain supportive listening
    #[default]
    General,
    /// Cognitive behavioural therapy framing
    Cbt,
    /// Present-moment awareness
    Mindfulness,
    /// Harm reduction, non-judgemental
    HarmReduction,
    /// Acceptance and commitment therapy
    Acceptance,
    /// Persona: a close friend
    Friend,
    /// Persona: an experienced mentor
    Mentor,
}

impl Approach {
    pub const ALL: [Approach; 7] = [
        Approach::General,
        Approach::Cbt,
        Approach::Mindfulness,
        Approach::HarmReduction,
        Approach::Acceptance,
        Approach::Friend,
        Approach::Mentor,
    ];

    /// Stable identifier used in settings and on the CLI
    pub fn id(&self) -> &'static str {
        match self {
            Approach::General => "general",
            Approach::Cbt => "cbt",
            Approach::Mindfulness => "mindfulness",
            Approach::HarmReduction => "harm_reduction",
            Approach::Acceptance => "acceptance",
            Approach::Friend => "friend",
            Approach::Mentor => "mentor",
        }
    }

    pub fn is_general(&self) -> bool {
        matches!(self, Approach::General)
    }

    /// Whether this entry is a persona rather than a therapeutic lens
    pub fn is_persona(&self) -> bool {
        matches!(self, Approach::Friend | Approach::Mentor)
    }

    /// Posture description embedded in the remote system prompt
    pub fn description(&self) -> &'static str {
        match self {
            Approach::General => {
                "Escuta acolhedora e empática, sem julgamentos, validando sentimentos."
            }
            Approach::Cbt => {
                "Terapia cognitivo-comportamental: ajude a identificar pensamentos automáticos, \
                 distorções cognitivas e a buscar interpretações alternativas."
            }
            Approach::Mindfulness => {
                "Mindfulness: traga a atenção para o momento presente, a respiração e as \
                 sensações do corpo, com aceitação."
            }
            Approach::HarmReduction => {
                "Redução de danos: sem julgamento moral, priorize a segurança e passos \
                 pequenos e realistas."
            }
            Approach::Acceptance => {
                "Terapia de aceitação e compromisso: acolha emoções difíceis e conecte a \
                 pessoa aos seus valores."
            }
            Approach::Friend => {
                "Persona de amigo próximo: linguagem leve, calorosa e informal."
            }
            Approach::Mentor => {
                "Persona de mentor experiente: calma, perspectiva e perguntas que estimulam \
                 reflexão."
            }
        }
    }
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Approach {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        for approach in Approach::ALL {
            if approach.id() == wanted {
                return Ok(approach);
            }
        }
        bail!(
            "Unknown approach '{}'. Available: {}",
            s,
            Approach::ALL
                .iter()
                .map(|a| a.id())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
