// System instruction for the remote model

use crate::approach::Approach;
use crate::insights::UserInsight;
use crate::sentiment::SentimentVerdict;

const PERSONA: &str = "Você é um companheiro virtual de apoio emocional. Fale em português do \
Brasil, com acolhimento, empatia e sem julgamentos. Respostas curtas (até 4 frases), validando \
sentimentos antes de sugerir qualquer coisa. Você não é terapeuta e não faz diagnósticos; quando \
fizer sentido, incentive a busca por ajuda profissional.";

const ETHICS: &str = "Princípios: respeite a autonomia da pessoa; use redução de danos em vez de \
moralismo; não prescreva medicamentos nem doses; não prometa resultados; preserve a privacidade \
e não peça dados pessoais sensíveis; reconheça limites e encaminhe para profissionais quando o \
assunto exigir.";

const SAFETY: &str = "Segurança: se a pessoa mencionar suicídio, automutilação ou risco à vida, \
não tente lidar sozinho. Demonstre cuidado e oriente a ligar imediatamente para o CVV (188, \
gratuito, 24 horas) ou o SAMU (192).";

const NO_INSIGHTS: &str = "Nenhuma informação prévia.";

pub struct SystemPrompt;

impl SystemPrompt {
    /// Assemble the system instruction for one turn
    pub fn build(approach: Approach, insights: &[UserInsight]) -> String {
        let insight_block = if insights.is_empty() {
            NO_INSIGHTS.to_string()
        } else {
            insights
                .iter()
                .map(|insight| format!("- {}", insight.text))
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            "{}\n\n{}\n\n{}\n\nAbordagem atual ({}): {}\n\nO que você já sabe sobre o usuário:\n{}",
            PERSONA,
            ETHICS,
            SAFETY,
            approach.id(),
            approach.description(),
            insight_block
        )
    }

    /// Bracketed context placed before the user's text
    pub fn context_prefix(verdict: &SentimentVerdict, approach: Approach) -> String {
        format!(
            "[Contexto: sentimento={}, abordagem={}]",
            verdict.level,
            approach.id()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::SentimentLevel;

    #[test]
    fn test_prompt_without_insights_uses_placeholder() {
        let prompt = SystemPrompt::build(Approach::General, &[]);
        assert!(prompt.contains(NO_INSIGHTS));
        assert!(prompt.contains("188"));
        assert!(prompt.contains("Abordagem atual (general)"));
    }

    #[test]
    fn test_prompt_lists_insights() {
        let insights = vec![
            UserInsight::new("Trabalha em turnos noturnos."),
            UserInsight::new("Caminhar ajuda a acalmar."),
        ];
        let prompt = SystemPrompt::build(Approach::Mindfulness, &insights);

        assert!(prompt.contains("- Trabalha em turnos noturnos.\n- Caminhar ajuda a acalmar."));
        assert!(!prompt.contains(NO_INSIGHTS));
        assert!(prompt.contains(Approach::Mindfulness.description()));
    }

    #[test]
    fn test_context_prefix() {
        let verdict = SentimentVerdict {
            level: SentimentLevel::Negative,
            score: 20,
            risks: vec![],
        };
        assert_eq!(
            SystemPrompt::context_prefix(&verdict, Approach::HarmReduction),
            "[Contexto: sentimento=negative, abordagem=harm_reduction]"
        );
    }
}
