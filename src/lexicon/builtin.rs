// Built-in Portuguese tables

use super::{KnowledgeBase, LevelTable, RiskKeywords};
use crate::approach::Approach;
use std::collections::HashMap;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub(super) fn risk_keywords() -> RiskKeywords {
    RiskKeywords {
        high: strings(&[
            "quero morrer",
            "me matar",
            "suicídio",
            "suicidio",
            "suicidar",
            "tirar minha vida",
            "tirar a minha vida",
            "acabar com a minha vida",
            "acabar com tudo",
            "não quero mais viver",
            "nao quero mais viver",
            "não aguento mais viver",
            "me cortar",
            "automutilação",
            "automutilacao",
            "me enforcar",
            "overdose",
            "melhor sem mim",
        ]),
        medium: strings(&[
            "ansiedade",
            "ansioso",
            "ansiosa",
            "depressão",
            "depressao",
            "deprimido",
            "deprimida",
            "triste",
            "infeliz",
            "sozinho",
            "sozinha",
            "solidão",
            "solidao",
            "pânico",
            "panico",
            "estresse",
            "estressado",
            "estressada",
            "trabalho",
            "sono",
            "insônia",
            "insonia",
            "desesperado",
            "desesperada",
            "sem esperança",
            "chorando",
            "vazio",
            "vazia",
        ]),
        low: strings(&[
            "chateado",
            "chateada",
            "preocupado",
            "preocupada",
            "irritado",
            "irritada",
            "nervoso",
            "nervosa",
            "cansado",
            "cansada",
            "desanimado",
            "desanimada",
            "entediado",
            "entediada",
            "frustrado",
            "frustrada",
            "inseguro",
            "insegura",
        ]),
    }
}

pub(super) fn positive_words() -> Vec<String> {
    strings(&[
        "feliz",
        "felicidade",
        "alegre",
        "tranquilo",
        "tranquila",
        "calmo",
        "grato",
        "grata",
        "gratidão",
        "empolgado",
        "empolgada",
        "ótimo",
        "otimo",
        "maravilhoso",
        "incrível",
        "incrivel",
        "orgulhoso",
        "orgulhosa",
        "esperançoso",
        "aliviado",
        "aliviada",
    ])
}

pub(super) fn crisis_responses() -> Vec<String> {
    strings(&[
        "Sinto muito que você esteja passando por uma dor tão grande. Você não está sozinho. \
         Por favor, ligue agora para o CVV no 188, é gratuito e funciona 24 horas.",
        "O que você está sentindo importa muito, e sua vida também. Vou te mostrar seus \
         contatos de emergência. Se puder, ligue para o CVV (188) agora mesmo.",
        "Estou preocupado com a sua segurança. Você merece apoio imediato: o CVV atende \
         pelo 188 e o SAMU pelo 192. Vou ajudar você a entrar em contato com alguém.",
    ])
}

pub(super) fn level_responses() -> LevelTable {
    LevelTable {
        crisis: Vec::new(),
        negative: strings(&[
            "Sinto muito que você esteja se sentindo assim. Quer me contar um pouco mais sobre o que está acontecendo?",
            "Parece que as coisas estão pesadas agora. Seus sentimentos são válidos e estou aqui para ouvir.",
            "Obrigado por compartilhar isso comigo. Não é fácil falar sobre o que dói.",
            "Às vezes tudo parece demais ao mesmo tempo. Vamos olhar para isso com calma, um passo de cada vez.",
        ]),
        neutral: strings(&[
            "Estou aqui para ouvir. Como você está se sentindo agora?",
            "Entendo. Me conta mais sobre isso?",
            "Obrigado por compartilhar. O que mais está passando pela sua cabeça?",
            "Pode falar à vontade, sem pressa.",
        ]),
        positive: strings(&[
            "Que bom saber disso! Fico feliz que você esteja se sentindo bem.",
            "Isso é ótimo! O que contribuiu para esse momento bom?",
            "Adoro ouvir isso. Vale a pena guardar esse sentimento com carinho.",
            "Que notícia boa! Celebrar as pequenas vitórias faz muita diferença.",
        ]),
    }
}

pub(super) fn follow_ups() -> LevelTable {
    LevelTable {
        crisis: Vec::new(),
        negative: strings(&[
            "Há quanto tempo você vem se sentindo assim?",
            "Tem alguém de confiança com quem você possa conversar sobre isso?",
            "O que costuma te ajudar quando você se sente assim?",
        ]),
        neutral: strings(&[
            "Como foi o seu dia hoje?",
            "Tem algo em especial que você gostaria de conversar?",
            "Como você tem dormido ultimamente?",
        ]),
        positive: strings(&[
            "O que você pode fazer para manter esse sentimento?",
            "Quer me contar mais sobre o que te deixou assim?",
            "Com quem você gostaria de compartilhar essa alegria?",
        ]),
    }
}

pub(super) fn activities() -> Vec<String> {
    strings(&[
        "Faça a respiração 4-7-8: inspire por 4 segundos, segure por 7, expire por 8.",
        "Dê uma caminhada curta, de 10 minutos, prestando atenção ao redor.",
        "Escreva três coisas que você está sentindo agora, sem julgá-las.",
        "Beba um copo de água e alongue o corpo por alguns minutos.",
        "Mande uma mensagem para alguém de confiança.",
        "Ouça uma música que te acalma.",
    ])
}

pub(super) fn knowledge_bases() -> HashMap<Approach, KnowledgeBase> {
    let mut bases = HashMap::new();

    bases.insert(
        Approach::General,
        KnowledgeBase {
            keywords: strings(&["dormir", "respirar", "amigos", "família", "familia"]),
            responses: strings(&[
                "Cuidar do sono, da respiração e das relações faz diferença no dia a dia. Quer pensar junto comigo em algo pequeno que você possa fazer hoje?",
                "As pessoas ao nosso redor podem ser um grande apoio. Como estão as suas relações ultimamente?",
                "Respirar devagar por alguns instantes já ajuda o corpo a desacelerar. Quer tentar comigo?",
            ]),
            fallback_prefix: None,
        },
    );

    bases.insert(
        Approach::Cbt,
        KnowledgeBase {
            keywords: strings(&["sempre", "nunca", "ninguém", "ninguem", "pensamento", "culpa"]),
            responses: strings(&[
                "Percebi palavras como 'sempre' ou 'nunca'. Será que existe alguma exceção a esse pensamento?",
                "Que evidências você tem a favor e contra esse pensamento?",
                "Se um amigo estivesse nessa situação, o que você diria a ele?",
                "Vamos separar o fato da interpretação: o que aconteceu e o que você pensou sobre isso?",
            ]),
            fallback_prefix: Some("Olhando para os seus pensamentos,".to_string()),
        },
    );

    bases.insert(
        Approach::Mindfulness,
        KnowledgeBase {
            keywords: strings(&["respira", "agora", "corpo", "presente", "acalmar"]),
            responses: strings(&[
                "Vamos fazer uma pausa: perceba cinco coisas que você consegue ver ao seu redor.",
                "Traga a atenção para a sua respiração. Inspire devagar, e solte o ar ainda mais devagar.",
                "Note onde esse sentimento aparece no seu corpo, sem tentar mudá-lo, apenas observando.",
            ]),
            fallback_prefix: Some("Trazendo a atenção para o momento presente,".to_string()),
        },
    );

    bases.insert(
        Approach::HarmReduction,
        KnowledgeBase {
            keywords: strings(&["beber", "álcool", "alcool", "usar", "droga", "remédio", "remedio"]),
            responses: strings(&[
                "Sem julgamentos: o que poderia tornar essa situação um pouco mais segura para você?",
                "Pequenos passos contam. Existe algo que você poderia reduzir ou ajustar hoje?",
                "Sua segurança vem em primeiro lugar. Você tem alguém por perto se precisar de ajuda?",
            ]),
            fallback_prefix: Some("Pensando na sua segurança, sem julgamentos,".to_string()),
        },
    );

    bases.insert(
        Approach::Acceptance,
        KnowledgeBase {
            keywords: strings(&["aceitar", "valores", "controle", "lutar", "evitar"]),
            responses: strings(&[
                "Às vezes lutar contra um sentimento o deixa mais forte. E se você desse um pouco de espaço para ele?",
                "O que realmente importa para você nessa situação? Quais valores você quer honrar?",
                "Você não precisa gostar desse sentimento para seguir em direção ao que importa.",
            ]),
            fallback_prefix: Some("Acolhendo o que você sente,".to_string()),
        },
    );

    bases.insert(
        Approach::Friend,
        KnowledgeBase {
            keywords: strings(&["cara", "amigo", "amiga", "conversar", "desabafar"]),
            responses: strings(&[
                "Pode desabafar comigo, tô aqui pra você!",
                "Poxa, entendo demais. Me conta tudo, sem filtro.",
                "Você não precisa passar por isso sozinho. Bora conversar?",
            ]),
            fallback_prefix: Some("Falando como amigo,".to_string()),
        },
    );

    bases.insert(
        Approach::Mentor,
        KnowledgeBase {
            keywords: strings(&["decisão", "decisao", "futuro", "carreira", "objetivo"]),
            responses: strings(&[
                "Grandes decisões ficam mais leves quando divididas em partes. Qual seria o primeiro passo?",
                "Olhando daqui a um ano, o que você gostaria de ter feito hoje?",
                "O que essa situação está tentando te ensinar?",
            ]),
            fallback_prefix: Some("Com a experiência de quem já viu muitos caminhos,".to_string()),
        },
    );

    bases
}
