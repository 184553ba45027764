//! Reply texts sent back to the chat.

use crate::config::Game;
use crate::domain::{Outcome, PlayerRecord};
use crate::parser::Keyword;

/// Scores are shown with at least one decimal place (`10.0`, `250.5`)
pub fn format_score(score: f64) -> String {
    format!("{score:?}")
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or("-")
}

pub fn welcome() -> String {
    "Falaa, meu fii! Eu sou o Bot do Semcomp! \
     Se quiser saber de algum comando, clique aqui -> /help\n"
        .to_string()
}

pub fn help() -> String {
    [
        "📌 **Bot da Semcomp - Comandos Principais**",
        "",
        "⚠️ **ATENTE-SE ÀS VÍRGULAS**",
        "",
        "🎯 **Comando /add** – Adicionar pontos de jogadores",
        "Existem **3 formas de usar**:",
        "1️⃣ `/add id, nome, contato, pontuação`",
        "2️⃣ `/add nome, contato, pontuação`",
        "3️⃣ `/add id, pontuação`",
        "",
        "ℹ️ Observação: este comando **só aumenta a pontuação** se a nova for maior que a anterior. \
         Então, use sempre que quiser registrar a tentativa do jogador.",
        "",
        "🔍 **Comando /busca** – Consulta informações do jogador na planilha",
        "`/busca id` ou `/busca nome, contato`",
        "",
        "🛠️ **Comando /ajuste** – Ajusta pontuação manualmente, caso algo dê errado",
        "",
        "🎮 Envie os comandos dentro do tópico do jogo.",
    ]
    .join("\n")
}

pub fn usage(keyword: Keyword) -> String {
    match keyword {
        Keyword::Submit => "⚠️ Use o comando no formato:\n\
                            `/add id, nome, contato, pontuação`\n\
                            `/add nome, contato, pontuação`\n\
                            `/add id, pontuação`"
            .to_string(),
        Keyword::Lookup => "⚠️ Formato: `/busca id` ou `/busca nome, contato`".to_string(),
        Keyword::Adjust => "⚠️ Formato: `/ajuste id, pontuação` ou `/ajuste nome, contato, pontuação` \
                            ou `/ajuste id, nome, contato, pontuação`"
            .to_string(),
        Keyword::Start | Keyword::Help => help(),
    }
}

pub fn outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Created {
            id,
            name,
            contact,
            game,
            score,
            actor,
            timestamp,
        } => format!(
            "🆕 **Novo jogador registrado!**\n\
             🆔 ID: {id}\n\
             👤 Nome: {}\n\
             📞 Contato: {}\n\
             🎮 Jogo: {game}\n\
             🏅 Pontuação inicial: {}\n\
             🕒 Registrado por @{actor} às {timestamp}",
            or_dash(name.as_deref()),
            or_dash(contact.as_deref()),
            format_score(*score),
        ),
        Outcome::Updated {
            name,
            game,
            previous,
            current,
            actor,
            timestamp,
        } => format!(
            "🏆 **Parabéns, {name}!**\n\
             🎮 Jogo: {game}\n\
             ⬆️ Pontos antigos: {}\n\
             ✨ Pontos novos: {}\n\
             🕒 Atualizado por @{actor} às {timestamp}",
            format_score(*previous),
            format_score(*current),
        ),
        Outcome::Unchanged {
            name,
            game,
            current,
            attempted,
        } => format!(
            "⚠️ **Nada mudou para {name}**\n\
             🎮 Jogo: {game}\n\
             Pontuação atual: {}\n\
             Tentativa de registro: {} (não foi suficiente para atualizar)",
            format_score(*current),
            format_score(*attempted),
        ),
        Outcome::Adjusted {
            name,
            game,
            score,
            actor,
            timestamp,
        } => format!(
            "🛠️ **Pontuação ajustada com sucesso!**\n\
             👤 Jogador: {name}\n\
             🎮 Jogo: {game}\n\
             🏅 Nova pontuação: {}\n\
             🕒 Alterado manualmente por @{actor} às {timestamp}",
            format_score(*score),
        ),
    }
}

pub fn found(row: usize, player: &PlayerRecord) -> String {
    let mut reply = format!(
        "🏆 **Jogador encontrado na linha {row}:**\n\
         🆔 ID: {}\n\
         👤 Nome: {}\n\
         📞 Contato: {}\n\n\
         🎮 **Pontuações:**\n",
        player.id(),
        player.name(),
        player.contact(),
    );
    for game in Game::ALL {
        let score = Some(player.raw_score(game))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or("0");
        reply.push_str(&format!(
            "• {game}: {score} às {}\n",
            or_dash(Some(player.timestamp(game)))
        ));
    }
    reply
}

pub fn player_not_found() -> String {
    "❌ Jogador não encontrado.".to_string()
}

pub fn invalid_score(raw: &str) -> String {
    format!("❌ **Pontuação inválida:** `{raw}`")
}

pub fn unknown_game(topic: &str) -> String {
    let topic = if topic.is_empty() { "(nenhum tópico)" } else { topic };
    format!(
        "❌ **Jogo desconhecido:** `{topic}`\n\
         Envie o comando como resposta dentro do tópico de um destes jogos: {}",
        Game::names().join(", ")
    )
}

pub fn store_failure(cause: &str) -> String {
    format!("😵 Desculpe, não consegui acessar a planilha agora.\nMotivo: {cause}\nTente novamente em instantes.")
}

pub fn unexpected_failure() -> String {
    "😵 Desculpe, algo deu errado ao processar o comando. Tente novamente.".to_string()
}
