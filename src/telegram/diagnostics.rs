//! `/info_mensagem`: describes the raw message back to the sender.

use chrono::FixedOffset;

use super::models::Message;
use crate::domain::format_sent_at;

/// Command word that asks for a message description
pub const INFO_COMMAND: &str = "info_mensagem";

fn or_unknown(value: Option<&str>) -> &str {
    value.unwrap_or("Não informado")
}

pub fn message_info(message: &Message, offset: &FixedOffset) -> String {
    let mut info = format!(
        "📝 *Informações da Mensagem* 📝\n\
         • *Conteúdo*: `{}`\n\
         • *Tipo de Chat*: `{}`\n\
         • *ID do Chat*: `{}`\n\
         • *ID da Mensagem*: `{}`\n\
         • *Data/Hora*: `{}`\n",
        message.text.as_deref().unwrap_or("Sem texto"),
        message.chat.kind,
        message.chat.id,
        message.message_id,
        format_sent_at(message.date, offset),
    );

    if let Some(topic) = message.topic_name() {
        info.push_str(&format!("• *Tópico*: `{topic}`\n"));
    }

    if let Some(user) = &message.from {
        info.push_str(&format!(
            "\n👤 *Informações do Remetente* 👤\n\
             • *ID*: `{}`\n\
             • *Nome*: `{}`\n\
             • *Sobrenome*: `{}`\n\
             • *Username*: @{}\n\
             • *É bot?*: {}\n",
            user.id,
            user.first_name,
            or_unknown(user.last_name.as_deref()),
            or_unknown(user.username.as_deref()),
            if user.is_bot { "Sim" } else { "Não" },
        ));
    }

    if matches!(message.chat.kind.as_str(), "group" | "supergroup" | "channel") {
        info.push_str(&format!(
            "\n👥 *Informações do Grupo/Canal* 👥\n\
             • *Título*: `{}`\n\
             • *Username*: @{}\n",
            or_unknown(message.chat.title.as_deref()),
            or_unknown(message.chat.username.as_deref()),
        ));
    }

    let entities = message.entities.as_deref().unwrap_or_default();
    if !entities.is_empty() {
        info.push_str("\n🔍 *Entidades na Mensagem* 🔍\n");
        for entity in entities {
            info.push_str(&format!(
                "• *Tipo*: `{}`\n• *Texto*: `{}`\n",
                entity.kind,
                message.entity_text(entity).unwrap_or_default(),
            ));
        }
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_message_is_fully_described() {
        let json = r#"{
            "message_id": 77, "date": 1735725600, "message_thread_id": 12,
            "chat": {"id": -100123, "type": "supergroup", "title": "Semcomp"},
            "from": {"id": 42, "is_bot": false, "first_name": "Maria", "username": "maria_monitora"},
            "text": "/info_mensagem",
            "entities": [{"type": "bot_command", "offset": 0, "length": 14}],
            "reply_to_message": {
                "message_id": 12, "date": 0,
                "chat": {"id": -100123, "type": "supergroup"},
                "forum_topic_created": {"name": "Tetris"}
            }
        }"#;
        let message: Message = serde_json::from_str(json).unwrap();
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();

        let info = message_info(&message, &offset);

        assert!(info.contains("• *ID do Chat*: `-100123`"));
        assert!(info.contains("• *Data/Hora*: `01/01/2025 07:00:00`"));
        assert!(info.contains("• *Tópico*: `Tetris`"));
        assert!(info.contains("• *Sobrenome*: `Não informado`"));
        assert!(info.contains("• *Título*: `Semcomp`"));
        assert!(info.contains("• *Texto*: `/info_mensagem`"));
    }

    #[test]
    fn test_private_message_without_sender() {
        let json = r#"{"message_id": 1, "date": 0, "chat": {"id": 5, "type": "private"}}"#;
        let message: Message = serde_json::from_str(json).unwrap();

        let info = message_info(&message, &FixedOffset::east_opt(0).unwrap());

        assert!(info.contains("`Sem texto`"));
        assert!(!info.contains("Remetente"));
        assert!(!info.contains("Grupo/Canal"));
    }
}
