use serde::{Deserialize, Serialize};

use crate::domain::IncomingCommand;

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub date: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
    pub message_thread_id: Option<i64>,
    pub reply_to_message: Option<Box<Message>>,
    pub forum_topic_created: Option<ForumTopicCreated>,
    pub entities: Option<Vec<MessageEntity>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForumTopicCreated {
    pub name: String,
}

/// Command, mention or link inside a message; offsets count UTF-16 units
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub kind: String,
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Serialize)]
pub struct GetUpdates {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_thread_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_parameters: Option<ReplyParameters>,
}

#[derive(Debug, Serialize)]
pub struct ReplyParameters {
    pub message_id: i64,
    pub allow_sending_without_reply: bool,
}

/// Where a reply to a message has to go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyTarget {
    pub chat_id: i64,
    pub message_id: i64,
    pub thread_id: Option<i64>,
}

impl Message {
    /// Name of the forum topic this message was posted in.
    ///
    /// Inside a topic every message replies to the service message that
    /// created the topic.
    pub fn topic_name(&self) -> Option<&str> {
        self.reply_to_message
            .as_ref()
            .and_then(|parent| parent.forum_topic_created.as_ref())
            .map(|topic| topic.name.as_str())
    }

    /// Sender handle: username, else first name, else numeric id
    pub fn actor(&self) -> String {
        match &self.from {
            Some(User {
                username: Some(username),
                ..
            }) => username.clone(),
            Some(user) if !user.first_name.is_empty() => user.first_name.clone(),
            Some(user) => user.id.to_string(),
            None => "desconhecido".to_string(),
        }
    }

    pub fn reply_target(&self) -> ReplyTarget {
        ReplyTarget {
            chat_id: self.chat.id,
            message_id: self.message_id,
            thread_id: self.message_thread_id,
        }
    }

    /// Text covered by `entity`, when the offsets fall inside the text
    pub fn entity_text(&self, entity: &MessageEntity) -> Option<String> {
        let units: Vec<u16> = self.text.as_deref()?.encode_utf16().collect();
        let covered = units.get(entity.offset..entity.offset.checked_add(entity.length)?)?;
        Some(String::from_utf16_lossy(covered))
    }

    pub fn is_from_bot(&self) -> bool {
        self.from.as_ref().is_some_and(|user| user.is_bot)
    }

    pub fn to_command(&self) -> Option<IncomingCommand> {
        let text = self.text.as_ref()?;
        Some(IncomingCommand {
            text: text.clone(),
            game: self.topic_name().map(str::to_string),
            actor: self.actor(),
            sent_at: self.date,
        })
    }
}
