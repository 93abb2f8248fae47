//! Trello JSON shapes and their translation into domain types.

use relay::{BoardLabel, BoardList, LabelId, ListId, Record, RecordId, Webhook, WebhookId};
use serde::Deserialize;

/// Card as returned by `GET /1/cards/{id}` and `GET /1/lists/{id}/cards`.
#[derive(Debug, Deserialize)]
pub(crate) struct CardDto {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "idList", default)]
    pub id_list: Option<ListId>,
}

impl From<CardDto> for Record {
    fn from(card: CardDto) -> Self {
        Record {
            id: card.id,
            name: card.name,
            description: card.desc,
            url: card.url,
            list_id: card.id_list,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListDto {
    pub id: ListId,
    pub name: String,
}

impl From<ListDto> for BoardList {
    fn from(list: ListDto) -> Self {
        BoardList {
            id: list.id,
            name: list.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LabelDto {
    pub id: LabelId,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<LabelDto> for BoardLabel {
    fn from(label: LabelDto) -> Self {
        BoardLabel {
            id: label.id,
            name: label.name.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WebhookDto {
    pub id: WebhookId,
    #[serde(rename = "idModel")]
    pub id_model: String,
    #[serde(rename = "callbackURL")]
    pub callback_url: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<WebhookDto> for Webhook {
    fn from(hook: WebhookDto) -> Self {
        Webhook {
            id: hook.id,
            model_id: hook.id_model,
            callback_url: hook.callback_url,
            description: hook.description.filter(|d| !d.is_empty()),
        }
    }
}
