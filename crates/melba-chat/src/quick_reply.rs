//! Canned quick-reply buttons shown under the chat log.

use serde::{Deserialize, Serialize};

use crate::replies::ReplyBook;
use crate::types::{Reply, ReplyKind};

/// A quick-reply button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickReply {
    /// "Our Services".
    Services,
    /// "Contact Sales".
    Contact,
    /// Any other button type.
    Help,
}

impl QuickReply {
    /// Parse a button type as sent by the widget. Unknown types map to
    /// [`QuickReply::Help`].
    pub fn parse(reply_type: &str) -> Self {
        match reply_type.trim().to_ascii_lowercase().as_str() {
            "services" => QuickReply::Services,
            "contact" => QuickReply::Contact,
            _ => QuickReply::Help,
        }
    }

    /// Fixed reply for this button. Never reads or changes conversation
    /// context.
    pub fn reply(&self, book: &ReplyBook) -> Reply {
        match self {
            QuickReply::Services => Reply::new(ReplyKind::QuickReplyServices, book.quick_services()),
            QuickReply::Contact => Reply::new(ReplyKind::QuickReplyContact, book.quick_contact()),
            QuickReply::Help => Reply::new(ReplyKind::QuickReplyHelp, book.quick_help()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_types() {
        assert_eq!(QuickReply::parse("services"), QuickReply::Services);
        assert_eq!(QuickReply::parse(" Contact "), QuickReply::Contact);
    }

    #[test]
    fn test_parse_unknown_falls_back_to_help() {
        assert_eq!(QuickReply::parse("portfolio"), QuickReply::Help);
        assert_eq!(QuickReply::parse(""), QuickReply::Help);
    }

    #[test]
    fn test_replies() {
        let book = ReplyBook::default();
        let services = QuickReply::Services.reply(&book);
        assert_eq!(services.kind, ReplyKind::QuickReplyServices);
        assert!(services.text.contains("Web Development"));

        let contact = QuickReply::Contact.reply(&book);
        assert_eq!(contact.kind, ReplyKind::QuickReplyContact);
        assert!(contact.text.contains("href='/contact'"));

        let help = QuickReply::Help.reply(&book);
        assert_eq!(help.kind, ReplyKind::QuickReplyHelp);
        assert!(!help.text.is_empty());
    }

    #[test]
    fn test_deserialize_snake_case() {
        let q: QuickReply = serde_json::from_str("\"contact\"").unwrap();
        assert_eq!(q, QuickReply::Contact);
    }
}
