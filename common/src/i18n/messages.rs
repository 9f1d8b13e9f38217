//! Translation sources for the built-in catalog.
//!
//! Rows are listed in identifier order; `message_ids` names each row. A
//! `None` translation falls back to the untranslated text.

use super::MessageId;

/// Locales shipped with the built-in catalog, in slot order.
pub const LOCALES: [&str; 5] = ["de", "en_US@snarky", "fr_FR", "pt_BR", "sv_SE"];

const LOCALE_COUNT: usize = LOCALES.len();

/// Identifiers of the built-in messages.
pub mod message_ids {
    use super::MessageId;

    /// "unclosed block comment"
    pub const UNCLOSED_BLOCK_COMMENT: MessageId = MessageId::new(0);
    /// "unopened block comment"
    pub const UNOPENED_BLOCK_COMMENT: MessageId = MessageId::new(1);
    /// "unclosed string literal"
    pub const UNCLOSED_STRING_LITERAL: MessageId = MessageId::new(2);
    /// "unclosed template"
    pub const UNCLOSED_TEMPLATE: MessageId = MessageId::new(3);
    /// "unexpected '{0}'"
    pub const UNEXPECTED_CHARACTER: MessageId = MessageId::new(4);
}

pub(crate) struct MessageSource {
    pub(crate) id: MessageId,
    pub(crate) untranslated: &'static str,
    pub(crate) translations: [Option<&'static str>; LOCALE_COUNT],
}

pub(crate) const MESSAGES: &[MessageSource] = &[
    MessageSource {
        id: message_ids::UNCLOSED_BLOCK_COMMENT,
        untranslated: "unclosed block comment",
        translations: [
            Some("nicht geschlossener Blockkommentar"),
            Some("/* unclosed block comment"),
            Some("commentaire de bloc non fermé"),
            Some("comentário de bloco não fechado"),
            Some("oavslutad blockkommentar"),
        ],
    },
    MessageSource {
        id: message_ids::UNOPENED_BLOCK_COMMENT,
        untranslated: "unopened block comment",
        translations: [
            Some("nicht geöffneter Blockkommentar"),
            Some("unopened block comment */"),
            Some("commentaire de bloc non ouvert"),
            None,
            Some("oöppnad blockkommentar"),
        ],
    },
    MessageSource {
        id: message_ids::UNCLOSED_STRING_LITERAL,
        untranslated: "unclosed string literal",
        translations: [
            Some("nicht geschlossenes Zeichenkettenliteral"),
            Some("\"unclosed string literal"),
            Some("chaîne de caractères non fermée"),
            Some("string literal não fechada"),
            Some("oavslutad strängliteral"),
        ],
    },
    MessageSource {
        id: message_ids::UNCLOSED_TEMPLATE,
        untranslated: "unclosed template",
        translations: [
            Some("nicht geschlossenes Template"),
            Some("`unclosed template"),
            Some("modèle non fermé"),
            None,
            None,
        ],
    },
    MessageSource {
        id: message_ids::UNEXPECTED_CHARACTER,
        untranslated: "unexpected '{0}'",
        translations: [
            Some("unerwartetes '{0}'"),
            Some("'{0}'? what is that doing here"),
            Some("'{0}' inattendu"),
            Some("'{0}' inesperado"),
            Some("oväntat '{0}'"),
        ],
    },
];
