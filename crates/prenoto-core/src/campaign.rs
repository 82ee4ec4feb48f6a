//! Campaign message templating.
//!
//! Messages carry `{name}` and `{link}` placeholders expanded per customer;
//! delivery happens outside the platform — the dashboard opens the generated
//! `wa.me` links.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Built-in campaign template.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CampaignTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub message: &'static str,
}

/// Template catalog offered by the dashboard composer.
pub const TEMPLATES: &[CampaignTemplate] = &[
    CampaignTemplate {
        key: "winback",
        name: "Ti aspettiamo",
        message: "Ciao {name}! 👋\nÈ passato un po' di tempo dall'ultima visita. Che ne dici di prenotare un nuovo appuntamento?\n{link}\nTi aspettiamo! 🌟",
    },
    CampaignTemplate {
        key: "promo",
        name: "Promozione",
        message: "Ciao {name}! 🎉\nAbbiamo una promozione speciale per te! Prenota ora e approfitta dell'offerta.\n{link}\nNon perdere questa occasione! ✨",
    },
    CampaignTemplate {
        key: "reminder",
        name: "Promemoria",
        message: "Ciao {name}! 👋\nVuoi prenotare il tuo prossimo appuntamento?\n{link}\nSiamo qui per te! 💙",
    },
    CampaignTemplate {
        key: "new-service",
        name: "Nuovo servizio",
        message: "Ciao {name}! ✨\nAbbiamo un nuovo servizio che potrebbe interessarti! Scoprilo e prenota ora.\n{link}\nNon vediamo l'ora di vederti! 🎊",
    },
];

/// Campaign composition request: a message plus an optional tag filter for
/// the recipient list.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RenderCampaignRequest {
    #[validate(length(min = 1, max = 1000))]
    pub message: String,
    /// Restrict recipients to customers carrying this tag.
    #[serde(default)]
    pub tag_id: Option<Uuid>,
}

/// One expanded recipient: personalized text plus the `wa.me` link the
/// dashboard opens.
#[derive(Debug, Serialize, ToSchema)]
pub struct CampaignRecipient {
    pub customer_id: Uuid,
    pub name: String,
    pub phone: String,
    pub message: String,
    pub whatsapp_url: String,
}

/// Expand `{name}` and `{link}` placeholders.
pub fn render_message(template: &str, customer_name: &str, booking_link: &str) -> String {
    template
        .replace("{name}", customer_name)
        .replace("{link}", booking_link)
}

/// `wa.me` deep link for a rendered message: digits-only phone, text
/// percent-encoded.
pub fn whatsapp_url(phone: &str, message: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    format!(
        "https://wa.me/{}?text={}",
        digits,
        utf8_percent_encode(message, NON_ALPHANUMERIC)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_all_occurrences() {
        let rendered = render_message(
            "Ciao {name}! Prenota qui: {link} — a presto, {name}!",
            "Mario",
            "https://prenoto.example/salone-da-anna",
        );
        assert_eq!(
            rendered,
            "Ciao Mario! Prenota qui: https://prenoto.example/salone-da-anna — a presto, Mario!"
        );
    }

    #[test]
    fn test_render_without_placeholders_is_identity() {
        assert_eq!(render_message("Ciao!", "Mario", "x"), "Ciao!");
    }

    #[test]
    fn test_whatsapp_url_strips_phone_punctuation() {
        let url = whatsapp_url("+39 333-123.4567", "Ciao");
        assert!(url.starts_with("https://wa.me/393331234567?text="));
    }

    #[test]
    fn test_whatsapp_url_encodes_message() {
        let url = whatsapp_url("3331234567", "Ciao Mario! Prenota: https://x.it/a");
        assert!(!url.split_once("text=").unwrap().1.contains(' '));
        assert!(url.contains("Ciao%20Mario%21"));
    }

    #[test]
    fn test_template_catalog_placeholders() {
        for template in TEMPLATES {
            assert!(template.message.contains("{name}"), "{}", template.key);
            assert!(template.message.contains("{link}"), "{}", template.key);
        }
    }
}
