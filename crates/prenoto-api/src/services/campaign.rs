//! Campaign recipient expansion.

use prenoto_core::campaign::{
    render_message, whatsapp_url, CampaignRecipient, CampaignTemplate, TEMPLATES,
};
use prenoto_core::models::Business;
use prenoto_core::{AppError, Config};
use prenoto_db::CustomerRepository;
use uuid::Uuid;

#[derive(Clone)]
pub struct CampaignService {
    customers: CustomerRepository,
    config: Config,
}

impl CampaignService {
    pub fn new(customers: CustomerRepository, config: Config) -> Self {
        Self { customers, config }
    }

    pub fn templates(&self) -> &'static [CampaignTemplate] {
        TEMPLATES
    }

    /// Expand a message for every selected customer. Nothing is sent from
    /// here; the dashboard opens the returned `wa.me` links.
    #[tracing::instrument(skip(self, business, message), fields(business_id = %business.id))]
    pub async fn recipients(
        &self,
        business: &Business,
        message: &str,
        tag_id: Option<Uuid>,
    ) -> Result<Vec<CampaignRecipient>, AppError> {
        let customers = match tag_id {
            Some(tag_id) => self.customers.list_by_tag(business.id, tag_id).await?,
            None => self.customers.list(business.id, None).await?,
        };

        let booking_link = self.config.booking_url(&business.slug);

        Ok(customers
            .into_iter()
            .map(|customer| {
                let text = render_message(message, &customer.name, &booking_link);
                let whatsapp = whatsapp_url(&customer.phone, &text);
                CampaignRecipient {
                    customer_id: customer.id,
                    name: customer.name,
                    phone: customer.phone,
                    message: text,
                    whatsapp_url: whatsapp,
                }
            })
            .collect())
    }
}
