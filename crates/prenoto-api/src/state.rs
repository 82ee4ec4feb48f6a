//! Application state.
//!
//! AppState is split into a repository sub-state and the two domain
//! services, so handlers reach for what they need instead of a flat god
//! object.

use prenoto_core::Config;
use prenoto_db::{
    BookingRepository, BusinessRepository, CustomerRepository, QuoteRepository, ServiceRepository,
    SettingsRepository, StaffRepository, TagRepository,
};
use sqlx::PgPool;

use crate::services::{BookingWorkflow, CampaignService};

/// Database pool and all repositories.
#[derive(Clone)]
pub struct DbState {
    pub pool: PgPool,
    pub business_repository: BusinessRepository,
    pub settings_repository: SettingsRepository,
    pub service_repository: ServiceRepository,
    pub staff_repository: StaffRepository,
    pub customer_repository: CustomerRepository,
    pub tag_repository: TagRepository,
    pub booking_repository: BookingRepository,
    pub quote_repository: QuoteRepository,
}

#[derive(Clone)]
pub struct AppState {
    pub db: DbState,
    pub booking_workflow: BookingWorkflow,
    pub campaigns: CampaignService,
    pub config: Config,
}

impl AppState {
    pub fn build(pool: PgPool, config: Config) -> Self {
        let db = DbState {
            pool: pool.clone(),
            business_repository: BusinessRepository::new(pool.clone()),
            settings_repository: SettingsRepository::new(pool.clone()),
            service_repository: ServiceRepository::new(pool.clone()),
            staff_repository: StaffRepository::new(pool.clone()),
            customer_repository: CustomerRepository::new(pool.clone()),
            tag_repository: TagRepository::new(pool.clone()),
            booking_repository: BookingRepository::new(pool.clone()),
            quote_repository: QuoteRepository::new(pool),
        };

        let booking_workflow = BookingWorkflow::new(
            db.settings_repository.clone(),
            db.service_repository.clone(),
            db.customer_repository.clone(),
            db.booking_repository.clone(),
        );

        let campaigns = CampaignService::new(db.customer_repository.clone(), config.clone());

        AppState {
            db,
            booking_workflow,
            campaigns,
            config,
        }
    }
}
