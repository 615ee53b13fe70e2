//! Business logic services

pub mod availability;
pub mod blockouts;
pub mod board;

use std::sync::Arc;

use crate::{
    config::AvailabilityConfig,
    repository::{BlockoutStore, BookingStore, Repository, VenueStore},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub availability: availability::AvailabilityService,
    pub blockouts: blockouts::BlockoutsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, availability_config: AvailabilityConfig) -> Self {
        let venues: Arc<dyn VenueStore> = Arc::new(repository.venues.clone());
        let blockouts: Arc<dyn BlockoutStore> = Arc::new(repository.blockouts.clone());
        let bookings: Arc<dyn BookingStore> = Arc::new(repository.bookings.clone());

        let availability = availability::AvailabilityService::new(
            venues.clone(),
            blockouts.clone(),
            bookings,
            availability_config,
        );
        let blockouts =
            blockouts::BlockoutsService::new(venues, blockouts, availability.clone());
        Self {
            availability,
            blockouts,
        }
    }
}
