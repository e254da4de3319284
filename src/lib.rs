// Air quality map backend - Location-driven data synchronization
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
