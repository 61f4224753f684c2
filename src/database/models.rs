pub mod application_status;
pub mod company;
pub mod job_application;
pub mod job_listing;
pub mod job_listing_skill;
pub mod listing_enums;
pub mod role;
pub mod skill;
pub mod user;
pub mod user_skill;
