pub mod event;
pub mod event_coordinator;
pub mod event_resource;
