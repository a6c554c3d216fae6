pub mod attendance;
pub mod event_feedback;
pub mod registration;
