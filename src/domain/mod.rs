pub mod audit;
pub mod dashboard;
pub mod event;
pub mod health;
pub mod notification;
pub mod registration;
pub mod user;
pub mod venue;
