pub mod dto;
pub mod entity;
pub mod handler;
pub mod lifecycle;
pub mod service;
