pub mod dto;
pub mod entity;
pub mod handler;
pub mod logger;
pub mod service;
