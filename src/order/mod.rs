pub mod controller;
pub mod dto;
pub mod repository;
pub mod repository_sqlx;
pub mod service;
pub mod usecase;
