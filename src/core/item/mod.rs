//! The item resource.

pub mod item_entity;
pub mod item_repository;
pub mod item_service;
pub mod memory_item_repository;
