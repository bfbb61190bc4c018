// Application layer - Stores, resolver, playback and use cases
pub mod chart_service;
pub mod controls;
pub mod path_store;
pub mod playback_controller;
pub mod record_store;
pub mod replay_service;
pub mod resolver;
pub mod running_stats;
pub mod session;
pub mod sink;
pub mod smoothing;
pub mod source_repository;
pub mod timeline_store;
