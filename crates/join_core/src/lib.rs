pub mod action;
pub mod board;
pub mod config;
pub mod contact_api;
pub mod error;
pub mod form;
pub mod ids;
pub mod model;
pub mod storage;
pub mod summary;
pub mod task_api;
pub mod text;
pub mod transition;
