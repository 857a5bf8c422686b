pub mod cache;
pub mod catalog;
pub mod config;
pub mod models;
pub mod search;
pub mod web;
