mod analytics;
mod common;
mod report;
mod service;
