pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{AnnotationService, CaptionService, FileService, TranscriptionService};
