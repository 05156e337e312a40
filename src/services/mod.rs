pub mod catalog_service;
pub mod exporter;
pub mod ranker;
pub mod record_extractor;
pub mod roll_generator;
pub mod sequence;

pub use catalog_service::ExamCatalogStore;
pub use exporter::ExportTable;
pub use record_extractor::{Extraction, NotFoundReason};
pub use roll_generator::RollGenerator;
