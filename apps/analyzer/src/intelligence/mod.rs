//! Résumé Intelligence: section detection, skill alignment against a job
//! description, and project validation.

pub mod embedding_client;
pub mod handlers;
pub mod impact;
pub mod jd_parser;
pub mod pipeline;
pub mod project_validator;
pub mod sections;
pub mod similarity;
pub mod skill_matcher;
pub mod structure;
pub mod tfidf;
