pub mod charts;
pub mod markdown;
