pub mod options;
pub mod scores;
pub mod tables;
