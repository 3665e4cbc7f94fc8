pub mod catalog;
pub mod criteria;
pub mod matcher;
pub mod merge;
pub mod vector;
pub mod vision;
