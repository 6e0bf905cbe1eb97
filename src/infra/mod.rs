pub mod bmkg;
pub mod local;
