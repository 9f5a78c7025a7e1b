pub mod input;
pub mod status;
