pub mod climb;
pub mod gradient;
pub mod profile;
