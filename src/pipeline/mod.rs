pub mod analyze;
pub mod bands;
pub mod detect;
pub mod finalize;
pub mod merge;
pub mod profile;
pub mod rolling;
pub mod scan;
pub mod smooth;
