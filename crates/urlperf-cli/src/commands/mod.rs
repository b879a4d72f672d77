pub mod analyze;
pub mod completion;
pub mod status_codes;
