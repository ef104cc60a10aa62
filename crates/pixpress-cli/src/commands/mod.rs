pub mod info;
pub mod run;

/// Server used when neither a flag nor a config file names one.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";
