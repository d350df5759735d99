pub mod bundle;
pub mod exec;
pub mod fs;
pub mod minify;
