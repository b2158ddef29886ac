// Frameworks layer: configuration, runtime bootstrap and the console front end.

pub mod config;
pub mod console;
pub mod runtime;
