pub mod braille;
pub mod config;
pub mod data;
pub mod geo;
pub mod globe;
pub mod hash;
pub mod logging;
pub mod term;
