pub mod config;
pub mod generator;
pub mod parse;

pub use config::{AlignerConfig, MIN_CORRESPONDENCES};
pub use generator::{DisplaySettings, GeneratorSettings};
pub use parse::{
    elements_in_ranges, format_element_ranges, format_scale, node_derivative_width,
    parse_element_ranges, parse_scale, ElementRange,
};
