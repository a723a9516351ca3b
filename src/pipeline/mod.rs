pub mod enhancer;
pub mod extract;
pub mod generator;
pub mod sanitizer;
