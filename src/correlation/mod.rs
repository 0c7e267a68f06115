pub mod assembler;
pub mod consolidate;
pub mod window;
