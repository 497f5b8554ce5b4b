pub mod excel;
pub mod meta;
pub mod reader;
