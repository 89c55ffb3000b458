pub mod column;
pub mod conventions;
pub mod table;
