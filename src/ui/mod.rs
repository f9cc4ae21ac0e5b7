pub mod panels;
pub mod results;
pub mod table;
