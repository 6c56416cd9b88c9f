pub mod maps;
pub mod points;
