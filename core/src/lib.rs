pub mod basis;
pub mod config;
pub mod integrate;
pub mod matrices;
pub mod molecule;
pub mod scf;

pub(crate) mod utils;
