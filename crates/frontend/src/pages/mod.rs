pub mod dots;
pub mod heat;
