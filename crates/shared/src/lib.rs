pub mod controller;
pub mod document;
pub mod error;
pub mod heat;
pub mod models;
pub mod projection;
pub mod render;
pub mod selection;
pub mod status;
pub mod svg;
mod topo;
