pub mod boundary_map;
pub mod heat_legend;
pub mod navigation;
pub mod status_bar;
