pub mod chart;
pub mod heat;
pub mod icons;
pub mod map;
pub mod panels;
pub mod style;
