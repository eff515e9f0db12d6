pub mod area;
pub mod confidence;
pub mod items;
pub mod ranking;
pub mod usage;
