pub mod clustering;
pub mod corridor;
pub mod frequency;
pub mod hub;
pub mod overlap;
pub mod qualification_ops;
