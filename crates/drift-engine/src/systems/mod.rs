pub mod collision;
pub mod constrain;
pub mod motion;
pub mod update;
