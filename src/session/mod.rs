pub mod controller;
pub mod countdown;
pub mod drill;
pub mod input;
pub mod result;
pub mod timer;
