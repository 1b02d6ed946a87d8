pub mod body;
pub mod bonus;
pub mod ghost;
pub mod movement;
pub mod pac;
pub mod steering;
