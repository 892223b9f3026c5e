pub mod division;
pub mod roster;
