pub mod honorifics;
pub mod names;
pub mod roster;
pub mod text;
