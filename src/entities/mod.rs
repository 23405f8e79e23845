pub mod prelude;

pub mod magasins;
pub mod plannings;
pub mod users;
