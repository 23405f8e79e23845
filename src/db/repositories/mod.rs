pub mod magasin;
pub mod planning;
pub mod user;
