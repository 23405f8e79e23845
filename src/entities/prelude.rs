pub use super::magasins::Entity as Magasins;
pub use super::plannings::Entity as Plannings;
pub use super::users::Entity as Users;
