pub mod planning;

pub use planning::{NewPlanning, Planning, PlanningChanges, PlanningQuery, SortField, SortKey};
