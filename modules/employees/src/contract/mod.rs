pub mod model;

pub use model::{Employee, EmployeePatch, EmployeeQuery, NewEmployee, Page};
