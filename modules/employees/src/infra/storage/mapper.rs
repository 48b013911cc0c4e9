use crate::contract::Employee;
use crate::infra::storage::entity::Model as EmployeeEntity;

/// Convert a database entity to a contract model
pub fn entity_to_contract(entity: EmployeeEntity) -> Employee {
    Employee {
        id: entity.id,
        first_name: entity.first_name,
        last_name: entity.last_name,
        email: entity.email,
        phone: entity.phone,
        title: entity.title,
        department: entity.department,
        location: entity.location,
        hire_date: entity.hire_date,
        salary: entity.salary,
        avatar: entity.avatar,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}
