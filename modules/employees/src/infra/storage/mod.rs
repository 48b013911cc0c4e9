pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod repo;

pub use repo::SeaOrmEmployeesRepository;
