pub mod index;
pub mod person;
