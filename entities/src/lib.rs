pub mod announcement;
pub mod book;
