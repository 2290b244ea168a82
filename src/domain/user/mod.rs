// User domain module
// Contains the email value object; the persistence-facing User struct lives
// with its repository trait

pub mod value_objects;

pub use value_objects::Email;
