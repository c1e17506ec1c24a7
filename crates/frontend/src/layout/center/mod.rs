pub mod center;
pub mod sections;

pub use center::Center;
pub use sections::SectionsHost;
