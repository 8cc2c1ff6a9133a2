pub mod destination;
pub mod review;

pub use destination::Entity as Destination;
pub use review::Entity as Review;
