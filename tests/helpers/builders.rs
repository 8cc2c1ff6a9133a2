use sea_orm::DatabaseConnection;
use stopover::entities;
use stopover::storage;

/// Builder for seeding destination rows directly through the record store.
pub struct DestinationBuilder {
    name: String,
    price: f64,
    meta_description: String,
    description: String,
}

impl DestinationBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            price: 120.50,
            meta_description: "A place worth a long weekend".to_string(),
            description: "Seeded description for tests.".to_string(),
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub async fn create(self, db: &DatabaseConnection) -> entities::destination::Model {
        storage::create_destination(
            db,
            storage::NewDestination {
                photo_1: "destination_photo/seed-one.png".to_string(),
                photo_2: "destination_photo/seed-two.png".to_string(),
                name: self.name,
                price: self.price,
                meta_description: self.meta_description,
                description: self.description,
            },
        )
        .await
        .expect("Failed to seed destination")
    }
}

/// Builder for seeding review rows.
pub struct ReviewBuilder {
    review: String,
    user_name: String,
}

impl ReviewBuilder {
    pub fn new(user_name: &str) -> Self {
        Self {
            review: "Loved every minute of the stay, the guide was fantastic.".to_string(),
            user_name: user_name.to_string(),
        }
    }

    pub async fn create(self, db: &DatabaseConnection) -> entities::review::Model {
        storage::create_review(
            db,
            storage::NewReview {
                photo: "review_photo/seed.png".to_string(),
                review: self.review,
                user_name: self.user_name,
            },
        )
        .await
        .expect("Failed to seed review")
    }
}
