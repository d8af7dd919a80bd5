//! In-memory store fakes for service-level tests, wired through the same
//! trait-object seam the Postgres stores use in production.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::auth::repo::{IdentityStore, User, UserToken};
use crate::bookings::repo::{Booking, BookingStore, BookingSummary};
use crate::packages::repo::{CatalogStore, Package};
use crate::reviews::repo::{NewReview, Review, ReviewDetails, ReviewStore, ReviewUpdate};
use crate::reviews::service::ReviewService;

/// Single in-memory backing store implementing every store trait.
#[derive(Default)]
pub struct MemStore {
    pub users: Mutex<Vec<User>>,
    pub tokens: Mutex<HashMap<String, UserToken>>,
    pub packages: Mutex<Vec<Package>>,
    pub bookings: Mutex<Vec<Booking>>,
    pub reviews: Mutex<Vec<Review>>,
}

impl MemStore {
    pub fn seed_user(&self, email: &str, password: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: hash_password(password).unwrap(),
            name: "Test Guest".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }

    pub fn seed_package(&self, hotel_name: &str) -> Package {
        let package = Package {
            id: Uuid::new_v4(),
            hotel_name: hotel_name.into(),
            image_url: None,
            description: Some("Two nights, breakfast included".into()),
            unit_cost: sqlx::types::Decimal::new(12_000, 2),
            duration: 2,
            created_at: OffsetDateTime::now_utc(),
        };
        self.packages.lock().unwrap().push(package.clone());
        package
    }

    pub fn seed_booking(&self, customer: &User, package: &Package, check_in: Date) -> Booking {
        let booking = Booking {
            id: Uuid::new_v4(),
            customer_id: customer.id,
            package_id: package.id,
            check_in_date: check_in,
            created_at: OffsetDateTime::now_utc(),
        };
        self.bookings.lock().unwrap().push(booking.clone());
        booking
    }
}

/// A ReviewService wired entirely against one MemStore.
pub fn review_service(store: &Arc<MemStore>) -> ReviewService {
    ReviewService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    )
}

#[async_trait]
impl IdentityStore for MemStore {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> anyhow::Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: password_hash.into(),
            name: name.into(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn find_token(&self, email: &str) -> anyhow::Result<Option<UserToken>> {
        Ok(self.tokens.lock().unwrap().get(email).cloned())
    }

    async fn save_token(&self, email: &str, token: &str) -> anyhow::Result<UserToken> {
        let mut tokens = self.tokens.lock().unwrap();
        let entry = tokens.entry(email.to_string()).or_insert_with(|| UserToken {
            email: email.into(),
            token: token.into(),
            issued_at: OffsetDateTime::now_utc(),
        });
        Ok(entry.clone())
    }
}

#[async_trait]
impl CatalogStore for MemStore {
    async fn list_packages(&self) -> anyhow::Result<Vec<Package>> {
        let mut packages = self.packages.lock().unwrap().clone();
        packages.sort_by(|a, b| a.hotel_name.cmp(&b.hotel_name));
        Ok(packages)
    }

    async fn find_by_hotel_name(&self, hotel_name: &str) -> anyhow::Result<Option<Package>> {
        Ok(self
            .packages
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.hotel_name == hotel_name)
            .cloned())
    }
}

#[async_trait]
impl BookingStore for MemStore {
    async fn create(
        &self,
        customer_id: Uuid,
        package_id: Uuid,
        check_in_date: Date,
    ) -> anyhow::Result<Booking> {
        let booking = Booking {
            id: Uuid::new_v4(),
            customer_id,
            package_id,
            check_in_date,
            created_at: OffsetDateTime::now_utc(),
        };
        self.bookings.lock().unwrap().push(booking.clone());
        Ok(booking)
    }

    async fn find(
        &self,
        check_in_date: Date,
        customer_id: Uuid,
        package_id: Uuid,
    ) -> anyhow::Result<Option<Booking>> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| {
                b.check_in_date == check_in_date
                    && b.customer_id == customer_id
                    && b.package_id == package_id
            })
            .cloned())
    }

    async fn list_for_customer_since(
        &self,
        customer_id: Uuid,
        since: Date,
    ) -> anyhow::Result<Vec<BookingSummary>> {
        let users = self.users.lock().unwrap();
        let packages = self.packages.lock().unwrap();
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings
            .iter()
            .filter(|b| b.customer_id == customer_id && b.check_in_date >= since)
            .filter_map(|b| {
                let email = users.iter().find(|u| u.id == b.customer_id)?.email.clone();
                let hotel = packages
                    .iter()
                    .find(|p| p.id == b.package_id)?
                    .hotel_name
                    .clone();
                Some(BookingSummary {
                    check_in_date: b.check_in_date,
                    customer_email: email,
                    hotel_name: hotel,
                })
            })
            .collect())
    }

    async fn reschedule(
        &self,
        old_check_in: Date,
        new_check_in: Date,
        customer_id: Uuid,
        package_id: Uuid,
    ) -> anyhow::Result<bool> {
        let mut bookings = self.bookings.lock().unwrap();
        match bookings.iter_mut().find(|b| {
            b.check_in_date == old_check_in
                && b.customer_id == customer_id
                && b.package_id == package_id
        }) {
            Some(booking) => {
                booking.check_in_date = new_check_in;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(
        &self,
        check_in_date: Date,
        customer_id: Uuid,
        package_id: Uuid,
    ) -> anyhow::Result<bool> {
        let mut bookings = self.bookings.lock().unwrap();
        let position = bookings.iter().position(|b| {
            b.check_in_date == check_in_date
                && b.customer_id == customer_id
                && b.package_id == package_id
        });
        match position {
            Some(idx) => {
                bookings.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ReviewStore for MemStore {
    async fn insert_if_absent(&self, new: NewReview) -> anyhow::Result<Option<Review>> {
        let mut reviews = self.reviews.lock().unwrap();
        if reviews.iter().any(|r| r.booking_id == new.booking_id) {
            return Ok(None);
        }
        let review = Review {
            id: Uuid::new_v4(),
            customer_id: new.customer_id,
            package_id: new.package_id,
            booking_id: new.booking_id,
            rating: new.rating,
            title: new.title,
            comment: new.comment,
            date: OffsetDateTime::now_utc(),
            suggested_theme: None,
            image_url: None,
        };
        reviews.push(review.clone());
        Ok(Some(review))
    }

    async fn list_all(&self) -> anyhow::Result<Vec<ReviewDetails>> {
        let users = self.users.lock().unwrap();
        let packages = self.packages.lock().unwrap();
        let reviews = self.reviews.lock().unwrap();
        Ok(reviews
            .iter()
            .filter_map(|r| {
                let email = users.iter().find(|u| u.id == r.customer_id)?.email.clone();
                let hotel = packages
                    .iter()
                    .find(|p| p.id == r.package_id)?
                    .hotel_name
                    .clone();
                Some(ReviewDetails {
                    date: r.date,
                    customer_email: email,
                    hotel_name: hotel,
                    rating: r.rating,
                    title: r.title.clone(),
                    comment: r.comment.clone(),
                    image_url: r.image_url.clone(),
                    suggested_theme: r.suggested_theme.clone(),
                })
            })
            .collect())
    }

    async fn find_by_booking(&self, booking_id: Uuid) -> anyhow::Result<Option<Review>> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.booking_id == booking_id)
            .cloned())
    }

    async fn update(
        &self,
        review_id: Uuid,
        update: ReviewUpdate,
    ) -> anyhow::Result<Option<Review>> {
        let mut reviews = self.reviews.lock().unwrap();
        match reviews.iter_mut().find(|r| r.id == review_id) {
            Some(review) => {
                review.rating = update.rating;
                review.title = update.title;
                review.comment = update.comment;
                review.image_url = update.image_url;
                review.suggested_theme = update.suggested_theme;
                Ok(Some(review.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_customer_package(
        &self,
        customer_id: Uuid,
        package_id: Uuid,
    ) -> anyhow::Result<bool> {
        let mut reviews = self.reviews.lock().unwrap();
        let position = reviews
            .iter()
            .position(|r| r.customer_id == customer_id && r.package_id == package_id);
        match position {
            Some(idx) => {
                reviews.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
