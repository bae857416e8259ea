//! Reviews and the vendor-rating recompute.

use soko_core::prelude::*;
use soko_core::{round1, SokoError};
use soko_store::Collection;

/// Service over reviews. Vendor reviews drive the denormalized
/// `rating`/`review_count` on the vendor.
#[derive(Clone)]
pub struct ReviewService {
    reviews: Collection<Review>,
    vendors: Collection<Vendor>,
}

impl ReviewService {
    pub fn new(reviews: Collection<Review>, vendors: Collection<Vendor>) -> Self {
        Self { reviews, vendors }
    }

    /// Create a review. One per (user, target); rating must be 1..=5.
    pub async fn create(
        &self,
        user_id: &UserId,
        target: ReviewTarget,
        rating: u8,
        title: Option<String>,
        comment: Option<String>,
    ) -> Result<Review, SokoError> {
        if !(1..=5).contains(&rating) {
            return Err(SokoError::Validation(format!(
                "rating must be between 1 and 5, got {rating}"
            )));
        }

        let duplicate = self
            .reviews
            .find_one(|r| &r.user_id == user_id && r.target == target)
            .await;
        if duplicate.is_some() {
            return Err(SokoError::Conflict(
                "you have already reviewed this item".into(),
            ));
        }

        let mut review = Review::new(user_id.clone(), target.clone(), rating);
        review.title = title;
        review.comment = comment;

        self.reviews
            .insert(review.clone())
            .await
            .map_err(|e| SokoError::Store(e.to_string()))?;

        if let ReviewTarget::Vendor(vendor_id) = &target {
            self.recompute_vendor_rating(vendor_id).await;
        }

        Ok(review)
    }

    /// Active reviews for one target, newest first.
    pub async fn list_for_target(&self, target: &ReviewTarget) -> Vec<Review> {
        let mut reviews = self
            .reviews
            .find(|r| r.is_active && &r.target == target)
            .await;
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reviews
    }

    pub async fn mark_helpful(&self, id: &ReviewId) -> Result<Review, SokoError> {
        self.reviews
            .update(id.as_str(), |r| r.helpful_count += 1)
            .await
            .map_err(|_| SokoError::ReviewNotFound(id.to_string()))
    }

    /// Delete a review (only its author may) and refresh the target rating.
    pub async fn delete(&self, id: &ReviewId, user_id: &UserId) -> Result<(), SokoError> {
        let review = self
            .reviews
            .get(id.as_str())
            .await
            .ok_or_else(|| SokoError::ReviewNotFound(id.to_string()))?;
        if &review.user_id != user_id {
            return Err(SokoError::Forbidden(
                "you can only delete your own reviews".into(),
            ));
        }

        self.reviews.remove(id.as_str()).await;
        if let ReviewTarget::Vendor(vendor_id) = &review.target {
            self.recompute_vendor_rating(vendor_id).await;
        }
        Ok(())
    }

    /// Average active-review rating, rounded to one decimal, plus count.
    async fn recompute_vendor_rating(&self, vendor_id: &VendorId) {
        let target = ReviewTarget::Vendor(vendor_id.clone());
        let ratings: Vec<u8> = self
            .reviews
            .find(|r| r.is_active && r.target == target)
            .await
            .into_iter()
            .map(|r| r.rating)
            .collect();

        let count = ratings.len() as i64;
        let average = if ratings.is_empty() {
            0.0
        } else {
            round1(ratings.iter().map(|&r| r as f64).sum::<f64>() / ratings.len() as f64)
        };

        if let Err(err) = self
            .vendors
            .update(vendor_id.as_str(), |v| {
                v.rating = average;
                v.review_count = count;
            })
            .await
        {
            tracing::warn!(vendor = %vendor_id, error = %err, "vendor rating recompute skipped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        svc: ReviewService,
        vendors: Collection<Vendor>,
        vendor: Vendor,
    }

    async fn fixture() -> Fixture {
        let reviews = Collection::new();
        let vendors = Collection::new();
        let vendor = Vendor::new(
            UserId::generate(),
            "Kola Phones",
            VendorType::MarketShop,
            StateId::new("st-1"),
            AreaId::new("ar-1"),
            ContactDetails::with_phone("+2348011111111"),
        );
        vendors.insert(vendor.clone()).await.unwrap();
        Fixture {
            svc: ReviewService::new(reviews, vendors.clone()),
            vendors,
            vendor,
        }
    }

    #[tokio::test]
    async fn test_rating_bounds() {
        let fx = fixture().await;
        let user = UserId::generate();
        let target = ReviewTarget::Vendor(fx.vendor.id.clone());
        assert!(matches!(
            fx.svc.create(&user, target.clone(), 0, None, None).await,
            Err(SokoError::Validation(_))
        ));
        assert!(matches!(
            fx.svc.create(&user, target.clone(), 6, None, None).await,
            Err(SokoError::Validation(_))
        ));
        assert!(fx.svc.create(&user, target, 5, None, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_one_review_per_user_and_target() {
        let fx = fixture().await;
        let user = UserId::generate();
        let target = ReviewTarget::Vendor(fx.vendor.id.clone());
        fx.svc
            .create(&user, target.clone(), 4, None, None)
            .await
            .unwrap();
        assert!(matches!(
            fx.svc.create(&user, target, 5, None, None).await,
            Err(SokoError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_vendor_rating_recomputed() {
        let fx = fixture().await;
        let target = ReviewTarget::Vendor(fx.vendor.id.clone());
        fx.svc
            .create(&UserId::generate(), target.clone(), 5, None, None)
            .await
            .unwrap();
        fx.svc
            .create(&UserId::generate(), target.clone(), 4, None, None)
            .await
            .unwrap();
        fx.svc
            .create(&UserId::generate(), target, 4, None, None)
            .await
            .unwrap();

        let vendor = fx.vendors.get(fx.vendor.id.as_str()).await.unwrap();
        assert_eq!(vendor.review_count, 3);
        // (5 + 4 + 4) / 3 = 4.333... → 4.3
        assert_eq!(vendor.rating, 4.3);
    }

    #[tokio::test]
    async fn test_delete_requires_author_and_recomputes() {
        let fx = fixture().await;
        let author = UserId::generate();
        let target = ReviewTarget::Vendor(fx.vendor.id.clone());
        let review = fx
            .svc
            .create(&author, target, 5, None, None)
            .await
            .unwrap();

        assert!(matches!(
            fx.svc.delete(&review.id, &UserId::generate()).await,
            Err(SokoError::Forbidden(_))
        ));

        fx.svc.delete(&review.id, &author).await.unwrap();
        let vendor = fx.vendors.get(fx.vendor.id.as_str()).await.unwrap();
        assert_eq!(vendor.review_count, 0);
        assert_eq!(vendor.rating, 0.0);
    }
}
