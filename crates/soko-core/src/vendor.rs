//! Vendor (shop) profiles.

use crate::geo::GeoPoint;
use crate::ids::{AreaId, MarketId, StateId, UserId, VendorId};
use crate::unix_timestamp;
use serde::{Deserialize, Serialize};

/// How a vendor trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VendorType {
    #[default]
    MarketShop,
    MallShop,
    HomeBased,
    StreetShop,
    OnlineOnly,
}

impl VendorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorType::MarketShop => "market_shop",
            VendorType::MallShop => "mall_shop",
            VendorType::HomeBased => "home_based",
            VendorType::StreetShop => "street_shop",
            VendorType::OnlineOnly => "online_only",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "market_shop" => Some(VendorType::MarketShop),
            "mall_shop" => Some(VendorType::MallShop),
            "home_based" => Some(VendorType::HomeBased),
            "street_shop" => Some(VendorType::StreetShop),
            "online_only" => Some(VendorType::OnlineOnly),
            _ => None,
        }
    }
}

/// How to reach a vendor. Phone is the one required channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ContactDetails {
    pub phone: String,
    pub alternate_phone: Option<String>,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub website: Option<String>,
}

impl ContactDetails {
    pub fn with_phone(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            ..Default::default()
        }
    }
}

/// Settlement account details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BankDetails {
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,
    pub bank_code: Option<String>,
}

/// Opening hours for a shop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OperatingHours {
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    pub operating_days: Vec<String>,
    pub is_24_hours: bool,
}

/// Shop imagery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ShopImages {
    pub entrance_photo: Option<String>,
    pub logo: Option<String>,
    pub layout_map: Option<String>,
    pub additional_images: Vec<String>,
}

/// A vendor: one shop owned by exactly one user.
///
/// Carries denormalized aggregates (`total_products`, `rating`,
/// `min_product_price`, `max_product_price`, ...) maintained by the
/// directory's recompute events whenever the vendor's active+approved
/// product set changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vendor {
    pub id: VendorId,
    pub user_id: UserId,
    pub business_name: String,
    pub business_description: Option<String>,
    pub vendor_type: VendorType,

    // Location hierarchy
    pub state_id: StateId,
    pub area_id: AreaId,
    pub market_id: Option<MarketId>,

    // Shop placement
    pub shop_number: Option<String>,
    pub shop_floor: Option<String>,
    pub shop_block: Option<String>,
    pub shop_address: Option<String>,
    pub landmark: Option<String>,
    pub point: Option<GeoPoint>,

    pub shop_images: Option<ShopImages>,
    pub contact_details: ContactDetails,
    pub bank_details: Option<BankDetails>,
    pub operating_hours: Option<OperatingHours>,

    /// Categories of products sold.
    pub categories: Vec<String>,
    pub tags: Vec<String>,

    // Denormalized statistics
    pub total_products: i64,
    pub total_views: i64,
    pub search_appearances: i64,
    pub rating: f64,
    pub review_count: i64,
    pub min_product_price: f64,
    pub max_product_price: f64,

    // Flags
    pub is_active: bool,
    pub is_verified: bool,
    pub is_featured: bool,
    pub is_open: bool,

    pub created_at: i64,
}

impl Vendor {
    pub fn new(
        user_id: UserId,
        business_name: impl Into<String>,
        vendor_type: VendorType,
        state_id: StateId,
        area_id: AreaId,
        contact_details: ContactDetails,
    ) -> Self {
        Self {
            id: VendorId::generate(),
            user_id,
            business_name: business_name.into(),
            business_description: None,
            vendor_type,
            state_id,
            area_id,
            market_id: None,
            shop_number: None,
            shop_floor: None,
            shop_block: None,
            shop_address: None,
            landmark: None,
            point: None,
            shop_images: None,
            contact_details,
            bank_details: None,
            operating_hours: None,
            categories: Vec::new(),
            tags: Vec::new(),
            total_products: 0,
            total_views: 0,
            search_appearances: 0,
            rating: 0.0,
            review_count: 0,
            min_product_price: 0.0,
            max_product_price: 0.0,
            is_active: true,
            is_verified: false,
            is_featured: false,
            is_open: true,
            created_at: unix_timestamp(),
        }
    }

    /// Shop logo URL, if any.
    pub fn logo(&self) -> Option<&str> {
        self.shop_images.as_ref()?.logo.as_deref()
    }

    /// Entrance photo URL, if any.
    pub fn entrance_photo(&self) -> Option<&str> {
        self.shop_images.as_ref()?.entrance_photo.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_vendor() -> Vendor {
        Vendor::new(
            UserId::generate(),
            "Kola Phones",
            VendorType::MarketShop,
            StateId::new("st-1"),
            AreaId::new("ar-1"),
            ContactDetails::with_phone("+2348011111111"),
        )
    }

    #[test]
    fn test_vendor_defaults() {
        let v = sample_vendor();
        assert!(v.is_active);
        assert!(!v.is_verified);
        assert_eq!(v.total_products, 0);
        assert_eq!(v.min_product_price, 0.0);
        assert!(v.point.is_none());
    }

    #[test]
    fn test_vendor_type_round_trip() {
        assert_eq!(VendorType::from_str("mall_shop"), Some(VendorType::MallShop));
        assert_eq!(VendorType::from_str("MARKET_SHOP"), Some(VendorType::MarketShop));
        assert_eq!(VendorType::from_str("kiosk"), None);
    }

    #[test]
    fn test_logo_accessor() {
        let mut v = sample_vendor();
        assert!(v.logo().is_none());
        v.shop_images = Some(ShopImages {
            logo: Some("https://cdn.example/logo.png".into()),
            ..Default::default()
        });
        assert_eq!(v.logo(), Some("https://cdn.example/logo.png"));
    }
}
