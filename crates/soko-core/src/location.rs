//! The state → area → market location hierarchy.
//!
//! Location nodes are reference data: seeded once, then pointed at by
//! vendors and products. Coordinates are optional throughout — a node
//! without surveyed coordinates simply has no point.

use crate::geo::GeoPoint;
use crate::ids::{AreaId, MarketId, StateId};
use crate::unix_timestamp;
use serde::{Deserialize, Serialize};

/// A state: the top of the hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct State {
    pub id: StateId,
    /// State name (unique).
    pub name: String,
    /// Short state code, e.g. "LA" (unique).
    pub code: String,
    pub capital: Option<String>,
    pub country: String,
    pub point: Option<GeoPoint>,
    pub is_active: bool,
    pub created_at: i64,
}

impl State {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: StateId::generate(),
            name: name.into(),
            code: code.into(),
            capital: None,
            country: "Nigeria".to_string(),
            point: None,
            is_active: true,
            created_at: unix_timestamp(),
        }
    }
}

/// An area inside a state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
    pub state_id: StateId,
    pub description: Option<String>,
    pub local_government: Option<String>,
    pub postal_code: Option<String>,
    pub point: Option<GeoPoint>,
    pub is_active: bool,
    pub created_at: i64,
}

impl Area {
    pub fn new(name: impl Into<String>, state_id: StateId) -> Self {
        Self {
            id: AreaId::generate(),
            name: name.into(),
            state_id,
            description: None,
            local_government: None,
            postal_code: None,
            point: None,
            is_active: true,
            created_at: unix_timestamp(),
        }
    }
}

/// Kind of physical market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MarketType {
    #[default]
    TraditionalMarket,
    ShoppingMall,
    Plaza,
    StreetMarket,
}

impl MarketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketType::TraditionalMarket => "traditional_market",
            MarketType::ShoppingMall => "shopping_mall",
            MarketType::Plaza => "plaza",
            MarketType::StreetMarket => "street_market",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "traditional_market" => Some(MarketType::TraditionalMarket),
            "shopping_mall" => Some(MarketType::ShoppingMall),
            "plaza" => Some(MarketType::Plaza),
            "street_market" => Some(MarketType::StreetMarket),
            _ => None,
        }
    }
}

/// A named market inside an area.
///
/// Invariant: `area_id` must belong to an area whose `state_id` equals this
/// market's own `state_id`. Enforced by the location service at write time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Market {
    pub id: MarketId,
    pub name: String,
    pub description: Option<String>,
    pub market_type: MarketType,
    pub state_id: StateId,
    pub area_id: AreaId,
    pub address: Option<String>,
    pub landmark: Option<String>,
    pub point: Option<GeoPoint>,
    pub entrance_photo: Option<String>,
    pub layout_map: Option<String>,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    pub operating_days: Vec<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    /// Number of registered shops, maintained by the vendor service.
    pub total_shops: i64,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: i64,
}

impl Market {
    pub fn new(
        name: impl Into<String>,
        market_type: MarketType,
        state_id: StateId,
        area_id: AreaId,
    ) -> Self {
        Self {
            id: MarketId::generate(),
            name: name.into(),
            description: None,
            market_type,
            state_id,
            area_id,
            address: None,
            landmark: None,
            point: None,
            entrance_photo: None,
            layout_map: None,
            opening_time: None,
            closing_time: None,
            operating_days: Vec::new(),
            contact_phone: None,
            contact_email: None,
            total_shops: 0,
            is_active: true,
            is_verified: false,
            created_at: unix_timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_defaults() {
        let state = State::new("Lagos", "LA");
        assert_eq!(state.country, "Nigeria");
        assert!(state.point.is_none());
        assert!(state.is_active);
    }

    #[test]
    fn test_market_type_round_trip() {
        assert_eq!(
            MarketType::from_str("shopping_mall"),
            Some(MarketType::ShoppingMall)
        );
        assert_eq!(MarketType::from_str("bazaar"), None);
        assert_eq!(MarketType::Plaza.as_str(), "plaza");
    }

    #[test]
    fn test_market_creation() {
        let state = State::new("Lagos", "LA");
        let area = Area::new("Ikeja", state.id.clone());
        let market = Market::new(
            "Computer Village",
            MarketType::TraditionalMarket,
            state.id.clone(),
            area.id.clone(),
        );
        assert_eq!(market.state_id, state.id);
        assert_eq!(market.total_shops, 0);
    }
}
