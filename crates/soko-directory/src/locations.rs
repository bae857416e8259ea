//! Location hierarchy reference data.

use serde::Deserialize;
use soko_core::prelude::*;
use soko_core::{GeoPoint, SokoError};
use soko_store::Collection;

/// Service over the state → area → market hierarchy.
#[derive(Clone)]
pub struct LocationService {
    states: Collection<State>,
    areas: Collection<Area>,
    markets: Collection<Market>,
}

/// Input for creating a market.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMarket {
    pub name: String,
    pub market_type: MarketType,
    pub state_id: StateId,
    pub area_id: AreaId,
    pub description: Option<String>,
    pub address: Option<String>,
    pub landmark: Option<String>,
    pub point: Option<GeoPoint>,
}

impl LocationService {
    pub fn new(
        states: Collection<State>,
        areas: Collection<Area>,
        markets: Collection<Market>,
    ) -> Self {
        Self {
            states,
            areas,
            markets,
        }
    }

    pub async fn create_state(&self, name: &str, code: &str) -> Result<State, SokoError> {
        let name_lower = name.to_lowercase();
        let code_lower = code.to_lowercase();
        let exists = self
            .states
            .find_one(|s| {
                s.name.to_lowercase() == name_lower || s.code.to_lowercase() == code_lower
            })
            .await;
        if exists.is_some() {
            return Err(SokoError::Conflict(format!("state {name} already exists")));
        }
        let state = State::new(name, code);
        self.states
            .insert(state.clone())
            .await
            .map_err(|e| SokoError::Store(e.to_string()))?;
        Ok(state)
    }

    pub async fn create_area(&self, name: &str, state_id: &StateId) -> Result<Area, SokoError> {
        self.get_state(state_id).await?;
        let area = Area::new(name, state_id.clone());
        self.areas
            .insert(area.clone())
            .await
            .map_err(|e| SokoError::Store(e.to_string()))?;
        Ok(area)
    }

    /// Create a market, enforcing the hierarchy invariant: the area must
    /// belong to the same state the market claims.
    pub async fn create_market(&self, input: NewMarket) -> Result<Market, SokoError> {
        self.get_state(&input.state_id).await?;
        let area = self.get_area(&input.area_id).await?;
        if area.state_id != input.state_id {
            return Err(SokoError::LocationMismatch(format!(
                "area {} belongs to state {}, not {}",
                input.area_id, area.state_id, input.state_id
            )));
        }

        let mut market = Market::new(
            input.name,
            input.market_type,
            input.state_id,
            input.area_id,
        );
        market.description = input.description;
        market.address = input.address;
        market.landmark = input.landmark;
        market.point = input.point;

        self.markets
            .insert(market.clone())
            .await
            .map_err(|e| SokoError::Store(e.to_string()))?;
        Ok(market)
    }

    pub async fn get_state(&self, id: &StateId) -> Result<State, SokoError> {
        self.states
            .get(id.as_str())
            .await
            .ok_or_else(|| SokoError::StateNotFound(id.to_string()))
    }

    pub async fn get_area(&self, id: &AreaId) -> Result<Area, SokoError> {
        self.areas
            .get(id.as_str())
            .await
            .ok_or_else(|| SokoError::AreaNotFound(id.to_string()))
    }

    pub async fn get_market(&self, id: &MarketId) -> Result<Market, SokoError> {
        self.markets
            .get(id.as_str())
            .await
            .ok_or_else(|| SokoError::MarketNotFound(id.to_string()))
    }

    pub async fn list_states(&self) -> Vec<State> {
        self.states.find(|s| s.is_active).await
    }

    pub async fn list_areas(&self, state_id: Option<&StateId>) -> Vec<Area> {
        self.areas
            .find(|a| a.is_active && state_id.map_or(true, |id| &a.state_id == id))
            .await
    }

    pub async fn list_markets(
        &self,
        state_id: Option<&StateId>,
        area_id: Option<&AreaId>,
        market_type: Option<MarketType>,
    ) -> Vec<Market> {
        self.markets
            .find(|m| {
                m.is_active
                    && state_id.map_or(true, |id| &m.state_id == id)
                    && area_id.map_or(true, |id| &m.area_id == id)
                    && market_type.map_or(true, |t| m.market_type == t)
            })
            .await
    }

    /// Markets within `max_distance_km` of a point, closest first.
    pub async fn markets_nearby(&self, center: GeoPoint, max_distance_km: f64) -> Vec<Market> {
        self.markets
            .geo_near(center, max_distance_km * 1000.0, |m| m.point, |m| m.is_active)
            .await
            .into_iter()
            .map(|hit| hit.doc)
            .collect()
    }

    pub async fn increment_shop_count(&self, market_id: &MarketId) {
        if let Err(err) = self
            .markets
            .update(market_id.as_str(), |m| m.total_shops += 1)
            .await
        {
            tracing::warn!(market = %market_id, error = %err, "shop count increment skipped");
        }
    }

    pub async fn decrement_shop_count(&self, market_id: &MarketId) {
        if let Err(err) = self
            .markets
            .update(market_id.as_str(), |m| m.total_shops = (m.total_shops - 1).max(0))
            .await
        {
            tracing::warn!(market = %market_id, error = %err, "shop count decrement skipped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> LocationService {
        LocationService::new(Collection::new(), Collection::new(), Collection::new())
    }

    #[tokio::test]
    async fn test_duplicate_state_rejected() {
        let svc = service();
        svc.create_state("Lagos", "LA").await.unwrap();
        let err = svc.create_state("lagos", "LG").await.unwrap_err();
        assert!(matches!(err, SokoError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_area_requires_existing_state() {
        let svc = service();
        let err = svc
            .create_area("Ikeja", &StateId::new("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, SokoError::StateNotFound(_)));
    }

    #[tokio::test]
    async fn test_market_hierarchy_invariant() {
        let svc = service();
        let lagos = svc.create_state("Lagos", "LA").await.unwrap();
        let abuja = svc.create_state("Abuja", "AB").await.unwrap();
        let ikeja = svc.create_area("Ikeja", &lagos.id).await.unwrap();

        // Market claiming Abuja but whose area is in Lagos must be rejected.
        let err = svc
            .create_market(NewMarket {
                name: "Computer Village".into(),
                market_type: MarketType::TraditionalMarket,
                state_id: abuja.id.clone(),
                area_id: ikeja.id.clone(),
                description: None,
                address: None,
                landmark: None,
                point: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SokoError::LocationMismatch(_)));

        let market = svc
            .create_market(NewMarket {
                name: "Computer Village".into(),
                market_type: MarketType::TraditionalMarket,
                state_id: lagos.id.clone(),
                area_id: ikeja.id.clone(),
                description: None,
                address: None,
                landmark: None,
                point: None,
            })
            .await
            .unwrap();
        assert_eq!(market.state_id, lagos.id);
    }

    #[tokio::test]
    async fn test_list_areas_by_state() {
        let svc = service();
        let lagos = svc.create_state("Lagos", "LA").await.unwrap();
        let abuja = svc.create_state("Abuja", "AB").await.unwrap();
        svc.create_area("Ikeja", &lagos.id).await.unwrap();
        svc.create_area("Garki", &abuja.id).await.unwrap();

        let areas = svc.list_areas(Some(&lagos.id)).await;
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].name, "Ikeja");
        assert_eq!(svc.list_areas(None).await.len(), 2);
    }

    #[tokio::test]
    async fn test_shop_count_never_negative() {
        let svc = service();
        let lagos = svc.create_state("Lagos", "LA").await.unwrap();
        let ikeja = svc.create_area("Ikeja", &lagos.id).await.unwrap();
        let market = svc
            .create_market(NewMarket {
                name: "Ikeja Mall".into(),
                market_type: MarketType::ShoppingMall,
                state_id: lagos.id.clone(),
                area_id: ikeja.id.clone(),
                description: None,
                address: None,
                landmark: None,
                point: None,
            })
            .await
            .unwrap();

        svc.decrement_shop_count(&market.id).await;
        assert_eq!(svc.get_market(&market.id).await.unwrap().total_shops, 0);
    }
}
