//! Vendor registration and profiles.

use crate::locations::LocationService;
use serde::Deserialize;
use soko_core::prelude::*;
use soko_core::{GeoPoint, SokoError};
use soko_store::Collection;

/// Input for registering a vendor.
#[derive(Debug, Clone, Deserialize)]
pub struct NewVendor {
    pub business_name: String,
    pub business_description: Option<String>,
    pub vendor_type: VendorType,
    pub state_id: StateId,
    pub area_id: AreaId,
    pub market_id: Option<MarketId>,
    pub shop_number: Option<String>,
    pub shop_floor: Option<String>,
    pub shop_block: Option<String>,
    pub shop_address: Option<String>,
    pub landmark: Option<String>,
    pub point: Option<GeoPoint>,
    pub contact_details: ContactDetails,
    pub bank_details: Option<BankDetails>,
    pub operating_hours: Option<OperatingHours>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Mutable vendor profile fields; everything absent stays unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorUpdate {
    pub business_name: Option<String>,
    pub business_description: Option<String>,
    pub shop_number: Option<String>,
    pub shop_floor: Option<String>,
    pub shop_block: Option<String>,
    pub shop_address: Option<String>,
    pub landmark: Option<String>,
    pub point: Option<GeoPoint>,
    pub contact_details: Option<ContactDetails>,
    pub bank_details: Option<BankDetails>,
    pub operating_hours: Option<OperatingHours>,
    pub categories: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub is_open: Option<bool>,
}

/// Service over vendor profiles.
#[derive(Clone)]
pub struct VendorService {
    vendors: Collection<Vendor>,
    products: Collection<Product>,
    users: Collection<User>,
    locations: LocationService,
}

impl VendorService {
    pub fn new(
        vendors: Collection<Vendor>,
        products: Collection<Product>,
        users: Collection<User>,
        locations: LocationService,
    ) -> Self {
        Self {
            vendors,
            products,
            users,
            locations,
        }
    }

    /// Register a vendor profile for a user. Exactly one vendor per user;
    /// a second registration is a conflict. Flips the user's role to
    /// vendor and counts the shop in its market.
    pub async fn register(&self, user_id: &UserId, input: NewVendor) -> Result<Vendor, SokoError> {
        if self
            .vendors
            .find_one(|v| &v.user_id == user_id)
            .await
            .is_some()
        {
            return Err(SokoError::Conflict(format!(
                "user {user_id} already has a vendor profile"
            )));
        }

        // The location hierarchy must be internally consistent.
        let area = self.locations.get_area(&input.area_id).await?;
        if area.state_id != input.state_id {
            return Err(SokoError::LocationMismatch(format!(
                "area {} is not in state {}",
                input.area_id, input.state_id
            )));
        }
        if let Some(market_id) = &input.market_id {
            let market = self.locations.get_market(market_id).await?;
            if market.area_id != input.area_id {
                return Err(SokoError::LocationMismatch(format!(
                    "market {market_id} is not in area {}",
                    input.area_id
                )));
            }
        }

        let mut vendor = Vendor::new(
            user_id.clone(),
            input.business_name,
            input.vendor_type,
            input.state_id,
            input.area_id,
            input.contact_details,
        );
        vendor.business_description = input.business_description;
        vendor.market_id = input.market_id.clone();
        vendor.shop_number = input.shop_number;
        vendor.shop_floor = input.shop_floor;
        vendor.shop_block = input.shop_block;
        vendor.shop_address = input.shop_address;
        vendor.landmark = input.landmark;
        vendor.point = input.point;
        vendor.bank_details = input.bank_details;
        vendor.operating_hours = input.operating_hours;
        vendor.categories = input.categories;
        vendor.tags = input.tags;

        self.vendors
            .insert(vendor.clone())
            .await
            .map_err(|e| SokoError::Store(e.to_string()))?;

        if let Err(err) = self
            .users
            .update(user_id.as_str(), |u| {
                u.role = Role::Vendor;
                u.vendor_id = Some(vendor.id.clone());
            })
            .await
        {
            tracing::warn!(user = %user_id, error = %err, "user role update skipped");
        }

        if let Some(market_id) = &input.market_id {
            self.locations.increment_shop_count(market_id).await;
        }

        Ok(vendor)
    }

    /// Fetch a vendor and count the view. The counter bump is
    /// fire-and-forget and never delays the read.
    pub async fn get(&self, id: &VendorId) -> Result<Vendor, SokoError> {
        let vendor = self
            .vendors
            .get(id.as_str())
            .await
            .ok_or_else(|| SokoError::VendorNotFound(id.to_string()))?;

        let vendors = self.vendors.clone();
        let vendor_id = id.as_str().to_string();
        tokio::spawn(async move {
            let _ = vendors
                .update_many(&[vendor_id], |v| v.total_views += 1)
                .await;
        });

        Ok(vendor)
    }

    pub async fn find_by_user(&self, user_id: &UserId) -> Result<Vendor, SokoError> {
        self.vendors
            .find_one(|v| &v.user_id == user_id)
            .await
            .ok_or_else(|| SokoError::VendorNotFound(format!("for user {user_id}")))
    }

    /// Vendors within `max_distance_km` of a point, closest first.
    pub async fn find_nearby(&self, center: GeoPoint, max_distance_km: f64) -> Vec<Vendor> {
        self.vendors
            .geo_near(center, max_distance_km * 1000.0, |v| v.point, |v| v.is_active)
            .await
            .into_iter()
            .map(|hit| hit.doc)
            .collect()
    }

    /// Update a vendor profile. Only the owning user may do this.
    pub async fn update(
        &self,
        id: &VendorId,
        user_id: &UserId,
        update: VendorUpdate,
    ) -> Result<Vendor, SokoError> {
        let vendor = self
            .vendors
            .get(id.as_str())
            .await
            .ok_or_else(|| SokoError::VendorNotFound(id.to_string()))?;
        if &vendor.user_id != user_id {
            return Err(SokoError::Forbidden(
                "you can only update your own vendor profile".into(),
            ));
        }
        self.apply_update(id, update).await
    }

    /// Update any vendor, without the ownership check (admin path).
    pub async fn admin_update(
        &self,
        id: &VendorId,
        update: VendorUpdate,
    ) -> Result<Vendor, SokoError> {
        self.apply_update(id, update).await
    }

    async fn apply_update(&self, id: &VendorId, update: VendorUpdate) -> Result<Vendor, SokoError> {
        self.vendors
            .update(id.as_str(), |v| {
                if let Some(name) = update.business_name.clone() {
                    v.business_name = name;
                }
                if let Some(description) = update.business_description.clone() {
                    v.business_description = Some(description);
                }
                if let Some(number) = update.shop_number.clone() {
                    v.shop_number = Some(number);
                }
                if let Some(floor) = update.shop_floor.clone() {
                    v.shop_floor = Some(floor);
                }
                if let Some(block) = update.shop_block.clone() {
                    v.shop_block = Some(block);
                }
                if let Some(address) = update.shop_address.clone() {
                    v.shop_address = Some(address);
                }
                if let Some(landmark) = update.landmark.clone() {
                    v.landmark = Some(landmark);
                }
                if let Some(point) = update.point {
                    v.point = Some(point);
                }
                if let Some(contact) = update.contact_details.clone() {
                    v.contact_details = contact;
                }
                if let Some(bank) = update.bank_details.clone() {
                    v.bank_details = Some(bank);
                }
                if let Some(hours) = update.operating_hours.clone() {
                    v.operating_hours = Some(hours);
                }
                if let Some(categories) = update.categories.clone() {
                    v.categories = categories;
                }
                if let Some(tags) = update.tags.clone() {
                    v.tags = tags;
                }
                if let Some(is_open) = update.is_open {
                    v.is_open = is_open;
                }
            })
            .await
            .map_err(|_| SokoError::VendorNotFound(id.to_string()))
    }

    /// Delete a vendor profile. Its products are soft-orphaned: deactivated
    /// in place so no search surface can return them, but kept for audit.
    pub async fn delete(&self, id: &VendorId, user_id: &UserId) -> Result<(), SokoError> {
        let vendor = self
            .vendors
            .get(id.as_str())
            .await
            .ok_or_else(|| SokoError::VendorNotFound(id.to_string()))?;
        if &vendor.user_id != user_id {
            return Err(SokoError::Forbidden(
                "you can only delete your own vendor profile".into(),
            ));
        }

        let orphaned: Vec<String> = self
            .products
            .find(|p| p.vendor_id == vendor.id)
            .await
            .into_iter()
            .map(|p| p.id.into_inner())
            .collect();
        let deactivated = self
            .products
            .update_many(&orphaned, |p| p.is_active = false)
            .await;
        tracing::info!(vendor = %id, deactivated, "soft-orphaned products of deleted vendor");

        if let Some(market_id) = &vendor.market_id {
            self.locations.decrement_shop_count(market_id).await;
        }

        if let Err(err) = self
            .users
            .update(vendor.user_id.as_str(), |u| {
                u.role = Role::User;
                u.vendor_id = None;
            })
            .await
        {
            tracing::warn!(user = %vendor.user_id, error = %err, "user role reset skipped");
        }

        self.vendors.remove(id.as_str()).await;
        Ok(())
    }

    /// Listings the market reference data needs: vendors of one market.
    pub async fn find_by_market(&self, market_id: &MarketId) -> Vec<Vendor> {
        self.vendors
            .find(|v| v.is_active && v.market_id.as_ref() == Some(market_id))
            .await
    }
}
