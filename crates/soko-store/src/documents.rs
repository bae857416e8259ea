//! [`Document`] implementations for the domain types.

use crate::collection::Document;
use soko_core::prelude::*;

impl Document for State {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Document for Area {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Document for Market {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Document for Vendor {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Document for Product {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Document for CatalogItem {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Document for User {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Document for Review {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Document for Favorite {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}
