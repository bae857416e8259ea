//! Spherical proximity queries over a collection.

use crate::collection::{Collection, Document};
use soko_core::GeoPoint;

/// A document within range of a proximity query, with its spherical
/// distance from the query center in meters.
#[derive(Debug, Clone)]
pub struct GeoHit<T> {
    pub doc: T,
    pub distance_m: f64,
}

impl<T: Document> Collection<T> {
    /// Proximity query: all documents with a point within `max_distance_m`
    /// meters of `center`, sorted by distance ascending.
    ///
    /// `point_of` extracts the document's coordinates; documents without a
    /// point never match. `pred` is the base eligibility filter applied
    /// inside the geo stage, mirroring a `$geoNear` query clause.
    pub async fn geo_near<FP, P>(
        &self,
        center: GeoPoint,
        max_distance_m: f64,
        point_of: FP,
        pred: P,
    ) -> Vec<GeoHit<T>>
    where
        FP: Fn(&T) -> Option<GeoPoint>,
        P: Fn(&T) -> bool,
    {
        let docs = self.find(|d| pred(d) && point_of(d).is_some()).await;
        let mut hits: Vec<GeoHit<T>> = docs
            .into_iter()
            .filter_map(|doc| {
                let point = point_of(&doc)?;
                let distance_m = center.distance_m(&point);
                (distance_m <= max_distance_m).then_some(GeoHit { doc, distance_m })
            })
            .collect();
        // Stable sort keeps insertion order for equidistant documents.
        hits.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
        hits
    }
}
