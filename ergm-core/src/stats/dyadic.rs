//! Dyadic covariate change statistics.
//!
//! These kernels derive a per-dyad covariate from continuous coordinate
//! columns of both endpoints. A missing coordinate silently zeroes the
//! term, matching the NA convention of the nodal statistics.

use crate::attributes::Attributes;
use crate::graph::{Graph, NodeId};

const EARTH_RADIUS_KM: f64 = 6371.0;

fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let half_dphi = (lat2 - lat1).to_radians() / 2.0;
    let half_dlambda = (lon2 - lon1).to_radians() / 2.0;
    let a = half_dphi.sin().powi(2) + phi1.cos() * phi2.cos() * half_dlambda.sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

fn geo_distance(attrs: &Attributes, slots: &[usize], i: NodeId, j: NodeId) -> f64 {
    let (lat_slot, lon_slot) = (slots[0], slots[1]);
    let (lat1, lon1) = (attrs.continuous(lat_slot, i), attrs.continuous(lon_slot, i));
    let (lat2, lon2) = (attrs.continuous(lat_slot, j), attrs.continuous(lon_slot, j));
    if lat1.is_nan() || lon1.is_nan() || lat2.is_nan() || lon2.is_nan() {
        return 0.0;
    }
    haversine_km(lat1, lon1, lat2, lon2)
}

/// `GeoDistance`: great-circle distance in kilometres between endpoint
/// coordinates given as decimal-degree latitude and longitude columns.
pub(crate) fn change_geo_distance(
    _g: &Graph,
    attrs: &Attributes,
    slots: &[usize],
    i: NodeId,
    j: NodeId,
) -> f64 {
    if i == j {
        return 0.0;
    }
    geo_distance(attrs, slots, i, j)
}

/// `LogGeoDistance`: natural log of the great-circle distance; zero for
/// coincident or unobserved coordinates.
pub(crate) fn change_log_geo_distance(
    _g: &Graph,
    attrs: &Attributes,
    slots: &[usize],
    i: NodeId,
    j: NodeId,
) -> f64 {
    if i == j {
        return 0.0;
    }
    let d = geo_distance(attrs, slots, i, j);
    if d > 0.0 { d.ln() } else { 0.0 }
}

/// `EuclideanDistance`: straight-line distance over three coordinate
/// columns.
pub(crate) fn change_euclidean_distance(
    _g: &Graph,
    attrs: &Attributes,
    slots: &[usize],
    i: NodeId,
    j: NodeId,
) -> f64 {
    if i == j {
        return 0.0;
    }
    let mut sum = 0.0;
    for &slot in slots {
        let (x, y) = (attrs.continuous(slot, i), attrs.continuous(slot, j));
        if x.is_nan() || y.is_nan() {
            return 0.0;
        }
        let diff = x - y;
        sum += diff * diff;
    }
    sum.sqrt()
}
