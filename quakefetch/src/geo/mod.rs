//! Geographic station-selection domains.
//!
//! A [`GeoDomain`] describes which stations an FDSN query should cover. It
//! can hold a rectangular bound, a circular bound, or both. FDSN web services
//! accept either a rectangle or a circle in one query, not both, so when both
//! bounds are present the rectangle goes into the server-side query
//! parameters and the circle is re-applied client-side through
//! [`GeoDomain::is_in_domain`] once station coordinates are known.

use serde::Serialize;

/// Rectangular latitude/longitude bound in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RectangleBounds {
    pub minlatitude: f64,
    pub maxlatitude: f64,
    pub minlongitude: f64,
    pub maxlongitude: f64,
}

/// Circular bound: center point plus an epicentral distance band in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CircleBounds {
    pub latitude: f64,
    pub longitude: f64,
    pub minradius: f64,
    pub maxradius: f64,
}

/// Geographic selection region for station queries.
///
/// Four shapes are possible: rectangle only, circle only, both, or neither
/// (a global domain that matches everywhere). Construction never fails:
/// bounds are all-or-nothing, so a builder given only some of a bound's four
/// fields silently leaves that bound disabled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeoDomain {
    rectangle: Option<RectangleBounds>,
    circle: Option<CircleBounds>,
}

impl GeoDomain {
    /// Returns a builder with no bounds set.
    pub fn builder() -> GeoDomainBuilder {
        GeoDomainBuilder::default()
    }

    /// A domain without any geographic constraint.
    pub fn global() -> Self {
        Self::default()
    }

    /// A purely rectangular domain.
    pub fn rectangle(
        minlatitude: f64,
        maxlatitude: f64,
        minlongitude: f64,
        maxlongitude: f64,
    ) -> Self {
        Self {
            rectangle: Some(RectangleBounds {
                minlatitude,
                maxlatitude,
                minlongitude,
                maxlongitude,
            }),
            circle: None,
        }
    }

    /// A purely circular domain around a center point, radii in degrees.
    pub fn circle(latitude: f64, longitude: f64, minradius: f64, maxradius: f64) -> Self {
        Self {
            rectangle: None,
            circle: Some(CircleBounds {
                latitude,
                longitude,
                minradius,
                maxradius,
            }),
        }
    }

    /// Whether a rectangular bound is configured.
    pub fn has_rectangle(&self) -> bool {
        self.rectangle.is_some()
    }

    /// Whether a circular bound is configured.
    pub fn has_circle(&self) -> bool {
        self.circle.is_some()
    }

    /// The circular bound's radius band `(minradius, maxradius)`, if any.
    pub fn radius_band(&self) -> Option<(f64, f64)> {
        self.circle.map(|c| (c.minradius, c.maxradius))
    }

    /// Server-side query parameters for this domain.
    ///
    /// When a rectangle is configured it takes priority, even if a circle is
    /// also present; the circle is then left to [`Self::is_in_domain`]. A
    /// domain without bounds yields no parameters (global query).
    pub fn query_parameters(&self) -> Vec<(&'static str, f64)> {
        if let Some(r) = self.rectangle {
            return vec![
                ("minlatitude", r.minlatitude),
                ("maxlatitude", r.maxlatitude),
                ("minlongitude", r.minlongitude),
                ("maxlongitude", r.maxlongitude),
            ];
        }
        if let Some(c) = self.circle {
            return vec![
                ("latitude", c.latitude),
                ("longitude", c.longitude),
                ("minradius", c.minradius),
                ("maxradius", c.maxradius),
            ];
        }
        Vec::new()
    }

    /// Post-filter test for a station at `latitude`/`longitude`.
    ///
    /// Only meaningful when both bounds are configured: the server query
    /// carried the rectangle, so the circular constraint is re-applied here
    /// against the great-circle distance from the circle center. With one
    /// bound or none, the server query already expressed everything and the
    /// point passes unconditionally.
    pub fn is_in_domain(&self, latitude: f64, longitude: f64) -> bool {
        match (self.rectangle, self.circle) {
            (Some(_), Some(c)) => {
                let distance =
                    great_circle_distance_deg(c.latitude, c.longitude, latitude, longitude);
                c.minradius <= distance && distance <= c.maxradius
            }
            _ => true,
        }
    }
}

/// Builder for [`GeoDomain`].
///
/// Each setter fills one field; [`GeoDomainBuilder::build`] enables a bound
/// only when all four of its fields were given. Partial bounds are dropped,
/// never an error.
#[derive(Debug, Clone, Default)]
pub struct GeoDomainBuilder {
    minlatitude: Option<f64>,
    maxlatitude: Option<f64>,
    minlongitude: Option<f64>,
    maxlongitude: Option<f64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    minradius: Option<f64>,
    maxradius: Option<f64>,
}

impl GeoDomainBuilder {
    /// Set the rectangle's minimum latitude in degrees.
    pub fn min_latitude(mut self, degrees: f64) -> Self {
        self.minlatitude = Some(degrees);
        self
    }

    /// Set the rectangle's maximum latitude in degrees.
    pub fn max_latitude(mut self, degrees: f64) -> Self {
        self.maxlatitude = Some(degrees);
        self
    }

    /// Set the rectangle's minimum longitude in degrees.
    pub fn min_longitude(mut self, degrees: f64) -> Self {
        self.minlongitude = Some(degrees);
        self
    }

    /// Set the rectangle's maximum longitude in degrees.
    pub fn max_longitude(mut self, degrees: f64) -> Self {
        self.maxlongitude = Some(degrees);
        self
    }

    /// Set the circle center latitude in degrees.
    pub fn center_latitude(mut self, degrees: f64) -> Self {
        self.latitude = Some(degrees);
        self
    }

    /// Set the circle center longitude in degrees.
    pub fn center_longitude(mut self, degrees: f64) -> Self {
        self.longitude = Some(degrees);
        self
    }

    /// Set the circle's minimum radius in degrees.
    pub fn min_radius(mut self, degrees: f64) -> Self {
        self.minradius = Some(degrees);
        self
    }

    /// Set the circle's maximum radius in degrees.
    pub fn max_radius(mut self, degrees: f64) -> Self {
        self.maxradius = Some(degrees);
        self
    }

    /// Build the domain, enabling each bound only if complete.
    pub fn build(self) -> GeoDomain {
        let rectangle = match (
            self.minlatitude,
            self.maxlatitude,
            self.minlongitude,
            self.maxlongitude,
        ) {
            (Some(minlatitude), Some(maxlatitude), Some(minlongitude), Some(maxlongitude)) => {
                Some(RectangleBounds {
                    minlatitude,
                    maxlatitude,
                    minlongitude,
                    maxlongitude,
                })
            }
            _ => None,
        };
        let circle = match (self.latitude, self.longitude, self.minradius, self.maxradius) {
            (Some(latitude), Some(longitude), Some(minradius), Some(maxradius)) => {
                Some(CircleBounds {
                    latitude,
                    longitude,
                    minradius,
                    maxradius,
                })
            }
            _ => None,
        };
        GeoDomain { rectangle, circle }
    }
}

/// Great-circle distance between two points, in degrees of arc.
///
/// Uses the haversine formula on a sphere and returns the central angle
/// directly, so no Earth radius enters the result. The spherical
/// approximation differs from the WGS84 geodesic by well under 0.3%, far
/// below the radius-band granularity the post-filter decides over, so filter
/// decisions stay stable against servers using ellipsoidal formulas.
pub fn great_circle_distance_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let half_dphi = (lat2 - lat1).to_radians() / 2.0;
    let half_dlambda = (lon2 - lon1).to_radians() / 2.0;

    let a = half_dphi.sin().powi(2) + phi1.cos() * phi2.cos() * half_dlambda.sin().powi(2);
    let central_angle = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    central_angle.to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_domain_has_no_query_parameters() {
        let domain = GeoDomain::global();
        assert!(!domain.has_rectangle());
        assert!(!domain.has_circle());
        assert!(domain.query_parameters().is_empty());
    }

    #[test]
    fn test_global_domain_matches_everywhere() {
        let domain = GeoDomain::global();
        assert!(domain.is_in_domain(0.0, 0.0));
        assert!(domain.is_in_domain(-89.0, 179.0));
    }

    #[test]
    fn test_rectangle_only_query_parameters() {
        let domain = GeoDomain::rectangle(10.0, 20.0, 100.0, 120.0);
        assert_eq!(
            domain.query_parameters(),
            vec![
                ("minlatitude", 10.0),
                ("maxlatitude", 20.0),
                ("minlongitude", 100.0),
                ("maxlongitude", 120.0),
            ]
        );
    }

    #[test]
    fn test_circle_only_query_parameters() {
        let domain = GeoDomain::circle(35.0, 140.0, 0.0, 90.0);
        assert_eq!(
            domain.query_parameters(),
            vec![
                ("latitude", 35.0),
                ("longitude", 140.0),
                ("minradius", 0.0),
                ("maxradius", 90.0),
            ]
        );
    }

    #[test]
    fn test_single_bound_is_not_revalidated() {
        // With one bound the server query is authoritative, so the
        // post-filter accepts everything, even points outside the bound.
        let rectangle = GeoDomain::rectangle(10.0, 20.0, 100.0, 120.0);
        assert!(rectangle.is_in_domain(-50.0, 0.0));

        let circle = GeoDomain::circle(0.0, 0.0, 0.0, 10.0);
        assert!(circle.is_in_domain(80.0, 80.0));
    }

    #[test]
    fn test_both_bounds_rectangle_wins_query() {
        let domain = GeoDomain::builder()
            .min_latitude(10.0)
            .max_latitude(20.0)
            .min_longitude(100.0)
            .max_longitude(120.0)
            .center_latitude(15.0)
            .center_longitude(110.0)
            .min_radius(0.0)
            .max_radius(30.0)
            .build();

        assert!(domain.has_rectangle());
        assert!(domain.has_circle());
        let params = domain.query_parameters();
        assert_eq!(params[0], ("minlatitude", 10.0));
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_both_bounds_post_filter_applies_circle() {
        // Circle centered on the equator with a 10-30 degree band. The
        // rectangle plays no role here; only the distance band decides.
        let domain = GeoDomain::builder()
            .min_latitude(-5.0)
            .max_latitude(5.0)
            .min_longitude(-5.0)
            .max_longitude(5.0)
            .center_latitude(0.0)
            .center_longitude(0.0)
            .min_radius(10.0)
            .max_radius(30.0)
            .build();

        assert!(domain.is_in_domain(20.0, 0.0)); // 20 deg away
        assert!(domain.is_in_domain(0.0, 15.0)); // 15 deg away
        assert!(!domain.is_in_domain(5.0, 0.0)); // too close
        assert!(!domain.is_in_domain(40.0, 0.0)); // too far
        assert!(!domain.is_in_domain(0.0, 0.0)); // at the center
    }

    #[test]
    fn test_post_filter_band_is_inclusive_at_zero() {
        // A band starting at zero keeps the center point itself: the
        // distance is exactly 0 and the comparison is inclusive.
        let domain = GeoDomain::builder()
            .min_latitude(-5.0)
            .max_latitude(5.0)
            .min_longitude(-5.0)
            .max_longitude(5.0)
            .center_latitude(0.0)
            .center_longitude(0.0)
            .min_radius(0.0)
            .max_radius(30.0)
            .build();

        assert!(domain.is_in_domain(0.0, 0.0));
    }

    #[test]
    fn test_partial_rectangle_is_disabled() {
        // Three of four rectangle fields: the rectangle must be dropped and
        // the complete circle takes over the query parameters.
        let domain = GeoDomain::builder()
            .min_latitude(10.0)
            .max_latitude(20.0)
            .min_longitude(100.0)
            .center_latitude(15.0)
            .center_longitude(110.0)
            .min_radius(0.0)
            .max_radius(30.0)
            .build();

        assert!(!domain.has_rectangle());
        assert!(domain.has_circle());
        assert_eq!(domain.query_parameters()[0], ("latitude", 15.0));
        // Circle-only: no post-filtering.
        assert!(domain.is_in_domain(80.0, 80.0));
    }

    #[test]
    fn test_partial_circle_is_disabled() {
        let domain = GeoDomain::builder()
            .center_latitude(15.0)
            .min_radius(0.0)
            .build();

        assert!(!domain.has_circle());
        assert!(domain.query_parameters().is_empty());
    }

    #[test]
    fn test_radius_band_accessor() {
        let domain = GeoDomain::circle(0.0, 0.0, 30.0, 60.0);
        assert_eq!(domain.radius_band(), Some((30.0, 60.0)));
        assert_eq!(GeoDomain::global().radius_band(), None);
    }

    mod distance {
        use super::*;

        #[test]
        fn test_identical_points_are_zero() {
            let d = great_circle_distance_deg(45.0, 45.0, 45.0, 45.0);
            assert!(d.abs() < 1e-9);
        }

        #[test]
        fn test_quarter_circle_along_equator() {
            let d = great_circle_distance_deg(0.0, 0.0, 0.0, 90.0);
            assert!((d - 90.0).abs() < 1e-9);
        }

        #[test]
        fn test_pole_to_pole() {
            let d = great_circle_distance_deg(90.0, 0.0, -90.0, 0.0);
            assert!((d - 180.0).abs() < 1e-9);
        }

        #[test]
        fn test_antipodal_on_equator() {
            let d = great_circle_distance_deg(0.0, 0.0, 0.0, 180.0);
            assert!((d - 180.0).abs() < 1e-9);
        }

        #[test]
        fn test_new_york_to_london() {
            // Known great-circle separation of about 50.08 degrees.
            let d = great_circle_distance_deg(40.7128, -74.0060, 51.5074, -0.1278);
            assert!((d - 50.08).abs() < 0.1, "got {}", d);
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_distance_in_valid_range(
                lat1 in -90.0..90.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -90.0..90.0_f64,
                lon2 in -180.0..180.0_f64,
            ) {
                let d = great_circle_distance_deg(lat1, lon1, lat2, lon2);
                prop_assert!((-1e-9..=180.0 + 1e-9).contains(&d), "distance {} out of range", d);
            }

            #[test]
            fn test_distance_is_symmetric(
                lat1 in -90.0..90.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -90.0..90.0_f64,
                lon2 in -180.0..180.0_f64,
            ) {
                let forward = great_circle_distance_deg(lat1, lon1, lat2, lon2);
                let backward = great_circle_distance_deg(lat2, lon2, lat1, lon1);
                prop_assert!((forward - backward).abs() < 1e-9);
            }

            #[test]
            fn test_distance_to_self_is_zero(
                lat in -90.0..90.0_f64,
                lon in -180.0..180.0_f64,
            ) {
                let d = great_circle_distance_deg(lat, lon, lat, lon);
                prop_assert!(d.abs() < 1e-9);
            }

            #[test]
            fn test_incomplete_builder_never_enables_bounds(
                minlat in -90.0..90.0_f64,
                maxlat in -90.0..90.0_f64,
                minlon in -180.0..180.0_f64,
            ) {
                // Any 1-3 rectangle fields must leave the bound disabled.
                let domain = GeoDomain::builder()
                    .min_latitude(minlat)
                    .max_latitude(maxlat)
                    .min_longitude(minlon)
                    .build();
                prop_assert!(!domain.has_rectangle());
                prop_assert!(domain.query_parameters().is_empty());
                prop_assert!(domain.is_in_domain(0.0, 0.0));
            }
        }
    }
}
