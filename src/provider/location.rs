/// Fixed-coordinate location provider
///
/// A terminal client has no device geolocation; coordinates arrive from
/// CLI flags or the config file. Missing coordinates classify as
/// PositionUnavailable, the same class a device without a fix reports,
/// so callers follow one degraded path for both.
use async_trait::async_trait;

use super::{LocationError, LocationProvider};
use crate::ranking::UserLocation;

pub struct StaticLocationProvider {
    lat: Option<f64>,
    lon: Option<f64>,
}

impl StaticLocationProvider {
    pub fn new(lat: Option<f64>, lon: Option<f64>) -> Self {
        StaticLocationProvider { lat, lon }
    }
}

#[async_trait]
impl LocationProvider for StaticLocationProvider {
    async fn current_location(&self) -> Result<UserLocation, LocationError> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(UserLocation { lat, lon }),
            _ => Err(LocationError::PositionUnavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_when_both_coordinates_present() {
        let provider = StaticLocationProvider::new(Some(10.77), Some(106.69));
        let location = provider
            .current_location()
            .await
            .expect("Failed to resolve location");
        assert_eq!(location.lat, 10.77);
        assert_eq!(location.lon, 106.69);
    }

    #[tokio::test]
    async fn test_missing_coordinate_is_position_unavailable() {
        for (lat, lon) in [(None, None), (Some(10.77), None), (None, Some(106.69))] {
            let provider = StaticLocationProvider::new(lat, lon);
            let result = provider.current_location().await;
            assert!(matches!(result, Err(LocationError::PositionUnavailable)));
        }
    }
}
