use crate::probe::SensorReading;
use regex::Regex;
use std::num::ParseFloatError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to build sensor value pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("sensor T{sensor} reported malformed value {raw:?}: {source}")]
    MalformedValue {
        sensor: u32,
        raw: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("sensor T{sensor} is outside 1..={count}")]
    UnknownSensor { sensor: u32, count: u32 },
}

/// Pulls `T<n>` readings out of a PCsensor status page.
///
/// A reading is the `T<n><p>` marker, anything on the same line, then the
/// first decimal number. Markers are located with a plain substring search;
/// one shared pattern reads the value after each marker, so building an
/// extractor costs the same for any sensor count.
#[derive(Debug)]
pub struct SensorExtractor {
    sensor_count: u32,
    value: Regex,
}

impl SensorExtractor {
    pub fn new(sensor_count: u32) -> Result<Self, ExtractError> {
        Ok(Self {
            sensor_count,
            value: Regex::new(r"^.*?(\d*\.\d*)")?,
        })
    }

    pub fn sensor_count(&self) -> u32 {
        self.sensor_count
    }

    /// Returns `Ok(None)` when the sensor's marker is absent. A marker whose
    /// number does not parse is an error.
    ///
    /// Markers are tried in document order; the first one followed by a
    /// decimal on its line wins.
    pub fn extract(&self, body: &str, sensor: u32) -> Result<Option<SensorReading>, ExtractError> {
        if sensor == 0 || sensor > self.sensor_count {
            return Err(ExtractError::UnknownSensor {
                sensor,
                count: self.sensor_count,
            });
        }

        let marker = format!("T{sensor}<p>");
        let Some(raw) = body.match_indices(&marker).find_map(|(at, _)| {
            self.value
                .captures(&body[at + marker.len()..])
                .and_then(|captures| captures.get(1))
                .map(|value| value.as_str())
        }) else {
            return Ok(None);
        };

        let value = raw
            .parse::<f64>()
            .map_err(|source| ExtractError::MalformedValue {
                sensor,
                raw: raw.to_string(),
                source,
            })?;

        Ok(Some(SensorReading { sensor, value }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<html><body>\
        <div>T1<p>21.50</p></div>\
        <div>T2<p><b>22.75</b> C</p></div>\
        </body></html>";

    #[test]
    fn extracts_each_sensor_value() {
        let extractor = SensorExtractor::new(2).expect("extractor");
        let first = extractor.extract(PAGE, 1).expect("extract").expect("T1");
        let second = extractor.extract(PAGE, 2).expect("extract").expect("T2");
        assert_eq!(first, SensorReading { sensor: 1, value: 21.5 });
        assert_eq!(second, SensorReading { sensor: 2, value: 22.75 });
    }

    #[test]
    fn missing_marker_is_absent() {
        let extractor = SensorExtractor::new(3).expect("extractor");
        assert!(extractor.extract(PAGE, 3).expect("extract").is_none());
    }

    #[test]
    fn marker_without_any_decimal_is_absent() {
        let extractor = SensorExtractor::new(1).expect("extractor");
        let reading = extractor.extract("T1<p>offline", 1).expect("extract");
        assert!(reading.is_none());
    }

    #[test]
    fn bare_decimal_point_is_malformed() {
        let extractor = SensorExtractor::new(1).expect("extractor");
        let err = extractor
            .extract("...T1<p>notanumber...", 1)
            .expect_err("should error");
        match err {
            ExtractError::MalformedValue { sensor, raw, .. } => {
                assert_eq!(sensor, 1);
                assert_eq!(raw, ".");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn first_match_in_document_order_wins() {
        let extractor = SensorExtractor::new(1).expect("extractor");
        let body = "T1<p>18.25 T1<p>30.00";
        let reading = extractor.extract(body, 1).expect("extract").expect("T1");
        assert_eq!(reading.value, 18.25);
    }

    #[test]
    fn single_digit_marker_does_not_match_two_digit_sensor() {
        let extractor = SensorExtractor::new(1).expect("extractor");
        let reading = extractor.extract("T10<p>25.00", 1).expect("extract");
        assert!(reading.is_none());
    }

    #[test]
    fn intervening_content_must_stay_on_one_line() {
        let extractor = SensorExtractor::new(1).expect("extractor");
        let reading = extractor.extract("T1<p>\n21.50", 1).expect("extract");
        assert!(reading.is_none());
    }

    #[test]
    fn sensor_outside_range_is_rejected() {
        let extractor = SensorExtractor::new(2).expect("extractor");
        assert!(matches!(
            extractor.extract(PAGE, 0),
            Err(ExtractError::UnknownSensor { sensor: 0, count: 2 })
        ));
        assert!(matches!(
            extractor.extract(PAGE, 3),
            Err(ExtractError::UnknownSensor { sensor: 3, count: 2 })
        ));
    }

    #[test]
    fn zero_sensors_builds_empty_extractor() {
        let extractor = SensorExtractor::new(0).expect("extractor");
        assert_eq!(extractor.sensor_count(), 0);
    }

    #[test]
    fn later_marker_is_used_when_first_has_no_decimal() {
        let extractor = SensorExtractor::new(1).expect("extractor");
        let body = "T1<p>offline\nT1<p>19.75";
        let reading = extractor.extract(body, 1).expect("extract").expect("T1");
        assert_eq!(reading.value, 19.75);
    }

    #[test]
    fn widest_sensor_range_builds_instantly() {
        let started = std::time::Instant::now();
        let extractor = SensorExtractor::new(u32::MAX).expect("extractor");
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
        assert_eq!(extractor.sensor_count(), u32::MAX);

        let reading = extractor.extract(PAGE, 2).expect("extract").expect("T2");
        assert_eq!(reading.value, 22.75);
        assert!(extractor.extract(PAGE, u32::MAX).expect("extract").is_none());
    }
}
