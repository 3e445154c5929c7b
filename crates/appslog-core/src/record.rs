//! Record Data Structure
//!
//! This module defines the core `Record` type - one device activity event in
//! the log - and the validation that turns loose JSON input into one.
//!
//! ## What is a Record?
//! A record describes one observation of a device's installed apps:
//! - Which device it was (an opaque id plus a platform tag)
//! - Where it was (latitude/longitude)
//! - Which apps were installed (numeric app ids)
//!
//! ## Structure
//! Every field is optional. Telemetry arrives patchy - a record with no
//! coordinates or no device block is still worth keeping - so absence is
//! modeled with `Option`/empty rather than rejected:
//! - **device**: Optional device identity (id + platform kind)
//! - **lat** / **lon**: Optional coordinates
//! - **apps**: App id list, possibly empty
//!
//! ## Validation
//! [`Record::from_value`] is the gate between untrusted JSON and a typed
//! record. It is strict about shape - unknown keys and mistyped values are
//! errors, not warnings - and every error names the offending field with a
//! dotted path (`device.id`, `apps[3]`) so a bad record in a big batch can
//! be found without guessing. Missing fields are fine; wrong ones are not.
//!
//! ## Example
//! ```ignore
//! let value = serde_json::json!({
//!     "device": {"id": "e7e1a50c", "type": "idfa"},
//!     "lat": 67.77,
//!     "lon": -22.8,
//!     "apps": [1, 2, 3],
//! });
//! let record = Record::from_value(&value)?;
//! assert_eq!(record.apps, vec![1, 2, 3]);
//! ```

use serde_json::Value;

use crate::error::{Error, Result};

/// A single device activity record
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// Device identity, absent when the input carried no device block
    pub device: Option<Device>,

    /// Latitude in degrees
    pub lat: Option<f64>,

    /// Longitude in degrees
    pub lon: Option<f64>,

    /// Installed app ids
    pub apps: Vec<u32>,
}

/// Device identity attached to a record
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Device {
    /// Opaque device identifier
    pub id: Option<String>,

    /// Platform tag ("idfa", "gaid", ...), the `type` key in JSON input
    pub kind: Option<String>,
}

impl Record {
    /// Validate a loose JSON value into a typed record.
    ///
    /// Strict on shape: an unknown key anywhere or a value of the wrong
    /// type fails the whole record. Integer coordinates are accepted and
    /// widened to floats. See the module docs for the full rules.
    pub fn from_value(value: &Value) -> Result<Record> {
        let map = value
            .as_object()
            .ok_or_else(|| schema("record", "an object"))?;

        let mut record = Record::default();
        for (key, value) in map {
            match key.as_str() {
                "device" => record.device = Some(parse_device(value)?),
                "lat" => record.lat = Some(number_field("lat", value)?),
                "lon" => record.lon = Some(number_field("lon", value)?),
                "apps" => record.apps = parse_apps(value)?,
                other => return Err(Error::UnknownField(other.to_string())),
            }
        }

        Ok(record)
    }
}

fn parse_device(value: &Value) -> Result<Device> {
    let map = value
        .as_object()
        .ok_or_else(|| schema("device", "an object"))?;

    let mut device = Device::default();
    for (key, value) in map {
        match key.as_str() {
            "id" => device.id = Some(text_field("device.id", value)?),
            "type" => device.kind = Some(text_field("device.type", value)?),
            other => return Err(Error::UnknownField(format!("device.{other}"))),
        }
    }

    Ok(device)
}

fn text_field(field: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| schema(field, "a string"))
}

fn number_field(field: &str, value: &Value) -> Result<f64> {
    value.as_f64().ok_or_else(|| schema(field, "a number"))
}

fn parse_apps(value: &Value) -> Result<Vec<u32>> {
    let items = value.as_array().ok_or_else(|| schema("apps", "an array"))?;

    let mut apps = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let id = item
            .as_u64()
            .filter(|&n| n <= u32::MAX as u64)
            .ok_or_else(|| schema(format!("apps[{index}]"), "a non-negative 32-bit integer"))?;
        apps.push(id as u32);
    }

    Ok(apps)
}

fn schema(field: impl Into<String>, expected: &'static str) -> Error {
    Error::Schema {
        field: field.into(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ---------------------------------------------------------------
    // Accepting well-formed input
    // ---------------------------------------------------------------

    #[test]
    fn test_full_record() {
        let value = json!({
            "device": {"id": "e7e1a50c0ec2747ca56cd9e1558c0d7c", "type": "idfa"},
            "lat": 67.7835424444,
            "lon": -22.8044005471,
            "apps": [1, 2, 3, 7, 23],
        });

        let record = Record::from_value(&value).unwrap();
        let device = record.device.unwrap();
        assert_eq!(device.id.as_deref(), Some("e7e1a50c0ec2747ca56cd9e1558c0d7c"));
        assert_eq!(device.kind.as_deref(), Some("idfa"));
        assert_eq!(record.lat, Some(67.7835424444));
        assert_eq!(record.lon, Some(-22.8044005471));
        assert_eq!(record.apps, vec![1, 2, 3, 7, 23]);
    }

    #[test]
    fn test_empty_object_is_valid() {
        let record = Record::from_value(&json!({})).unwrap();
        assert_eq!(record, Record::default());
        assert!(record.device.is_none());
        assert!(record.apps.is_empty());
    }

    #[test]
    fn test_missing_fields_stay_absent() {
        let record = Record::from_value(&json!({"apps": [42]})).unwrap();
        assert!(record.device.is_none());
        assert!(record.lat.is_none());
        assert!(record.lon.is_none());
        assert_eq!(record.apps, vec![42]);
    }

    #[test]
    fn test_empty_device_differs_from_absent() {
        let present = Record::from_value(&json!({"device": {}})).unwrap();
        let absent = Record::from_value(&json!({})).unwrap();

        assert_eq!(present.device, Some(Device::default()));
        assert_eq!(absent.device, None);
        assert_ne!(present, absent);
    }

    #[test]
    fn test_integer_coordinates_widen_to_float() {
        let record = Record::from_value(&json!({"lat": 42, "lon": -7})).unwrap();
        assert_eq!(record.lat, Some(42.0));
        assert_eq!(record.lon, Some(-7.0));
    }

    #[test]
    fn test_empty_apps_list() {
        let record = Record::from_value(&json!({"apps": []})).unwrap();
        assert!(record.apps.is_empty());
    }

    #[test]
    fn test_apps_at_u32_max() {
        let record = Record::from_value(&json!({"apps": [0, 4294967295u64]})).unwrap();
        assert_eq!(record.apps, vec![0, u32::MAX]);
    }

    // ---------------------------------------------------------------
    // Rejecting malformed input
    // ---------------------------------------------------------------

    #[test]
    fn test_non_object_record() {
        let err = Record::from_value(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.to_string(), "'record' must be an object");
    }

    #[test]
    fn test_unknown_top_level_key() {
        let err = Record::from_value(&json!({"latitude": 1.0})).unwrap_err();
        assert!(matches!(&err, Error::UnknownField(f) if f == "latitude"));
    }

    #[test]
    fn test_unknown_device_key() {
        let value = json!({"device": {"id": "a", "serial": "b"}});
        let err = Record::from_value(&value).unwrap_err();
        assert!(matches!(&err, Error::UnknownField(f) if f == "device.serial"));
    }

    #[test]
    fn test_device_must_be_object() {
        let err = Record::from_value(&json!({"device": "idfa"})).unwrap_err();
        assert_eq!(err.to_string(), "'device' must be an object");
    }

    #[test]
    fn test_device_id_must_be_string() {
        let err = Record::from_value(&json!({"device": {"id": 123}})).unwrap_err();
        assert_eq!(err.to_string(), "'device.id' must be a string");
    }

    #[test]
    fn test_device_type_must_be_string() {
        let err = Record::from_value(&json!({"device": {"type": null}})).unwrap_err();
        assert_eq!(err.to_string(), "'device.type' must be a string");
    }

    #[test]
    fn test_null_coordinate_is_an_error() {
        let err = Record::from_value(&json!({"lat": null})).unwrap_err();
        assert_eq!(err.to_string(), "'lat' must be a number");
    }

    #[test]
    fn test_string_coordinate_is_an_error() {
        let err = Record::from_value(&json!({"lon": "-22.8"})).unwrap_err();
        assert_eq!(err.to_string(), "'lon' must be a number");
    }

    #[test]
    fn test_apps_must_be_array() {
        let err = Record::from_value(&json!({"apps": 1})).unwrap_err();
        assert_eq!(err.to_string(), "'apps' must be an array");
    }

    #[test]
    fn test_fractional_app_id_rejected() {
        let err = Record::from_value(&json!({"apps": [1, 2.5]})).unwrap_err();
        assert_eq!(err.to_string(), "'apps[1]' must be a non-negative 32-bit integer");
    }

    #[test]
    fn test_negative_app_id_rejected() {
        let err = Record::from_value(&json!({"apps": [-1]})).unwrap_err();
        assert_eq!(err.to_string(), "'apps[0]' must be a non-negative 32-bit integer");
    }

    #[test]
    fn test_overflowing_app_id_rejected() {
        let err = Record::from_value(&json!({"apps": [4294967296u64]})).unwrap_err();
        assert!(matches!(&err, Error::Schema { field, .. } if field == "apps[0]"));
    }

    #[test]
    fn test_string_app_id_rejected() {
        let err = Record::from_value(&json!({"apps": ["1"]})).unwrap_err();
        assert!(matches!(&err, Error::Schema { field, .. } if field == "apps[0]"));
    }
}
