//! # Data Sources
//!
//! Where records come from. Both variants return the ordered collection found
//! under the top-level `"data"` key, so calling code never needs to know
//! whether the records came over the network or from a cached file.
//!
//! - **`remote`**: `GET {base_url}/{route}` through the shared `ApiClient`.
//! - **`local`**: reads `{data_dir}/{route}.json`.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

use serde_json::{Map, Value};

use crate::errors::{FisheryError, FisheryResult};
use crate::routes::RouteName;

/// Reads cached collections from the local disk.
pub mod local;
/// Fetches collections from the remote FishBase-style service.
pub mod remote;

pub use local::LocalSource;
pub use remote::RemoteSource;

/// One field-mapping item from a fetched collection.
pub type Record = Map<String, Value>;

/// The ordered records found under `"data"`.
pub type RawCollection = Vec<Record>;

/// Anything that can retrieve the raw collection for a route.
pub trait DataSource {
    /// Short variant name for logging (`"remote"`, `"local"`).
    fn name(&self) -> &str;

    /// Where the data comes from: the base URL or the data directory.
    fn origin(&self) -> String;

    /// Retrieves the ordered collection for `route`.
    fn get_data(&self, route: RouteName) -> FisheryResult<RawCollection>;
}

/// Pulls the `"data"` array of objects out of a decoded payload.
///
/// A payload of the wrong shape fails the whole route; there is no
/// record-by-record recovery.
pub(crate) fn extract_collection(route: RouteName, body: Value) -> FisheryResult<RawCollection> {
    let mut object = match body {
        Value::Object(object) => object,
        other => {
            return Err(FisheryError::Format(format!(
                "{}: expected a JSON object, found {}",
                route,
                kind_of(&other)
            )))
        }
    };

    let items = match object.remove("data") {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(FisheryError::Format(format!(
                "{}: \"data\" must be an array, found {}",
                route,
                kind_of(&other)
            )))
        }
        None => {
            return Err(FisheryError::Format(format!(
                "{}: payload has no \"data\" key",
                route
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(FisheryError::Format(format!(
                "{}: data[{}] must be an object, found {}",
                route,
                index,
                kind_of(&other)
            ))),
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_records_in_order() {
        let body = json!({"data": [{"GenName": "Perca"}, {"GenName": "Esox"}], "count": 2});
        let records = extract_collection(RouteName::Genera, body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["GenName"], "Perca");
        assert_eq!(records[1]["GenName"], "Esox");
    }

    #[test]
    fn wrong_shapes_fail_the_whole_route() {
        let cases = [
            json!([{"GenName": "Perca"}]),
            json!({"count": 0}),
            json!({"data": {"GenName": "Perca"}}),
            json!({"data": [{"GenName": "Perca"}, "Esox"]}),
        ];
        for body in cases {
            let err = extract_collection(RouteName::Genera, body).unwrap_err();
            assert!(matches!(err, FisheryError::Format(_)), "unexpected {:?}", err);
        }
    }
}
