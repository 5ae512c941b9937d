use serde_json::{Map, Value};

use super::{EstimateRecord, Formatter};

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, record: &EstimateRecord<'_>) -> String {
        let mut object = Map::new();
        object.insert("index".to_string(), Value::from(record.index));
        for (key, &value) in record.keys.iter().zip(record.values) {
            object.insert(key.to_string(), Value::from(f64::from(value)));
        }
        Value::Object(object).to_string()
    }
}
