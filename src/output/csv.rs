use super::{EstimateRecord, Formatter};
use crate::config::ChannelKey;

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, record: &EstimateRecord<'_>) -> String {
        let mut line = record.index.to_string();
        for value in record.values {
            line.push(',');
            line.push_str(&value.to_string());
        }
        line
    }

    fn header(&self, keys: &[ChannelKey]) -> Option<String> {
        let mut line = String::from("index");
        for key in keys {
            line.push(',');
            line.push_str(&key.to_string());
        }
        Some(line)
    }
}
