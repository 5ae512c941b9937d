mod csv;
mod json;
mod text;

use crate::config::ChannelKey;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// One output record: the estimate of every channel for one input sample
pub struct EstimateRecord<'a> {
    pub index: usize,
    pub keys: &'a [ChannelKey],
    pub values: &'a [f32],
}

pub trait Formatter: Send {
    fn format(&self, record: &EstimateRecord<'_>) -> String;

    fn header(&self, _keys: &[ChannelKey]) -> Option<String> {
        None
    }
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [ChannelKey; 2] = [
        ChannelKey { derivative: 0, mu: 1 },
        ChannelKey { derivative: 1, mu: 1 },
    ];

    fn record() -> EstimateRecord<'static> {
        EstimateRecord {
            index: 3,
            keys: &KEYS,
            values: &[1.5, -0.25],
        }
    }

    #[test]
    fn test_csv_format() {
        let formatter = create_formatter(OutputFormat::Csv, false);
        assert_eq!(formatter.header(&KEYS).unwrap(), "index,d0_mu1,d1_mu1");
        assert_eq!(formatter.format(&record()), "3,1.5,-0.25");
    }

    #[test]
    fn test_json_format() {
        let formatter = create_formatter(OutputFormat::Json, false);
        assert!(formatter.header(&KEYS).is_none());
        let value: serde_json::Value = serde_json::from_str(&formatter.format(&record())).unwrap();
        assert_eq!(value["index"], 3);
        assert_eq!(value["d0_mu1"], 1.5);
        assert_eq!(value["d1_mu1"], -0.25);
    }

    #[test]
    fn test_text_format() {
        let brief = create_formatter(OutputFormat::Text, false).format(&record());
        assert_eq!(brief, "     3   1.500000  -0.250000");

        let verbose = create_formatter(OutputFormat::Text, true).format(&record());
        assert!(verbose.contains("d0_mu1=  1.500000"));
        assert!(verbose.contains("d1_mu1= -0.250000"));
    }
}
