use super::{EstimateRecord, Formatter};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, record: &EstimateRecord<'_>) -> String {
        let mut line = format!("{:>6}", record.index);
        if self.verbose {
            for (key, value) in record.keys.iter().zip(record.values) {
                line.push_str(&format!("  {}={:>10.6}", key, value));
            }
        } else {
            for value in record.values {
                line.push_str(&format!(" {:>10.6}", value));
            }
        }
        line
    }
}
