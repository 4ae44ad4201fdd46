use crate::error::{ProcessingError, Result};
use crate::models::{StationAggregate, StationMap};
use std::io::Write;

/// Renders the merged station map as
/// `{StationA=min/mean/max, StationB=min/mean/max}`, sorted by name.
pub struct SummaryFormatter;

impl SummaryFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, stations: &StationMap) -> Result<String> {
        let mut entries = stations
            .iter()
            .map(|(station, aggregate)| Ok((decode_station(station)?, aggregate)))
            .collect::<Result<Vec<(&str, &StationAggregate)>>>()?;
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let mut output = String::with_capacity(entries.len() * 32 + 2);
        output.push('{');
        for (index, (name, aggregate)) in entries.iter().enumerate() {
            let rendered = aggregate.render().ok_or_else(|| {
                ProcessingError::MissingData(format!("station '{}' has no observations", name))
            })?;

            if index > 0 {
                output.push_str(", ");
            }
            output.push_str(name);
            output.push('=');
            output.push_str(&rendered);
        }
        output.push('}');

        Ok(output)
    }

    /// Write the summary followed by a newline.
    pub fn write_to<W: Write>(&self, stations: &StationMap, mut writer: W) -> Result<()> {
        let summary = self.format(stations)?;
        writeln!(writer, "{}", summary)?;
        writer.flush()?;
        Ok(())
    }
}

impl Default for SummaryFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_station(station: &[u8]) -> Result<&str> {
    std::str::from_utf8(station)
        .map_err(|_| ProcessingError::InvalidStationName(String::from_utf8_lossy(station).into_owned()))
}
