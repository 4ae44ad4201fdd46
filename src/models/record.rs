/// One parsed `station;value` line, borrowing the station name from the
/// scanned bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementRecord<'a> {
    pub station: &'a [u8],
    pub value: f64,
}

impl<'a> MeasurementRecord<'a> {
    pub fn new(station: &'a [u8], value: f64) -> Self {
        Self { station, value }
    }
}
