use crate::error::LineParseError;
use crate::models::MeasurementRecord;
use crate::utils::constants::DELIMITER;
use memchr::memchr;

/// Split one line (terminator already stripped) at the first `;` into the
/// raw station bytes and the parsed measurement.
pub fn parse_line(line: &[u8]) -> Result<MeasurementRecord<'_>, LineParseError> {
    let delimiter = memchr(DELIMITER, line).ok_or(LineParseError::MissingDelimiter)?;
    let station = &line[..delimiter];
    let value = parse_value(&line[delimiter + 1..])?;

    Ok(MeasurementRecord::new(station, value))
}

fn parse_value(field: &[u8]) -> Result<f64, LineParseError> {
    let field = field.trim_ascii();
    lexical_core::parse::<f64>(field)
        .map_err(|_| LineParseError::InvalidNumber(String::from_utf8_lossy(field).into_owned()))
}
