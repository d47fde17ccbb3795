use crate::models::timeline::RainfallPoint;
use csv::WriterBuilder;

/// Timeline as `time,rainfall` CSV, the format the simulation host reads.
pub fn timeline_csv(points: &[RainfallPoint]) -> anyhow::Result<String> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    for point in points {
        wtr.serialize(point)?;
    }
    let bytes = wtr.into_inner().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}
