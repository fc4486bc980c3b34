//! Price data access port trait.

use crate::domain::error::MtftraderError;
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// The full chronological series.
    fn fetch_series(&self) -> Result<PriceSeries, MtftraderError>;

    /// Bars whose date falls in `[start, end]`. Bars without a timestamp are
    /// kept, since they cannot be placed outside the range.
    fn fetch_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<PriceSeries, MtftraderError> {
        let series = self.fetch_series()?;
        if start.is_none() && end.is_none() {
            return Ok(series);
        }
        let bars = (0..series.len())
            .filter_map(|i| series.bar(i))
            .filter(|bar| match bar.timestamp {
                Some(ts) => {
                    let date = ts.date();
                    start.is_none_or(|s| date >= s) && end.is_none_or(|e| date <= e)
                }
                None => true,
            })
            .collect();
        Ok(PriceSeries::new(bars))
    }
}
