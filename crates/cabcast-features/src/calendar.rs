//! Calendar features derived from the pickup hour alone.

use crate::columns::{DAY_OF_MONTH, DAY_OF_WEEK, HOUR_OF_DAY, IS_WEEKEND, PICKUP_HOUR};
use crate::error::Result;
use crate::stage::FeatureStage;
use polars::prelude::*;

/// Adds `hour_of_day`, `day_of_week` (Monday = 0), `is_weekend` and `day_of_month`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalendarFeatures;

impl FeatureStage for CalendarFeatures {
    fn name(&self) -> &str {
        "calendar"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![PICKUP_HOUR]
    }

    fn produced_columns(&self) -> Vec<String> {
        [HOUR_OF_DAY, DAY_OF_WEEK, IS_WEEKEND, DAY_OF_MONTH]
            .iter()
            .map(|c| (*c).to_string())
            .collect()
    }

    fn apply(&self, data: LazyFrame) -> Result<LazyFrame> {
        let hour = || col(PICKUP_HOUR);

        // ISO weekday is Monday = 1 .. Sunday = 7
        let weekday = || hour().dt().weekday().cast(DataType::Int32);

        let result = data.with_columns([
            hour().dt().hour().cast(DataType::Int32).alias(HOUR_OF_DAY),
            (weekday() - lit(1)).alias(DAY_OF_WEEK),
            weekday().gt_eq(lit(6)).alias(IS_WEEKEND),
            hour().dt().day().cast(DataType::Int32).alias(DAY_OF_MONTH),
        ]);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::run_stage;
    use chrono::NaiveDate;

    fn hours_frame(hours: &[(u32, u32)]) -> LazyFrame {
        let micros: Vec<i64> = hours
            .iter()
            .map(|&(day, hour)| {
                NaiveDate::from_ymd_opt(2024, 1, day)
                    .unwrap()
                    .and_hms_opt(hour, 0, 0)
                    .unwrap()
                    .and_utc()
                    .timestamp_micros()
            })
            .collect();
        let series = Series::new(PICKUP_HOUR.into(), micros)
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
            .unwrap();
        DataFrame::new(vec![series.into()]).unwrap().lazy()
    }

    fn int_column(df: &DataFrame, name: &str) -> Vec<i32> {
        df.column(name)
            .unwrap()
            .i32()
            .unwrap()
            .into_no_null_iter()
            .collect()
    }

    #[test]
    fn test_calendar_fields() {
        // 2024-01-01 was a Monday; the 6th and 7th a weekend
        let data = hours_frame(&[(1, 0), (5, 17), (6, 23), (7, 9), (31, 12)]);
        let df = run_stage(&CalendarFeatures, data).unwrap().collect().unwrap();

        assert_eq!(int_column(&df, HOUR_OF_DAY), vec![0, 17, 23, 9, 12]);
        assert_eq!(int_column(&df, DAY_OF_WEEK), vec![0, 4, 5, 6, 2]);
        assert_eq!(int_column(&df, DAY_OF_MONTH), vec![1, 5, 6, 7, 31]);

        let weekend: Vec<bool> = df
            .column(IS_WEEKEND)
            .unwrap()
            .bool()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(weekend, vec![false, false, true, true, false]);
    }

    #[test]
    fn test_column_order() {
        let df = run_stage(&CalendarFeatures, hours_frame(&[(2, 3)]))
            .unwrap()
            .collect()
            .unwrap();
        let names: Vec<&str> = df.get_column_names().iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            vec![PICKUP_HOUR, HOUR_OF_DAY, DAY_OF_WEEK, IS_WEEKEND, DAY_OF_MONTH]
        );
    }
}
