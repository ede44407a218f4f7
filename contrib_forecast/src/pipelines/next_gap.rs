//! Days until the next day with contributions

use crate::calendar::ContributionCalendar;
use crate::config::ForecastConfig;
use crate::error::Result;
use crate::pipelines::{round_abs, ForecastContext, ForecastPipeline, PipelineCore, PipelineKind};
use chrono::{Datelike, Duration, NaiveDate};
use regression_math::{Predictor, TrainingSeries};
use serde::Serialize;

/// Predicted distance to the next active day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NextGapForecastResult {
    /// Days counted from tomorrow
    pub days: u32,
    /// Tomorrow plus `days`
    pub date: NaiveDate,
}

/// Forecasts how many idle days follow before the next contribution.
///
/// One sample per calendar day: the features are (month, day of month, day
/// index starting at 1) and the label is the running count of consecutive
/// idle days including that day, so an active day is labelled 0.
#[derive(Debug)]
pub struct NextGapForecast<'a> {
    core: PipelineCore<'a>,
}

impl<'a> NextGapForecast<'a> {
    /// Create an untrained pipeline
    pub fn new(
        calendar: &'a ContributionCalendar,
        config: ForecastConfig,
        context: ForecastContext,
    ) -> Self {
        Self {
            core: PipelineCore::new(calendar, config, context),
        }
    }

    /// Create a pipeline and train it
    pub fn train(
        calendar: &'a ContributionCalendar,
        config: ForecastConfig,
        context: ForecastContext,
    ) -> Result<Self> {
        let mut pipeline = Self::new(calendar, config, context);
        pipeline.get_model()?;
        Ok(pipeline)
    }

    fn features(date: NaiveDate, day_index: usize) -> Vec<f64> {
        vec![date.month() as f64, date.day() as f64, day_index as f64]
    }

    /// Predict the gap from tomorrow to the next active day
    pub fn predict_next(&self) -> Result<NextGapForecastResult> {
        let tomorrow = self.core.context.tomorrow()?;
        let day_index = self.core.calendar.len() + 1;
        let raw = self.core.predict_raw(&Self::features(tomorrow, day_index))?;

        let max_gap = f64::from(self.core.config.max_gap_days);
        let value = round_abs(raw);
        let days = if value.is_finite() {
            value.min(max_gap) as u32
        } else {
            self.core.config.max_gap_days
        };

        Ok(NextGapForecastResult {
            days,
            date: tomorrow + Duration::days(i64::from(days)),
        })
    }
}

impl ForecastPipeline for NextGapForecast<'_> {
    fn kind(&self) -> PipelineKind {
        PipelineKind::NextGap
    }

    fn data_prep(&self) -> Result<TrainingSeries> {
        let mut series = TrainingSeries::new();
        let mut gap: u32 = 0;

        for (i, day) in self.core.calendar.days().iter().enumerate() {
            if day.contribution_count > 0 {
                gap = 0;
            } else {
                gap += 1;
            }
            series.push(Self::features(day.date, i + 1), f64::from(gap));
        }

        Ok(series)
    }

    fn get_model(&mut self) -> Result<()> {
        let series = self.data_prep()?;
        self.core.train(self.kind(), series)
    }

    fn predictor(&self) -> &Predictor {
        &self.core.predictor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::DayRecord;

    fn calendar(counts: &[u32]) -> ContributionCalendar {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let days = counts
            .iter()
            .enumerate()
            .map(|(i, &c)| DayRecord::new(start + Duration::days(i as i64), c))
            .collect();
        ContributionCalendar::from_days(days).unwrap()
    }

    #[test]
    fn test_data_prep_labels_are_concurrent_gaps() {
        let cal = calendar(&[3, 0, 0, 1, 0]);
        let pipeline =
            NextGapForecast::new(&cal, ForecastConfig::default(), ForecastContext::default());
        let series = pipeline.data_prep().unwrap();

        assert_eq!(series.targets(), &[0.0, 1.0, 2.0, 0.0, 1.0]);
        assert_eq!(series.features()[0], vec![1.0, 1.0, 1.0]);
        assert_eq!(series.features()[4], vec![1.0, 5.0, 5.0]);
    }

    #[test]
    fn test_training_leaves_expansion_cache_for_predictions() {
        let counts: Vec<u32> = (0..366).map(|i| (i % 3) as u32).collect();
        let cal = calendar(&counts);
        let config = ForecastConfig {
            max_degree: 6,
            ..ForecastConfig::default()
        };
        let ctx = ForecastContext::new(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        let pipeline = NextGapForecast::train(&cal, config, ctx).unwrap();
        assert!(pipeline.core.cache.is_empty());

        let first = pipeline.predict_next().unwrap();
        let second = pipeline.predict_next().unwrap();
        assert_eq!(first, second);
        assert_eq!(pipeline.core.cache.len(), 1);
    }

    #[test]
    fn test_empty_calendar_stays_untrained() {
        let cal = calendar(&[]);
        let pipeline =
            NextGapForecast::train(&cal, ForecastConfig::default(), ForecastContext::default())
                .unwrap();

        assert!(!pipeline.is_trained());
        assert!(matches!(
            pipeline.predict_next(),
            Err(crate::error::ForecastError::ModelNotTrained)
        ));
    }
}
