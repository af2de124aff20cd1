// ABOUTME: Orchestrating service owning activities, streams, and the per-batch memo caches
// ABOUTME: Fans per-activity work across a rayon pool; the day recurrence stays sequential
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Batch Analyzer
//!
//! One `BatchAnalyzer` is constructed per batch run and owns every cache:
//! best-average memos, the per-day intensity memo, and the power-curve
//! memos. Nothing here is process-wide state; dropping the analyzer drops
//! the caches. Per-activity computations are independent and fan out across
//! a worker pool keyed by activity id, which is why the memo maps are
//! concurrency-safe.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use dashmap::DashMap;
use rayon::prelude::*;
use tracing::{info, warn};

use veloform_core::errors::{AppError, AppResult};
use veloform_core::models::{Activity, ActivityId, AthleteProfile, Stream, StreamKind};

use crate::algorithms::{BestAverages, IntensityEstimator, TrimpCalculator};
use crate::config::AnalysisConfig;
use crate::power_curve::{self, PowerOutput};
use crate::training_load::{LoadState, TrainingLoadModel, TrainingLoadPoint};

/// Batch-scoped analytics orchestrator
pub struct BatchAnalyzer {
    config: AnalysisConfig,
    profile: AthleteProfile,
    activities: BTreeMap<ActivityId, Activity>,
    streams: HashMap<(ActivityId, StreamKind), Stream>,
    activities_by_day: BTreeMap<NaiveDate, Vec<ActivityId>>,
    trimp: TrimpCalculator,
    intensity: IntensityEstimator,
    load_model: TrainingLoadModel,

    // Per-batch memo caches; invalidated only by stream re-ingestion,
    // which here means building a fresh analyzer
    best_averages: DashMap<(ActivityId, StreamKind), Option<Arc<BestAverages>>>,
    intensity_by_day: DashMap<NaiveDate, u32>,
    activity_curves: DashMap<ActivityId, Arc<BTreeMap<u32, PowerOutput>>>,
    record_curve: Mutex<Option<Arc<Vec<PowerOutput>>>>,
}

impl BatchAnalyzer {
    /// Create an analyzer for one batch run
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::ConfigInvalid` when the configuration fails
    /// validation.
    pub fn new(
        config: AnalysisConfig,
        profile: AthleteProfile,
        activities: Vec<Activity>,
        streams: Vec<Stream>,
    ) -> AppResult<Self> {
        config.validate()?;

        let mut activities_by_day: BTreeMap<NaiveDate, Vec<ActivityId>> = BTreeMap::new();
        for activity in &activities {
            activities_by_day
                .entry(activity.start_day())
                .or_default()
                .push(activity.id.clone());
        }

        let streams = streams
            .into_iter()
            .map(|stream| ((stream.activity.clone(), stream.kind), stream))
            .collect();

        Ok(Self {
            trimp: TrimpCalculator::from_config(&config),
            intensity: IntensityEstimator,
            load_model: TrainingLoadModel::from_config(&config),
            config,
            profile,
            activities: activities
                .into_iter()
                .map(|activity| (activity.id.clone(), activity))
                .collect(),
            streams,
            activities_by_day,
            best_averages: DashMap::new(),
            intensity_by_day: DashMap::new(),
            activity_curves: DashMap::new(),
            record_curve: Mutex::new(None),
        })
    }

    /// Activities in the batch, in id order
    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.activities.values()
    }

    fn activity(&self, id: &ActivityId) -> AppResult<&Activity> {
        self.activities
            .get(id)
            .ok_or_else(|| AppError::not_found(format!("activity {id}")))
    }

    /// Best averages for one (activity, stream kind) pair over the
    /// configured durations, memoized per pair.
    ///
    /// `None` when the stream is missing or fails the data-quality guard.
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::ResourceNotFound` for an unknown activity id.
    pub fn best_averages(
        &self,
        id: &ActivityId,
        kind: StreamKind,
    ) -> AppResult<Option<Arc<BestAverages>>> {
        self.activity(id)?;

        let key = (id.clone(), kind);
        if let Some(cached) = self.best_averages.get(&key) {
            return Ok(cached.clone());
        }

        let computed = self.streams.get(&key).and_then(|stream| {
            let samples = stream.usable_samples();
            if samples.is_none() {
                warn!(activity = %id, "discarding implausible heart-rate stream");
            }
            samples.map(|samples| {
                Arc::new(BestAverages::compute(samples, &self.config.durations))
            })
        });

        self.best_averages.insert(key, computed.clone());
        Ok(computed)
    }

    /// Power curve for one activity in watts and W/kg, memoized.
    ///
    /// Empty when the activity has no usable power stream.
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::ReferenceDataMissing` when no bodyweight record
    /// covers the activity date, and `ErrorCode::ResourceNotFound` for an
    /// unknown activity id.
    pub fn activity_power_curve(
        &self,
        id: &ActivityId,
    ) -> AppResult<Arc<BTreeMap<u32, PowerOutput>>> {
        if let Some(cached) = self.activity_curves.get(id) {
            return Ok(cached.clone());
        }

        let activity = self.activity(id)?;
        let curve = match self.best_averages(id, StreamKind::Watts)? {
            Some(best) => power_curve::build_activity_curve(activity, &best, &self.profile)?,
            None => BTreeMap::new(),
        };

        let curve = Arc::new(curve);
        self.activity_curves.insert(id.clone(), curve.clone());
        Ok(curve)
    }

    /// Global record power curve across the batch, computed once.
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::ReferenceDataMissing` when no bodyweight record
    /// covers a record-holding activity's date.
    pub fn record_power_curve(&self) -> AppResult<Arc<Vec<PowerOutput>>> {
        let mut memo = self
            .record_curve
            .lock()
            .map_err(|_| AppError::internal("record curve cache lock poisoned"))?;
        if let Some(cached) = memo.as_ref() {
            return Ok(cached.clone());
        }

        // Fan the per-activity extraction across the pool; each result lands
        // in the shared memo map.
        let cached: Vec<(ActivityId, Arc<BestAverages>)> = self
            .activities
            .par_iter()
            .filter_map(|(id, _)| {
                self.best_averages(id, StreamKind::Watts)
                    .ok()
                    .flatten()
                    .map(|best| (id.clone(), best))
            })
            .collect();

        let entries: Vec<(&Activity, &BestAverages)> = cached
            .iter()
            .filter_map(|(id, best)| {
                self.activities
                    .get(id)
                    .map(|activity| (activity, best.as_ref()))
            })
            .collect();

        let curve = Arc::new(power_curve::build_record_curve(
            &entries,
            &self.profile,
            &self.config.durations,
        )?);
        info!(
            durations = curve.len(),
            activities = entries.len(),
            "record power curve computed"
        );

        *memo = Some(curve.clone());
        Ok(curve)
    }

    /// Aggregate legacy intensity score for one day, memoized per date key.
    ///
    /// Activities without a score are excluded from the sum; a day with no
    /// scorable activity sums to 0.
    ///
    /// # Errors
    ///
    /// Propagates reference-data failures from the heart-rate branch.
    pub fn intensity_on(&self, date: NaiveDate) -> AppResult<u32> {
        if let Some(cached) = self.intensity_by_day.get(&date) {
            return Ok(*cached);
        }

        let mut sum = 0;
        if let Some(ids) = self.activities_by_day.get(&date) {
            for id in ids {
                let activity = self.activity(id)?;
                if let Some(score) = self.intensity.score(activity, &self.profile)? {
                    sum += score;
                }
            }
        }

        self.intensity_by_day.insert(date, sum);
        Ok(sum)
    }

    /// Daily intensity totals for every day with at least one activity
    ///
    /// # Errors
    ///
    /// Propagates reference-data failures from the heart-rate branch.
    pub fn daily_intensity(&self) -> AppResult<BTreeMap<NaiveDate, u32>> {
        self.activities_by_day
            .keys()
            .map(|&date| Ok((date, self.intensity_on(date)?)))
            .collect()
    }

    /// Daily TRIMP totals in chronological order.
    ///
    /// Per-activity TRIMP runs in parallel; activities scoring 0 (zero or
    /// negative duration) are excluded from their day's sum.
    ///
    /// # Errors
    ///
    /// Propagates max-heart-rate resolution failures.
    pub fn daily_trimp(&self) -> AppResult<BTreeMap<NaiveDate, f64>> {
        let scores: Vec<(NaiveDate, f64)> = self
            .activities
            .par_iter()
            .map(|(_, activity)| {
                let trimp = self.trimp.calculate(activity, &self.profile)?;
                Ok((activity.start_day(), trimp))
            })
            .collect::<AppResult<_>>()?;

        let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for (date, trimp) in scores {
            if trimp > 0.0 {
                *daily.entry(date).or_insert(0.0) += trimp;
            }
        }
        Ok(daily)
    }

    /// Full training-load series from day zero
    ///
    /// # Errors
    ///
    /// Propagates failures from the daily TRIMP aggregation.
    pub fn training_load(&self) -> AppResult<Vec<TrainingLoadPoint>> {
        let daily = self.daily_trimp()?;
        let points = self.load_model.compute(&daily);
        info!(
            training_days = daily.len(),
            series_days = points.len(),
            "training load series computed"
        );
        Ok(points)
    }

    /// Extend a previously computed series from its tail state.
    ///
    /// Only days at or after `since` are fed into the resumed recurrence;
    /// `tail` is the CTL/ATL of the most recent day before `since`.
    ///
    /// # Errors
    ///
    /// Propagates failures from the daily TRIMP aggregation.
    pub fn training_load_since(
        &self,
        since: NaiveDate,
        tail: LoadState,
    ) -> AppResult<Vec<TrainingLoadPoint>> {
        let daily: BTreeMap<NaiveDate, f64> = self
            .daily_trimp()?
            .into_iter()
            .filter(|&(date, _)| date >= since)
            .collect();
        Ok(self.load_model.extend(&daily, tail))
    }
}
