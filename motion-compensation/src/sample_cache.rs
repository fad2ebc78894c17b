use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};
use crate::MCTime;

/// How a cached sample was matched to the requested time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchQuality {
    Exact,
    // Succeeding entry within tolerance
    Later,
    // Preceding entry within tolerance
    Earlier,
    // Nearest entry outside the tolerance window
    BestEffort,
    // Cache was empty
    Fallback,
}

impl MatchQuality {
    pub fn is_degraded(&self) -> bool {
        match *self {
            MatchQuality::BestEffort | MatchQuality::Fallback => true,
            _ => false,
        }
    }

    pub fn is_found(&self) -> bool {
        *self != MatchQuality::Fallback
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedSample<T> {
    pub value: T,
    // Timestamp of the matched entry, None for the fallback value
    pub time: Option<MCTime>,
    pub quality: MatchQuality,
}

/// Time-indexed store answering "what was the value near time T".
/// Lookups always answer, trading accuracy for availability when the
/// producer and the consumer drift apart.
pub struct SampleCache<T> {
    samples: BTreeMap<MCTime, T>,
    tolerance: MCTime,
    fallback: T,
}

impl<T: Clone> SampleCache<T> {
    pub fn new(tolerance: MCTime, fallback: T) -> SampleCache<T> {
        SampleCache {
            samples: BTreeMap::new(),
            tolerance: tolerance.abs(),
            fallback,
        }
    }

    pub fn tolerance(&self) -> MCTime {
        self.tolerance
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn add_sample(&mut self, time: MCTime, sample: T) {
        self.samples.insert(time, sample);
    }

    pub fn get_sample(&self, time: MCTime) -> CachedSample<T> {
        if let Some(sample) = self.samples.get(&time) {
            trace!("get_sample({}): exact match", time);
            return self.found(time, sample, MatchQuality::Exact);
        }

        let later = self.samples.range((Excluded(time), Unbounded)).next();
        let earlier = self.samples.range((Unbounded, Excluded(time))).next_back();
        let later_distance = later.map(|(t, _)| t.saturating_sub(time));
        let earlier_distance = earlier.map(|(t, _)| time.saturating_sub(*t));
        let later_ok = later_distance.map_or(false, |d| d <= self.tolerance);
        let earlier_ok = earlier_distance.map_or(false, |d| d <= self.tolerance);

        match (later, earlier) {
            (Some((t, sample)), _) if later_ok && (!earlier_ok || later_distance <= earlier_distance) => {
                trace!("get_sample({}): later match found {}", time, t);
                self.found(*t, sample, MatchQuality::Later)
            }
            (_, Some((t, sample))) if earlier_ok => {
                trace!("get_sample({}): earlier match found {}", time, t);
                self.found(*t, sample, MatchQuality::Earlier)
            }
            (Some((later_t, later_sample)), Some((earlier_t, earlier_sample))) => {
                warn!("get_sample({}): no sample within +-{}", time, self.tolerance);
                let (t, sample) = if earlier_distance < later_distance {
                    (earlier_t, earlier_sample)
                } else {
                    (later_t, later_sample)
                };
                warn!("using best match: t = {}", t);
                self.found(*t, sample, MatchQuality::BestEffort)
            }
            (Some((t, sample)), None) | (None, Some((t, sample))) => {
                warn!("get_sample({}): no sample within +-{}, using best match: t = {}", time, self.tolerance, t);
                self.found(*t, sample, MatchQuality::BestEffort)
            }
            (None, None) => {
                error!("get_sample({}): cache is empty, using fallback", time);
                CachedSample {
                    value: self.fallback.clone(),
                    time: None,
                    quality: MatchQuality::Fallback,
                }
            }
        }
    }

    /// Removes entries older than `time - tolerance`.
    /// The newest entry always survives so that lookups can still degrade
    /// to a best-effort match instead of the fallback.
    pub fn clean_up(&mut self, time: MCTime) {
        let cutoff = time.saturating_sub(self.tolerance);
        let newest = match self.samples.keys().next_back() {
            Some(newest) => *newest,
            None => return,
        };
        let keep_from = if newest < cutoff { newest } else { cutoff };
        let stale: Vec<MCTime> = self
            .samples
            .range((Unbounded, Excluded(keep_from)))
            .map(|(t, _)| *t)
            .collect();
        for t in stale {
            self.samples.remove(&t);
        }
    }

    fn found(&self, time: MCTime, sample: &T, quality: MatchQuality) -> CachedSample<T> {
        CachedSample {
            value: sample.clone(),
            time: Some(time),
            quality,
        }
    }
}
