//! Social-text sentiment aggregation
//!
//! Scores a batch of texts through a pluggable polarity scorer, optionally
//! applies the asymmetric domain weighting used for sports chatter
//! (amplify favorable signals, dampen unfavorable ones), buckets the
//! scores, and extracts salient tokens. Trend fitting over a time-ordered
//! polarity series lives in [`trend`].

pub mod scorer;
pub mod trend;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SentimentConfig;

pub use scorer::{LexiconScorer, SentimentScorer};
pub use trend::{SentimentPoint, SentimentTrend, TrendOutcome, TrendStatus};

/// Polarity bucket. The five intervals partition the real line exactly:
/// boundary values always land in the bucket shown here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentCategory {
    /// s < -0.6
    VeryNegative,
    /// -0.6 <= s < -0.2
    Negative,
    /// -0.2 <= s <= 0.2
    Neutral,
    /// 0.2 < s <= 0.6
    Positive,
    /// s > 0.6
    VeryPositive,
}

impl SentimentCategory {
    /// Classify a polarity score. Total over all reals: every value lands
    /// in exactly one bucket, including the interval boundaries.
    pub fn classify(score: f64) -> Self {
        if score < -0.6 {
            SentimentCategory::VeryNegative
        } else if score < -0.2 {
            SentimentCategory::Negative
        } else if score <= 0.2 {
            SentimentCategory::Neutral
        } else if score <= 0.6 {
            SentimentCategory::Positive
        } else {
            SentimentCategory::VeryPositive
        }
    }
}

/// Count of texts per polarity bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub very_negative: usize,
    pub negative: usize,
    pub neutral: usize,
    pub positive: usize,
    pub very_positive: usize,
}

impl SentimentBreakdown {
    fn record(&mut self, category: SentimentCategory) {
        match category {
            SentimentCategory::VeryNegative => self.very_negative += 1,
            SentimentCategory::Negative => self.negative += 1,
            SentimentCategory::Neutral => self.neutral += 1,
            SentimentCategory::Positive => self.positive += 1,
            SentimentCategory::VeryPositive => self.very_positive += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.very_negative + self.negative + self.neutral + self.positive + self.very_positive
    }
}

/// Aggregate polarity over a batch of texts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentSummary {
    /// Mean polarity after any domain weighting
    pub overall: f64,
    pub breakdown: SentimentBreakdown,
    /// Population standard deviation of the (weighted) scores
    pub std_dev: f64,
    pub text_count: usize,
    /// Per-text scores in input order, after any domain weighting
    pub scores: Vec<f64>,
}

impl SentimentSummary {
    fn empty() -> Self {
        Self {
            overall: 0.0,
            breakdown: SentimentBreakdown::default(),
            std_dev: 0.0,
            text_count: 0,
            scores: Vec::new(),
        }
    }
}

/// A ranked salient token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPhrase {
    pub token: String,
    pub count: usize,
}

/// Scores, weights and buckets batches of social text
pub struct SentimentAggregator {
    scorer: Box<dyn SentimentScorer>,
    config: SentimentConfig,
}

impl Default for SentimentAggregator {
    fn default() -> Self {
        Self::new(Box::new(LexiconScorer::new()), SentimentConfig::default())
    }
}

impl SentimentAggregator {
    pub fn new(scorer: Box<dyn SentimentScorer>, config: SentimentConfig) -> Self {
        Self { scorer, config }
    }

    /// Score every text and summarize the batch.
    ///
    /// Domain weighting multiplies positive scores by 1.2 and everything
    /// else by 0.8, deliberately amplifying favorable chatter and damping
    /// unfavorable chatter. An empty batch yields a zero summary.
    pub fn aggregate(&self, texts: &[&str], apply_domain_weighting: bool) -> SentimentSummary {
        if texts.is_empty() {
            return SentimentSummary::empty();
        }

        let mut scores: Vec<f64> = texts.iter().map(|t| self.scorer.score(t)).collect();
        if apply_domain_weighting {
            for s in &mut scores {
                *s *= if *s > 0.0 { 1.2 } else { 0.8 };
            }
        }

        let mut breakdown = SentimentBreakdown::default();
        for &s in &scores {
            breakdown.record(SentimentCategory::classify(s));
        }

        let overall = crate::stats::mean(&scores);
        let std_dev = crate::stats::population_std(&scores);

        info!(
            texts = texts.len(),
            overall, apply_domain_weighting, "sentiment batch aggregated"
        );

        SentimentSummary {
            overall,
            breakdown,
            std_dev,
            text_count: texts.len(),
            scores,
        }
    }

    /// Rank tokens across the batch by frequency.
    ///
    /// Tokens of length <= 2 are discarded; ties in frequency keep the
    /// order in which tokens were first encountered.
    pub fn extract_key_phrases(&self, texts: &[&str], top_n: usize) -> Vec<KeyPhrase> {
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        let mut next_rank = 0usize;
        for text in texts {
            for token in scorer::tokenize(text) {
                if token.len() <= 2 {
                    continue;
                }
                let entry = counts.entry(token).or_insert_with(|| {
                    let rank = next_rank;
                    next_rank += 1;
                    (0, rank)
                });
                entry.0 += 1;
            }
        }

        let mut ranked: Vec<(String, usize, usize)> = counts
            .into_iter()
            .map(|(token, (count, first))| (token, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        debug!(
            unique = ranked.len(),
            top_n, "key phrase extraction complete"
        );

        ranked
            .into_iter()
            .take(top_n)
            .map(|(token, count, _)| KeyPhrase { token, count })
            .collect()
    }

    /// Fit a trend over a time-ordered polarity history using the
    /// configured EWMA span.
    pub fn trend(&self, history: &[SentimentPoint]) -> TrendOutcome {
        trend::analyze_trend(history, self.config.ewma_span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedScorer(Vec<f64>);

    impl SentimentScorer for FixedScorer {
        fn score(&self, text: &str) -> f64 {
            // index encoded in the test text, e.g. "t3"
            let idx: usize = text.trim_start_matches('t').parse().unwrap_or(0);
            self.0[idx]
        }
    }

    fn aggregator_with(scores: Vec<f64>) -> SentimentAggregator {
        SentimentAggregator::new(Box::new(FixedScorer(scores)), SentimentConfig::default())
    }

    #[test]
    fn test_empty_batch_zero_summary() {
        let summary = SentimentAggregator::default().aggregate(&[], true);
        assert_eq!(summary.text_count, 0);
        assert_eq!(summary.overall, 0.0);
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.breakdown.total(), 0);
    }

    #[test]
    fn test_classify_boundaries_exact() {
        use SentimentCategory::*;
        assert_eq!(SentimentCategory::classify(-0.61), VeryNegative);
        assert_eq!(SentimentCategory::classify(-0.6), Negative);
        assert_eq!(SentimentCategory::classify(-0.2), Neutral);
        assert_eq!(SentimentCategory::classify(0.2), Neutral);
        assert_eq!(SentimentCategory::classify(0.2000001), Positive);
        assert_eq!(SentimentCategory::classify(0.6), Positive);
        assert_eq!(SentimentCategory::classify(0.6000001), VeryPositive);
    }

    #[test]
    fn test_every_polarity_lands_in_exactly_one_bucket() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let s: f64 = rng.gen_range(-1.0..=1.0);
            let mut breakdown = SentimentBreakdown::default();
            breakdown.record(SentimentCategory::classify(s));
            assert_eq!(breakdown.total(), 1, "polarity {s} landed in {breakdown:?}");
        }
    }

    #[test]
    fn test_domain_weighting_asymmetric() {
        let aggregator = aggregator_with(vec![0.5, -0.5, 0.0]);
        let weighted = aggregator.aggregate(&["t0", "t1", "t2"], true);
        assert!((weighted.scores[0] - 0.6).abs() < 1e-12, "positive amplified");
        assert!((weighted.scores[1] + 0.4).abs() < 1e-12, "negative dampened");
        assert_eq!(weighted.scores[2], 0.0, "zero stays zero under x0.8");

        let unweighted = aggregator.aggregate(&["t0", "t1", "t2"], false);
        assert_eq!(unweighted.scores, vec![0.5, -0.5, 0.0]);
    }

    #[test]
    fn test_weighting_can_cross_bucket_boundary() {
        // 0.55 is positive unweighted, very_positive after x1.2
        let aggregator = aggregator_with(vec![0.55]);
        let unweighted = aggregator.aggregate(&["t0"], false);
        assert_eq!(unweighted.breakdown.positive, 1);
        let weighted = aggregator.aggregate(&["t0"], true);
        assert_eq!(weighted.breakdown.very_positive, 1);
    }

    #[test]
    fn test_breakdown_counts_sum_to_text_count() {
        let aggregator = aggregator_with(vec![-0.9, -0.4, 0.0, 0.4, 0.9, 0.1]);
        let summary = aggregator.aggregate(&["t0", "t1", "t2", "t3", "t4", "t5"], false);
        assert_eq!(summary.breakdown.total(), 6);
        assert_eq!(summary.breakdown.very_negative, 1);
        assert_eq!(summary.breakdown.negative, 1);
        assert_eq!(summary.breakdown.neutral, 2);
        assert_eq!(summary.breakdown.positive, 1);
        assert_eq!(summary.breakdown.very_positive, 1);
    }

    #[test]
    fn test_key_phrases_ranked_with_stable_ties() {
        let aggregator = SentimentAggregator::default();
        let texts = [
            "Lakers lakers LAKERS tonight",
            "tonight the lakers looked sharp",
            "sharp shooting tonight",
        ];
        let phrases = aggregator.extract_key_phrases(&texts, 3);

        assert_eq!(phrases[0].token, "lakers");
        assert_eq!(phrases[0].count, 4);
        assert_eq!(phrases[1].token, "tonight");
        assert_eq!(phrases[1].count, 3);
        // "sharp" (2) beats "looked"/"shooting" (1); short tokens dropped
        assert_eq!(phrases[2].token, "sharp");
    }

    #[test]
    fn test_key_phrases_drop_short_tokens() {
        let aggregator = SentimentAggregator::default();
        let phrases = aggregator.extract_key_phrases(&["it is on we go big"], 10);
        assert_eq!(phrases.len(), 1);
        assert_eq!(phrases[0].token, "big");
    }

    #[test]
    fn test_key_phrases_tie_order_is_first_encounter() {
        let aggregator = SentimentAggregator::default();
        let phrases = aggregator.extract_key_phrases(&["zebra apple zebra apple mango"], 3);
        assert_eq!(phrases[0].token, "zebra");
        assert_eq!(phrases[1].token, "apple");
        assert_eq!(phrases[2].token, "mango");
    }
}
