use std::sync::Arc;

use tracing::debug;

use crate::{
    config::ModelConfig,
    domain::{Label, SentimentBuckets},
    nlp::{filter_tokens, split_sentences, PosTagger},
};

use super::model::{CountVectorizer, ModelError, MultinomialNb};

/// Anything that can put a sentiment label on a single sentence.
pub trait SentenceScorer {
    fn score(&self, sentence: &str) -> Option<Label>;
}

impl<F> SentenceScorer for F
where
    F: Fn(&str) -> Option<Label>,
{
    fn score(&self, sentence: &str) -> Option<Label> {
        self(sentence)
    }
}

/// Pre-trained vectorizer and Naive Bayes pair loaded from disk. Sentences
/// are tokenized by the shared tagger before stop-words are dropped.
pub struct ModelScorer {
    tagger: Arc<dyn PosTagger>,
    vectorizer: CountVectorizer,
    model: MultinomialNb,
}

impl ModelScorer {
    pub fn new(
        tagger: Arc<dyn PosTagger>,
        vectorizer: CountVectorizer,
        model: MultinomialNb,
    ) -> Result<Self, ModelError> {
        model.validate(vectorizer.width())?;
        debug!(
            target: "classify",
            classes = ?model.classes(),
            terms = vectorizer.width(),
            "sentiment model ready"
        );
        Ok(Self {
            tagger,
            vectorizer,
            model,
        })
    }

    pub fn load(config: &ModelConfig, tagger: Arc<dyn PosTagger>) -> Result<Self, ModelError> {
        let vectorizer = CountVectorizer::load(&config.vectorizer_path)?;
        let model = MultinomialNb::load(&config.classifier_path)?;
        Self::new(tagger, vectorizer, model)
    }
}

impl SentenceScorer for ModelScorer {
    fn score(&self, sentence: &str) -> Option<Label> {
        let words = self.tagger.tag(sentence);
        let features = self.vectorizer.transform(&filter_tokens(&words));
        self.model.predict(&features).and_then(Label::from_class)
    }
}

/// Splits every comment into sentences and files each labelled sentence,
/// verbatim, into its bucket. Blank segments are skipped.
pub fn classify_comments(comments: &[String], scorer: &dyn SentenceScorer) -> SentimentBuckets {
    let mut buckets = SentimentBuckets::default();
    let mut dropped = 0usize;

    for comment in comments {
        for sentence in split_sentences(comment) {
            if sentence.trim().is_empty() {
                continue;
            }
            match scorer.score(sentence) {
                Some(label) => buckets.push(label, sentence),
                None => dropped += 1,
            }
        }
    }

    debug!(
        target: "classify",
        good = buckets.good.len(),
        bad = buckets.bad.len(),
        dropped,
        "sentences classified"
    );
    buckets
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use std::{io::Write, path::PathBuf};

    use super::*;
    use crate::{nlp::SlashTagger, sentiment::model::VectorizerArtifact};

    fn keyword_scorer(sentence: &str) -> Option<Label> {
        if sentence.contains("amazing") || sentence.contains("Loved") {
            Some(Label::Good)
        } else if sentence.contains("steep") {
            Some(Label::Bad)
        } else {
            None
        }
    }

    fn model_scorer() -> ModelScorer {
        let vocabulary: HashMap<String, usize> = [("amazing", 0), ("steep", 1), ("view", 2)]
            .into_iter()
            .map(|(term, idx)| (term.to_string(), idx))
            .collect();
        let vectorizer = CountVectorizer::from_artifact(VectorizerArtifact {
            vocabulary,
            lowercase: true,
            token_pattern: r"(?u)\b\w\w+\b".into(),
            binary: false,
        })
        .unwrap();
        let model = MultinomialNb::new(
            vec!["BAD".into(), "GOOD".into(), "MEH".into()],
            vec![(0.3f64).ln(), (0.3f64).ln(), (0.4f64).ln()],
            vec![
                vec![(0.1f64).ln(), (0.8f64).ln(), (0.1f64).ln()],
                vec![(0.6f64).ln(), (0.1f64).ln(), (0.3f64).ln()],
                vec![(0.3f64).ln(), (0.3f64).ln(), (0.4f64).ln()],
            ],
        );
        ModelScorer::new(Arc::new(SlashTagger), vectorizer, model).unwrap()
    }

    #[test]
    fn buckets_hold_sentence_text_verbatim() {
        let comments = vec!["The view was amazing. The trail was steep.".to_string()];
        let buckets = classify_comments(&comments, &keyword_scorer);
        assert_eq!(buckets.good, vec!["The view was amazing"]);
        assert_eq!(buckets.bad, vec![" The trail was steep"]);
    }

    #[test]
    fn trailing_empty_segments_are_skipped() {
        let comments = vec!["Great hike! Loved it.".to_string()];
        let calls = std::cell::Cell::new(0);
        let scorer = |sentence: &str| {
            calls.set(calls.get() + 1);
            keyword_scorer(sentence)
        };
        let buckets = classify_comments(&comments, &scorer);
        assert_eq!(calls.get(), 2);
        assert_eq!(buckets.good, vec![" Loved it"]);
        assert!(buckets.bad.is_empty());
    }

    #[test]
    fn unlabelled_sentences_are_dropped() {
        let comments = vec!["We parked at the lot.".to_string()];
        assert!(classify_comments(&comments, &keyword_scorer).is_empty());
    }

    #[test]
    fn no_comments_means_empty_buckets() {
        assert!(classify_comments(&[], &keyword_scorer).is_empty());
    }

    #[test]
    fn model_scorer_maps_classes_to_labels() {
        let scorer = model_scorer();
        assert_eq!(
            scorer.score("The/DT view/NN was/VBD amazing/JJ"),
            Some(Label::Good)
        );
        assert_eq!(
            scorer.score("The/DT trail/NN was/VBD so/RB steep/JJ"),
            Some(Label::Bad)
        );
        // no known terms: the prior favours the unmapped class
        assert_eq!(scorer.score("We/PRP parked/VBD early/RB"), None);
    }

    #[test]
    fn model_scorer_rejects_mismatched_model() {
        let vectorizer = model_scorer().vectorizer;
        let model = MultinomialNb::new(vec!["GOOD".into()], vec![0.0], vec![vec![0.0]]);
        assert!(ModelScorer::new(Arc::new(SlashTagger), vectorizer, model).is_err());
    }

    #[test]
    fn model_scorer_loads_both_artifacts() {
        let mut vectorizer = tempfile::NamedTempFile::new().unwrap();
        write!(vectorizer, r#"{{"vocabulary": {{"muddy": 0, "views": 1}}}}"#).unwrap();
        let mut classifier = tempfile::NamedTempFile::new().unwrap();
        write!(
            classifier,
            r#"{{"classes": ["BAD", "GOOD"], "class_log_prior": [-0.69, -0.69],
                "feature_log_prob": [[-0.2, -1.8], [-1.8, -0.2]]}}"#
        )
        .unwrap();

        let config = ModelConfig {
            tokenizer_path: PathBuf::from("unused.bin"),
            vectorizer_path: vectorizer.path().to_path_buf(),
            classifier_path: classifier.path().to_path_buf(),
        };
        let scorer = ModelScorer::load(&config, Arc::new(SlashTagger)).unwrap();
        assert_eq!(scorer.model.classes(), ["BAD".to_string(), "GOOD".to_string()]);
        assert_eq!(scorer.score("It/PRP was/VBD muddy/JJ"), Some(Label::Bad));
        assert_eq!(
            scorer.score("The/DT views/NNS were/VBD great/JJ"),
            Some(Label::Good)
        );
    }
}
