use std::collections::HashMap;

use tracing::debug;

use crate::{
    config::AspectConfig,
    domain::AspectPair,
    nlp::{Dependency, DependencyParser, ParsedSentence, PartOfSpeech},
};

/// Pairs every nominal subject with the first adjective to the right of its
/// head, if there is one.
pub fn noun_adjective_pairs(sentence: &ParsedSentence) -> Vec<AspectPair> {
    sentence
        .tokens
        .iter()
        .filter(|token| token.dep == Dependency::Nsubj)
        .filter_map(|noun| {
            let adjective = sentence
                .rights(noun.head)
                .find(|token| token.pos == PartOfSpeech::Adj)?;
            Some(AspectPair {
                noun: noun.text.clone(),
                adjective: adjective.text.clone(),
            })
        })
        .collect()
}

/// Adjective counts in order of first appearance.
#[derive(Debug, Default)]
struct AdjectiveCounter {
    counts: Vec<(String, usize)>,
    slots: HashMap<String, usize>,
}

impl AdjectiveCounter {
    fn add(&mut self, adjective: String) {
        match self.slots.get(&adjective) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.slots.insert(adjective.clone(), self.counts.len());
                self.counts.push((adjective, 1));
            }
        }
    }

    /// Up to `n` entries by descending count, ties in first-seen order.
    fn most_common(mut self, n: usize) -> Vec<(String, usize)> {
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts.truncate(n);
        self.counts
    }
}

/// Parses each sentence on its own and returns the most frequent subject
/// adjectives that occur at least `min_count` times.
pub fn rank_aspects(
    sentences: &[String],
    parser: &dyn DependencyParser,
    config: &AspectConfig,
) -> Vec<String> {
    let mut counter = AdjectiveCounter::default();
    let mut pairs = 0usize;
    for sentence in sentences {
        for pair in noun_adjective_pairs(&parser.parse(sentence)) {
            debug!(target: "aspects", noun = %pair.noun, adjective = %pair.adjective, "pair");
            counter.add(pair.adjective);
            pairs += 1;
        }
    }
    debug!(target: "aspects", sentences = sentences.len(), pairs, "pairs extracted");

    counter
        .most_common(config.top)
        .into_iter()
        .filter(|(_, count)| *count >= config.min_count)
        .map(|(adjective, _)| adjective)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::nlp::{ParsedToken, RuleParser, SlashTagger};

    fn config() -> AspectConfig {
        AspectConfig::default()
    }

    fn parser() -> RuleParser {
        RuleParser::new(Arc::new(SlashTagger))
    }

    fn sentences(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn pairs_subject_with_predicate_adjective() {
        let parsed = parser().parse("The/DT view/NN was/VBD amazing/JJ");
        assert_eq!(
            noun_adjective_pairs(&parsed),
            vec![AspectPair {
                noun: "view".into(),
                adjective: "amazing".into()
            }]
        );
    }

    #[test]
    fn attributive_adjectives_are_not_paired() {
        let parsed = parser().parse("The/DT hike/NN offers/VBZ beautiful/JJ views/NNS");
        assert!(noun_adjective_pairs(&parsed).is_empty());
    }

    #[test]
    fn each_clause_contributes_its_own_pair() {
        let parsed = parser()
            .parse("The/DT view/NN was/VBD amazing/JJ and/CC the/DT trail/NN was/VBD steep/JJ");
        let adjectives: Vec<_> = noun_adjective_pairs(&parsed)
            .into_iter()
            .map(|pair| pair.adjective)
            .collect();
        assert_eq!(adjectives, vec!["amazing", "steep"]);
    }

    #[test]
    fn works_on_hand_built_parses() {
        let token = |text: &str, pos, dep, head| ParsedToken {
            text: text.into(),
            pos,
            dep,
            head,
        };
        let parsed = ParsedSentence {
            tokens: vec![
                token("creek", PartOfSpeech::Noun, Dependency::Nsubj, 1),
                token("ran", PartOfSpeech::Verb, Dependency::Root, 1),
                token("high", PartOfSpeech::Adv, Dependency::Advmod, 1),
                token("cold", PartOfSpeech::Adj, Dependency::Acomp, 1),
                token("clear", PartOfSpeech::Adj, Dependency::Conj, 3),
            ],
        };
        let pairs = noun_adjective_pairs(&parsed);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].adjective, "cold");
    }

    #[test]
    fn participles_tagged_adjective_pair_with_their_subject() {
        let parsed = parser().parse("The/DT blazes/NNS were/VBD faint/VB|JJ|NN");
        assert_eq!(
            noun_adjective_pairs(&parsed),
            vec![AspectPair {
                noun: "blazes".into(),
                adjective: "faint".into()
            }]
        );
    }

    #[test]
    fn single_occurrences_are_filtered_out() {
        let parser = parser();
        let ranked = rank_aspects(
            &sentences(&["The/DT view/NN was/VBD amazing/JJ"]),
            &parser,
            &config(),
        );
        assert!(ranked.is_empty());
    }

    #[test]
    fn ranks_by_count_then_first_seen() {
        let parser = parser();
        let ranked = rank_aspects(
            &sentences(&[
                "The/DT trail/NN was/VBD steep/JJ",
                "The/DT climb/NN was/VBD steep/JJ",
                "The/DT creek/NN was/VBD cold/JJ",
                "The/DT water/NN was/VBD cold/JJ",
                "The/DT views/NNS were/VBD amazing/JJ",
                "The/DT summit/NN was/VBD amazing/JJ",
                "It/PRP was/VBD amazing/JJ",
                "The/DT loop/NN was/VBD short/JJ",
                "The/DT lot/NN was/VBD small/JJ",
                "The/DT hike/NN was/VBD short/JJ",
            ]),
            &parser,
            &config(),
        );
        assert_eq!(ranked, vec!["amazing", "steep", "cold"]);
    }

    #[test]
    fn never_more_than_top_entries() {
        let parser = parser();
        let config = AspectConfig {
            top: 2,
            min_count: 2,
        };
        let ranked = rank_aspects(
            &sentences(&[
                "The/DT trail/NN was/VBD steep/JJ",
                "The/DT climb/NN was/VBD steep/JJ",
                "The/DT creek/NN was/VBD cold/JJ",
                "The/DT water/NN was/VBD cold/JJ",
                "The/DT hike/NN was/VBD short/JJ",
                "The/DT loop/NN was/VBD short/JJ",
            ]),
            &parser,
            &config,
        );
        assert_eq!(ranked, vec!["steep", "cold"]);
    }

    #[test]
    fn sentences_are_parsed_independently() {
        let parser = parser();
        // joined into one text, "steep" would attach to both subjects
        let ranked = rank_aspects(
            &sentences(&[
                "The/DT trail/NN was/VBD",
                "steep/JJ",
                "The/DT climb/NN was/VBD",
                "steep/JJ",
            ]),
            &parser,
            &config(),
        );
        assert!(ranked.is_empty());
    }

    #[test]
    fn empty_bucket_ranks_nothing() {
        assert!(rank_aspects(&[], &parser(), &config()).is_empty());
    }
}
