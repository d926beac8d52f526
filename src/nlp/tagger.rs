use std::path::Path;

use anyhow::{Context, Result};
use nlprule::Tokenizer;

/// Coarse part-of-speech tags, named after the universal tag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    Propn,
    Pron,
    Verb,
    Aux,
    Adj,
    Adv,
    Det,
    Adp,
    Cconj,
    Sconj,
    Part,
    Num,
    Punct,
    Intj,
    Other,
}

use PartOfSpeech::*;

const BE_FORMS: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being", "'s", "’s", "'re", "’re", "'m", "’m",
];

const HAVE_DO_FORMS: &[&str] = &[
    "has", "have", "had", "having", "do", "does", "did", "'ve", "’ve", "'d", "’d",
];

const NEGATIONS: &[&str] = &["not", "n't", "n’t"];

const SUBORDINATORS: &[&str] = &[
    "because", "although", "though", "if", "unless", "while", "whereas", "whether", "since",
    "until", "once",
];

/// Tags that mark sentence or paragraph edges rather than a word class.
const EDGE_TAGS: &[&str] = &["SENT_START", "SENT_END", "PARA_END"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedWord {
    pub text: String,
    pub pos: PartOfSpeech,
}

/// Splits text into words and gives each word a part of speech.
pub trait PosTagger {
    fn tag(&self, text: &str) -> Vec<TaggedWord>;
}

/// Pre-trained nlprule English tokenizer: tokenization, dictionary tags and
/// disambiguation rules, loaded from a binary built for the crate version.
pub struct NlpruleTagger {
    tokenizer: Tokenizer,
}

impl NlpruleTagger {
    pub fn load(path: &Path) -> Result<Self> {
        let tokenizer = Tokenizer::new(path)
            .with_context(|| format!("failed to load tokenizer {}", path.display()))?;
        Ok(Self { tokenizer })
    }
}

impl PosTagger for NlpruleTagger {
    fn tag(&self, text: &str) -> Vec<TaggedWord> {
        let mut tokens = Vec::new();
        for sentence in self.tokenizer.pipe(text) {
            for token in sentence.tokens() {
                let word = token.word();
                tokens.push(RawToken {
                    text: word.text().as_str().to_string(),
                    tags: word
                        .tags()
                        .iter()
                        .map(|data| data.pos().as_str().to_string())
                        .collect(),
                });
            }
        }
        resolve(tokens)
    }
}

/// A token with every Penn Treebank tag the tagger left standing.
#[derive(Debug)]
struct RawToken {
    text: String,
    tags: Vec<String>,
}

/// Maps one Penn Treebank tag onto the coarse set. Sub-tags after `:` are
/// ignored (`NN:UN` is `NN`). Edge markers and unknown tags map to `None`.
pub fn from_penn(tag: &str, word: &str) -> Option<PartOfSpeech> {
    let base = tag.split(':').next().unwrap_or_default();
    if EDGE_TAGS.contains(&base) {
        return None;
    }
    let lower = word.to_lowercase();
    let pos = match base {
        "NN" | "NNS" => Noun,
        "NNP" | "NNPS" => Propn,
        "PRP" | "WP" | "EX" => Pron,
        "PRP$" | "WP$" | "DT" | "PDT" | "WDT" => Det,
        "VB" | "VBD" | "VBG" | "VBN" | "VBP" | "VBZ" if BE_FORMS.contains(&lower.as_str()) => Aux,
        "VB" | "VBD" | "VBG" | "VBN" | "VBP" | "VBZ" => Verb,
        "MD" => Aux,
        "JJ" | "JJR" | "JJS" => Adj,
        "RB" | "RBR" | "RBS" | "WRB" if NEGATIONS.contains(&lower.as_str()) => Part,
        "RB" | "RBR" | "RBS" | "WRB" => Adv,
        "IN" if SUBORDINATORS.contains(&lower.as_str()) => Sconj,
        "IN" | "TO" | "RP" => Adp,
        "CC" => Cconj,
        "CD" => Num,
        "UH" => Intj,
        "." | "," | ":" | "``" | "''" | "-LRB-" | "-RRB-" | "HYPH" | "PCT" | "SYM" => Punct,
        "POS" | "FW" | "LS" => Other,
        _ => return None,
    };
    Some(pos)
}

/// Picks one tag per word. Punctuation is decided by the text alone; among
/// several readings an adjective wins after a form of "be" and a noun wins
/// after a determiner or modifier, otherwise the first reading is kept.
fn resolve(tokens: Vec<RawToken>) -> Vec<TaggedWord> {
    let mut words: Vec<TaggedWord> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.text.trim().is_empty() {
            continue;
        }
        let pos = choose(&token, &words);
        words.push(TaggedWord {
            text: token.text,
            pos,
        });
    }
    promote_auxiliaries(&mut words);
    words
}

fn choose(token: &RawToken, before: &[TaggedWord]) -> PartOfSpeech {
    if !token.text.chars().any(char::is_alphanumeric) {
        return Punct;
    }

    let mut readings: Vec<PartOfSpeech> = Vec::new();
    for tag in &token.tags {
        if let Some(pos) = from_penn(tag, &token.text) {
            if !readings.contains(&pos) {
                readings.push(pos);
            }
        }
    }

    match readings.as_slice() {
        [] if token.text.chars().all(|ch| ch.is_ascii_digit() || matches!(ch, ',' | '.')) => Num,
        [] => Noun,
        [only] => *only,
        [first, ..] => {
            let previous = before
                .iter()
                .rev()
                .find(|word| !matches!(word.pos, Adv | Part))
                .map(|word| word.pos);
            if previous == Some(Aux) && readings.contains(&Adj) {
                // "the creek was swollen"
                Adj
            } else if matches!(previous, Some(Det | Adj | Num)) && readings.contains(&Noun) {
                // "the hike", "a steep climb"
                Noun
            } else {
                *first
            }
        }
    }
}

/// "has", "did" and their clitics are auxiliaries when a verb follows.
fn promote_auxiliaries(words: &mut [TaggedWord]) {
    for idx in 0..words.len() {
        if words[idx].pos != Verb || !HAVE_DO_FORMS.contains(&words[idx].text.to_lowercase().as_str())
        {
            continue;
        }
        let next = words[idx + 1..]
            .iter()
            .find(|word| !matches!(word.pos, Adv | Part))
            .map(|word| word.pos);
        if matches!(next, Some(Verb | Aux)) {
            words[idx].pos = Aux;
        }
    }
}

/// Reads pre-tagged text in `word/TAG` form; alternative readings are joined
/// with `|` (`swollen/VBN|JJ`) and untagged tokens carry no readings.
#[cfg(test)]
pub(crate) struct SlashTagger;

#[cfg(test)]
impl PosTagger for SlashTagger {
    fn tag(&self, text: &str) -> Vec<TaggedWord> {
        let tokens = text
            .split_whitespace()
            .map(|chunk| match chunk.rsplit_once('/') {
                Some((word, tags)) if !word.is_empty() => RawToken {
                    text: word.to_string(),
                    tags: tags.split('|').map(str::to_string).collect(),
                },
                _ => RawToken {
                    text: chunk.to_string(),
                    tags: Vec::new(),
                },
            })
            .collect();
        resolve(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(text: &str) -> Vec<PartOfSpeech> {
        SlashTagger.tag(text).into_iter().map(|word| word.pos).collect()
    }

    #[test]
    fn maps_penn_tags_to_coarse_classes() {
        assert_eq!(from_penn("NNS", "views"), Some(Noun));
        assert_eq!(from_penn("NN:UN", "mud"), Some(Noun));
        assert_eq!(from_penn("NNP", "Shenandoah"), Some(Propn));
        assert_eq!(from_penn("JJR", "steeper"), Some(Adj));
        assert_eq!(from_penn("VBD", "hiked"), Some(Verb));
        assert_eq!(from_penn("VBD", "Was"), Some(Aux));
        assert_eq!(from_penn("MD", "would"), Some(Aux));
        assert_eq!(from_penn("RB", "n't"), Some(Part));
        assert_eq!(from_penn("RB", "very"), Some(Adv));
        assert_eq!(from_penn("IN", "because"), Some(Sconj));
        assert_eq!(from_penn("IN", "of"), Some(Adp));
        assert_eq!(from_penn("PRP$", "our"), Some(Det));
        assert_eq!(from_penn("CD", "three"), Some(Num));
        assert_eq!(from_penn("SENT_END", "."), None);
        assert_eq!(from_penn("ZZZ", "word"), None);
    }

    #[test]
    fn adjective_reading_wins_after_copula() {
        assert_eq!(
            tags("The/DT creek/NN was/VBD swollen/VBN|JJ"),
            vec![Det, Noun, Aux, Adj]
        );
        assert_eq!(
            tags("The/DT blazes/NNS were/VBD very/RB faint/VB|JJ|NN"),
            vec![Det, Noun, Aux, Adv, Adj]
        );
    }

    #[test]
    fn noun_reading_wins_after_determiner() {
        assert_eq!(tags("The/DT hike/VB|NN"), vec![Det, Noun]);
        assert_eq!(tags("We/PRP hike/VB|NN"), vec![Pron, Verb]);
    }

    #[test]
    fn have_and_do_are_auxiliaries_only_before_verbs() {
        assert_eq!(
            tags("We/PRP had/VBD n't/RB hiked/VBN"),
            vec![Pron, Aux, Part, Verb]
        );
        assert_eq!(tags("We/PRP had/VBD lunch/NN"), vec![Pron, Verb, Noun]);
    }

    #[test]
    fn punctuation_and_untagged_tokens() {
        assert_eq!(tags("Wow/UH , great/JJ !"), vec![Intj, Punct, Adj, Punct]);
        assert_eq!(tags("1,200/CD feet"), vec![Num, Noun]);
        assert_eq!(tags("4 miles/NNS"), vec![Num, Noun]);
        assert!(tags("").is_empty());
    }

    #[test]
    fn missing_tokenizer_binary_is_an_error() {
        let err = NlpruleTagger::load(Path::new("/definitely/not/en_tokenizer.bin"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("failed to load tokenizer"));
    }
}
