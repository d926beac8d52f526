//! Text handling for review comments: sentence splitting, part-of-speech
//! tagging with a pre-trained nlprule tokenizer, token filtering and a
//! shallow dependency parser over the tagged words.

mod parser;
mod sentences;
mod tagger;
mod tokens;

pub use parser::{Dependency, DependencyParser, ParsedSentence, ParsedToken, RuleParser};
pub use sentences::split_sentences;
pub use tagger::{NlpruleTagger, PartOfSpeech, PosTagger};
pub use tokens::filter_tokens;

#[cfg(test)]
pub(crate) use tagger::SlashTagger;
