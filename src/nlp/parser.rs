use std::sync::Arc;

use super::tagger::{PartOfSpeech, PosTagger};

use PartOfSpeech::*;

/// Syntactic relation of a token to its head, named after the ClearNLP labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependency {
    Root,
    Nsubj,
    Aux,
    Neg,
    Acomp,
    Attr,
    Dobj,
    Xcomp,
    Amod,
    Advmod,
    Det,
    Nummod,
    Compound,
    Prep,
    Pobj,
    Cc,
    Conj,
    Punct,
    Dep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedToken {
    pub text: String,
    pub pos: PartOfSpeech,
    pub dep: Dependency,
    /// Index of the governing token; the root points at itself.
    pub head: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSentence {
    pub tokens: Vec<ParsedToken>,
}

impl ParsedSentence {
    /// Dependents of `idx` that sit to its right, in sentence order.
    pub fn rights(&self, idx: usize) -> impl Iterator<Item = &ParsedToken> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .skip(idx + 1)
            .filter(move |(child, token)| token.head == idx && *child != idx)
            .map(|(_, token)| token)
    }
}

pub trait DependencyParser {
    fn parse(&self, sentence: &str) -> ParsedSentence;
}

/// Shallow parser over tagged words. Each clause is anchored on its first
/// verb or auxiliary; the nearest free noun phrase head before it becomes
/// the subject and everything after it hangs off the predicate.
#[derive(Clone)]
pub struct RuleParser {
    tagger: Arc<dyn PosTagger>,
}

impl RuleParser {
    pub fn new(tagger: Arc<dyn PosTagger>) -> Self {
        Self { tagger }
    }
}

impl DependencyParser for RuleParser {
    fn parse(&self, sentence: &str) -> ParsedSentence {
        let tagged = self.tagger.tag(sentence);
        if tagged.is_empty() {
            return ParsedSentence::default();
        }
        let words: Vec<&str> = tagged.iter().map(|word| word.text.as_str()).collect();
        let pos: Vec<PartOfSpeech> = tagged.iter().map(|word| word.pos).collect();

        let mut attacher = Attacher::new(&words, &pos);
        attacher.clause(0, words.len(), None);
        let links = attacher.finish();

        let tokens = tagged
            .into_iter()
            .zip(links)
            .map(|(word, (dep, head))| ParsedToken {
                text: word.text,
                pos: word.pos,
                dep,
                head,
            })
            .collect();
        ParsedSentence { tokens }
    }
}

fn is_nominal(pos: PartOfSpeech) -> bool {
    matches!(pos, Noun | Propn | Pron)
}

fn is_modifier(pos: PartOfSpeech) -> bool {
    matches!(pos, Det | Adj | Num | Adv | Noun | Propn)
}

struct Attacher<'a> {
    words: &'a [&'a str],
    pos: &'a [PartOfSpeech],
    links: Vec<Option<(Dependency, usize)>>,
}

impl<'a> Attacher<'a> {
    fn new(words: &'a [&'a str], pos: &'a [PartOfSpeech]) -> Self {
        Self {
            words,
            pos,
            links: vec![None; words.len()],
        }
    }

    /// First link wins; later passes only fill gaps.
    fn set(&mut self, idx: usize, dep: Dependency, head: usize) {
        if self.links[idx].is_none() {
            self.links[idx] = Some((dep, head));
        }
    }

    fn is_free(&self, idx: usize) -> bool {
        self.links[idx].is_none()
    }

    fn finish(self) -> Vec<(Dependency, usize)> {
        let root = self
            .links
            .iter()
            .position(|link| matches!(link, Some((Dependency::Root, _))))
            .unwrap_or(0);
        self.links
            .into_iter()
            .map(|link| link.unwrap_or((Dependency::Dep, root)))
            .collect()
    }

    fn clause(&mut self, start: usize, end: usize, parent: Option<usize>) {
        if start >= end {
            return;
        }
        let Some((root, chain)) = self.predicate(start, end) else {
            self.fragment(start, end, parent);
            return;
        };

        self.attach_root(root, parent);
        for &idx in &chain {
            let dep = match self.pos[idx] {
                Part => Dependency::Neg,
                Adv => Dependency::Advmod,
                _ => Dependency::Aux,
            };
            self.set(idx, dep, root);
        }

        let subject_end = chain.first().copied().unwrap_or(root);
        self.subject_region(start, subject_end, root);

        let boundary = self.clause_boundary(root + 1, end);
        self.predicate_region(root + 1, boundary.unwrap_or(end), root);

        if let Some(split) = boundary {
            let dep = if self.pos[split] == Punct {
                Dependency::Punct
            } else {
                Dependency::Cc
            };
            self.set(split, dep, root);
            self.clause(split + 1, end, Some(root));
        }
    }

    fn attach_root(&mut self, root: usize, parent: Option<usize>) {
        match parent {
            Some(parent) => self.set(root, Dependency::Conj, parent),
            None => self.set(root, Dependency::Root, root),
        }
    }

    /// Finds the clause head and the auxiliaries, negations and adverbs that
    /// lead up to it. A run of auxiliaries with no main verb after it is a
    /// copular clause headed by its last auxiliary.
    fn predicate(&self, start: usize, end: usize) -> Option<(usize, Vec<usize>)> {
        let first = (start..end).find(|&idx| matches!(self.pos[idx], Verb | Aux))?;
        if self.pos[first] == Verb {
            return Some((first, Vec::new()));
        }

        let mut chain = vec![first];
        let mut last_aux = first;
        for idx in first + 1..end {
            match self.pos[idx] {
                Aux => {
                    chain.push(idx);
                    last_aux = idx;
                }
                Adv | Part => chain.push(idx),
                Verb => return Some((idx, chain)),
                _ => break,
            }
        }

        chain.retain(|&idx| idx < last_aux);
        Some((last_aux, chain))
    }

    /// A conjunction or clause punctuation followed by its own subject and
    /// predicate starts a new coordinated clause.
    fn clause_boundary(&self, start: usize, end: usize) -> Option<usize> {
        (start..end).find(|&split| {
            let splits = matches!(self.pos[split], Cconj | Sconj)
                || (self.pos[split] == Punct && matches!(self.words[split], "," | ";" | ":"));
            if !splits {
                return false;
            }
            let Some((root, chain)) = self.predicate(split + 1, end) else {
                return false;
            };
            let subject_end = chain.first().copied().unwrap_or(root);
            let between = split + 1..subject_end;
            between.clone().any(|idx| is_nominal(self.pos[idx]))
                && !between.clone().any(|idx| {
                    matches!(self.pos[idx], Cconj | Sconj)
                        || (self.pos[idx] == Punct && self.words[idx] == ",")
                })
        })
    }

    fn fragment(&mut self, start: usize, end: usize, parent: Option<usize>) {
        let heads = self.noun_phrases(start, end);
        let root = heads
            .iter()
            .rev()
            .copied()
            .find(|&head| self.is_free(head))
            .or_else(|| (start..end).find(|&idx| self.pos[idx] != Punct))
            .unwrap_or(start);

        self.attach_root(root, parent);
        self.link_heads(start, end, &heads, root);
        for idx in start..end {
            self.fallback(idx, root);
        }
    }

    fn subject_region(&mut self, start: usize, end: usize, root: usize) {
        let heads = self.noun_phrases(start, end);
        self.link_heads(start, end, &heads, root);

        if let Some(subject) = heads.iter().rev().copied().find(|&head| self.is_free(head)) {
            self.set(subject, Dependency::Nsubj, root);
        }
        for idx in start..end {
            self.fallback(idx, root);
        }
    }

    fn predicate_region(&mut self, start: usize, end: usize, root: usize) {
        let copular = self.pos[root] == Aux;
        let heads = self.noun_phrases(start, end);
        self.link_heads(start, end, &heads, root);

        let object = if copular {
            Dependency::Attr
        } else {
            Dependency::Dobj
        };
        for &head in &heads {
            self.set(head, object, root);
        }

        for idx in start..end {
            if !self.is_free(idx) {
                continue;
            }
            match self.pos[idx] {
                Adj => {
                    // "steep and rocky": the second adjective joins the first
                    let coordinated = idx >= start + 2
                        && (self.pos[idx - 1] == Cconj || self.words[idx - 1] == ",")
                        && self.pos[idx - 2] == Adj;
                    if coordinated {
                        let cc = if self.pos[idx - 1] == Cconj {
                            Dependency::Cc
                        } else {
                            Dependency::Punct
                        };
                        self.set(idx - 1, cc, idx - 2);
                        self.set(idx, Dependency::Conj, idx - 2);
                    } else {
                        self.set(idx, Dependency::Acomp, root);
                    }
                }
                Adv if idx + 1 < end && self.pos[idx + 1] == Adj => {
                    self.set(idx, Dependency::Advmod, idx + 1);
                }
                Verb => self.set(idx, Dependency::Xcomp, root),
                _ => {}
            }
        }

        for idx in start..end {
            self.fallback(idx, root);
        }
    }

    /// Marks noun phrase heads (the last noun of a run, or a pronoun) and
    /// attaches determiners, adjectives, numbers and compounds that lead
    /// into them without a break.
    fn noun_phrases(&mut self, start: usize, end: usize) -> Vec<usize> {
        let heads: Vec<usize> = (start..end)
            .filter(|&idx| {
                let pos = self.pos[idx];
                let continues = pos != Pron && idx + 1 < end && matches!(self.pos[idx + 1], Noun | Propn);
                self.is_free(idx) && is_nominal(pos) && !continues
            })
            .collect();

        for idx in start..end {
            if !self.is_free(idx) || heads.contains(&idx) {
                continue;
            }
            let Some(head) = heads.iter().copied().find(|&head| head > idx) else {
                continue;
            };
            if !(idx + 1..head).all(|between| is_modifier(self.pos[between])) {
                continue;
            }
            let dep = match self.pos[idx] {
                Noun | Propn => Dependency::Compound,
                Det => Dependency::Det,
                Adj => Dependency::Amod,
                Num => Dependency::Nummod,
                Adv if self.pos[idx + 1] == Adj => {
                    self.set(idx, Dependency::Advmod, idx + 1);
                    continue;
                }
                Adv => Dependency::Advmod,
                _ => continue,
            };
            self.set(idx, dep, head);
        }
        heads
    }

    /// Prepositional objects and coordinated noun phrases.
    fn link_heads(&mut self, start: usize, end: usize, heads: &[usize], fallback: usize) {
        for idx in start..end {
            if !self.is_free(idx) {
                continue;
            }
            let previous = heads.iter().rev().copied().find(|&head| head < idx);
            let next = heads.iter().copied().find(|&head| head > idx);
            match self.pos[idx] {
                Adp => {
                    let governor = previous.filter(|&head| head + 1 == idx).unwrap_or(fallback);
                    self.set(idx, Dependency::Prep, governor);
                    if let Some(object) = next {
                        self.set(object, Dependency::Pobj, idx);
                    }
                }
                Cconj => {
                    if let (Some(left), Some(right)) = (previous, next) {
                        if left + 1 == idx {
                            self.set(idx, Dependency::Cc, left);
                            self.set(right, Dependency::Conj, left);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn fallback(&mut self, idx: usize, root: usize) {
        if idx == root {
            return;
        }
        let dep = match self.pos[idx] {
            Punct => Dependency::Punct,
            Adv => Dependency::Advmod,
            Part => Dependency::Neg,
            Cconj => Dependency::Cc,
            Aux => Dependency::Aux,
            _ => Dependency::Dep,
        };
        self.set(idx, dep, root);
    }
}
