#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Good,
    Bad,
}

impl Label {
    /// Maps a classifier class name onto a label. Unknown classes yield `None`.
    pub fn from_class(class: &str) -> Option<Self> {
        match class {
            "GOOD" => Some(Self::Good),
            "BAD" => Some(Self::Bad),
            _ => None,
        }
    }
}

/// Sentences collected for one hike, split by predicted sentiment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentimentBuckets {
    pub good: Vec<String>,
    pub bad: Vec<String>,
}

impl SentimentBuckets {
    pub fn push(&mut self, label: Label, sentence: &str) {
        match label {
            Label::Good => self.good.push(sentence.to_string()),
            Label::Bad => self.bad.push(sentence.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.good.is_empty() && self.bad.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AspectPair {
    pub noun: String,
    pub adjective: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewPage {
    Comments(Vec<String>),
    /// The hike page had no link to its reviews.
    NoReviews,
}

impl ReviewPage {
    pub fn comments(&self) -> &[String] {
        match self {
            Self::Comments(comments) => comments,
            Self::NoReviews => &[],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub liked: Vec<String>,
    pub disliked: Vec<String>,
}
