use scraper::{Html, Selector};
use url::Url;

use crate::config::{ConfigError, SiteConfig};

/// Site-specific markup rules: how the reviews link is recognized and which
/// elements hold comment bodies. Both rules match on serialized markup, so
/// a marker may sit in any attribute or in nested children.
#[derive(Debug, Clone)]
pub struct ExtractionPolicy {
    review_link_marker: String,
    anchors: Selector,
    comment_marker: String,
    comments: Selector,
}

impl ExtractionPolicy {
    pub fn new(
        review_link_marker: &str,
        comment_tag: &str,
        comment_marker: &str,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            review_link_marker: review_link_marker.to_string(),
            anchors: selector("a")?,
            comment_marker: comment_marker.to_string(),
            comments: selector(comment_tag)?,
        })
    }

    pub fn from_site(site: &SiteConfig) -> Result<Self, ConfigError> {
        Self::new(
            &site.review_link_marker,
            &site.comment_tag,
            &site.comment_marker,
        )
    }

    /// Finds the reviews page link. When several anchors carry the marker the
    /// last one wins.
    pub fn find_review_link(&self, document: &Html, origin: &Url) -> Option<Url> {
        document
            .select(&self.anchors)
            .filter(|anchor| anchor.html().contains(&self.review_link_marker))
            .filter_map(|anchor| anchor.value().attr("href"))
            .filter_map(|href| origin.join(href.trim()).ok())
            .last()
    }

    /// Text of every comment-tag element whose markup contains the comment
    /// marker. An element wrapping a marked one matches too.
    pub fn extract_comments(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.comments)
            .filter(|element| element.html().contains(&self.comment_marker))
            .map(|element| element.text().collect::<String>())
            .collect()
    }
}

fn selector(css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css).map_err(|err| ConfigError::Selector {
        selector: css.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ExtractionPolicy {
        ExtractionPolicy::from_site(&SiteConfig::default()).unwrap()
    }

    fn origin() -> Url {
        Url::parse("https://www.hikingupward.com/").unwrap()
    }

    #[test]
    fn finds_relative_reviews_link() {
        let html = Html::parse_document(
            r#"<html><body>
                <a href="/GSMNP/SomeTrail/map.html">Map</a>
                <a href="/GSMNP/SomeTrail/all_reviews.html">See every review</a>
            </body></html>"#,
        );
        let link = policy().find_review_link(&html, &origin()).unwrap();
        assert_eq!(
            link.as_str(),
            "https://www.hikingupward.com/GSMNP/SomeTrail/all_reviews.html"
        );
    }

    #[test]
    fn marker_may_appear_anywhere_in_anchor_markup() {
        let html = Html::parse_document(
            r#"<a class="all_reviews" href="/SNP/OldRag/reviews.asp">Reviews</a>"#,
        );
        let link = policy().find_review_link(&html, &origin()).unwrap();
        assert_eq!(link.path(), "/SNP/OldRag/reviews.asp");
    }

    #[test]
    fn last_matching_anchor_wins() {
        let html = Html::parse_document(
            r#"<a href="/a/all_reviews.html">one</a><a href="/b/all_reviews.html">two</a>"#,
        );
        let link = policy().find_review_link(&html, &origin()).unwrap();
        assert_eq!(link.path(), "/b/all_reviews.html");
    }

    #[test]
    fn anchors_without_href_are_ignored() {
        let html = Html::parse_document(r#"<a name="all_reviews">anchor</a>"#);
        assert!(policy().find_review_link(&html, &origin()).is_none());
    }

    #[test]
    fn missing_link_yields_none() {
        let html = Html::parse_document(r#"<a href="/GSMNP/other.html">Other</a>"#);
        assert!(policy().find_review_link(&html, &origin()).is_none());
    }

    #[test]
    fn extracts_only_small_font_comments() {
        let html = Html::parse_document(
            r#"<table>
                <tr><td><font size="2">Posted by Sam</font></td></tr>
                <tr><td><font size="1">The view was amazing. The trail was steep.</font></td></tr>
                <tr><td><font size="1">Great <b>hike</b>!</font></td></tr>
            </table>"#,
        );
        let comments = policy().extract_comments(&html);
        assert_eq!(
            comments,
            vec![
                "The view was amazing. The trail was steep.".to_string(),
                "Great hike!".to_string(),
            ]
        );
    }

    #[test]
    fn wrapping_font_matches_alongside_the_marked_one() {
        let html = Html::parse_document(
            r#"<font face="verdana"><font size="1">Nice loop.</font></font>
               <font face="verdana"><font size="2">Directions</font></font>"#,
        );
        assert_eq!(
            policy().extract_comments(&html),
            vec!["Nice loop.".to_string(), "Nice loop.".to_string()]
        );
    }

    #[test]
    fn marker_must_match_serialized_attribute_order() {
        let html = Html::parse_document(r#"<font face="arial" size="1">Fine day</font>"#);
        assert!(policy().extract_comments(&html).is_empty());

        let by_attribute = ExtractionPolicy::new("all_reviews", "font", r#"size="1""#).unwrap();
        assert_eq!(by_attribute.extract_comments(&html), vec!["Fine day".to_string()]);
    }

    #[test]
    fn page_without_comments_extracts_nothing() {
        let html = Html::parse_document("<p>No reviews yet</p>");
        assert!(policy().extract_comments(&html).is_empty());
    }

    #[test]
    fn invalid_selector_is_a_config_error() {
        let err = ExtractionPolicy::new("all_reviews", "font[size=", r#"size="1""#).unwrap_err();
        assert!(matches!(err, ConfigError::Selector { .. }));
    }
}
