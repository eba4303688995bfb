//! Rich message attachments.
//!
//! Attachments are rendered below the message text in the order they were added.

use serde::{Deserialize, Serialize};

/// Green accent. Used when no color is given.
pub const COLOR_GOOD: &str = "good";
/// Yellow accent.
pub const COLOR_WARNING: &str = "warning";
/// Red accent.
pub const COLOR_DANGER: &str = "danger";

/// A single attachment block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Bold title line.
    pub title: String,
    /// Body text.
    #[serde(rename = "text")]
    pub body: String,
    /// Accent color: `good`, `warning`, `danger` or a hex code like `#439FE0`.
    pub color: String,
}

impl Attachment {
    /// Creates an attachment with the default [`COLOR_GOOD`] accent.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            color: COLOR_GOOD.to_string(),
        }
    }

    /// Sets the accent color. An empty color keeps the default.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        let color = color.into();
        if !color.is_empty() {
            self.color = color;
        }
        self
    }
}

/// Ordered collection of attachments for one outgoing message.
///
/// # Example
///
/// ```
/// use slackline::{Attachments, COLOR_DANGER};
///
/// let attachments = Attachments::new()
///     .add_attachment("Build", "passed", None)
///     .add_attachment("Deploy", "failed", Some(COLOR_DANGER));
///
/// assert_eq!(attachments.len(), 2);
/// assert_eq!(attachments.attachments()[0].color, "good");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachments {
    items: Vec<Attachment>,
}

impl Attachments {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends an attachment and returns the collection for chaining.
    ///
    /// `color` falls back to [`COLOR_GOOD`] when `None` or empty.
    #[must_use]
    pub fn add_attachment(
        mut self,
        title: impl Into<String>,
        body: impl Into<String>,
        color: Option<&str>,
    ) -> Self {
        let attachment = Attachment::new(title, body);
        self.push(match color {
            Some(color) => attachment.with_color(color),
            None => attachment,
        });
        self
    }

    /// Appends an already-built attachment.
    pub fn push(&mut self, attachment: Attachment) {
        self.items.push(attachment);
    }

    /// Returns the attachments in insertion order.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.items
    }

    /// Returns an owned copy of the attachments.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Attachment> {
        self.items.clone()
    }

    /// Number of attachments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no attachments were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serializes the attachments as the JSON array sent in the `attachments` form field.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(&self.items)?)
    }
}

impl FromIterator<Attachment> for Attachments {
    fn from_iter<I: IntoIterator<Item = Attachment>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Attachments {
    type Item = &'a Attachment;
    type IntoIter = std::slice::Iter<'a, Attachment>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_color() {
        let attachments = Attachments::new().add_attachment("title", "body", None);
        assert_eq!(attachments.attachments()[0].color, COLOR_GOOD);
    }

    #[test]
    fn test_empty_color_falls_back() {
        let attachments = Attachments::new().add_attachment("title", "body", Some(""));
        assert_eq!(attachments.attachments()[0].color, COLOR_GOOD);
    }

    #[test]
    fn test_explicit_color() {
        let attachments = Attachments::new().add_attachment("title", "body", Some("#439FE0"));
        assert_eq!(attachments.attachments()[0].color, "#439FE0");
    }

    #[test]
    fn test_empty_title_and_body_accepted() {
        let attachments = Attachments::new().add_attachment("", "", None);
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments.attachments()[0], Attachment::new("", ""));
    }

    #[test]
    fn test_to_vec_is_detached() {
        let attachments = Attachments::new().add_attachment("a", "1", None);
        let mut copy = attachments.to_vec();
        copy[0].title = "changed".into();
        copy.push(Attachment::new("b", "2"));

        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments.attachments()[0].title, "a");
    }

    #[test]
    fn test_json_shape() {
        let json = Attachments::new()
            .add_attachment("Build", "passed", None)
            .add_attachment("Deploy", "failed", Some(COLOR_DANGER))
            .to_json()
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"title": "Build", "text": "passed", "color": "good"},
                {"title": "Deploy", "text": "failed", "color": "danger"},
            ])
        );
    }

    #[test]
    fn test_empty_serializes_to_empty_array() {
        assert_eq!(Attachments::new().to_json().unwrap(), "[]");
    }

    #[test]
    fn test_collect() {
        let attachments: Attachments = ["a", "b"]
            .into_iter()
            .map(|t| Attachment::new(t, "x"))
            .collect();
        let titles: Vec<_> = attachments.into_iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["a", "b"]);
    }

    proptest! {
        #[test]
        fn prop_missing_color_is_good(title in ".*", body in ".*") {
            let attachments = Attachments::new().add_attachment(title.clone(), body.clone(), None);
            let added = &attachments.attachments()[0];
            prop_assert_eq!(&added.title, &title);
            prop_assert_eq!(&added.body, &body);
            prop_assert_eq!(added.color.as_str(), COLOR_GOOD);
        }

        #[test]
        fn prop_explicit_color_preserved(color in ".+") {
            let attachments = Attachments::new().add_attachment("t", "b", Some(color.as_str()));
            prop_assert_eq!(&attachments.attachments()[0].color, &color);
        }

        #[test]
        fn prop_insertion_order_kept(titles in proptest::collection::vec("[a-z]{0,8}", 0..16)) {
            let attachments = titles
                .iter()
                .fold(Attachments::new(), |acc, t| acc.add_attachment(t.as_str(), "body", None));
            let got: Vec<_> = attachments.attachments().iter().map(|a| a.title.clone()).collect();
            prop_assert_eq!(got, titles);
        }
    }
}
