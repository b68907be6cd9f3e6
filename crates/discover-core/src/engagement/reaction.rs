// SPDX-License-Identifier: Apache-2.0

//! Reaction classification.
//!
//! Maps the GraphQL `ReactionContent` tokens to display glyphs and a
//! sentiment flag used by the positive-reaction filter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed set of reactions GitHub allows on issues and pull requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReactionKind {
    /// :+1:
    ThumbsUp,
    /// :-1:
    ThumbsDown,
    /// :laughing:
    Laugh,
    /// :tada:
    Hooray,
    /// :confused:
    Confused,
    /// :heart:
    Heart,
    /// :rocket:
    Rocket,
    /// :eyes:
    Eyes,
}

impl ReactionKind {
    /// All reaction kinds, in the order GitHub displays them.
    pub const ALL: [ReactionKind; 8] = [
        ReactionKind::ThumbsUp,
        ReactionKind::ThumbsDown,
        ReactionKind::Laugh,
        ReactionKind::Hooray,
        ReactionKind::Confused,
        ReactionKind::Heart,
        ReactionKind::Rocket,
        ReactionKind::Eyes,
    ];

    /// The GraphQL token, e.g. `THUMBS_UP`.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            ReactionKind::ThumbsUp => "THUMBS_UP",
            ReactionKind::ThumbsDown => "THUMBS_DOWN",
            ReactionKind::Laugh => "LAUGH",
            ReactionKind::Hooray => "HOORAY",
            ReactionKind::Confused => "CONFUSED",
            ReactionKind::Heart => "HEART",
            ReactionKind::Rocket => "ROCKET",
            ReactionKind::Eyes => "EYES",
        }
    }

    /// GitHub markdown shortcode.
    #[must_use]
    pub fn shortcode(self) -> &'static str {
        match self {
            ReactionKind::ThumbsUp => ":+1:",
            ReactionKind::ThumbsDown => ":-1:",
            ReactionKind::Laugh => ":laughing:",
            ReactionKind::Hooray => ":tada:",
            ReactionKind::Confused => ":confused:",
            ReactionKind::Heart => ":heart:",
            ReactionKind::Rocket => ":rocket:",
            ReactionKind::Eyes => ":eyes:",
        }
    }

    /// Unicode emoji, for terminals.
    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            ReactionKind::ThumbsUp => "\u{1f44d}",
            ReactionKind::ThumbsDown => "\u{1f44e}",
            ReactionKind::Laugh => "\u{1f604}",
            ReactionKind::Hooray => "\u{1f389}",
            ReactionKind::Confused => "\u{1f615}",
            ReactionKind::Heart => "\u{2764}\u{fe0f}",
            ReactionKind::Rocket => "\u{1f680}",
            ReactionKind::Eyes => "\u{1f440}",
        }
    }

    /// Confused, thumbs-down and laugh read as negative; everything else is positive.
    #[must_use]
    pub fn is_negative(self) -> bool {
        matches!(
            self,
            ReactionKind::Confused | ReactionKind::ThumbsDown | ReactionKind::Laugh
        )
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ReactionKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.token() == s)
            .ok_or(())
    }
}

/// A reaction as observed on an issue, classified.
///
/// Unknown tokens are kept verbatim with no glyph and count as positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// Raw GraphQL token.
    pub content: String,
    /// Recognised kind, if any.
    pub kind: Option<ReactionKind>,
}

impl Reaction {
    /// Display shortcode, empty for unknown tokens.
    #[must_use]
    pub fn shortcode(&self) -> &'static str {
        self.kind.map_or("", ReactionKind::shortcode)
    }

    /// Unicode emoji, empty for unknown tokens.
    #[must_use]
    pub fn emoji(&self) -> &'static str {
        self.kind.map_or("", ReactionKind::emoji)
    }

    /// Sentiment flag; unknown tokens are treated as positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        !self.kind.is_some_and(ReactionKind::is_negative)
    }
}

/// Classifies a raw reaction token.
#[must_use]
pub fn classify(content: &str) -> Reaction {
    Reaction {
        content: content.to_string(),
        kind: content.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_kinds() {
        let negative: Vec<_> = ReactionKind::ALL
            .into_iter()
            .filter(|k| k.is_negative())
            .collect();
        assert_eq!(
            negative,
            vec![
                ReactionKind::ThumbsDown,
                ReactionKind::Laugh,
                ReactionKind::Confused
            ]
        );
    }

    #[test]
    fn test_token_round_trips_through_from_str() {
        for kind in ReactionKind::ALL {
            assert_eq!(kind.token().parse::<ReactionKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_classify_known() {
        let reaction = classify("ROCKET");
        assert_eq!(reaction.kind, Some(ReactionKind::Rocket));
        assert_eq!(reaction.shortcode(), ":rocket:");
        assert!(reaction.is_positive());

        let reaction = classify("CONFUSED");
        assert_eq!(reaction.shortcode(), ":confused:");
        assert!(!reaction.is_positive());
    }

    #[test]
    fn test_classify_unknown_is_blank_and_positive() {
        let reaction = classify("SPARKLES");
        assert_eq!(reaction.kind, None);
        assert_eq!(reaction.content, "SPARKLES");
        assert_eq!(reaction.shortcode(), "");
        assert_eq!(reaction.emoji(), "");
        assert!(reaction.is_positive());
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        assert_eq!(classify("thumbs_up").kind, None);
    }

    #[test]
    fn test_serde_uses_graphql_tokens() {
        let json = serde_json::to_string(&ReactionKind::ThumbsUp).unwrap();
        assert_eq!(json, "\"THUMBS_UP\"");
        let kind: ReactionKind = serde_json::from_str("\"HOORAY\"").unwrap();
        assert_eq!(kind, ReactionKind::Hooray);
    }
}
