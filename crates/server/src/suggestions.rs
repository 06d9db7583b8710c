//! Canned assistant replies for the chat endpoint.
//!
//! [`KeywordSuggestions`] classifies the user's text against an ordered
//! topic table; the first topic with a matching keyword wins. Anything that
//! implements [`SuggestionGenerator`] (e.g. a client for a real inference
//! service) can replace it without touching the handlers.

/// An assistant reply with optional follow-up prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub suggestions: Option<Vec<String>>,
}

pub trait SuggestionGenerator: Send + Sync {
    fn reply(&self, message: &str) -> Reply;
}

/// How a keyword is found in the lowercased message.
enum Keyword {
    /// Anywhere, as a plain substring ("seafood" contains "food").
    Anywhere(&'static str),
    /// Only at the start of a word, for keywords hidden inside common
    /// words ("eat" in "weather").
    WordStart(&'static str),
}

struct Topic {
    keywords: &'static [Keyword],
    text: &'static str,
    suggestions: &'static [&'static str],
}

impl Topic {
    fn matches(&self, words: &[&str], lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| match keyword {
            Keyword::Anywhere(text) => lowered.contains(text),
            Keyword::WordStart(text) => words.iter().any(|word| word.starts_with(text)),
        })
    }

    fn to_reply(&self) -> Reply {
        Reply {
            text: self.text.to_string(),
            suggestions: Some(self.suggestions.iter().map(|s| s.to_string()).collect()),
        }
    }
}

const TOPICS: &[Topic] = &[
    Topic {
        keywords: &[Keyword::Anywhere("trip"), Keyword::Anywhere("plan")],
        text: "I'd be happy to help you plan a trip! Where would you like to go, and when are you planning to travel?",
        suggestions: &["Paris in spring", "Tokyo for a week", "Beach vacation in Bali"],
    },
    Topic {
        keywords: &[
            Keyword::Anywhere("restaurant"),
            Keyword::Anywhere("food"),
            Keyword::WordStart("eat"),
        ],
        text: "I can recommend some great restaurants! What type of cuisine are you interested in?",
        suggestions: &["Italian restaurants", "Local specialties", "Vegetarian options"],
    },
    Topic {
        keywords: &[Keyword::Anywhere("itinerary"), Keyword::Anywhere("schedule")],
        text: "Let me help you with your itinerary. Would you like me to show you today's activities or plan for a specific day?",
        suggestions: &["Show today's itinerary", "Plan tomorrow", "Full week view"],
    },
    Topic {
        keywords: &[Keyword::Anywhere("weather")],
        text: "The weather looks great for your trip! Sunny with temperatures around 72°F (22°C). Perfect for outdoor activities!",
        suggestions: &["Outdoor activity suggestions", "What to pack", "7-day forecast"],
    },
    Topic {
        keywords: &[Keyword::Anywhere("help"), Keyword::Anywhere("what can you do")],
        text: "I'm your AI travel assistant! I can help you plan trips, find restaurants, manage your itinerary, check weather, and provide safety information. What would you like to do?",
        suggestions: &["Plan a new trip", "Find restaurants", "Check my itinerary", "Safety information"],
    },
];

const FALLBACK: Topic = Topic {
    keywords: &[],
    text: "I'm here to help with your travel plans! You can ask me about destinations, restaurants, activities, weather, or anything else related to your trip.",
    suggestions: &["Tell me about popular destinations", "What should I do today?", "Help me plan a trip"],
};

/// Case-insensitive substring matching, except for [`Keyword::WordStart`]
/// entries.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordSuggestions;

impl SuggestionGenerator for KeywordSuggestions {
    fn reply(&self, message: &str) -> Reply {
        let lowered = message.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        TOPICS
            .iter()
            .find(|topic| topic.matches(&words, &lowered))
            .unwrap_or(&FALLBACK)
            .to_reply()
    }
}
