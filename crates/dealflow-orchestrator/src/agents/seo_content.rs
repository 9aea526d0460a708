//! Search-optimized marketing content.
//!
//! Title, slug, meta description and keywords are derived deterministically
//! from the keyword and location. Only the body text goes through the
//! generator.

use super::support::{draft, to_payload};
use crate::{Agent, AgentError, Payload, Task};
use async_trait::async_trait;
use dealflow_abstraction::{GenerationParameters, TextGenerator};
use dealflow_core::Settings;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

pub const META_DESCRIPTION_MAX_CHARS: usize = 160;
const DEFAULT_LOCATION: &str = "your area";
const TEMPERATURE: f32 = 0.8;
const MAX_TOKENS: u32 = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContentType {
    Blog,
    LandingPage,
    CaseStudy,
}

impl ContentType {
    fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "blog" | "blog_post" => Some(Self::Blog),
            "landing_page" => Some(Self::LandingPage),
            "case_study" => Some(Self::CaseStudy),
            _ => None,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::LandingPage => "landing_page",
            Self::CaseStudy => "case_study",
        }
    }

    fn title(self, keyword: &str, location: &str) -> String {
        let keyword = title_case(keyword);
        match self {
            Self::Blog => format!("{keyword} in {location}: A Seller's Guide"),
            Self::LandingPage => format!("{keyword} in {location} | Fair Cash Offer in 24 Hours"),
            Self::CaseStudy => format!("Case Study: A {keyword} Sale in {location}"),
        }
    }

    fn meta_description(self, keyword: &str, location: &str) -> String {
        match self {
            Self::Blog => format!(
                "Thinking about {keyword} in {location}? Learn your options, typical timelines \
                 and what a cash sale really nets you."
            ),
            Self::LandingPage => format!(
                "Get a no-obligation cash offer for your {location} home. {} with no repairs, \
                 no commissions and a closing date you choose.",
                title_case(keyword)
            ),
            Self::CaseStudy => format!(
                "How one {location} homeowner handled {keyword} and closed in under three weeks."
            ),
        }
    }

    const fn outline(self) -> &'static [&'static str] {
        match self {
            Self::Blog => &[
                "Introduction",
                "Why homeowners choose this route",
                "Step-by-step process",
                "Costs compared with a listed sale",
                "Frequently asked questions",
                "Next steps",
            ],
            Self::LandingPage => &[
                "Headline and offer",
                "How it works in three steps",
                "Why sellers choose us",
                "Testimonials",
                "Call to action",
            ],
            Self::CaseStudy => &[
                "The situation",
                "The challenge",
                "Our offer",
                "The outcome",
                "Key takeaways",
            ],
        }
    }
}

#[derive(Debug, Serialize)]
struct ContentPiece {
    content_type: &'static str,
    keyword: String,
    location: String,
    title: String,
    slug: String,
    meta_description: String,
    seo_keywords: Vec<String>,
    outline: Vec<&'static str>,
    body: String,
    word_count: usize,
    model: String,
    tokens_used: u64,
}

/// Writes blog posts, landing pages and case studies for seller acquisition.
pub struct SeoContentAgent {
    settings: Arc<Settings>,
    generator: Arc<dyn TextGenerator>,
}

impl SeoContentAgent {
    #[must_use]
    pub fn new(settings: Arc<Settings>, generator: Arc<dyn TextGenerator>) -> Self {
        Self { settings, generator }
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase ASCII words joined by single hyphens.
#[must_use]
pub fn slugify(text: &str) -> String {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Cuts at a word boundary so the result fits in `max_chars` characters.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    let cut = cut.rsplit_once(' ').map_or(cut.as_str(), |(head, _)| head).trim_end();
    format!("{cut}...")
}

fn keywords(keyword: &str, location: &str) -> Vec<String> {
    let keyword = keyword.to_lowercase();
    let location = location.to_lowercase();
    vec![
        keyword.clone(),
        format!("{keyword} {location}"),
        format!("sell my house fast {location}"),
        format!("cash home buyers {location}"),
        format!("we buy houses {location}"),
    ]
}

fn prompt(content_type: ContentType, title: &str, keyword: &str, location: &str) -> String {
    let sections: Vec<String> =
        content_type.outline().iter().map(|s| format!("- {s}")).collect();
    format!(
        "Write the {kind} \"{title}\"\n\
         Audience: homeowners in {location} considering a direct cash sale.\n\
         Primary keyword: {keyword}. Use it naturally in the first paragraph and one heading.\n\
         Sections:\n{sections}\n\
         Keep the tone plain and helpful. Do not promise a specific price.",
        kind = content_type.as_str().replace('_', " "),
        sections = sections.join("\n"),
    )
}

#[async_trait]
impl Agent for SeoContentAgent {
    fn name(&self) -> &str {
        "SEOContent"
    }

    fn description(&self) -> &str {
        "Generates search-optimized content for seller acquisition"
    }

    fn model(&self) -> &str {
        self.generator.generator_id()
    }

    fn validate(&self, task: &Task) -> bool {
        task.has_keys(&["content_type", "keyword"])
    }

    async fn execute(&self, task: &Task) -> Result<Payload, AgentError> {
        let label = task.string("content_type").unwrap_or_default();
        let content_type = ContentType::parse(&label)
            .ok_or_else(|| AgentError::InvalidInput(format!("Unknown content type: {label}")))?;
        let keyword = task
            .string("keyword")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AgentError::InvalidInput("'keyword' must be a non-empty string".to_string()))?;
        let location = task
            .string("location")
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        let title = content_type.title(&keyword, &location);
        info!(content_type = content_type.as_str(), keyword = %keyword, "Drafting content");

        let parameters = GenerationParameters::new(TEMPERATURE, MAX_TOKENS)
            .with_system("You write clear, accurate real estate marketing copy.");
        let generation = draft(
            self.generator.as_ref(),
            &prompt(content_type, &title, &keyword, &location),
            parameters,
            self.settings.runtime.generator_timeout(),
        )
        .await?;

        to_payload(&ContentPiece {
            content_type: content_type.as_str(),
            slug: slugify(&title),
            meta_description: truncate_chars(
                &content_type.meta_description(&keyword, &location),
                META_DESCRIPTION_MAX_CHARS,
            ),
            seo_keywords: keywords(&keyword, &location),
            outline: content_type.outline().to_vec(),
            word_count: generation.content.split_whitespace().count(),
            model: generation
                .model_id
                .clone()
                .unwrap_or_else(|| self.generator.generator_id().to_string()),
            tokens_used: generation.total_tokens(),
            body: generation.content,
            keyword,
            location,
            title,
        })
    }
}
