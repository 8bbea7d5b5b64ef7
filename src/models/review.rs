// src/models/review.rs
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: String,          // "{paper_id}/{review_type}", unique within a batch
    pub paper_id: String,    // Paper the review was written for
    pub review_type: String, // Which reviewer/system produced the text
    pub position: usize,     // 1-based position in the batch
    pub content: String,     // Raw review text
}

impl Review {
    pub fn new(paper_id: &str, review_type: &str, position: usize, content: String) -> Self {
        Self {
            id: format!("{paper_id}/{review_type}"),
            paper_id: paper_id.to_string(),
            review_type: review_type.to_string(),
            position,
            content,
        }
    }

    pub fn sections(&self) -> ReviewSections {
        parse_review(&self.content)
    }
}

/// Review text split into the sections a reviewer is asked to fill in.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewSections {
    pub summary: Option<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub questions: Vec<String>,
}

impl ReviewSections {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.strengths.is_empty()
            && self.weaknesses.is_empty()
            && self.questions.is_empty()
    }
}

const SUMMARY: &str = "**Summary**";
const STRENGTHS: &str = "**Strengths**";
const WEAKNESSES: &str = "**Weaknesses**";
const QUESTIONS: &str = "**Questions**";

/// Splits markdown-ish review text on its bold section markers.
/// Each section runs until the marker of the section that follows it.
pub fn parse_review(text: &str) -> ReviewSections {
    let summary = section_body(text, SUMMARY, Some(STRENGTHS))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    ReviewSections {
        summary,
        strengths: bullet_points(section_body(text, STRENGTHS, Some(WEAKNESSES))),
        weaknesses: bullet_points(section_body(text, WEAKNESSES, Some(QUESTIONS))),
        questions: bullet_points(section_body(text, QUESTIONS, None)),
    }
}

fn section_body<'a>(text: &'a str, marker: &str, until: Option<&str>) -> Option<&'a str> {
    let start = text.find(marker)? + marker.len();
    let rest = &text[start..];
    let end = until.and_then(|next| rest.find(next)).unwrap_or(rest.len());
    Some(&rest[..end])
}

fn bullet_points(body: Option<&str>) -> Vec<String> {
    let Some(body) = body else {
        return Vec::new();
    };
    body.trim()
        .split("\n-")
        .map(|point| {
            let point = point.trim();
            point.strip_prefix('-').map(str::trim).unwrap_or(point)
        })
        .filter(|point| !point.is_empty())
        .map(str::to_string)
        .collect()
}
