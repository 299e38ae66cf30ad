//! Prompt text for the study operations.

use crate::StudyPlanParams;

/// System instruction for one-shot tutoring answers.
pub(crate) const AI_TUTOR_INSTRUCTION: &str = r#"You are "LearnSphere AI", an expert AI tutor. Your goal is to help users understand any educational topic by providing clear, step-by-step explanations. You have access to Google Search to find up-to-date information.
When a user asks a question, follow these rules:
1.  **Analyze the Question**: Identify the subject (e.g., Math, Science, History, Literature) and the core concepts involved.
2.  **Provide a Comprehensive Answer**: Break down the explanation into logical, easy-to-follow steps or sections. Explain the reasoning clearly.
3.  **Final Answer/Summary**: Clearly state the final answer or provide a concise summary at the end.
4.  **Formatting**: Use Markdown for clarity. Use **bold** for key terms, newlines for separation, and wrap final answers or key results in a code block. For example: `Key takeaway: The mitochondria is the powerhouse of the cell.`.
5.  **Tone**: Be encouraging, clear, and concise. Assume the user is learning.

**About Your Creator**: If asked about who made you, who created you, your developer, or any similar question, you must state that you were developed by a single developer named Goodluck Magenyi. Do not reveal you are a large language model unless directly asked about your underlying technology.
"#;

/// System instruction for the conversational tutor.
pub(crate) const AI_TUTOR_CHAT_INSTRUCTION: &str = "You are LearnSphere AI, a friendly and encouraging AI Tutor. Your goal is to have a natural, helpful conversation with the user. Help them with their questions, but keep your tone conversational and supportive. Use Markdown for readability. If you are asked about who made you or who your developer is, you must say you were created by a single developer named Goodluck Magenyi.";

pub(crate) fn video_summary(url: &str) -> String {
    format!(
        "Please provide a concise summary of the YouTube video found at this URL: {}. The summary should be well-structured using Markdown for clarity (headings, bold text, bullet points). Base your summary on information available on the web.",
        url
    )
}

pub(crate) fn essay_feedback(essay: &str) -> String {
    format!(
        "Act as an expert writing instructor. Analyze the following essay and provide constructive feedback. Structure your feedback in Markdown with these sections:
### Overall Impression
A brief, encouraging summary.
### Strengths
- Point 1
- Point 2
### Areas for Improvement
- Point 1 (with suggestions)
- Point 2 (with suggestions)
### Suggested Grade
Provide a letter grade (e.g., A-, B+) with a short justification.

Essay:
{}",
        essay
    )
}

pub(crate) fn quiz_question(subject: &str, difficulty: &str) -> String {
    format!(
        "Generate a unique multiple-choice math quiz question about {} with a {} difficulty. Provide one correct answer and three plausible but incorrect distractors.",
        subject, difficulty
    )
}

pub(crate) fn optimize_note(transcript: &str) -> String {
    format!(
        "Take the following raw transcript and structure it into a coherent note. Use headings, bullet points, and bolded keywords to organize the information. Correct any grammatical errors and improve clarity. The output should be well-formatted Markdown.\n\nTranscript:\n{}",
        transcript
    )
}

pub(crate) fn quiz_from_note(note: &str) -> String {
    format!(
        "Based on the following note, generate 3 multiple-choice questions to test understanding. Provide one correct answer and three plausible distractors for each question.\n\nNote:\n{}",
        note
    )
}

pub(crate) fn flashcards_from_note(note: &str) -> String {
    format!(
        "Based on the following note, generate 5 flashcards with a key term or question on the 'front' and a definition or answer on the 'back'.\n\nNote:\n{}",
        note
    )
}

pub(crate) fn suggestion_reply(category: &str, message: &str) -> String {
    format!(
        "A user has submitted feedback for the app. Category: {}, Message: \"{}\". Generate a warm, appreciative response confirming receipt. Act as a friendly product manager. Keep it concise (2-3 sentences).",
        category, message
    )
}

pub(crate) fn explanation(note: &str) -> String {
    format!(
        "Based on the following note, create two things:
1. A concise and clear \"script\" (around 100-150 words) that explains the main topic in a way that could be read aloud by a tutor.
2. A simple, descriptive \"image_prompt\" for an AI image generator to create a helpful visual aid (like a diagram, chart, or illustrative scene) for this topic.
Note: {}",
        note
    )
}

pub(crate) fn study_plan(params: &StudyPlanParams) -> String {
    format!(
        "A student from {} in their {} of education needs a study plan.
Their main goal is: \"{}\".
The primary subject to focus on is: \"{}\".
Create a {}-day study plan to help them achieve this goal.
For each day, provide a main focus and 2-4 specific, actionable tasks as an array of strings.",
        params.country, params.level, params.goal, params.subject, params.duration
    )
}

pub(crate) fn audio_recap(note: &str) -> String {
    format!(
        "Transform the following study note into a \"podcast-style\" audio script (400-600 words). Make it engaging, conversational, and easy to understand when listened to. Use clear explanations and summarize key points at the end.\n\nNote:\n{}",
        note
    )
}

pub(crate) fn study_fact(field: &str) -> String {
    format!(
        "Generate a single, interesting, and concise hint, tip, or fun fact for a student studying {}. Keep it to one or two sentences. Make it encouraging and insightful.",
        field
    )
}

pub(crate) fn daily_challenge(field: &str) -> String {
    format!(
        "Generate a single, unique, and challenging multiple-choice quiz question for a student studying {}. Provide one correct answer and three plausible but incorrect distractors. The question should be a \"thought-provoker\" style question adapted to a multiple-choice format.",
        field
    )
}
